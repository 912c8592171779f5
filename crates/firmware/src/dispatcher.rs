//! Stack event dispatch.
//!
//! [`WriteDispatcher`] owns the wireless stack handle and the front-end
//! outputs. It sleeps on the [`SignalBridge`] and, on every wake, drains the
//! stack's event queue completely: one interrupt signal may stand for
//! several queued events.
//!
//! # Write requests
//!
//! Writes are routed by attribute handle ([`AttributeMap::classify`]):
//!
//! | Register   | Effect                                                    |
//! |------------|-----------------------------------------------------------|
//! | value      | locked store (bounded wait), clamp to 0–100, dim compare  |
//! | gain       | store code, drive the gain bank from [`gain_decode`]      |
//! | channel    | store code, drive the channel bank from [`channel_decode`]|
//! | oscillator | store code, console only                                  |
//! | misc       | store code, console only                                  |
//!
//! Every write request is acknowledged exactly once, whether or not its
//! handle matched and whether or not the register update succeeded.
//!
//! [`AttributeMap::classify`]: crate::config::AttributeMap::classify

use bluetooth::{
    AdvertisingMode, BleStack, BluetoothState, ConnectionHandle, DeviceAddresses, StackEvent,
    StackState, WriteRequest,
};
use core::fmt;
use embassy_futures::yield_now;
use embassy_sync::blocking_mutex::raw::RawMutex;
use platform::{Console, OutputPin, PwmChannel};

use crate::codec::{channel_decode, channel_label, gain_decode, gain_level};
use crate::config::DispatcherConfig;
use crate::error::FirmwareError;
use crate::front_end::FrontEnd;
use crate::registers::{ControlRegister, ControlRegisters};
use crate::signal_bridge::SignalBridge;

/// The dispatcher task's state.
pub struct WriteDispatcher<'a, M, S, P, W, C>
where
    M: RawMutex,
{
    registers: &'a ControlRegisters<M>,
    stack: S,
    front_end: FrontEnd<P, W>,
    console: C,
    config: DispatcherConfig,
    link: BluetoothState,
}

impl<'a, M, S, P, W, C> WriteDispatcher<'a, M, S, P, W, C>
where
    M: RawMutex,
    S: BleStack,
    P: OutputPin,
    W: PwmChannel,
    C: Console,
{
    /// Build a dispatcher. Nothing touches the stack until
    /// [`start_stack`](Self::start_stack).
    pub fn new(
        registers: &'a ControlRegisters<M>,
        stack: S,
        front_end: FrontEnd<P, W>,
        console: C,
        config: DispatcherConfig,
    ) -> Self {
        Self {
            registers,
            stack,
            front_end,
            console,
            config,
            link: BluetoothState::new(),
        }
    }

    /// Start the stack and process events until it reports
    /// [`StackState::On`]. The stack-on event itself is dispatched like any
    /// other, so advertising is already running when this returns.
    pub async fn start_stack(&mut self) -> Result<(), FirmwareError> {
        self.stack.start().map_err(|_| FirmwareError::StackStart)?;
        log_info!("stack started, waiting for it to come on");
        while self.stack.state() != StackState::On {
            if self.drain().await == 0 {
                yield_now().await;
            }
        }
        log_info!("stack on");
        Ok(())
    }

    /// Wait on `bridge`, drain, repeat. Never returns.
    pub async fn run<B: RawMutex>(&mut self, bridge: &SignalBridge<B>) -> ! {
        loop {
            bridge.wait().await;
            let handled = self.drain().await;
            log_trace!("drained {} events", handled);
        }
    }

    /// Dispatch every event the stack currently has queued. Returns how many
    /// were handled.
    pub async fn drain(&mut self) -> usize {
        let mut handled = 0usize;
        while let Some(event) = self.stack.poll_event() {
            self.handle_event(event).await;
            handled = handled.saturating_add(1);
        }
        handled
    }

    /// Dispatch a single event.
    pub async fn handle_event(&mut self, event: StackEvent) {
        match event {
            StackEvent::StackOn => self.begin_advertising(),
            StackEvent::GapDisconnected => {
                self.link.on_disconnected();
                self.console.write_line("disconnected");
                self.begin_advertising();
            }
            StackEvent::GattConnected(connection) => self.on_connected(connection),
            StackEvent::GattDisconnected(connection) => {
                log_debug!("gatt bearer closed on {}", connection.att_id);
            }
            StackEvent::WriteRequest(request) => self.handle_write(request).await,
            StackEvent::DeviceAddressRead(addresses) => self.report_addresses(&addresses),
            StackEvent::StackBusyStatus { busy } => log_debug!("stack busy: {}", busy),
            StackEvent::MtuExchangeRequest { mtu, .. } => log_debug!("mtu exchange: {}", mtu),
            StackEvent::ReadAccessRequest { handle, .. } => {
                log_debug!("read access on handle {:x}", handle.get());
            }
            StackEvent::HardwareError => {
                log_error!("radio controller hardware error");
                self.console.write_line("hardware error");
            }
            StackEvent::Timeout => log_warn!("stack procedure timed out"),
            StackEvent::Unknown(code) => {
                log_warn!("unknown stack event {:x}", code);
                self.console.print(format_args!("unknown event: 0x{code:x}"));
            }
            other @ (StackEvent::DeviceAddressSet
            | StackEvent::TxPowerSet
            | StackEvent::AdvertisingStartStop
            | StackEvent::GapConnected
            | StackEvent::ConnectionParametersUpdated) => {
                log_debug!("stack event: {}", other.name());
            }
        }
    }

    fn begin_advertising(&mut self) {
        if let Err(err) = self.front_end.show_waiting() {
            log_error!("waiting indicator: {}", err.as_str());
        }
        match self.stack.start_advertising(AdvertisingMode::Fast) {
            Ok(()) => self.console.write_line("start advertising"),
            Err(_) => {
                log_error!("{}", FirmwareError::Advertising.as_str());
                self.console.print(format_args!("{}", FirmwareError::Advertising));
            }
        }
    }

    fn on_connected(&mut self, connection: ConnectionHandle) {
        self.link.on_connected(connection);
        if let Err(err) = self.front_end.show_connected() {
            log_error!("connected indicator: {}", err.as_str());
        }
        self.console.print(format_args!(
            "active connection: att {} bd {}",
            connection.att_id, connection.bd_handle
        ));
    }

    fn report_addresses(&mut self, addresses: &DeviceAddresses) {
        self.console
            .print(format_args!("public address: {}", Address(&addresses.public)));
        self.console
            .print(format_args!("private address: {}", Address(&addresses.private)));
    }

    async fn handle_write(&mut self, request: WriteRequest) {
        let handle = request.handle;
        match (self.config.handles.classify(handle), request.first_byte()) {
            (Some(register), Some(byte)) => {
                if let Err(err) = self.apply(register, byte).await {
                    log_error!("{} write dropped: {}", register.as_str(), err.as_str());
                    self.console
                        .print(format_args!("{} write dropped: {}", register.as_str(), err));
                }
            }
            (Some(register), None) => {
                log_warn!("empty write to {} register", register.as_str());
            }
            (None, _) => {
                log_warn!("write to unmapped handle {:x}", handle.get());
            }
        }

        if self.stack.send_write_response(request.connection).is_err() {
            log_error!("{}", FirmwareError::WriteResponse.as_str());
        }
    }

    async fn apply(&mut self, register: ControlRegister, byte: u8) -> Result<(), FirmwareError> {
        match register {
            ControlRegister::Value => {
                let value = self
                    .registers
                    .store_value(byte, self.config.lock_timeout)
                    .await?;
                self.front_end.set_brightness(value)?;
                self.console.print(format_args!("value: {}", value.get()));
            }
            ControlRegister::Gain => {
                self.registers.set_gain(byte);
                self.front_end.apply_gain(gain_decode(byte))?;
                self.console.print(format_args!("gain: {}", gain_level(byte)));
            }
            ControlRegister::Channel => {
                self.registers.set_channel(byte);
                self.front_end.apply_channel(channel_decode(byte))?;
                self.console
                    .print(format_args!("channel select: {}", channel_label(byte)));
            }
            ControlRegister::Oscillator => {
                self.registers.set_oscillator(byte);
                self.console
                    .print(format_args!("oscillator register: 0x{byte:02x}"));
            }
            ControlRegister::Misc => {
                self.registers.set_misc(byte);
                self.console.print(format_args!("misc register: 0x{byte:02x}"));
            }
        }
        Ok(())
    }

    /// The stack handle.
    pub fn stack(&self) -> &S {
        &self.stack
    }

    /// Mutable stack handle, for queueing events from outside the task.
    pub fn stack_mut(&mut self) -> &mut S {
        &mut self.stack
    }

    /// The front-end outputs.
    pub fn front_end(&self) -> &FrontEnd<P, W> {
        &self.front_end
    }

    /// The diagnostic console.
    pub fn console(&self) -> &C {
        &self.console
    }

    /// Current connection state.
    pub fn link(&self) -> &BluetoothState {
        &self.link
    }

    /// Shared register file.
    pub fn registers(&self) -> &'a ControlRegisters<M> {
        self.registers
    }
}

/// Device address, most significant byte first.
struct Address<'a>(&'a [u8; 6]);

impl fmt::Display for Address<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, byte) in self.0.iter().rev().enumerate() {
            if i > 0 {
                f.write_str(":")?;
            }
            write!(f, "{byte:02X}")?;
        }
        Ok(())
    }
}
