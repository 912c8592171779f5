//! Controller Emulator
//!
//! Runs the dispatcher and heartbeat on the desktop. A producer thread
//! stands in for the radio interrupt: it queues raw stack events and calls
//! `SignalBridge::notify`, including bursts where one notify covers several
//! events. Lines, generators and the console all log through `tracing`.
//!
//! Run with: cargo run -p firmware --example controller_emulator --features emulator
//! Verbose:  RUST_LOG=debug cargo run -p firmware --example controller_emulator --features emulator

use std::convert::Infallible;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

use bluetooth::{
    AdvertisingMode, BleStack, ConnectionHandle, EventCode, StackEvent, StackState,
};
use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use firmware::config::{
    CHANNEL_HANDLE, DEVICE_NAME, FIRMWARE_VERSION, GAIN_HANDLE, MISC_HANDLE, OSCILLATOR_HANDLE,
    VALUE_HANDLE,
};
use firmware::{
    claim_bridge, prepare_front_end, run_controller, ControlRegisters, DispatcherConfig, FrontEnd,
    SignalBridge, WriteDispatcher,
};
use platform::{Console, OutputPin, PwmChannel};
use static_cell::StaticCell;
use tracing_subscriber::EnvFilter;

static BRIDGE: StaticCell<SignalBridge> = StaticCell::new();
static REGISTERS: ControlRegisters<CriticalSectionRawMutex> = ControlRegisters::new();

/// Raw `(code, payload)` frame as a radio driver would hand it over.
type Frame = (u32, Vec<u8>);

// ── Emulated stack ───────────────────────────────────────────────────────────

struct EmulatedStack {
    frames: Receiver<Frame>,
    state: StackState,
}

impl BleStack for EmulatedStack {
    type Error = Infallible;

    fn start(&mut self) -> Result<(), Self::Error> {
        tracing::info!("stack: start");
        self.state = StackState::Initializing;
        Ok(())
    }

    fn state(&self) -> StackState {
        self.state
    }

    fn poll_event(&mut self) -> Option<StackEvent> {
        loop {
            let (code, payload) = self.frames.try_recv().ok()?;
            match StackEvent::decode(code, &payload) {
                Ok(event) => {
                    if event == StackEvent::StackOn {
                        self.state = StackState::On;
                    }
                    return Some(event);
                }
                Err(err) => tracing::warn!(code, ?err, "stack: dropping malformed frame"),
            }
        }
    }

    fn send_write_response(&mut self, connection: ConnectionHandle) -> Result<(), Self::Error> {
        tracing::debug!(att = connection.att_id, bd = connection.bd_handle, "stack: write response");
        Ok(())
    }

    fn start_advertising(&mut self, mode: AdvertisingMode) -> Result<(), Self::Error> {
        tracing::info!(?mode, "stack: advertising");
        Ok(())
    }
}

// ── Emulated front end ───────────────────────────────────────────────────────

struct EmulatedLine(&'static str);

impl OutputPin for EmulatedLine {
    type Error = Infallible;

    fn set_high(&mut self) -> Result<(), Self::Error> {
        tracing::trace!(line = self.0, "high");
        Ok(())
    }

    fn set_low(&mut self) -> Result<(), Self::Error> {
        tracing::trace!(line = self.0, "low");
        Ok(())
    }
}

struct EmulatedGenerator(&'static str);

impl PwmChannel for EmulatedGenerator {
    type Error = Infallible;

    fn start(&mut self) -> Result<(), Self::Error> {
        tracing::debug!(generator = self.0, "start");
        Ok(())
    }

    fn disable(&mut self) -> Result<(), Self::Error> {
        tracing::debug!(generator = self.0, "disable");
        Ok(())
    }

    fn trigger_reload(&mut self) -> Result<(), Self::Error> {
        tracing::trace!(generator = self.0, "reload");
        Ok(())
    }

    fn set_compare(&mut self, compare: u32) -> Result<(), Self::Error> {
        tracing::debug!(generator = self.0, compare, "compare");
        Ok(())
    }
}

/// Console lines become `tracing` events on the `console` target.
struct TracingConsole;

impl Console for TracingConsole {
    fn write_line(&mut self, line: &str) {
        tracing::info!(target: "console", "{line}");
    }
}

fn front_end() -> FrontEnd<EmulatedLine, EmulatedGenerator> {
    FrontEnd::new(
        [
            EmulatedLine("pa0"),
            EmulatedLine("pa1"),
            EmulatedLine("pa2"),
            EmulatedLine("pa3"),
        ],
        [
            EmulatedLine("mux0"),
            EmulatedLine("mux1"),
            EmulatedLine("mux2"),
            EmulatedLine("mux3"),
        ],
        [EmulatedLine("osc0"), EmulatedLine("osc1"), EmulatedLine("osc2")],
        [
            EmulatedLine("misc0"),
            EmulatedLine("misc1"),
            EmulatedLine("misc2"),
            EmulatedLine("misc3"),
        ],
        EmulatedLine("mux_en"),
        EmulatedGenerator("dim"),
        EmulatedGenerator("blink"),
    )
}

// ── Scripted peer session ────────────────────────────────────────────────────

const PEER: [u8; 2] = [0x01, 0x00];

fn write(handle: bluetooth::AttributeHandle, byte: u8) -> Frame {
    let [lo, hi] = handle.get().to_le_bytes();
    (EventCode::WriteRequest as u32, vec![PEER[0], PEER[1], lo, hi, byte])
}

/// Each inner batch is queued in full before a single notify.
fn script() -> Vec<(Duration, Vec<Frame>)> {
    let ms = Duration::from_millis;
    vec![
        (ms(0), vec![(EventCode::StackOn as u32, vec![])]),
        (
            ms(300),
            vec![
                (EventCode::GapConnected as u32, vec![]),
                (EventCode::GattConnected as u32, PEER.to_vec()),
            ],
        ),
        (ms(200), vec![write(OSCILLATOR_HANDLE, 0x10)]),
        (ms(200), vec![write(GAIN_HANDLE, 0x09)]),
        (ms(200), vec![write(VALUE_HANDLE, 150)]),
        (
            ms(200),
            vec![
                write(CHANNEL_HANDLE, 0x03),
                write(CHANNEL_HANDLE, 0x0F),
                write(MISC_HANDLE, 0x01),
            ],
        ),
        (ms(200), vec![(0x7F, vec![])]),
        (ms(3_600), vec![(EventCode::GapDisconnected as u32, vec![])]),
    ]
}

fn produce(bridge: &'static SignalBridge, frames: Sender<Frame>, done: tokio::sync::oneshot::Sender<()>) {
    for (delay, batch) in script() {
        thread::sleep(delay);
        for frame in batch {
            if frames.send(frame).is_err() {
                return;
            }
        }
        bridge.notify();
    }
    // Let the heartbeat finish its current cycle before exiting.
    thread::sleep(Duration::from_millis(1_000));
    let _ = done.send(());
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    tracing::info!("{DEVICE_NAME} v{FIRMWARE_VERSION} - Controller Emulator");

    let mut front_end = front_end();
    prepare_front_end(&mut front_end).map_err(|err| err.to_string())?;

    let (frame_tx, frame_rx) = mpsc::channel();
    let (done_tx, done_rx) = tokio::sync::oneshot::channel();
    let stack = EmulatedStack {
        frames: frame_rx,
        state: StackState::Stopped,
    };

    let bridge = claim_bridge(&BRIDGE);
    if let Ok(bridge) = bridge {
        thread::spawn(move || produce(bridge, frame_tx, done_tx));
    }

    let dispatcher = WriteDispatcher::new(
        &REGISTERS,
        stack,
        front_end,
        TracingConsole,
        DispatcherConfig::default(),
    );

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    rt.block_on(async {
        match select(run_controller(dispatcher, bridge, TracingConsole), done_rx).await {
            Either::First(never) => never,
            Either::Second(_) => tracing::info!("script finished"),
        }
    });

    Ok(())
}
