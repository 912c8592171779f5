//! Write dispatcher scenarios
//!
//! Drives `WriteDispatcher` against `MockStack`, mock lines/generators and a
//! capturing console: register writes, connection changes, drain behaviour
//! and the acknowledgement contract.
//!
//! Run with: cargo test -p firmware --test dispatcher_scenarios

#![allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::panic)]

use bluetooth::{
    AdvertisingMode, AttributeHandle, BleStack, ConnectionHandle, MockStack, StackEvent, StackState,
    WriteRequest,
};
use embassy_futures::select::select;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_time::{Duration, Timer};
use firmware::config::{
    CHANNEL_HANDLE, GAIN_HANDLE, MISC_HANDLE, OSCILLATOR_HANDLE, VALUE_HANDLE,
};
use firmware::{
    ControlRegisters, ControlValue, DispatcherConfig, FirmwareError, FrontEnd, SignalBridge,
    WriteDispatcher,
};
use platform::mocks::{MockConsole, MockPin, MockPwm};

type Registers = ControlRegisters<CriticalSectionRawMutex>;
type Dispatcher<'a> =
    WriteDispatcher<'a, CriticalSectionRawMutex, MockStack, MockPin, MockPwm, MockConsole>;

const PEER: ConnectionHandle = ConnectionHandle::new(1, 0);

fn pins<const N: usize>(prefix: &'static str) -> [MockPin; N] {
    core::array::from_fn(|_| MockPin::new(prefix))
}

fn dispatcher(registers: &Registers) -> Dispatcher<'_> {
    let front_end = FrontEnd::new(
        pins("pa"),
        pins("mux"),
        pins("osc"),
        pins("misc"),
        MockPin::new("mux_en"),
        MockPwm::new(),
        MockPwm::new(),
    );
    WriteDispatcher::new(
        registers,
        MockStack::new(),
        front_end,
        MockConsole::new(),
        DispatcherConfig::default(),
    )
}

fn write(handle: AttributeHandle, value: &[u8]) -> StackEvent {
    StackEvent::WriteRequest(WriteRequest::new(PEER, handle, value).unwrap())
}

fn levels(bank: &[MockPin]) -> Vec<bool> {
    bank.iter().map(MockPin::is_set_high).collect()
}

fn line_writes(d: &Dispatcher<'_>) -> usize {
    let fe = d.front_end();
    fe.gain_lines()
        .iter()
        .chain(fe.channel_lines())
        .chain(fe.oscillator_lines())
        .chain(fe.misc_lines())
        .map(MockPin::write_count)
        .sum()
}

// ── Register writes ──────────────────────────────────────────────────────────

#[tokio::test]
async fn oscillator_write_is_stored_logged_and_acked_once() {
    let registers = Registers::new();
    let mut d = dispatcher(&registers);

    d.handle_event(write(OSCILLATOR_HANDLE, &[0x10])).await;

    assert_eq!(registers.oscillator(), 16);
    assert!(d.console().contains("0x10"));
    assert_eq!(line_writes(&d), 0);
    assert_eq!(d.stack().write_responses(), &[PEER]);
}

#[tokio::test]
async fn gain_nine_drives_1001_and_reports_x256() {
    let registers = Registers::new();
    let mut d = dispatcher(&registers);

    d.handle_event(write(GAIN_HANDLE, &[0x09])).await;

    assert_eq!(registers.gain(), 9);
    assert_eq!(levels(d.front_end().gain_lines()), [true, false, false, true]);
    assert_eq!(d.console().last(), Some("gain: x256"));
    assert_eq!(d.stack().write_response_count(), 1);
}

#[tokio::test]
async fn channel_out_of_table_selects_all_high() {
    let registers = Registers::new();
    let mut d = dispatcher(&registers);

    d.handle_event(write(CHANNEL_HANDLE, &[0x0F])).await;

    assert_eq!(registers.channel(), 0x0F);
    assert_eq!(levels(d.front_end().channel_lines()), [true; 4]);
    assert_eq!(d.console().last(), Some("channel select: F"));
}

#[tokio::test]
async fn misc_write_has_no_line_effect() {
    let registers = Registers::new();
    let mut d = dispatcher(&registers);

    d.handle_event(write(MISC_HANDLE, &[0x01])).await;

    assert_eq!(registers.misc(), 1);
    assert_eq!(line_writes(&d), 0);
    assert_eq!(d.console().last(), Some("misc register: 0x01"));
}

#[tokio::test]
async fn value_150_is_clamped_before_driving_the_dimmer() {
    let registers = Registers::new();
    let mut d = dispatcher(&registers);

    d.handle_event(write(VALUE_HANDLE, &[150])).await;

    assert_eq!(registers.try_value(), Some(ControlValue::new(100)));
    assert_eq!(d.front_end().dim().compare(), Some(100));
    assert_eq!(d.console().last(), Some("value: 100"));
    assert_eq!(d.stack().write_response_count(), 1);
}

#[tokio::test]
async fn value_write_is_dropped_when_lock_is_held() {
    let registers = Registers::new();
    let mut d = dispatcher(&registers);

    let guard = registers.value_lock().lock().await;
    d.handle_event(write(VALUE_HANDLE, &[42])).await;
    drop(guard);

    assert_eq!(registers.try_value(), Some(ControlValue::new(0)));
    assert_eq!(d.front_end().dim().compare_write_count(), 0);
    assert!(d.console().contains("value write dropped"));
    // The acknowledgement is owed regardless.
    assert_eq!(d.stack().write_response_count(), 1);
}

#[tokio::test]
async fn empty_payload_changes_nothing_but_is_acked() {
    let registers = Registers::new();
    let mut d = dispatcher(&registers);

    d.handle_event(write(GAIN_HANDLE, &[])).await;

    assert_eq!(registers.gain(), 0x01);
    assert_eq!(line_writes(&d), 0);
    assert_eq!(d.stack().write_response_count(), 1);
}

#[tokio::test]
async fn unmapped_handle_is_acked_without_effect() {
    let registers = Registers::new();
    let mut d = dispatcher(&registers);
    let before = registers.snapshot();

    d.handle_event(write(AttributeHandle::new(0x0042), &[0x05])).await;

    assert_eq!(registers.snapshot(), before);
    assert_eq!(d.stack().write_response_count(), 1);
}

#[tokio::test]
async fn rejected_ack_does_not_undo_the_write() {
    let registers = Registers::new();
    let mut d = dispatcher(&registers);
    d.stack_mut().fail_write_responses(true);

    d.handle_event(write(GAIN_HANDLE, &[0x03])).await;

    assert_eq!(registers.gain(), 3);
    assert_eq!(d.stack().write_response_count(), 0);
}

// ── Lifecycle events ─────────────────────────────────────────────────────────

#[tokio::test]
async fn connect_switches_to_connected_indicator() {
    let registers = Registers::new();
    let mut d = dispatcher(&registers);

    d.handle_event(StackEvent::StackOn).await;
    d.handle_event(StackEvent::GattConnected(PEER)).await;

    assert!(d.front_end().dim().is_running());
    assert!(!d.front_end().blink().is_running());
    assert_eq!(d.link().connection(), Some(PEER));
    assert!(d.console().contains("active connection"));
}

#[tokio::test]
async fn disconnect_restarts_advertising_and_waiting_indicator() {
    let registers = Registers::new();
    let mut d = dispatcher(&registers);
    d.handle_event(StackEvent::GattConnected(PEER)).await;

    d.handle_event(StackEvent::GapDisconnected).await;

    let fe = d.front_end();
    assert!(fe.blink().is_running());
    assert!(!fe.dim().is_running());
    assert_eq!(fe.dim().reload_count(), 1);
    assert_eq!(d.stack().advertising(), Some(AdvertisingMode::Fast));
    assert_eq!(d.stack().advertising_starts(), 1);
    assert!(!d.link().connected());
    assert_eq!(d.console().last(), Some("start advertising"));
}

#[tokio::test]
async fn unknown_event_logs_raw_code_only() {
    let registers = Registers::new();
    let mut d = dispatcher(&registers);

    d.handle_event(StackEvent::Unknown(0x7F)).await;

    assert_eq!(d.console().last(), Some("unknown event: 0x7f"));
    assert_eq!(d.stack().write_response_count(), 0);
    assert_eq!(d.stack().advertising_starts(), 0);
}

#[tokio::test]
async fn device_address_is_printed() {
    let registers = Registers::new();
    let mut d = dispatcher(&registers);

    d.handle_event(StackEvent::DeviceAddressRead(bluetooth::DeviceAddresses {
        public: [0x01, 0x02, 0x03, 0x04, 0x05, 0x06],
        private: [0; 6],
    }))
    .await;

    assert!(d.console().contains("public address: 06:05:04:03:02:01"));
    assert!(d.console().contains("private address: 00:00:00:00:00:00"));
}

// ── Startup and drain ────────────────────────────────────────────────────────

#[tokio::test]
async fn start_stack_drains_until_on_and_advertises() {
    let registers = Registers::new();
    let mut d = dispatcher(&registers);
    d.stack_mut().push_event(StackEvent::StackOn).unwrap();

    d.start_stack().await.unwrap();

    assert_eq!(d.stack().state(), StackState::On);
    assert_eq!(d.stack().advertising_starts(), 1);
    assert!(d.front_end().blink().is_running());
    assert!(d.console().contains("start advertising"));
}

#[tokio::test]
async fn start_stack_reports_refusal() {
    let registers = Registers::new();
    let mut d = dispatcher(&registers);
    d.stack_mut().fail_start(true);

    assert_eq!(d.start_stack().await, Err(FirmwareError::StackStart));
}

#[tokio::test]
async fn drain_handles_every_queued_event() {
    let registers = Registers::new();
    let mut d = dispatcher(&registers);
    d.stack_mut().push_event(write(GAIN_HANDLE, &[2])).unwrap();
    d.stack_mut().push_event(write(CHANNEL_HANDLE, &[5])).unwrap();
    d.stack_mut().push_event(StackEvent::GapConnected).unwrap();

    assert_eq!(d.drain().await, 3);
    assert_eq!(d.drain().await, 0);
    assert_eq!((registers.gain(), registers.channel()), (2, 5));
}

#[tokio::test]
async fn one_notify_releases_a_full_burst() {
    let registers = Registers::new();
    let bridge: SignalBridge = SignalBridge::new();
    let mut d = dispatcher(&registers);
    for byte in [10u8, 20, 30] {
        d.stack_mut().push_event(write(VALUE_HANDLE, &[byte])).unwrap();
    }
    bridge.notify();

    let _ = select(d.run(&bridge), Timer::after(Duration::from_millis(50))).await;

    assert_eq!(d.stack().pending_events(), 0);
    assert_eq!(d.stack().write_response_count(), 3);
    assert_eq!(registers.try_value(), Some(ControlValue::new(30)));
    assert_eq!(bridge.pending(), 0);
}

#[tokio::test]
async fn events_are_handled_in_queue_order() {
    let registers = Registers::new();
    let mut d = dispatcher(&registers);
    d.stack_mut().push_event(write(CHANNEL_HANDLE, &[1])).unwrap();
    d.stack_mut().push_event(write(CHANNEL_HANDLE, &[14])).unwrap();

    d.drain().await;

    assert_eq!(registers.channel(), 14);
    let lines: Vec<&str> = d.console().lines().collect();
    assert_eq!(lines, ["channel select: 1", "channel select: E"]);
}
