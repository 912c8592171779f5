//! Architecture boundary tests. Run with `cargo test -p firmware --test arch_boundaries`
// Architecture test file: unwrap/panic are intentional test mechanisms.
#![allow(clippy::unwrap_used, clippy::panic, clippy::arithmetic_side_effects)]
//!
//! Layering rules:
//!   Rule 1: platform (HAL traits) must not depend on firmware or bluetooth
//!   Rule 2: bluetooth (stack boundary) must not depend on firmware or platform
//!   Rule 3: firmware reaches hardware and the stack only through those traits
//!
//! The dependency graph in each crate's Cargo.toml is the real enforcement;
//! these tests fail to compile if a boundary type moves or a trait stops
//! being implementable from outside its crate.

use bluetooth::{BleStack, ConnectionHandle, StackEvent, StackState};
use platform::{Console, OutputPin, PwmChannel};

/// The HAL traits can be implemented without any firmware types.
#[test]
fn platform_traits_are_implementable_standalone() {
    struct Line(bool);
    impl OutputPin for Line {
        type Error = core::convert::Infallible;
        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.0 = true;
            Ok(())
        }
        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.0 = false;
            Ok(())
        }
    }

    struct Sink(usize);
    impl Console for Sink {
        fn write_line(&mut self, _line: &str) {
            self.0 += 1;
        }
    }

    let mut line = Line(false);
    line.set_state(platform::PinState::High).unwrap();
    assert!(line.0);

    let mut sink = Sink(0);
    sink.print(format_args!("{}", 1));
    assert_eq!(sink.0, 1);

    fn _assert_pwm_trait_exists<T: PwmChannel>() {}
}

/// A stack adapter needs nothing from firmware or platform.
#[test]
fn bluetooth_stack_is_implementable_standalone() {
    struct Idle;
    impl BleStack for Idle {
        type Error = ();
        fn start(&mut self) -> Result<(), ()> {
            Ok(())
        }
        fn state(&self) -> StackState {
            StackState::Stopped
        }
        fn poll_event(&mut self) -> Option<StackEvent> {
            None
        }
        fn send_write_response(&mut self, _connection: ConnectionHandle) -> Result<(), ()> {
            Ok(())
        }
        fn start_advertising(&mut self, _mode: bluetooth::AdvertisingMode) -> Result<(), ()> {
            Ok(())
        }
    }

    let mut stack = Idle;
    assert!(stack.poll_event().is_none());
}

/// Attribute handles in the firmware config are the ones the dispatcher
/// routes; two registers never share a handle.
#[test]
fn attribute_handles_are_distinct() {
    use firmware::config::{
        CHANNEL_HANDLE, GAIN_HANDLE, MISC_HANDLE, OSCILLATOR_HANDLE, VALUE_HANDLE,
    };
    let handles = [
        VALUE_HANDLE,
        GAIN_HANDLE,
        CHANNEL_HANDLE,
        OSCILLATOR_HANDLE,
        MISC_HANDLE,
    ];
    for (i, a) in handles.iter().enumerate() {
        for b in handles.iter().skip(i + 1) {
            if a == b {
                panic!("duplicate attribute handle {:#06x}", a.get());
            }
        }
    }
}
