//! Hardware Abstraction Layer (HAL) for the Novela front-end controller
//!
//! This crate provides trait-based abstractions for the few hardware
//! primitives the controller touches, enabling development and testing
//! without physical hardware.
//!
//! # Architecture Layers
//!
//! ```text
//! Application Layer (firmware crate: dispatcher, heartbeat)
//!         ↓
//! Wireless stack events (bluetooth crate)
//!         ↓
//! Platform HAL (this crate - trait abstractions)
//!         ↓
//! Hardware Layer (chip HAL via embedded-hal / embedded-io)
//! ```
//!
//! # Primitives
//!
//! - [`OutputPin`] - level-set on a named digital line
//! - [`PwmChannel`] - waveform generator (start, disable, reload, compare)
//! - [`Console`] - line-oriented diagnostic text stream
//!
//! Adapters bridge the ecosystem traits: [`HalOutput`] wraps any
//! `embedded_hal::digital::OutputPin`, [`HalPwm`] wraps any
//! `embedded_hal::pwm::SetDutyCycle` and [`IoConsole`] wraps any
//! `embedded_io::Write`.
//!
//! # Features
//!
//! - `std`: Expose [`mocks`] to downstream tests
//! - `defmt`: Enable defmt derives
//!
//! # Example
//!
//! ```
//! use platform::{Console, OutputPin, PinState};
//!
//! fn select<P: OutputPin, C: Console>(
//!     line: &mut P,
//!     console: &mut C,
//!     high: bool,
//! ) -> Result<(), P::Error> {
//!     line.set_state(PinState::from(high))?;
//!     console.print(format_args!("line -> {}", u8::from(high)));
//!     Ok(())
//! }
//! ```

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(clippy::unreachable)] // no unreachable!() that isn't documented
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)] // unsafe fn body is not implicitly unsafe block
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
#![allow(clippy::doc_markdown)] // line names in doc comments
#![allow(clippy::must_use_candidate)] // hardware accessors; callers decide
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod console;
pub mod gpio;
pub mod pwm;

#[cfg(any(test, feature = "std"))]
pub mod mocks;

pub use console::{Console, ConsoleLine, IoConsole, CONSOLE_LINE_CAPACITY};
pub use gpio::{HalOutput, OutputPin, PinState};
pub use pwm::{HalPwm, PwmChannel};
