//! Novela BLE Controls firmware core
//!
//! Turns attribute writes arriving over the wireless link into analog
//! front-end line patterns, and runs a self-pacing diagnostic heartbeat.
//!
//! # Architecture
//!
//! ```text
//! radio ISR ──notify──▶ SignalBridge ──wait──▶ WriteDispatcher
//!                                                 │ drain events
//!                                                 ▼
//!                        ControlRegisters ◀── store / clamp
//!                              │                  │ decode (codec)
//!                   snapshot   │                  ▼
//!                              ▼               FrontEnd lines + indicators
//!                          heartbeat
//! ```
//!
//! # Features
//!
//! - `defmt` - log through defmt (embedded targets)
//! - `tracing` - log through tracing (desktop)
//! - `std` - Enable standard library (for emulator and testing)
//! - `emulator` - Desktop emulator (tokio, tracing-subscriber, embassy-time std driver)
//!
//! # Emulator
//!
//! ```bash
//! cargo run -p firmware --example controller_emulator --features emulator
//! ```

#![cfg_attr(all(not(test), not(feature = "std")), no_std)]
// Upgrade relevant warns to deny; keep pedantic as warn (too noisy for firmware)
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Critical correctness: deny these
#![deny(clippy::await_holding_lock)] // holding a blocking Mutex across .await is a bug
#![deny(unsafe_op_in_unsafe_fn)]
// unsafe fn body is not implicitly unsafe block
// Logging discipline (allow println in tests via clippy.toml)
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
#![warn(clippy::dbg_macro)] // dbg! should not be left in committed code
// Intentional allows for this codebase:
#![allow(clippy::module_name_repetitions)] // common in Rust crates; not a real issue
#![allow(clippy::missing_errors_doc)] // most errors are self-explanatory
// Pedantic lints too noisy for firmware application code:
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::similar_names)]
#![allow(clippy::unused_self)]
#![allow(clippy::unused_async)]

#[macro_use]
mod fmt;

pub mod codec;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod front_end;
pub mod heartbeat;
pub mod registers;
pub mod signal_bridge;
pub mod startup;

// Re-export key types
pub use codec::{channel_decode, gain_decode, gain_level, GainLevel, LinePattern};
pub use config::{AttributeMap, DispatcherConfig};
pub use dispatcher::WriteDispatcher;
pub use error::FirmwareError;
pub use front_end::FrontEnd;
pub use heartbeat::{run_heartbeat, AdaptiveTimer, Expiry};
pub use registers::{ControlRegister, ControlRegisters, ControlValue, RegisterSnapshot};
pub use signal_bridge::{claim_bridge, SignalBridge};
pub use startup::{prepare_front_end, run_controller};
