//! Controller configuration and constants
//!
//! Central values used across the firmware. Attribute handles come from the
//! generated attribute table and must match the advertised GATT layout.

use bluetooth::AttributeHandle;
use embassy_time::Duration;

use crate::registers::ControlRegister;

/// The device name shown in diagnostics.
pub const DEVICE_NAME: &str = "Novela BLE Controls";

/// Firmware version (synchronized with Cargo.toml)
pub const FIRMWARE_VERSION: &str = env!("CARGO_PKG_VERSION");

// ── Attribute handles ────────────────────────────────────────────────────────

/// Primary value (indicator brightness, 0–100).
pub const VALUE_HANDLE: AttributeHandle = AttributeHandle::new(0x0010);
/// Programmable-amplifier gain code.
pub const GAIN_HANDLE: AttributeHandle = AttributeHandle::new(0x0013);
/// Multiplexer channel code.
pub const CHANNEL_HANDLE: AttributeHandle = AttributeHandle::new(0x0016);
/// Oscillator mode code.
pub const OSCILLATOR_HANDLE: AttributeHandle = AttributeHandle::new(0x0019);
/// Miscellaneous mode code.
pub const MISC_HANDLE: AttributeHandle = AttributeHandle::new(0x001C);

// ── Register defaults ────────────────────────────────────────────────────────

/// Power-on primary value.
pub const DEFAULT_VALUE: u8 = 0;
/// Power-on gain code (x1).
pub const DEFAULT_GAIN: u8 = 0x01;
/// Power-on channel code (channel 0).
pub const DEFAULT_CHANNEL: u8 = 0x00;
/// Power-on oscillator code.
pub const DEFAULT_OSCILLATOR: u8 = 0x10;
/// Power-on misc code (mux enabled).
pub const DEFAULT_MISC: u8 = 0x00;

/// Upper bound of the primary value; larger writes clamp to this.
pub const MAX_VALUE: u8 = 100;

// ── Timing ───────────────────────────────────────────────────────────────────

/// Bounded wait for the primary-value lock before a write is dropped.
pub const VALUE_LOCK_TIMEOUT: Duration = Duration::from_millis(10);

/// Heartbeat period step: period = step × count.
pub const HEARTBEAT_BASE_PERIOD_MS: u64 = 100;

/// Heartbeat count at which registers are dumped and the count resets.
pub const HEARTBEAT_ROLLOVER: u32 = 10;


/// Which attribute handle feeds which register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeMap {
    /// Primary value register.
    pub value: AttributeHandle,
    /// Gain code register.
    pub gain: AttributeHandle,
    /// Channel code register.
    pub channel: AttributeHandle,
    /// Oscillator code register.
    pub oscillator: AttributeHandle,
    /// Misc code register.
    pub misc: AttributeHandle,
}

impl Default for AttributeMap {
    fn default() -> Self {
        Self {
            value: VALUE_HANDLE,
            gain: GAIN_HANDLE,
            channel: CHANNEL_HANDLE,
            oscillator: OSCILLATOR_HANDLE,
            misc: MISC_HANDLE,
        }
    }
}

/// Runtime-tunable dispatcher settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatcherConfig {
    /// Handle → register routing.
    pub handles: AttributeMap,
    /// Bounded wait for the primary-value lock.
    pub lock_timeout: Duration,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            handles: AttributeMap::default(),
            lock_timeout: VALUE_LOCK_TIMEOUT,
        }
    }
}

impl AttributeMap {
    /// Register written through `handle`, if it is one of ours.
    pub fn classify(&self, handle: AttributeHandle) -> Option<ControlRegister> {
        [
            (self.value, ControlRegister::Value),
            (self.gain, ControlRegister::Gain),
            (self.channel, ControlRegister::Channel),
            (self.oscillator, ControlRegister::Oscillator),
            (self.misc, ControlRegister::Misc),
        ]
        .into_iter()
        .find_map(|(known, register)| (known == handle).then_some(register))
    }
}
