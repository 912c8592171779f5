//! Control registers shared between the dispatcher and the heartbeat.
//!
//! The primary value is the only register with two consumers that may run
//! in different contexts (the dispatcher writes it and drives the dimming
//! generator with it; the heartbeat dumps it), so it lives behind an async
//! mutex acquired with a bounded wait. The four code registers have a
//! single writer and are plain atomics; the heartbeat reads them without
//! ever blocking.

use core::fmt;
use core::sync::atomic::{AtomicU8, Ordering};

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::mutex::Mutex;
use embassy_time::{with_timeout, Duration};

use crate::config::{
    DEFAULT_CHANNEL, DEFAULT_GAIN, DEFAULT_MISC, DEFAULT_OSCILLATOR, DEFAULT_VALUE, MAX_VALUE,
};
use crate::error::FirmwareError;

// ── ControlValue ─────────────────────────────────────────────────────────────

/// Primary control value, clamped to 0–100.
///
/// Construct with [`ControlValue::new`], which clamps anything above
/// [`MAX_VALUE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct ControlValue(u8);

impl ControlValue {
    /// Create a `ControlValue`, clamping values above 100 to 100.
    #[must_use]
    pub const fn new(raw: u8) -> Self {
        if raw > MAX_VALUE {
            Self(MAX_VALUE)
        } else {
            Self(raw)
        }
    }

    /// Return the inner value (0–100).
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

// ── Register names ───────────────────────────────────────────────────────────

/// The five writable registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControlRegister {
    /// Primary value (indicator brightness).
    Value,
    /// Amplifier gain code.
    Gain,
    /// Multiplexer channel code.
    Channel,
    /// Oscillator mode code (no hardware effect yet).
    Oscillator,
    /// Miscellaneous mode code (no hardware effect yet).
    Misc,
}

impl ControlRegister {
    /// Short name, for logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Value => "value",
            Self::Gain => "gain",
            Self::Channel => "channel",
            Self::Oscillator => "oscillator",
            Self::Misc => "misc",
        }
    }
}

// ── Register file ────────────────────────────────────────────────────────────

/// All control registers, owned by one context and shared by reference.
pub struct ControlRegisters<M: RawMutex> {
    value: Mutex<M, ControlValue>,
    gain: AtomicU8,
    channel: AtomicU8,
    oscillator: AtomicU8,
    misc: AtomicU8,
}

impl<M: RawMutex> ControlRegisters<M> {
    /// Registers at their power-on defaults. `const` so the file can live in
    /// a `static`.
    pub const fn new() -> Self {
        Self {
            value: Mutex::new(ControlValue::new(DEFAULT_VALUE)),
            gain: AtomicU8::new(DEFAULT_GAIN),
            channel: AtomicU8::new(DEFAULT_CHANNEL),
            oscillator: AtomicU8::new(DEFAULT_OSCILLATOR),
            misc: AtomicU8::new(DEFAULT_MISC),
        }
    }

    /// Acquire the value lock (waiting at most `timeout`), store the clamped
    /// `raw` value and release the lock. Returns the committed value; the
    /// lock is already released when this returns, so the caller drives
    /// hardware with a committed value.
    pub async fn store_value(
        &self,
        raw: u8,
        timeout: Duration,
    ) -> Result<ControlValue, FirmwareError> {
        let mut guard = with_timeout(timeout, self.value.lock())
            .await
            .map_err(|_| FirmwareError::LockTimeout)?;
        let value = ControlValue::new(raw);
        *guard = value;
        Ok(value)
    }

    /// Current value if the lock is free right now; never waits.
    pub fn try_value(&self) -> Option<ControlValue> {
        self.value.try_lock().ok().map(|guard| *guard)
    }

    /// The lock guarding the primary value.
    pub fn value_lock(&self) -> &Mutex<M, ControlValue> {
        &self.value
    }

    /// Store a gain code.
    pub fn set_gain(&self, code: u8) {
        self.gain.store(code, Ordering::Release);
    }

    /// Current gain code.
    pub fn gain(&self) -> u8 {
        self.gain.load(Ordering::Acquire)
    }

    /// Store a channel code.
    pub fn set_channel(&self, code: u8) {
        self.channel.store(code, Ordering::Release);
    }

    /// Current channel code.
    pub fn channel(&self) -> u8 {
        self.channel.load(Ordering::Acquire)
    }

    /// Store an oscillator code.
    pub fn set_oscillator(&self, code: u8) {
        self.oscillator.store(code, Ordering::Release);
    }

    /// Current oscillator code.
    pub fn oscillator(&self) -> u8 {
        self.oscillator.load(Ordering::Acquire)
    }

    /// Store a misc code.
    pub fn set_misc(&self, code: u8) {
        self.misc.store(code, Ordering::Release);
    }

    /// Current misc code.
    pub fn misc(&self) -> u8 {
        self.misc.load(Ordering::Acquire)
    }

    /// Non-blocking copy of every register.
    pub fn snapshot(&self) -> RegisterSnapshot {
        RegisterSnapshot {
            value: self.try_value().map(ControlValue::get),
            gain: self.gain(),
            channel: self.channel(),
            oscillator: self.oscillator(),
            misc: self.misc(),
        }
    }
}

impl<M: RawMutex> Default for ControlRegisters<M> {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time copy of the registers.
///
/// `value` is `None` when the value lock was held at snapshot time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterSnapshot {
    /// Primary value, if the lock was free.
    pub value: Option<u8>,
    /// Gain code.
    pub gain: u8,
    /// Channel code.
    pub channel: u8,
    /// Oscillator code.
    pub oscillator: u8,
    /// Misc code.
    pub misc: u8,
}

impl fmt::Display for RegisterSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            Some(value) => write!(f, "val:[{value:x}]")?,
            None => f.write_str("val:[locked]")?,
        }
        write!(
            f,
            " PA:[{:x}] MUX:[{:x}] OSC:[{:x}] MISC:[{:x}]",
            self.gain, self.channel, self.oscillator, self.misc
        )
    }
}
