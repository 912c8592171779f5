//! Firmware error type.
//!
//! HAL and stack errors are associated types on their traits; they are
//! mapped into [`FirmwareError`] where the firmware calls them so the
//! dispatcher can log one uniform kind.

/// Every failure the controller can observe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror_no_std::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FirmwareError {
    /// The ISR→task signal bridge was already claimed (or could not be
    /// created); the dispatcher must not be scheduled.
    #[error("signal bridge unavailable")]
    BridgeUnavailable,
    /// The primary-value lock was not acquired within the bounded wait.
    #[error("timed out waiting for the value lock")]
    LockTimeout,
    /// The wireless stack refused to start.
    #[error("wireless stack failed to start")]
    StackStart,
    /// The stack rejected a write acknowledgement.
    #[error("write response rejected by the stack")]
    WriteResponse,
    /// Advertising could not be (re)started.
    #[error("advertising start failed")]
    Advertising,
    /// A control line could not be driven.
    #[error("control line write failed")]
    Line,
    /// A waveform generator rejected a command.
    #[error("indicator waveform command failed")]
    Indicator,
}

impl FirmwareError {
    /// Short static label, for logs that cannot format `Display`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BridgeUnavailable => "bridge unavailable",
            Self::LockTimeout => "lock timeout",
            Self::StackStart => "stack start",
            Self::WriteResponse => "write response",
            Self::Advertising => "advertising",
            Self::Line => "line write",
            Self::Indicator => "indicator",
        }
    }
}
