//! GPIO output abstraction
//!
//! The controller only ever drives lines: gain select, channel select, the
//! oscillator/misc placeholder banks and the mux enable. Reads are never
//! needed, so only the output half of the usual pin API is modelled.

/// Output pin operations
pub trait OutputPin {
    /// Error type
    type Error;

    /// Set pin high
    fn set_high(&mut self) -> Result<(), Self::Error>;

    /// Set pin low
    fn set_low(&mut self) -> Result<(), Self::Error>;

    /// Set pin state
    fn set_state(&mut self, state: PinState) -> Result<(), Self::Error> {
        match state {
            PinState::High => self.set_high(),
            PinState::Low => self.set_low(),
        }
    }
}

/// Pin state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinState {
    /// High (logic 1)
    High,
    /// Low (logic 0)
    Low,
}

impl From<bool> for PinState {
    fn from(value: bool) -> Self {
        if value {
            Self::High
        } else {
            Self::Low
        }
    }
}

impl From<PinState> for bool {
    fn from(value: PinState) -> Self {
        matches!(value, PinState::High)
    }
}

// ── embedded-hal adapter ─────────────────────────────────────────────────────

/// Adapts any `embedded_hal::digital::OutputPin` (e.g. a chip HAL's
/// `Output<'static>`) to [`OutputPin`].
pub struct HalOutput<P> {
    pin: P,
}

impl<P> HalOutput<P>
where
    P: embedded_hal::digital::OutputPin,
{
    /// Wrap a HAL output pin.
    pub fn new(pin: P) -> Self {
        Self { pin }
    }

    /// Release the wrapped HAL pin.
    pub fn into_inner(self) -> P {
        self.pin
    }
}

impl<P> OutputPin for HalOutput<P>
where
    P: embedded_hal::digital::OutputPin,
{
    type Error = P::Error;

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.pin.set_high()
    }

    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.pin.set_low()
    }

    fn set_state(&mut self, state: PinState) -> Result<(), Self::Error> {
        self.pin.set_state(match state {
            PinState::High => embedded_hal::digital::PinState::High,
            PinState::Low => embedded_hal::digital::PinState::Low,
        })
    }
}
