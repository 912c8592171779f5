//! Waveform generator abstraction
//!
//! The controller runs two independent generators: one dims the
//! "connected" indicator, the other blinks the "waiting for connection"
//! indicator. Both are driven through the same four primitives.

/// A counter/compare waveform generator.
pub trait PwmChannel {
    /// Error type
    type Error;

    /// Start (or resume) the generator.
    fn start(&mut self) -> Result<(), Self::Error>;

    /// Stop the generator, leaving the output inactive.
    fn disable(&mut self) -> Result<(), Self::Error>;

    /// Reload the counter so the next period starts from zero.
    fn trigger_reload(&mut self) -> Result<(), Self::Error>;

    /// Set the compare value (duty) in counter ticks.
    fn set_compare(&mut self, compare: u32) -> Result<(), Self::Error>;
}

// ── embedded-hal adapter ─────────────────────────────────────────────────────

/// Adapts an `embedded_hal::pwm::SetDutyCycle` output to [`PwmChannel`].
///
/// The compare value is interpreted against a fixed `period` in counter
/// ticks and clamped to it. While disabled the output is held fully off and
/// compare updates are latched for the next [`start`](PwmChannel::start).
pub struct HalPwm<P> {
    pwm: P,
    period: u16,
    compare: u16,
    running: bool,
}

impl<P> HalPwm<P>
where
    P: embedded_hal::pwm::SetDutyCycle,
{
    /// Wrap a HAL PWM output. `period` must be non-zero.
    pub fn new(pwm: P, period: u16, compare: u16) -> Self {
        Self {
            pwm,
            period: period.max(1),
            compare: compare.min(period),
            running: false,
        }
    }

    /// Returns `true` while the generator is started.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Release the wrapped HAL output.
    pub fn into_inner(self) -> P {
        self.pwm
    }

    fn apply(&mut self) -> Result<(), P::Error> {
        if self.running {
            self.pwm.set_duty_cycle_fraction(self.compare, self.period)
        } else {
            self.pwm.set_duty_cycle_fully_off()
        }
    }
}

impl<P> PwmChannel for HalPwm<P>
where
    P: embedded_hal::pwm::SetDutyCycle,
{
    type Error = P::Error;

    fn start(&mut self) -> Result<(), Self::Error> {
        self.running = true;
        self.apply()
    }

    fn disable(&mut self) -> Result<(), Self::Error> {
        self.running = false;
        self.apply()
    }

    fn trigger_reload(&mut self) -> Result<(), Self::Error> {
        self.apply()
    }

    fn set_compare(&mut self, compare: u32) -> Result<(), Self::Error> {
        let clamped = compare.min(u32::from(self.period));
        self.compare = u16::try_from(clamped).unwrap_or(self.period);
        if self.running {
            self.apply()
        } else {
            Ok(())
        }
    }
}
