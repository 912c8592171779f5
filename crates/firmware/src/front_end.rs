//! Analog front-end control lines and indicator generators.
//!
//! Owns every output the dispatcher drives: the gain and channel select
//! banks, the oscillator and misc lines, the multiplexer enable and the two
//! waveform generators (dimmable "connected" light, blinking "waiting"
//! light). HAL errors are folded into [`FirmwareError`] here.

use platform::{OutputPin, PinState, PwmChannel};

use crate::codec::LinePattern;
use crate::error::FirmwareError;
use crate::registers::ControlValue;

/// Every front-end output, grouped by function.
pub struct FrontEnd<P, W> {
    gain: [P; 4],
    channel: [P; 4],
    oscillator: [P; 3],
    misc: [P; 4],
    mux_enable: P,
    dim: W,
    blink: W,
}

impl<P, W> FrontEnd<P, W>
where
    P: OutputPin,
    W: PwmChannel,
{
    /// Assemble the front end. Nothing is driven until [`reset_lines`]
    /// or [`start_indicators`] is called.
    ///
    /// [`reset_lines`]: Self::reset_lines
    /// [`start_indicators`]: Self::start_indicators
    pub fn new(
        gain: [P; 4],
        channel: [P; 4],
        oscillator: [P; 3],
        misc: [P; 4],
        mux_enable: P,
        dim: W,
        blink: W,
    ) -> Self {
        Self {
            gain,
            channel,
            oscillator,
            misc,
            mux_enable,
            dim,
            blink,
        }
    }

    /// Drive every control line low.
    pub fn reset_lines(&mut self) -> Result<(), FirmwareError> {
        self.gain
            .iter_mut()
            .chain(self.channel.iter_mut())
            .chain(self.oscillator.iter_mut())
            .chain(self.misc.iter_mut())
            .chain(core::iter::once(&mut self.mux_enable))
            .try_for_each(|pin| pin.set_low())
            .map_err(|_| FirmwareError::Line)
    }

    /// Start both generators: blinking on, dimming ready at zero.
    pub fn start_indicators(&mut self) -> Result<(), FirmwareError> {
        self.dim.start().map_err(|_| FirmwareError::Indicator)?;
        self.blink.start().map_err(|_| FirmwareError::Indicator)
    }

    /// Drive the gain select bank.
    pub fn apply_gain(&mut self, pattern: LinePattern) -> Result<(), FirmwareError> {
        drive_bank(&mut self.gain, pattern.levels())
    }

    /// Drive the channel select bank.
    pub fn apply_channel(&mut self, pattern: LinePattern) -> Result<(), FirmwareError> {
        drive_bank(&mut self.channel, pattern.levels())
    }

    /// Set the dimming compare value to the value itself. The board
    /// configures the generator with a 100-count period, so the value reads
    /// as duty in percent.
    pub fn set_brightness(&mut self, value: ControlValue) -> Result<(), FirmwareError> {
        self.dim
            .set_compare(u32::from(value.get()))
            .map_err(|_| FirmwareError::Indicator)
    }

    /// No peer connected: blink, dimmed light off.
    pub fn show_waiting(&mut self) -> Result<(), FirmwareError> {
        self.blink.start().map_err(|_| FirmwareError::Indicator)?;
        self.dim.trigger_reload().map_err(|_| FirmwareError::Indicator)?;
        self.dim.disable().map_err(|_| FirmwareError::Indicator)
    }

    /// Peer connected: steady dimmed light, blink off.
    pub fn show_connected(&mut self) -> Result<(), FirmwareError> {
        self.blink.trigger_reload().map_err(|_| FirmwareError::Indicator)?;
        self.blink.disable().map_err(|_| FirmwareError::Indicator)?;
        self.dim.start().map_err(|_| FirmwareError::Indicator)
    }

    /// Gain select bank.
    pub fn gain_lines(&self) -> &[P; 4] {
        &self.gain
    }

    /// Channel select bank.
    pub fn channel_lines(&self) -> &[P; 4] {
        &self.channel
    }

    /// Oscillator lines.
    pub fn oscillator_lines(&self) -> &[P; 3] {
        &self.oscillator
    }

    /// Misc lines.
    pub fn misc_lines(&self) -> &[P; 4] {
        &self.misc
    }

    /// Multiplexer enable line.
    pub fn mux_enable(&self) -> &P {
        &self.mux_enable
    }

    /// Dimming ("connected") generator.
    pub fn dim(&self) -> &W {
        &self.dim
    }

    /// Blinking ("waiting") generator.
    pub fn blink(&self) -> &W {
        &self.blink
    }
}

fn drive_bank<P: OutputPin>(
    bank: &mut [P; 4],
    levels: [PinState; 4],
) -> Result<(), FirmwareError> {
    bank.iter_mut()
        .zip(levels)
        .try_for_each(|(pin, level)| pin.set_state(level))
        .map_err(|_| FirmwareError::Line)
}
