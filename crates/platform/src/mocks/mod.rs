//! Mock implementations for testing
//!
//! This module provides mock implementations of all platform traits
//! for use in unit and integration tests.

#![cfg(any(test, feature = "std"))]

use crate::{Console, ConsoleLine, OutputPin, PinState, PwmChannel};

/// Mock output line. Remembers its level and how often it was written.
#[derive(Debug, Clone)]
pub struct MockPin {
    name: &'static str,
    state: PinState,
    writes: usize,
}

impl MockPin {
    /// Create a new mock line, initially low.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            state: PinState::Low,
            writes: 0,
        }
    }

    /// Line name given at construction.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Current level.
    pub fn state(&self) -> PinState {
        self.state
    }

    /// Returns `true` if the line is currently driven high.
    pub fn is_set_high(&self) -> bool {
        self.state == PinState::High
    }

    /// Number of level writes since construction.
    pub fn write_count(&self) -> usize {
        self.writes
    }
}

impl OutputPin for MockPin {
    type Error = core::convert::Infallible;

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.set_state(PinState::High)
    }

    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.set_state(PinState::Low)
    }

    fn set_state(&mut self, state: PinState) -> Result<(), Self::Error> {
        self.state = state;
        self.writes = self.writes.saturating_add(1);
        Ok(())
    }
}

/// Mock waveform generator.
#[derive(Debug, Clone, Default)]
pub struct MockPwm {
    running: bool,
    compare: Option<u32>,
    starts: usize,
    disables: usize,
    reloads: usize,
    compare_writes: usize,
}

impl MockPwm {
    /// Create a new, stopped generator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` between `start()` and `disable()`.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Last compare value written, if any.
    pub fn compare(&self) -> Option<u32> {
        self.compare
    }

    /// Number of `start()` calls.
    pub fn start_count(&self) -> usize {
        self.starts
    }

    /// Number of `disable()` calls.
    pub fn disable_count(&self) -> usize {
        self.disables
    }

    /// Number of `trigger_reload()` calls.
    pub fn reload_count(&self) -> usize {
        self.reloads
    }

    /// Number of `set_compare()` calls.
    pub fn compare_write_count(&self) -> usize {
        self.compare_writes
    }
}

impl PwmChannel for MockPwm {
    type Error = core::convert::Infallible;

    fn start(&mut self) -> Result<(), Self::Error> {
        self.running = true;
        self.starts = self.starts.saturating_add(1);
        Ok(())
    }

    fn disable(&mut self) -> Result<(), Self::Error> {
        self.running = false;
        self.disables = self.disables.saturating_add(1);
        Ok(())
    }

    fn trigger_reload(&mut self) -> Result<(), Self::Error> {
        self.reloads = self.reloads.saturating_add(1);
        Ok(())
    }

    fn set_compare(&mut self, compare: u32) -> Result<(), Self::Error> {
        self.compare = Some(compare);
        self.compare_writes = self.compare_writes.saturating_add(1);
        Ok(())
    }
}

/// Depth of the [`MockConsole`] history; older lines are discarded.
pub const MOCK_CONSOLE_DEPTH: usize = 64;

/// Mock console capturing the most recent lines.
#[derive(Debug, Clone, Default)]
pub struct MockConsole {
    lines: heapless::Deque<ConsoleLine, MOCK_CONSOLE_DEPTH>,
}

impl MockConsole {
    /// Create a new, empty console.
    pub fn new() -> Self {
        Self::default()
    }

    /// Captured lines, oldest first.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(|line| line.as_str())
    }

    /// Most recent line.
    pub fn last(&self) -> Option<&str> {
        self.lines.back().map(|line| line.as_str())
    }

    /// Returns `true` if any captured line contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.lines().any(|line| line.contains(needle))
    }

    /// Number of captured lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns `true` if nothing was captured.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Drop all captured lines.
    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

impl Console for MockConsole {
    fn write_line(&mut self, line: &str) {
        if self.lines.is_full() {
            let _ = self.lines.pop_front();
        }
        let mut owned = ConsoleLine::new();
        for c in line.chars() {
            if owned.push(c).is_err() {
                break;
            }
        }
        let _ = self.lines.push_back(owned);
    }
}
