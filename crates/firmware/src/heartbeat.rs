//! Adaptive heartbeat timer.
//!
//! A one-shot timer whose period grows with its own firing count: after
//! firing at count `n` it re-arms for `100 × n` ms. Every firing prints the
//! count it fired at (0 to 9) to the console. When the count reaches
//! [`HEARTBEAT_ROLLOVER`] the register file is dumped to the console, the
//! count resets and the cycle restarts at the base period.
//!
//! [`AdaptiveTimer`] is the pure state machine; [`run_heartbeat`] drives it
//! with `embassy_time`.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_time::{Duration, Timer};
use platform::Console;

use crate::config::{HEARTBEAT_BASE_PERIOD_MS, HEARTBEAT_ROLLOVER};
use crate::registers::ControlRegisters;

/// What the timer does after one expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Expiry {
    /// Re-arm with a longer period.
    Continue {
        /// Count after this firing.
        count: u32,
        /// Next period in milliseconds.
        next_period_ms: u64,
    },
    /// Count hit the bound: dump registers, restart at the base period.
    Rollover,
}

/// Firing count plus the period it implies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdaptiveTimer {
    count: u32,
    period_ms: u64,
}

impl AdaptiveTimer {
    /// Fresh timer: count 0, base period.
    pub const fn new() -> Self {
        Self {
            count: 0,
            period_ms: HEARTBEAT_BASE_PERIOD_MS,
        }
    }

    /// Firings since the last rollover.
    pub const fn count(&self) -> u32 {
        self.count
    }

    /// Period the timer is currently armed with.
    pub const fn period(&self) -> Duration {
        Duration::from_millis(self.period_ms)
    }

    /// Advance by one expiry.
    pub fn on_expiry(&mut self) -> Expiry {
        let count = self.count.saturating_add(1);
        if count >= HEARTBEAT_ROLLOVER {
            *self = Self::new();
            return Expiry::Rollover;
        }
        self.count = count;
        self.period_ms = HEARTBEAT_BASE_PERIOD_MS.saturating_mul(u64::from(count));
        Expiry::Continue {
            count,
            next_period_ms: self.period_ms,
        }
    }
}

impl Default for AdaptiveTimer {
    fn default() -> Self {
        Self::new()
    }
}

/// Heartbeat task. Never returns.
pub async fn run_heartbeat<M, C>(registers: &ControlRegisters<M>, mut console: C) -> !
where
    M: RawMutex,
    C: Console,
{
    let mut timer = AdaptiveTimer::new();
    loop {
        Timer::after(timer.period()).await;
        let count = timer.count();
        console.print(format_args!("heartbeat count: {count}"));
        log_debug!("heartbeat count: {}", count);
        match timer.on_expiry() {
            Expiry::Continue { next_period_ms, .. } => {
                log_trace!("heartbeat next in {} ms", next_period_ms);
            }
            Expiry::Rollover => {
                console.print(format_args!("heartbeat expired at count: {}", HEARTBEAT_ROLLOVER));
                let snapshot = registers.snapshot();
                console.print(format_args!("{snapshot}"));
                log_debug!("heartbeat rollover, registers dumped");
            }
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::arithmetic_side_effects,
    clippy::indexing_slicing
)]
mod tests {
    use super::*;
    use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
    use platform::mocks::MockConsole;

    #[test]
    fn period_grows_by_base_step() {
        let mut timer = AdaptiveTimer::new();
        assert_eq!(timer.period().as_millis(), 100);
        for n in 1..10u32 {
            assert_eq!(
                timer.on_expiry(),
                Expiry::Continue {
                    count: n,
                    next_period_ms: 100 * u64::from(n),
                }
            );
        }
        assert_eq!(timer.period().as_millis(), 900);
    }

    #[test]
    fn tenth_firing_rolls_over_to_base() {
        let mut timer = AdaptiveTimer::new();
        for _ in 1..10 {
            let _ = timer.on_expiry();
        }
        assert_eq!(timer.on_expiry(), Expiry::Rollover);
        assert_eq!(timer, AdaptiveTimer::new());
        assert_eq!(
            timer.on_expiry(),
            Expiry::Continue {
                count: 1,
                next_period_ms: 100,
            }
        );
    }

    #[test]
    fn cycle_length_is_sum_of_periods() {
        let mut timer = AdaptiveTimer::new();
        let mut total = 0u64;
        loop {
            total += timer.period().as_millis();
            if timer.on_expiry() == Expiry::Rollover {
                break;
            }
        }
        // 100 + 100 + 200 + ... + 900
        assert_eq!(total, 4600);
    }

    #[tokio::test]
    async fn rollover_dumps_registers() {
        let registers = ControlRegisters::<CriticalSectionRawMutex>::new();
        registers.set_gain(0x09);
        let mut console = MockConsole::new();

        let _ = embassy_futures::select::select(
            run_heartbeat(&registers, &mut console),
            Timer::after(Duration::from_millis(4800)),
        )
        .await;

        assert!(console.contains("heartbeat expired at count: 10"));
        assert_eq!(
            console.last(),
            Some("val:[0] PA:[9] MUX:[0] OSC:[10] MISC:[0]")
        );
    }

    #[tokio::test]
    async fn every_expiry_prints_the_count_before_advancing() {
        let registers = ControlRegisters::<CriticalSectionRawMutex>::new();
        let mut console = MockConsole::new();

        // First cycle ends at 4600 ms; the next firing is at 4700 ms.
        let _ = embassy_futures::select::select(
            run_heartbeat(&registers, &mut console),
            Timer::after(Duration::from_millis(4650)),
        )
        .await;

        let counts: Vec<&str> = console
            .lines()
            .filter(|line| line.starts_with("heartbeat count: "))
            .collect();
        let expected: Vec<String> = (0..10).map(|n| format!("heartbeat count: {n}")).collect();
        assert_eq!(counts, expected);

        let lines: Vec<&str> = console.lines().collect();
        assert_eq!(
            lines[lines.len() - 3..],
            [
                "heartbeat count: 9",
                "heartbeat expired at count: 10",
                "val:[0] PA:[1] MUX:[0] OSC:[10] MISC:[0]",
            ]
        );
    }
}
