//! Interrupt → task handoff.
//!
//! The wireless stack's interrupt handler calls [`SignalBridge::notify`];
//! the dispatcher task awaits [`SignalBridge::wait`]. The bridge counts
//! signals rather than latching a flag, so a burst of notifies before the
//! task runs is never collapsed: every notify releases exactly one wait.
//!
//! `notify` is synchronous and only holds a critical section for a counter
//! increment and a waker wake, so it is safe from interrupt context.
//! Only a single task may wait on a bridge at a time; a second waiter
//! replaces the first one's waker.

use core::cell::RefCell;
use core::future::poll_fn;
use core::task::Poll;

use embassy_sync::blocking_mutex::raw::{CriticalSectionRawMutex, RawMutex};
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::waitqueue::WakerRegistration;
use static_cell::StaticCell;

use crate::error::FirmwareError;

struct BridgeState {
    pending: u32,
    waker: WakerRegistration,
}

/// Counting ISR → task signal.
pub struct SignalBridge<M: RawMutex = CriticalSectionRawMutex> {
    state: Mutex<M, RefCell<BridgeState>>,
}

impl<M: RawMutex> SignalBridge<M> {
    /// Create a bridge with nothing pending.
    pub const fn new() -> Self {
        Self {
            state: Mutex::new(RefCell::new(BridgeState {
                pending: 0,
                waker: WakerRegistration::new(),
            })),
        }
    }

    /// Record one unit of pending work and wake the waiting task.
    ///
    /// Never blocks and never fails. The count saturates at `u32::MAX`.
    pub fn notify(&self) {
        self.state.lock(|cell| {
            let mut state = cell.borrow_mut();
            state.pending = state.pending.saturating_add(1);
            state.waker.wake();
        });
    }

    /// Wait until at least one signal is pending, then consume one.
    pub async fn wait(&self) {
        poll_fn(|cx| {
            self.state.lock(|cell| {
                let mut state = cell.borrow_mut();
                if state.pending > 0 {
                    state.pending = state.pending.saturating_sub(1);
                    Poll::Ready(())
                } else {
                    state.waker.register(cx.waker());
                    Poll::Pending
                }
            })
        })
        .await;
    }

    /// Consume one signal if any is pending; never waits.
    pub fn try_wait(&self) -> bool {
        self.state.lock(|cell| {
            let mut state = cell.borrow_mut();
            if state.pending > 0 {
                state.pending = state.pending.saturating_sub(1);
                true
            } else {
                false
            }
        })
    }

    /// Signals not yet consumed.
    pub fn pending(&self) -> u32 {
        self.state.lock(|cell| cell.borrow().pending)
    }
}

impl<M: RawMutex> Default for SignalBridge<M> {
    fn default() -> Self {
        Self::new()
    }
}

/// Initialise the bridge in its static cell.
///
/// The cell can be claimed once; a second claim (or any other failure to
/// create the bridge) is reported as [`FirmwareError::BridgeUnavailable`],
/// after which the dispatcher must not be scheduled.
pub fn claim_bridge(
    cell: &'static StaticCell<SignalBridge>,
) -> Result<&'static SignalBridge, FirmwareError> {
    cell.try_init(SignalBridge::new())
        .map(|bridge| &*bridge)
        .ok_or(FirmwareError::BridgeUnavailable)
}
