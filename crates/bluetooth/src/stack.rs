//! The wireless stack as seen by the application.

use crate::event::{ConnectionHandle, StackEvent};
use crate::state::StackState;

/// Advertising interval class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvertisingMode {
    /// Short interval, used right after boot and after a disconnect.
    Fast,
}

/// Wireless protocol stack driven from a single task.
///
/// The stack's interrupt handler only signals that work is pending; all
/// processing happens when the task calls [`poll_event`](Self::poll_event),
/// which runs the stack's internal processing and hands back the next
/// queued event. One signal may stand for several events, so callers drain
/// until `None`.
pub trait BleStack {
    /// Error type
    type Error;

    /// Register with the controller and begin initialisation. Call once,
    /// before the first [`poll_event`](Self::poll_event).
    fn start(&mut self) -> Result<(), Self::Error>;

    /// Current lifecycle state.
    fn state(&self) -> StackState;

    /// Run pending stack processing and return the next event, if any.
    fn poll_event(&mut self) -> Option<StackEvent>;

    /// Acknowledge a write request on `connection`. Exactly one response is
    /// owed per write request.
    fn send_write_response(&mut self, connection: ConnectionHandle) -> Result<(), Self::Error>;

    /// Begin advertising so a peer can connect.
    fn start_advertising(&mut self, mode: AdvertisingMode) -> Result<(), Self::Error>;
}
