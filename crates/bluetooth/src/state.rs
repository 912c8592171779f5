//! Stack lifecycle and connection state.

use crate::event::ConnectionHandle;

/// Lifecycle of the wireless stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackState {
    /// Not started.
    Stopped,
    /// `start()` called, waiting for the stack-on event.
    Initializing,
    /// Ready: advertising, connections and attribute access work.
    On,
}

/// Tracks whether a peer is currently connected and, if so, on which
/// connection handle.
pub struct BluetoothState {
    connection: Option<ConnectionHandle>,
}

impl BluetoothState {
    /// Create a new, disconnected state.
    pub const fn new() -> Self {
        BluetoothState { connection: None }
    }

    /// Record a connection on `connection`.
    pub fn on_connected(&mut self, connection: ConnectionHandle) {
        self.connection = Some(connection);
    }

    /// Record that the peer has disconnected.
    pub fn on_disconnected(&mut self) {
        self.connection = None;
    }

    /// Returns `true` if a peer is currently connected.
    #[must_use]
    pub fn connected(&self) -> bool {
        self.connection.is_some()
    }

    /// Returns the active connection, or `None` when disconnected.
    #[must_use]
    pub fn connection(&self) -> Option<ConnectionHandle> {
        self.connection
    }
}

impl Default for BluetoothState {
    fn default() -> Self {
        Self::new()
    }
}
