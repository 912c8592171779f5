//! In-memory [`BleStack`] for tests.
//!
//! Events are queued with [`MockStack::push_event`] and handed out by
//! `poll_event` in order. Polling the stack-on event moves the stack to
//! [`StackState::On`], mirroring a real stack's bring-up.

#![cfg(any(test, feature = "std"))]

use crate::event::{ConnectionHandle, StackEvent};
use crate::stack::{AdvertisingMode, BleStack};
use crate::state::StackState;

/// Capacity of the pending-event queue.
pub const MOCK_EVENT_DEPTH: usize = 32;
/// Number of write responses remembered individually.
pub const MOCK_RESPONSE_DEPTH: usize = 64;

/// Error injected by [`MockStack`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockStackError {
    /// `start()` was told to fail.
    StartRejected,
    /// `send_write_response()` was told to fail.
    ResponseRejected,
}

pub struct MockStack {
    state: StackState,
    events: heapless::Deque<StackEvent, MOCK_EVENT_DEPTH>,
    responses: heapless::Vec<ConnectionHandle, MOCK_RESPONSE_DEPTH>,
    response_count: usize,
    advertising: Option<AdvertisingMode>,
    advertising_starts: usize,
    polls: usize,
    fail_start: bool,
    fail_responses: bool,
}

impl MockStack {
    pub fn new() -> Self {
        Self {
            state: StackState::Stopped,
            events: heapless::Deque::new(),
            responses: heapless::Vec::new(),
            response_count: 0,
            advertising: None,
            advertising_starts: 0,
            polls: 0,
            fail_start: false,
            fail_responses: false,
        }
    }

    /// Queue an event. Hands the event back if the queue is full.
    pub fn push_event(&mut self, event: StackEvent) -> Result<(), StackEvent> {
        self.events.push_back(event)
    }

    /// Events queued but not yet polled.
    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    /// Connections acknowledged so far, oldest first (first
    /// [`MOCK_RESPONSE_DEPTH`] only).
    pub fn write_responses(&self) -> &[ConnectionHandle] {
        &self.responses
    }

    /// Total number of acknowledged writes.
    pub fn write_response_count(&self) -> usize {
        self.response_count
    }

    /// Most recent advertising mode requested.
    pub fn advertising(&self) -> Option<AdvertisingMode> {
        self.advertising
    }

    /// Number of `start_advertising()` calls.
    pub fn advertising_starts(&self) -> usize {
        self.advertising_starts
    }

    /// Number of `poll_event()` calls, including those that returned `None`.
    pub fn poll_count(&self) -> usize {
        self.polls
    }

    /// Make the next `start()` fail.
    pub fn fail_start(&mut self, fail: bool) {
        self.fail_start = fail;
    }

    /// Make `send_write_response()` fail.
    pub fn fail_write_responses(&mut self, fail: bool) {
        self.fail_responses = fail;
    }
}

impl Default for MockStack {
    fn default() -> Self {
        Self::new()
    }
}

impl BleStack for MockStack {
    type Error = MockStackError;

    fn start(&mut self) -> Result<(), Self::Error> {
        if self.fail_start {
            return Err(MockStackError::StartRejected);
        }
        self.state = StackState::Initializing;
        Ok(())
    }

    fn state(&self) -> StackState {
        self.state
    }

    fn poll_event(&mut self) -> Option<StackEvent> {
        self.polls = self.polls.saturating_add(1);
        let event = self.events.pop_front()?;
        if event == StackEvent::StackOn {
            self.state = StackState::On;
        }
        Some(event)
    }

    fn send_write_response(&mut self, connection: ConnectionHandle) -> Result<(), Self::Error> {
        if self.fail_responses {
            return Err(MockStackError::ResponseRejected);
        }
        self.response_count = self.response_count.saturating_add(1);
        let _ = self.responses.push(connection);
        Ok(())
    }

    fn start_advertising(&mut self, mode: AdvertisingMode) -> Result<(), Self::Error> {
        self.advertising = Some(mode);
        self.advertising_starts = self.advertising_starts.saturating_add(1);
        Ok(())
    }
}
