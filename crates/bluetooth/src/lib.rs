//! Wireless stack boundary: typed stack events, attribute/connection
//! handles, connection tracking and the [`BleStack`] trait the firmware
//! drives.
//!
//! The stack itself (advertising, connection establishment, attribute
//! database, bonding) lives behind [`BleStack`]. Stacks that deliver events
//! as a numeric code plus payload bytes convert them with
//! [`StackEvent::decode`].
//!
//! This crate is `no_std` by default; it only uses `core` + `heapless`.

#![cfg_attr(not(test), no_std)]
// TODO: Add rustdoc to all public items (tracked as tech debt)
#![allow(missing_docs)]

pub mod event;
pub mod stack;
pub mod state;

#[cfg(any(test, feature = "std"))]
pub mod mock;

pub use event::{
    AttributeHandle, AttributeValue, ConnectionHandle, DeviceAddresses, EventCode, EventError,
    StackEvent, WriteRequest, MAX_ATTRIBUTE_VALUE_LEN,
};
pub use stack::{AdvertisingMode, BleStack};
pub use state::{BluetoothState, StackState};

#[cfg(any(test, feature = "std"))]
pub use mock::{MockStack, MockStackError};
