//! Stack events delivered to the application.
//!
//! Every event the stack can raise is one [`StackEvent`] variant carrying
//! only the payload relevant to it. Stack adapters that receive events as a
//! numeric code plus little-endian payload bytes build them with
//! [`StackEvent::decode`]; anything with an unrecognised code becomes
//! [`StackEvent::Unknown`] rather than an error.
//!
//! Payload layouts (all multi-byte fields little-endian):
//!
//! | Event                  | Payload                                        |
//! |------------------------|------------------------------------------------|
//! | stack busy status      | `[busy]`                                       |
//! | device address read    | `[public; 6][private; 6]`                      |
//! | GATT connect/disconnect| `[att_id, bd_handle]`                          |
//! | MTU exchange request   | `[att_id, bd_handle, mtu_lo, mtu_hi]`          |
//! | read access request    | `[att_id, bd_handle, handle_lo, handle_hi]`    |
//! | write request          | `[att_id, bd_handle, handle_lo, handle_hi, value..]` |
//!
//! All other events carry no payload.

#[cfg(test)]
#[allow(clippy::expect_used, clippy::indexing_slicing)] // Tests use expect() for readable assertions
mod tests {
    use super::{
        AttributeHandle, ConnectionHandle, EventCode, EventError, StackEvent, WriteRequest,
    };

    // ---- Code tests ----------------------------------------------------------

    #[test]
    fn test_event_code_round_trips_through_raw() {
        assert_eq!(EventCode::from_raw(0x24), Some(EventCode::WriteRequest));
        assert_eq!(EventCode::WriteRequest as u32, 0x24);
        assert_eq!(EventCode::from_raw(0xDEAD), None);
    }

    #[test]
    fn test_decoded_event_reports_its_code() {
        let event = StackEvent::decode(0x13, &[]).expect("gap disconnect decodes");
        assert_eq!(event, StackEvent::GapDisconnected);
        assert_eq!(event.code(), 0x13);
    }

    // ---- Decode tests --------------------------------------------------------

    #[test]
    fn test_decode_write_request() {
        // att_id=1, bd_handle=0, handle=0x0019 (LE), value=[0x10]
        let raw = [0x01_u8, 0x00, 0x19, 0x00, 0x10];
        let event = StackEvent::decode(0x24, &raw).expect("should decode write");
        let req = match event {
            StackEvent::WriteRequest(req) => req,
            other => unreachable!("decoded {other:?}"),
        };
        assert_eq!(req.connection, ConnectionHandle::new(1, 0));
        assert_eq!(req.handle, AttributeHandle::new(0x0019));
        assert_eq!(req.first_byte(), Some(0x10));
    }

    #[test]
    fn test_decode_write_request_with_empty_value() {
        let raw = [0x01_u8, 0x00, 0x10, 0x00];
        let event = StackEvent::decode(0x24, &raw).expect("empty value is legal");
        assert_eq!(
            event,
            StackEvent::WriteRequest(
                WriteRequest::new(ConnectionHandle::new(1, 0), AttributeHandle::new(0x10), &[])
                    .expect("empty value fits")
            )
        );
    }

    #[test]
    fn test_decode_short_payload_returns_err() {
        let result = StackEvent::decode(0x24, &[0x01, 0x00, 0x10]);
        assert_eq!(
            result,
            Err(EventError::PayloadTooShort {
                code: 0x24,
                needed: 4,
                actual: 3
            })
        );
    }

    #[test]
    fn test_decode_oversized_value_returns_err() {
        let mut raw = [0u8; 4 + 21];
        raw[2] = 0x10;
        let result = StackEvent::decode(0x24, &raw);
        assert_eq!(result, Err(EventError::ValueTooLong { len: 21 }));
    }

    #[test]
    fn test_decode_device_addresses() {
        let raw = [1_u8, 2, 3, 4, 5, 6, 0xA1, 0xA2, 0xA3, 0xA4, 0xA5, 0xA6];
        let event = StackEvent::decode(0x06, &raw).expect("addresses decode");
        let addrs = match event {
            StackEvent::DeviceAddressRead(addrs) => addrs,
            other => unreachable!("decoded {other:?}"),
        };
        assert_eq!(addrs.public, [1, 2, 3, 4, 5, 6]);
        assert_eq!(addrs.private, [0xA1, 0xA2, 0xA3, 0xA4, 0xA5, 0xA6]);
    }

    #[test]
    fn test_decode_unknown_code_is_not_an_error() {
        let event = StackEvent::decode(0x7F, &[0xFF; 3]).expect("unknown is Ok");
        assert_eq!(event, StackEvent::Unknown(0x7F));
        assert_eq!(event.code(), 0x7F);
    }

    #[test]
    fn test_decode_mtu_exchange() {
        let event = StackEvent::decode(0x22, &[0x02, 0x01, 0xF7, 0x00]).expect("mtu decodes");
        assert_eq!(
            event,
            StackEvent::MtuExchangeRequest {
                connection: ConnectionHandle::new(2, 1),
                mtu: 247
            }
        );
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Public types
// ─────────────────────────────────────────────────────────────────────────────

/// Largest attribute value carried by a write request (default ATT MTU 23
/// minus the 3-byte write header).
pub const MAX_ATTRIBUTE_VALUE_LEN: usize = 20;

/// Attribute value bytes of a write request.
pub type AttributeValue = heapless::Vec<u8, MAX_ATTRIBUTE_VALUE_LEN>;

/// Fixed numeric identifier of one attribute in the generated table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AttributeHandle(u16);

impl AttributeHandle {
    #[must_use]
    pub const fn new(raw: u16) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn get(self) -> u16 {
        self.0
    }
}

/// Identifies the peer connection an event belongs to; write responses are
/// addressed with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionHandle {
    /// ATT bearer instance.
    pub att_id: u8,
    /// Link-layer device handle.
    pub bd_handle: u8,
}

impl ConnectionHandle {
    #[must_use]
    pub const fn new(att_id: u8, bd_handle: u8) -> Self {
        Self { att_id, bd_handle }
    }
}

/// The device's own addresses, as reported by the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceAddresses {
    pub public: [u8; 6],
    pub private: [u8; 6],
}

/// A peer wrote `value` to the attribute `handle`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteRequest {
    pub connection: ConnectionHandle,
    pub handle: AttributeHandle,
    pub value: AttributeValue,
}

impl WriteRequest {
    /// Build a write request, rejecting values longer than
    /// [`MAX_ATTRIBUTE_VALUE_LEN`].
    ///
    /// # Errors
    ///
    /// Returns [`EventError::ValueTooLong`] when `value` does not fit.
    pub fn new(
        connection: ConnectionHandle,
        handle: AttributeHandle,
        value: &[u8],
    ) -> Result<Self, EventError> {
        let value = AttributeValue::from_slice(value)
            .map_err(|_| EventError::ValueTooLong { len: value.len() })?;
        Ok(Self {
            connection,
            handle,
            value,
        })
    }

    /// The control registers are one byte wide; only the first byte counts.
    #[must_use]
    pub fn first_byte(&self) -> Option<u8> {
        self.value.first().copied()
    }
}

/// Numeric event codes used by stack adapters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum EventCode {
    StackOn = 0x01,
    Timeout = 0x02,
    HardwareError = 0x03,
    StackBusyStatus = 0x04,
    DeviceAddressSet = 0x05,
    DeviceAddressRead = 0x06,
    TxPowerSet = 0x07,
    AdvertisingStartStop = 0x10,
    GapConnected = 0x11,
    ConnectionParametersUpdated = 0x12,
    GapDisconnected = 0x13,
    GattConnected = 0x20,
    GattDisconnected = 0x21,
    MtuExchangeRequest = 0x22,
    ReadAccessRequest = 0x23,
    WriteRequest = 0x24,
}

impl EventCode {
    const ALL: [Self; 16] = [
        Self::StackOn,
        Self::Timeout,
        Self::HardwareError,
        Self::StackBusyStatus,
        Self::DeviceAddressSet,
        Self::DeviceAddressRead,
        Self::TxPowerSet,
        Self::AdvertisingStartStop,
        Self::GapConnected,
        Self::ConnectionParametersUpdated,
        Self::GapDisconnected,
        Self::GattConnected,
        Self::GattDisconnected,
        Self::MtuExchangeRequest,
        Self::ReadAccessRequest,
        Self::WriteRequest,
    ];

    #[must_use]
    pub fn from_raw(raw: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|code| *code as u32 == raw)
    }
}

/// Events raised by the wireless stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StackEvent {
    /// Stack finished initialising and is ready.
    StackOn,
    /// A stack-level procedure timed out.
    Timeout,
    /// The radio controller reported a hardware fault.
    HardwareError,
    /// Stack busy state changed.
    StackBusyStatus { busy: bool },
    DeviceAddressSet,
    DeviceAddressRead(DeviceAddresses),
    TxPowerSet,
    /// Advertising started or stopped.
    AdvertisingStartStop,
    /// Link-layer connection established.
    GapConnected,
    ConnectionParametersUpdated,
    /// Link-layer connection lost.
    GapDisconnected,
    /// Attribute-protocol bearer opened on `connection`.
    GattConnected(ConnectionHandle),
    GattDisconnected(ConnectionHandle),
    MtuExchangeRequest {
        connection: ConnectionHandle,
        mtu: u16,
    },
    ReadAccessRequest {
        connection: ConnectionHandle,
        handle: AttributeHandle,
    },
    WriteRequest(WriteRequest),
    /// An event code this crate does not model.
    Unknown(u32),
}

/// Errors that can occur when decoding a raw stack event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventError {
    /// The payload is shorter than the event's fixed fields.
    PayloadTooShort {
        code: u32,
        needed: usize,
        actual: usize,
    },
    /// A write request value exceeds [`MAX_ATTRIBUTE_VALUE_LEN`].
    ValueTooLong { len: usize },
}

impl StackEvent {
    /// Decode a raw `(code, payload)` pair. Unknown codes decode to
    /// [`StackEvent::Unknown`]; extra trailing payload bytes are ignored for
    /// fixed-size events.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::PayloadTooShort`] when a known event's fixed
    /// fields are missing and [`EventError::ValueTooLong`] for oversized
    /// write values.
    pub fn decode(code: u32, payload: &[u8]) -> Result<Self, EventError> {
        let Some(kind) = EventCode::from_raw(code) else {
            return Ok(Self::Unknown(code));
        };

        let event = match kind {
            EventCode::StackOn => Self::StackOn,
            EventCode::Timeout => Self::Timeout,
            EventCode::HardwareError => Self::HardwareError,
            EventCode::StackBusyStatus => {
                let [busy] = field::<1>(code, payload, 0)?;
                Self::StackBusyStatus { busy: busy != 0 }
            }
            EventCode::DeviceAddressSet => Self::DeviceAddressSet,
            EventCode::DeviceAddressRead => Self::DeviceAddressRead(DeviceAddresses {
                public: field::<6>(code, payload, 0)?,
                private: field::<6>(code, payload, 6)?,
            }),
            EventCode::TxPowerSet => Self::TxPowerSet,
            EventCode::AdvertisingStartStop => Self::AdvertisingStartStop,
            EventCode::GapConnected => Self::GapConnected,
            EventCode::ConnectionParametersUpdated => Self::ConnectionParametersUpdated,
            EventCode::GapDisconnected => Self::GapDisconnected,
            EventCode::GattConnected => Self::GattConnected(connection(code, payload)?),
            EventCode::GattDisconnected => Self::GattDisconnected(connection(code, payload)?),
            EventCode::MtuExchangeRequest => Self::MtuExchangeRequest {
                connection: connection(code, payload)?,
                mtu: u16::from_le_bytes(field::<2>(code, payload, 2)?),
            },
            EventCode::ReadAccessRequest => Self::ReadAccessRequest {
                connection: connection(code, payload)?,
                handle: AttributeHandle::new(u16::from_le_bytes(field::<2>(code, payload, 2)?)),
            },
            EventCode::WriteRequest => {
                let conn = connection(code, payload)?;
                let handle = AttributeHandle::new(u16::from_le_bytes(field::<2>(code, payload, 2)?));
                let value = payload.get(4..).unwrap_or(&[]);
                Self::WriteRequest(WriteRequest::new(conn, handle, value)?)
            }
        };
        Ok(event)
    }

    /// Numeric code of this event; [`StackEvent::Unknown`] keeps its raw code.
    #[must_use]
    pub fn code(&self) -> u32 {
        let kind = match self {
            Self::StackOn => EventCode::StackOn,
            Self::Timeout => EventCode::Timeout,
            Self::HardwareError => EventCode::HardwareError,
            Self::StackBusyStatus { .. } => EventCode::StackBusyStatus,
            Self::DeviceAddressSet => EventCode::DeviceAddressSet,
            Self::DeviceAddressRead(_) => EventCode::DeviceAddressRead,
            Self::TxPowerSet => EventCode::TxPowerSet,
            Self::AdvertisingStartStop => EventCode::AdvertisingStartStop,
            Self::GapConnected => EventCode::GapConnected,
            Self::ConnectionParametersUpdated => EventCode::ConnectionParametersUpdated,
            Self::GapDisconnected => EventCode::GapDisconnected,
            Self::GattConnected(_) => EventCode::GattConnected,
            Self::GattDisconnected(_) => EventCode::GattDisconnected,
            Self::MtuExchangeRequest { .. } => EventCode::MtuExchangeRequest,
            Self::ReadAccessRequest { .. } => EventCode::ReadAccessRequest,
            Self::WriteRequest(_) => EventCode::WriteRequest,
            Self::Unknown(raw) => return *raw,
        };
        kind as u32
    }

    /// Short human-readable name, for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::StackOn => "stack on",
            Self::Timeout => "timeout",
            Self::HardwareError => "hardware error",
            Self::StackBusyStatus { .. } => "stack busy status",
            Self::DeviceAddressSet => "device address set",
            Self::DeviceAddressRead(_) => "device address read",
            Self::TxPowerSet => "tx power set",
            Self::AdvertisingStartStop => "advertising start/stop",
            Self::GapConnected => "gap connected",
            Self::ConnectionParametersUpdated => "connection parameters updated",
            Self::GapDisconnected => "gap disconnected",
            Self::GattConnected(_) => "gatt connected",
            Self::GattDisconnected(_) => "gatt disconnected",
            Self::MtuExchangeRequest { .. } => "mtu exchange request",
            Self::ReadAccessRequest { .. } => "read access request",
            Self::WriteRequest(_) => "write request",
            Self::Unknown(_) => "unknown",
        }
    }
}

fn connection(code: u32, payload: &[u8]) -> Result<ConnectionHandle, EventError> {
    let [att_id, bd_handle] = field::<2>(code, payload, 0)?;
    Ok(ConnectionHandle::new(att_id, bd_handle))
}

/// Copy `N` bytes starting at `offset` out of `payload`.
fn field<const N: usize>(code: u32, payload: &[u8], offset: usize) -> Result<[u8; N], EventError> {
    payload
        .get(offset..)
        .and_then(|rest| rest.get(..N))
        .and_then(|bytes| <[u8; N]>::try_from(bytes).ok())
        .ok_or(EventError::PayloadTooShort {
            code,
            needed: offset.saturating_add(N),
            actual: payload.len(),
        })
}
