//! Property-based tests for raw stack event decoding.
//! Decoding must be total: arbitrary frames either decode or return an
//! explicit error, never panic, and write values survive intact.

use bluetooth::{AttributeHandle, ConnectionHandle, EventError, StackEvent, MAX_ATTRIBUTE_VALUE_LEN};

proptest::proptest! {
    /// Arbitrary (code, payload) pairs never panic.
    #[test]
    fn decode_never_panics(code in 0u32..=0x40, payload in proptest::collection::vec(0u8..=255, 0..40)) {
        let _ = StackEvent::decode(code, &payload);
    }

    /// Unknown codes are reported verbatim, whatever the payload.
    #[test]
    fn unknown_codes_keep_raw_value(code in 0x100u32..=u32::MAX, payload in proptest::collection::vec(0u8..=255, 0..8)) {
        assert_eq!(StackEvent::decode(code, &payload), Ok(StackEvent::Unknown(code)));
    }

    /// Write requests carry handle, connection and value bytes unchanged.
    #[test]
    fn write_request_fields_survive_decode(
        att_id in 0u8..=255,
        bd_handle in 0u8..=255,
        handle in 0u16..=u16::MAX,
        value in proptest::collection::vec(0u8..=255, 0..=MAX_ATTRIBUTE_VALUE_LEN),
    ) {
        let mut raw = vec![att_id, bd_handle];
        raw.extend_from_slice(&handle.to_le_bytes());
        raw.extend_from_slice(&value);

        match StackEvent::decode(0x24, &raw) {
            Ok(StackEvent::WriteRequest(req)) => {
                assert_eq!(req.connection, ConnectionHandle::new(att_id, bd_handle));
                assert_eq!(req.handle, AttributeHandle::new(handle));
                assert_eq!(req.value.as_slice(), value.as_slice());
                assert_eq!(req.first_byte(), value.first().copied());
            }
            other => panic!("expected write request, got {other:?}"),
        }
    }

    /// Values past the attribute limit are rejected, not truncated.
    #[test]
    fn oversized_write_values_are_rejected(extra in 1usize..16) {
        let len = MAX_ATTRIBUTE_VALUE_LEN + extra;
        let mut raw = vec![0u8, 0, 0x10, 0x00];
        raw.resize(4 + len, 0xAB);
        assert_eq!(StackEvent::decode(0x24, &raw), Err(EventError::ValueTooLong { len }));
    }
}
