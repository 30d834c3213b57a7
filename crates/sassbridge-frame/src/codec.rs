use bytes::{Buf, Bytes, BytesMut};

use crate::error::{FrameError, Result};
use crate::varint;

/// Default maximum payload size: 16 MiB.
pub const DEFAULT_MAX_PAYLOAD: usize = 16 * 1024 * 1024;

/// A framed message with its multiplexing id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Compilation id (or 0 for compiler-global messages).
    pub id: u32,
    /// The serialized protocol message.
    pub payload: Bytes,
}

impl Frame {
    /// Create a new frame.
    pub fn new(id: u32, payload: impl Into<Bytes>) -> Self {
        Self {
            id,
            payload: payload.into(),
        }
    }

    /// Value of the length field: encoded id size plus payload size.
    pub fn length(&self) -> usize {
        frame_length(self.id, self.payload.len())
    }

    /// The total wire size of this frame (header + payload).
    pub fn wire_size(&self) -> usize {
        let length = self.length();
        varint::length(length as u64) + length
    }
}

/// Value of the length field for a frame carrying `id` and `payload_len` bytes.
///
/// The length counts the *encoded* id so the receiver knows where the id
/// ends and the payload begins.
pub fn frame_length(id: u32, payload_len: usize) -> usize {
    varint::length(u64::from(id)) + payload_len
}

/// Encode a frame into the wire format.
///
/// Wire format:
/// ```text
/// ┌──────────────────┬──────────────┬──────────────────────┐
/// │ Length (varint)  │ Id (varint)  │ Payload              │
/// │ len(Id)+len(Pay) │ u32          │ (protobuf message)   │
/// └──────────────────┴──────────────┴──────────────────────┘
/// ```
pub fn encode_frame(id: u32, payload: &[u8], dst: &mut BytesMut) {
    let length = frame_length(id, payload.len());
    dst.reserve(varint::length(length as u64) + length);
    varint::write(dst, length as u64);
    varint::write(dst, u64::from(id));
    dst.extend_from_slice(payload);
}

/// Decode a frame from a buffer.
///
/// Returns `Ok(None)` if the buffer doesn't contain a complete frame yet.
/// On success, consumes the frame bytes from the buffer.
pub fn decode_frame(src: &mut BytesMut, max_payload: usize) -> Result<Option<Frame>> {
    let Some((length, length_len)) = varint::decode(&src[..])? else {
        return Ok(None); // Need more data
    };
    let Some((raw_id, id_len)) = varint::decode(&src[length_len..])? else {
        return Ok(None);
    };

    let payload_len = payload_length(length, raw_id, id_len, max_payload)?;
    let id = raw_id as u32;

    let total = length_len + id_len + payload_len;
    if src.len() < total {
        return Ok(None); // Need more data
    }

    src.advance(length_len + id_len);
    let payload = src.split_to(payload_len).freeze();

    Ok(Some(Frame { id, payload }))
}

/// Validate a decoded header and return the payload length it announces.
pub(crate) fn payload_length(
    length: u64,
    id: u64,
    id_len: usize,
    max_payload: usize,
) -> Result<usize> {
    if u32::try_from(id).is_err() {
        return Err(FrameError::IdOutOfRange(id));
    }
    let Some(payload_len) = length.checked_sub(id_len as u64) else {
        return Err(FrameError::MalformedFrame { length, id_len });
    };
    match usize::try_from(payload_len) {
        Ok(len) if len <= max_payload => Ok(len),
        _ => Err(FrameError::PayloadTooLarge {
            size: usize::try_from(payload_len).unwrap_or(usize::MAX),
            max: max_payload,
        }),
    }
}

/// Configuration for the frame codec.
#[derive(Debug, Clone)]
pub struct FrameConfig {
    /// Maximum inbound payload size in bytes. Default: 16 MiB.
    pub max_payload_size: usize,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            max_payload_size: DEFAULT_MAX_PAYLOAD,
        }
    }
}

#[cfg(test)]
mod tests {
    use bytes::BufMut;

    use super::*;

    #[test]
    fn test_encode_decode_roundtrip() {
        let mut buf = BytesMut::new();
        let payload = b"hello, compiler!";
        let id = 1u32;

        encode_frame(id, payload, &mut buf);

        assert_eq!(buf.len(), Frame::new(id, &payload[..]).wire_size());

        let frame = decode_frame(&mut buf, DEFAULT_MAX_PAYLOAD)
            .unwrap()
            .unwrap();

        assert_eq!(frame.id, id);
        assert_eq!(frame.payload.as_ref(), payload);
        assert!(buf.is_empty());
    }

    #[test]
    fn test_header_layout() {
        let mut buf = BytesMut::new();
        encode_frame(300, b"abc", &mut buf);

        // length = 2 (id 300 encodes in two bytes) + 3
        assert_eq!(&buf[..], &[0x05, 0xac, 0x02, b'a', b'b', b'c']);
    }

    #[test]
    fn test_length_counts_encoded_id_size() {
        assert_eq!(frame_length(0, 10), 11);
        assert_eq!(frame_length(127, 10), 11);
        assert_eq!(frame_length(128, 10), 12);
        assert_eq!(frame_length(u32::MAX, 10), 15);
    }

    #[test]
    fn test_decode_incomplete_header() {
        let mut buf = BytesMut::from(&[0x85][..]);
        let result = decode_frame(&mut buf, DEFAULT_MAX_PAYLOAD).unwrap();
        assert!(result.is_none());

        let mut buf = BytesMut::from(&[0x05, 0xac][..]);
        let result = decode_frame(&mut buf, DEFAULT_MAX_PAYLOAD).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_decode_incomplete_payload() {
        let mut buf = BytesMut::new();
        encode_frame(1, b"hello", &mut buf);
        buf.truncate(4); // Truncate payload

        let result = decode_frame(&mut buf, DEFAULT_MAX_PAYLOAD).unwrap();
        assert!(result.is_none());
        assert_eq!(buf.len(), 4, "incomplete frames are not consumed");
    }

    #[test]
    fn test_decode_length_shorter_than_id() {
        // length 1, but id 300 needs two bytes
        let mut buf = BytesMut::from(&[0x01, 0xac, 0x02][..]);
        let result = decode_frame(&mut buf, DEFAULT_MAX_PAYLOAD);
        assert!(matches!(
            result,
            Err(FrameError::MalformedFrame {
                length: 1,
                id_len: 2
            })
        ));
    }

    #[test]
    fn test_decode_id_out_of_range() {
        let mut buf = BytesMut::new();
        varint::write(&mut buf, 6);
        varint::write(&mut buf, u64::from(u32::MAX) + 1);
        let result = decode_frame(&mut buf, DEFAULT_MAX_PAYLOAD);
        assert!(matches!(result, Err(FrameError::IdOutOfRange(_))));
    }

    #[test]
    fn test_decode_payload_too_large() {
        let mut buf = BytesMut::new();
        varint::write(&mut buf, 32 * 1024 * 1024 + 1); // 32 MiB
        buf.put_u8(1);

        let result = decode_frame(&mut buf, DEFAULT_MAX_PAYLOAD);
        assert!(matches!(result, Err(FrameError::PayloadTooLarge { .. })));
    }

    #[test]
    fn test_multiple_frames() {
        let mut buf = BytesMut::new();
        encode_frame(1, b"first", &mut buf);
        encode_frame(2, b"second", &mut buf);

        let f1 = decode_frame(&mut buf, DEFAULT_MAX_PAYLOAD)
            .unwrap()
            .unwrap();
        assert_eq!(f1.id, 1);
        assert_eq!(f1.payload.as_ref(), b"first");

        let f2 = decode_frame(&mut buf, DEFAULT_MAX_PAYLOAD)
            .unwrap()
            .unwrap();
        assert_eq!(f2.id, 2);
        assert_eq!(f2.payload.as_ref(), b"second");

        assert!(buf.is_empty());
    }

    #[test]
    fn test_empty_payload() {
        let mut buf = BytesMut::new();
        encode_frame(0, b"", &mut buf);
        assert_eq!(&buf[..], &[0x01, 0x00]);

        let frame = decode_frame(&mut buf, DEFAULT_MAX_PAYLOAD)
            .unwrap()
            .unwrap();
        assert_eq!(frame.id, 0);
        assert!(frame.payload.is_empty());
    }

    #[test]
    fn test_frame_wire_size() {
        let frame = Frame::new(1, Bytes::from_static(b"test"));
        assert_eq!(frame.length(), 5);
        assert_eq!(frame.wire_size(), 6);

        let large = Frame::new(7, vec![0u8; 200]);
        assert_eq!(large.wire_size(), 2 + 1 + 200);
    }
}
