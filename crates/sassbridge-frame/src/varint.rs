//! Unsigned LEB128 varints.
//!
//! Seven payload bits per byte, least significant group first, high bit set
//! on every byte except the last. Used for the length and id fields of every
//! frame header.

use std::io::{ErrorKind, Read};

use bytes::BufMut;

use crate::error::{FrameError, Result};

/// Widest encoding of a `u64`.
pub const MAX_VARINT_LEN: usize = 10;

/// Append the varint encoding of `value` to `buf`.
pub fn write<B: BufMut>(buf: &mut B, mut value: u64) {
    while value >= 0x80 {
        buf.put_u8((value as u8 & 0x7f) | 0x80);
        value >>= 7;
    }
    buf.put_u8(value as u8);
}

/// Number of bytes [`write`] emits for `value`.
pub fn length(value: u64) -> usize {
    let bits = 64 - (value | 1).leading_zeros() as usize;
    bits.div_ceil(7)
}

/// Read one varint from a blocking stream.
///
/// End of stream before the final byte yields [`FrameError::ConnectionClosed`];
/// the stream is considered broken, not malformed.
pub fn read<R: Read>(reader: &mut R) -> Result<u64> {
    let mut value = 0u64;
    for index in 0..MAX_VARINT_LEN {
        let byte = read_byte(reader)?;
        value |= accumulate(index, byte)?;
        if byte & 0x80 == 0 {
            return Ok(value);
        }
    }
    Err(FrameError::MalformedVarint(MAX_VARINT_LEN))
}

/// Decode one varint from the front of `src` without consuming it.
///
/// Returns `Ok(None)` if `src` ends before the varint does, otherwise the
/// value and the number of bytes it occupies.
pub fn decode(src: &[u8]) -> Result<Option<(u64, usize)>> {
    let mut value = 0u64;
    for (index, &byte) in src.iter().take(MAX_VARINT_LEN).enumerate() {
        value |= accumulate(index, byte)?;
        if byte & 0x80 == 0 {
            return Ok(Some((value, index + 1)));
        }
    }
    Ok(None)
}

fn accumulate(index: usize, byte: u8) -> Result<u64> {
    // The tenth byte holds bit 63 only.
    if index == MAX_VARINT_LEN - 1 && byte > 1 {
        return Err(FrameError::MalformedVarint(MAX_VARINT_LEN));
    }
    Ok(u64::from(byte & 0x7f) << (7 * index))
}

fn read_byte<R: Read>(reader: &mut R) -> Result<u8> {
    let mut byte = [0u8; 1];
    loop {
        match reader.read(&mut byte) {
            Ok(0) => return Err(FrameError::ConnectionClosed),
            Ok(_) => return Ok(byte[0]),
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(FrameError::Io(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn encode(value: u64) -> Vec<u8> {
        let mut buf = Vec::new();
        write(&mut buf, value);
        buf
    }

    #[test]
    fn known_encodings() {
        assert_eq!(encode(0), [0x00]);
        assert_eq!(encode(1), [0x01]);
        assert_eq!(encode(127), [0x7f]);
        assert_eq!(encode(128), [0x80, 0x01]);
        assert_eq!(encode(300), [0xac, 0x02]);
        assert_eq!(encode(16_384), [0x80, 0x80, 0x01]);
        assert_eq!(
            encode(u64::MAX),
            [0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x01]
        );
    }

    #[test]
    fn length_matches_written_bytes() {
        for value in [
            0,
            1,
            127,
            128,
            16_383,
            16_384,
            u64::from(u32::MAX),
            1 << 56,
            u64::MAX,
        ] {
            assert_eq!(length(value), encode(value).len(), "value {value}");
        }
    }

    #[test]
    fn read_returns_written_value() {
        for value in [0, 7, 300, 65_535, u64::from(u32::MAX), u64::MAX] {
            let mut cursor = Cursor::new(encode(value));
            assert_eq!(read(&mut cursor).unwrap(), value);
            assert_eq!(cursor.position() as usize, length(value));
        }
    }

    #[test]
    fn read_consumes_only_one_varint() {
        let mut bytes = encode(300);
        bytes.extend_from_slice(&encode(7));
        let mut cursor = Cursor::new(bytes);

        assert_eq!(read(&mut cursor).unwrap(), 300);
        assert_eq!(read(&mut cursor).unwrap(), 7);
    }

    #[test]
    fn read_eof_mid_varint_is_connection_closed() {
        let mut cursor = Cursor::new(vec![0x80, 0x80]);
        assert!(matches!(
            read(&mut cursor),
            Err(FrameError::ConnectionClosed)
        ));
    }

    #[test]
    fn read_empty_stream_is_connection_closed() {
        let mut cursor = Cursor::new(Vec::<u8>::new());
        assert!(matches!(
            read(&mut cursor),
            Err(FrameError::ConnectionClosed)
        ));
    }

    #[test]
    fn read_rejects_overlong_varint() {
        let mut cursor = Cursor::new(vec![0xff; 11]);
        assert!(matches!(
            read(&mut cursor),
            Err(FrameError::MalformedVarint(_))
        ));
    }

    #[test]
    fn decode_reports_incomplete_input() {
        assert_eq!(decode(&[]).unwrap(), None);
        assert_eq!(decode(&[0xac]).unwrap(), None);
        assert_eq!(decode(&[0xac, 0x02, 0xff]).unwrap(), Some((300, 2)));
    }

    #[test]
    fn decode_rejects_overflowing_tenth_byte() {
        let mut bytes = vec![0xff; 9];
        bytes.push(0x02);
        assert!(matches!(decode(&bytes), Err(FrameError::MalformedVarint(_))));
    }
}
