use std::io::{BufReader, ErrorKind, Read};

use bytes::BytesMut;
use tracing::trace;

use crate::codec::{payload_length, Frame, FrameConfig};
use crate::error::{FrameError, Result};
use crate::varint;

const READ_BUFFER_CAPACITY: usize = 8 * 1024;

/// Reads complete frames from any `Read` stream.
///
/// Handles partial reads internally; callers always get complete frames.
pub struct FrameReader<T> {
    inner: BufReader<T>,
    config: FrameConfig,
}

impl<T: Read> FrameReader<T> {
    /// Create a new frame reader with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    /// Create a new frame reader with explicit configuration.
    pub fn with_config(inner: T, config: FrameConfig) -> Self {
        Self {
            inner: BufReader::with_capacity(READ_BUFFER_CAPACITY, inner),
            config,
        }
    }

    /// Read the next complete frame (blocking).
    ///
    /// Reads the varint length and id, then exactly `length - len(id)`
    /// payload bytes. Returns `Err(FrameError::ConnectionClosed)` when EOF is
    /// reached, whether at a frame boundary or inside a frame.
    pub fn read_frame(&mut self) -> Result<Frame> {
        let length = varint::read(&mut self.inner)?;
        let raw_id = varint::read(&mut self.inner)?;
        let id_len = varint::length(raw_id);
        let payload_len = payload_length(length, raw_id, id_len, self.config.max_payload_size)?;

        let mut payload = BytesMut::zeroed(payload_len);
        self.inner.read_exact(&mut payload).map_err(|err| {
            if err.kind() == ErrorKind::UnexpectedEof {
                FrameError::ConnectionClosed
            } else {
                FrameError::Io(err)
            }
        })?;

        trace!(id = raw_id, payload_len, "read frame");
        Ok(Frame {
            id: raw_id as u32,
            payload: payload.freeze(),
        })
    }

    /// Consume the reader and return the inner stream.
    ///
    /// Bytes already buffered but not yet returned as a frame are lost.
    pub fn into_inner(self) -> T {
        self.inner.into_inner()
    }

    pub fn config(&self) -> &FrameConfig {
        &self.config
    }
}

impl<T: Read> Iterator for FrameReader<T> {
    type Item = Result<Frame>;

    /// Yields frames until the stream closes cleanly; other errors are
    /// yielded once and end the iteration on the next call.
    fn next(&mut self) -> Option<Self::Item> {
        match self.read_frame() {
            Err(FrameError::ConnectionClosed) => None,
            other => Some(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::io::{self, Cursor};

    use super::*;
    use crate::codec::encode_frame;

    fn wire(frames: &[(u32, &[u8])]) -> Vec<u8> {
        let mut wire = BytesMut::new();
        for (id, payload) in frames {
            encode_frame(*id, payload, &mut wire);
        }
        wire.to_vec()
    }

    /// Replays a fixed sequence of read outcomes, one chunk per call.
    struct Scripted(VecDeque<io::Result<Vec<u8>>>);

    impl Scripted {
        fn chunks(bytes: &[u8], size: usize) -> Self {
            Self(bytes.chunks(size).map(|c| Ok(c.to_vec())).collect())
        }

        fn fail_first(mut self, kind: ErrorKind) -> Self {
            self.0.push_front(Err(io::Error::from(kind)));
            self
        }
    }

    impl Read for Scripted {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.0.pop_front() {
                None => Ok(0),
                Some(Err(err)) => Err(err),
                Some(Ok(mut chunk)) => {
                    let n = chunk.len().min(buf.len());
                    buf[..n].copy_from_slice(&chunk[..n]);
                    if n < chunk.len() {
                        self.0.push_front(Ok(chunk.split_off(n)));
                    }
                    Ok(n)
                }
            }
        }
    }

    #[test]
    fn frames_come_back_in_stream_order() {
        let bytes = wire(&[(0, b"version"), (1, b"compile"), (300, b"third")]);
        let frames: Vec<Frame> = FrameReader::new(Cursor::new(bytes))
            .collect::<Result<_>>()
            .unwrap();

        assert_eq!(
            frames,
            vec![
                Frame::new(0, &b"version"[..]),
                Frame::new(1, &b"compile"[..]),
                Frame::new(300, &b"third"[..]),
            ]
        );
    }

    #[test]
    fn widest_id_and_empty_payload() {
        let mut reader = FrameReader::new(Cursor::new(wire(&[(u32::MAX, b"")])));
        let frame = reader.read_frame().unwrap();

        assert_eq!(frame.id, u32::MAX);
        assert!(frame.payload.is_empty());
    }

    #[test]
    fn one_byte_reads_assemble_a_frame() {
        let payload = vec![0x5a; 300];
        let mut reader = FrameReader::new(Scripted::chunks(&wire(&[(7, &payload)]), 1));
        let frame = reader.read_frame().unwrap();

        assert_eq!(frame.id, 7);
        assert_eq!(frame.payload.len(), 300);
    }

    #[test]
    fn payload_larger_than_read_buffer() {
        let payload = vec![0xab; READ_BUFFER_CAPACITY * 3 + 17];
        let mut reader = FrameReader::new(Scripted::chunks(&wire(&[(2, &payload)]), 4096));
        let frame = reader.read_frame().unwrap();

        assert_eq!(frame.payload.as_ref(), payload.as_slice());
    }

    #[test]
    fn eof_anywhere_is_connection_closed() {
        let full = wire(&[(2, b"only-part-of-it")]);
        for cut in [0, 1, 2, 8] {
            let mut reader = FrameReader::new(Cursor::new(full[..cut].to_vec()));
            let err = reader.read_frame().unwrap_err();
            assert!(matches!(err, FrameError::ConnectionClosed), "cut at {cut}: {err}");
        }
    }

    #[test]
    fn length_shorter_than_id_is_malformed() {
        // length 1, but id 300 takes two bytes
        let mut reader = FrameReader::new(Cursor::new(vec![0x01, 0xac, 0x02]));
        let err = reader.read_frame().unwrap_err();
        assert!(matches!(err, FrameError::MalformedFrame { length: 1, id_len: 2 }));
    }

    #[test]
    fn id_beyond_u32_is_rejected() {
        let mut bytes = BytesMut::new();
        let id = u64::from(u32::MAX) + 1;
        varint::write(&mut bytes, varint::length(id) as u64);
        varint::write(&mut bytes, id);

        let mut reader = FrameReader::new(Cursor::new(bytes.to_vec()));
        let err = reader.read_frame().unwrap_err();
        assert!(matches!(err, FrameError::IdOutOfRange(v) if v == id));
    }

    #[test]
    fn runaway_varint_is_malformed() {
        let mut reader = FrameReader::new(Cursor::new(vec![0xff; 12]));
        let err = reader.read_frame().unwrap_err();
        assert!(matches!(err, FrameError::MalformedVarint(_)));
    }

    #[test]
    fn configured_cap_rejects_large_payloads() {
        let config = FrameConfig {
            max_payload_size: 16,
        };
        let mut reader =
            FrameReader::with_config(Cursor::new(wire(&[(1, &[0u8; 1024])])), config);
        let err = reader.read_frame().unwrap_err();

        assert!(matches!(err, FrameError::PayloadTooLarge { size: 1024, max: 16 }));
        assert_eq!(reader.config().max_payload_size, 16);
    }

    #[test]
    fn interrupted_reads_are_retried() {
        let source = Scripted::chunks(&wire(&[(8, b"ok")]), 2).fail_first(ErrorKind::Interrupted);
        let frame = FrameReader::new(source).read_frame().unwrap();
        assert_eq!(frame, Frame::new(8, &b"ok"[..]));
    }

    #[test]
    fn other_io_errors_propagate() {
        let source = Scripted::chunks(&wire(&[(8, b"ok")]), 2).fail_first(ErrorKind::BrokenPipe);
        let err = FrameReader::new(source).read_frame().unwrap_err();
        assert!(matches!(err, FrameError::Io(e) if e.kind() == ErrorKind::BrokenPipe));
    }

    #[test]
    fn iterator_ends_on_clean_close_only() {
        let mut bytes = wire(&[(1, b"a")]);
        bytes.push(0xff);
        let mut reader = FrameReader::new(Cursor::new(bytes));

        assert_eq!(reader.next().unwrap().unwrap().id, 1);
        // A dangling partial header is still just a closed stream.
        assert!(reader.next().is_none());
    }

    #[test]
    #[cfg(unix)]
    fn frames_cross_a_socket_pair() {
        let (left, right) = std::os::unix::net::UnixStream::pair().unwrap();
        let mut writer = crate::writer::FrameWriter::new(left);
        let mut reader = FrameReader::new(right);

        let sender = std::thread::spawn(move || {
            for id in 0..64u32 {
                writer.send(id * 37, format!("msg-{id}").as_bytes()).unwrap();
            }
        });
        for id in 0..64u32 {
            let frame = reader.read_frame().unwrap();
            assert_eq!(frame.id, id * 37);
            assert_eq!(frame.payload.as_ref(), format!("msg-{id}").as_bytes());
        }
        sender.join().unwrap();
    }
}
