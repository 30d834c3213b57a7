use std::io::{ErrorKind, Write};

use bytes::BytesMut;
use tracing::trace;

use crate::codec::{encode_frame, Frame};
use crate::error::{FrameError, Result};

const INITIAL_BUFFER_CAPACITY: usize = 8 * 1024;

/// Writes complete frames to any `Write` stream.
///
/// Length, id and payload are assembled into one buffer before anything
/// reaches the stream, so a frame never interleaves with another frame sent
/// through the same writer. Every frame is flushed.
pub struct FrameWriter<T> {
    inner: T,
    buf: BytesMut,
}

impl<T: Write> FrameWriter<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
        }
    }

    /// Encode `payload` under `id` and write it out (blocking).
    ///
    /// A stream that accepts zero bytes is treated as closed.
    pub fn send(&mut self, id: u32, payload: &[u8]) -> Result<()> {
        self.buf.clear();
        encode_frame(id, payload, &mut self.buf);

        let mut pending = &self.buf[..];
        while !pending.is_empty() {
            match self.inner.write(pending) {
                Ok(0) => return Err(FrameError::ConnectionClosed),
                Ok(n) => pending = &pending[n..],
                Err(err) if retryable(err.kind()) => {}
                Err(err) => return Err(FrameError::Io(err)),
            }
        }

        loop {
            match self.inner.flush() {
                Ok(()) => break,
                Err(err) if retryable(err.kind()) => {}
                Err(err) => return Err(FrameError::Io(err)),
            }
        }

        trace!(id, payload_len = payload.len(), "wrote frame");
        Ok(())
    }

    pub fn write_frame(&mut self, frame: &Frame) -> Result<()> {
        self.send(frame.id, &frame.payload)
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

fn retryable(kind: ErrorKind) -> bool {
    matches!(kind, ErrorKind::Interrupted | ErrorKind::WouldBlock)
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::io;

    use super::*;
    use crate::codec::decode_frame;

    /// What the next `write` call on a [`Sink`] does.
    enum Step {
        Accept(usize),
        Fail(ErrorKind),
    }

    /// A stream whose write behaviour is scripted. Once the script runs out
    /// every write is accepted whole.
    #[derive(Default)]
    struct Sink {
        script: VecDeque<Step>,
        flush_failures: VecDeque<ErrorKind>,
        writes: Vec<Vec<u8>>,
        flushes: usize,
    }

    impl Sink {
        fn scripted(steps: impl IntoIterator<Item = Step>) -> Self {
            Self {
                script: steps.into_iter().collect(),
                ..Self::default()
            }
        }

        fn bytes(&self) -> Vec<u8> {
            self.writes.concat()
        }
    }

    impl Write for Sink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            let n = match self.script.pop_front() {
                None => buf.len(),
                Some(Step::Accept(n)) => n.min(buf.len()),
                Some(Step::Fail(kind)) => return Err(io::Error::from(kind)),
            };
            self.writes.push(buf[..n].to_vec());
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            if let Some(kind) = self.flush_failures.pop_front() {
                return Err(io::Error::from(kind));
            }
            self.flushes += 1;
            Ok(())
        }
    }

    #[test]
    fn frame_goes_out_in_one_write() {
        let mut writer = FrameWriter::new(Sink::default());
        writer.send(7, b"css").unwrap();

        let sink = writer.into_inner();
        assert_eq!(sink.writes, vec![vec![0x04, 0x07, b'c', b's', b's']]);
        assert_eq!(sink.flushes, 1);
    }

    #[test]
    fn short_writes_resume_where_they_stopped() {
        let sink = Sink::scripted([Step::Accept(1), Step::Accept(2)]);
        let mut writer = FrameWriter::new(sink);
        writer.send(300, b"stylesheet").unwrap();

        let sink = writer.into_inner();
        assert_eq!(sink.writes.len(), 3);
        let mut wire = BytesMut::from(sink.bytes().as_slice());
        let frame = decode_frame(&mut wire, usize::MAX).unwrap().unwrap();
        assert_eq!(frame, Frame::new(300, &b"stylesheet"[..]));
    }

    #[test]
    fn consecutive_frames_stay_separate() {
        let mut writer = FrameWriter::new(Sink::default());
        writer.send(0, b"version").unwrap();
        writer.write_frame(&Frame::new(u32::MAX, "compile")).unwrap();

        let mut wire = BytesMut::from(writer.into_inner().bytes().as_slice());
        let first = decode_frame(&mut wire, usize::MAX).unwrap().unwrap();
        let second = decode_frame(&mut wire, usize::MAX).unwrap().unwrap();

        assert_eq!(first, Frame::new(0, &b"version"[..]));
        assert_eq!(second, Frame::new(u32::MAX, "compile"));
        assert!(wire.is_empty());
    }

    #[test]
    fn interrupted_and_would_block_are_retried() {
        let mut sink = Sink::scripted([
            Step::Fail(ErrorKind::Interrupted),
            Step::Fail(ErrorKind::WouldBlock),
        ]);
        sink.flush_failures.push_back(ErrorKind::Interrupted);
        let mut writer = FrameWriter::new(sink);

        writer.send(5, b"retry").unwrap();

        let sink = writer.into_inner();
        assert_eq!(sink.bytes(), [0x06, 0x05, b'r', b'e', b't', b'r', b'y']);
        assert_eq!(sink.flushes, 1);
    }

    #[test]
    fn zero_length_write_means_closed() {
        let mut writer = FrameWriter::new(Sink::scripted([Step::Accept(0)]));
        let err = writer.send(1, b"x").unwrap_err();
        assert!(matches!(err, FrameError::ConnectionClosed));
    }

    #[test]
    fn broken_pipe_surfaces_as_io() {
        let mut writer = FrameWriter::new(Sink::scripted([Step::Fail(ErrorKind::BrokenPipe)]));
        let err = writer.send(1, b"x").unwrap_err();
        assert!(matches!(err, FrameError::Io(e) if e.kind() == ErrorKind::BrokenPipe));
    }

    #[test]
    fn failed_flush_surfaces_as_io() {
        let mut sink = Sink::default();
        sink.flush_failures.push_back(ErrorKind::BrokenPipe);
        let mut writer = FrameWriter::new(sink);

        let err = writer.send(1, b"x").unwrap_err();
        assert!(matches!(err, FrameError::Io(e) if e.kind() == ErrorKind::BrokenPipe));
    }
}
