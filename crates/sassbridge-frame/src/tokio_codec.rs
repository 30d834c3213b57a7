//! `tokio_util::codec` adapter for async hosts.

use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};

use crate::codec::{decode_frame, encode_frame, Frame, FrameConfig};
use crate::error::FrameError;

/// Frame codec for `FramedRead` / `FramedWrite` over async child pipes.
#[derive(Debug, Clone, Default)]
pub struct FrameCodec {
    config: FrameConfig,
}

impl FrameCodec {
    pub fn new(config: FrameConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FrameConfig {
        &self.config
    }
}

impl Decoder for FrameCodec {
    type Item = Frame;
    type Error = FrameError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        decode_frame(src, self.config.max_payload_size)
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        match self.decode(src)? {
            Some(frame) => Ok(Some(frame)),
            None if src.is_empty() => Ok(None),
            None => Err(FrameError::ConnectionClosed),
        }
    }
}

impl Encoder<Frame> for FrameCodec {
    type Error = FrameError;

    fn encode(&mut self, item: Frame, dst: &mut BytesMut) -> Result<(), Self::Error> {
        encode_frame(item.id, &item.payload, dst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use futures_util::{SinkExt, StreamExt};
    use tokio::io::AsyncWriteExt;
    use tokio_util::codec::{FramedRead, FramedWrite};

    use super::*;

    #[tokio::test]
    async fn frames_cross_a_duplex_pipe() {
        let (client, server) = tokio::io::duplex(64);
        let mut sink = FramedWrite::new(client, FrameCodec::default());
        let mut stream = FramedRead::new(server, FrameCodec::default());

        let writer = tokio::spawn(async move {
            sink.send(Frame::new(1, &b"compile"[..])).await.unwrap();
            sink.send(Frame::new(300, vec![0x5a; 1024])).await.unwrap();
        });

        let first = stream.next().await.unwrap().unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(first.payload.as_ref(), b"compile");

        let second = stream.next().await.unwrap().unwrap();
        assert_eq!(second.id, 300);
        assert_eq!(second.payload.len(), 1024);

        writer.await.unwrap();
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn truncated_stream_is_connection_closed() {
        let (mut client, server) = tokio::io::duplex(64);
        let mut stream = FramedRead::new(server, FrameCodec::default());

        client.write_all(&[0x05, 0x01, b'a']).await.unwrap();
        drop(client);

        let err = stream.next().await.unwrap().unwrap_err();
        assert!(matches!(err, FrameError::ConnectionClosed));
    }

    #[test]
    fn decoder_respects_configured_limit() {
        let mut codec = FrameCodec::new(FrameConfig {
            max_payload_size: 4,
        });
        let mut buf = BytesMut::new();
        encode_frame(1, b"too long", &mut buf);

        assert!(matches!(
            codec.decode(&mut buf),
            Err(FrameError::PayloadTooLarge { size: 8, max: 4 })
        ));
    }
}
