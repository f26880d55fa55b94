//! `tokio_util::codec` adapter for use with `FramedRead`/`FramedWrite`.

use bytes::{Buf, Bytes, BytesMut};
use tokio_util::codec::{Decoder, Encoder};
use tracing::warn;

use crate::codec::{encode_frame, Frame};
use crate::config::FrameConfig;
use crate::error::{FrameError, Result};
use crate::receiver::{Receiver, RxStatus};

/// Stream codec over a byte-stuffed link.
///
/// Decoding skips corrupt frames instead of failing the stream, since a
/// serial link is expected to see noise. Dropped frames are logged and
/// counted in [`corrupt_frames`](Self::corrupt_frames).
#[derive(Debug)]
pub struct BinexCodec {
    rx: Receiver,
    corrupt_frames: u64,
}

impl BinexCodec {
    pub fn new(config: FrameConfig) -> Result<Self> {
        Ok(Self {
            rx: Receiver::new(config)?,
            corrupt_frames: 0,
        })
    }

    pub fn corrupt_frames(&self) -> u64 {
        self.corrupt_frames
    }

    pub fn config(&self) -> &FrameConfig {
        self.rx.config()
    }
}

impl Default for BinexCodec {
    fn default() -> Self {
        Self {
            rx: Receiver::default(),
            corrupt_frames: 0,
        }
    }
}

impl Decoder for BinexCodec {
    type Item = Frame;
    type Error = FrameError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Frame>> {
        while !src.is_empty() {
            let (used, status) = self.rx.feed_slice(&src[..]);
            src.advance(used);
            match status {
                RxStatus::Complete => {
                    return Ok(Some(Frame::new(Bytes::copy_from_slice(self.rx.payload()))));
                }
                RxStatus::Corrupt(cause) => {
                    self.corrupt_frames = self.corrupt_frames.saturating_add(1);
                    warn!(%cause, "skipping corrupt frame");
                }
                RxStatus::NotReady => {}
            }
        }
        Ok(None)
    }
}

impl<'a> Encoder<&'a [u8]> for BinexCodec {
    type Error = FrameError;

    fn encode(&mut self, payload: &'a [u8], dst: &mut BytesMut) -> Result<()> {
        let config = self.rx.config();
        if payload.len() > config.buffer_capacity {
            return Err(FrameError::PayloadTooLarge {
                size: payload.len(),
                max: config.buffer_capacity,
            });
        }
        encode_frame(payload, config, dst)
    }
}

impl Encoder<Frame> for BinexCodec {
    type Error = FrameError;

    fn encode(&mut self, frame: Frame, dst: &mut BytesMut) -> Result<()> {
        Encoder::<&[u8]>::encode(self, frame.payload.as_ref(), dst)
    }
}
