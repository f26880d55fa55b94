use bytes::{Bytes, BytesMut};

use crate::checksum::{frame_checksum, Crc16};
use crate::config::FrameConfig;
use crate::error::{FrameError, Result};
use crate::receiver::{Receiver, RxStatus};
use crate::transmitter::{Transmitter, TxStatus};

/// A reassembled packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// The packet payload, unescaped.
    pub payload: Bytes,
}

impl Frame {
    /// Create a new frame.
    pub fn new(payload: impl Into<Bytes>) -> Self {
        Self {
            payload: payload.into(),
        }
    }

    /// The total wire size of this frame under `config`, escapes included.
    ///
    /// Returns `None` when the payload is too long for the 16-bit length
    /// field. The trailer is sized with [`Crc16`]: under a custom
    /// [`Checksum`](crate::Checksum) the real size can differ by the two
    /// possible checksum escapes.
    pub fn wire_size(&self, config: &FrameConfig) -> Option<usize> {
        let len = u16::try_from(self.payload.len()).ok()?;
        let mut fields =
            escaped_len(config, &len.to_le_bytes()) + escaped_len(config, &self.payload);
        if config.checksum {
            let crc = frame_checksum(&Crc16, len, &self.payload);
            fields += escaped_len(config, &crc.to_le_bytes());
        }
        Some(1 + fields)
    }
}

fn escaped_len(config: &FrameConfig, bytes: &[u8]) -> usize {
    bytes.len() + bytes.iter().filter(|&&b| config.is_reserved(b)).count()
}

/// Encode one frame into the wire format.
///
/// Wire format:
/// ```text
/// ┌───────┬──────────────┬─────────────────┬──────────────────┐
/// │ START │ Length       │ Payload         │ CRC16 (optional) │
/// │ (1B)  │ (2B LE)      │ (Length bytes)  │ (2B LE)          │
/// └───────┴──────────────┴─────────────────┴──────────────────┘
/// ```
///
/// Every field after START is byte-stuffed: a literal START or ESC byte is
/// sent as `ESC START` / `ESC ESC`.
pub fn encode_frame(payload: &[u8], config: &FrameConfig, dst: &mut BytesMut) -> Result<()> {
    let mut tx = Transmitter::new(config)?;
    tx.start(payload)?;
    dst.reserve(1 + 2 * (payload.len() + 2 + config.trailer_len()));
    match tx.step(dst) {
        TxStatus::Done => Ok(()),
        TxStatus::NotDone => Err(FrameError::Incomplete),
    }
}

/// Decode the first complete frame in `src`.
///
/// Leading noise is skipped. Returns [`FrameError::Corrupt`] for the first
/// dropped frame and [`FrameError::Incomplete`] when `src` runs out first.
pub fn decode_frame(src: &[u8], config: &FrameConfig) -> Result<Frame> {
    let mut rx = Receiver::new(config.clone())?;
    match rx.feed_slice(src) {
        (_, RxStatus::Complete) => Ok(Frame::new(Bytes::copy_from_slice(rx.payload()))),
        (_, RxStatus::Corrupt(cause)) => Err(FrameError::Corrupt(cause)),
        (_, RxStatus::NotReady) => Err(FrameError::Incomplete),
    }
}
