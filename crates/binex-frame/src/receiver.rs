//! Byte-at-a-time frame reassembly.

use tracing::trace;

use crate::checksum::{frame_checksum, Checksum, Crc16};
use crate::config::FrameConfig;
use crate::error::{Corruption, Result};
use crate::symbol::{Symbol, Unescaper};

/// Outcome of feeding one byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RxStatus {
    /// No complete frame yet.
    NotReady,
    /// A frame is complete; read it with [`Receiver::payload`].
    Complete,
    /// The frame in progress was dropped.
    Corrupt(Corruption),
}

impl RxStatus {
    pub fn is_complete(&self) -> bool {
        matches!(self, RxStatus::Complete)
    }

    pub fn is_corrupt(&self) -> bool {
        matches!(self, RxStatus::Corrupt(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RxState {
    AwaitStart,
    LengthLow,
    LengthHigh { low: u8 },
    Payload { length: u16, received: u16 },
    ChecksumLow { length: u16 },
    ChecksumHigh { length: u16, low: u8 },
}

/// Receiving half of a link.
///
/// Owns one packet's worth of buffer and reuses it for every frame. After
/// [`feed`](Self::feed) reports [`RxStatus::Complete`], the payload stays
/// readable until the next call to `feed`.
#[derive(Debug)]
pub struct Receiver<C = Crc16> {
    config: FrameConfig,
    checksum: C,
    unescaper: Unescaper,
    state: RxState,
    received_length: u16,
    buffer: Box<[u8]>,
}

impl Receiver<Crc16> {
    /// Create a receiver using the default CRC16.
    pub fn new(config: FrameConfig) -> Result<Self> {
        Self::with_checksum(config, Crc16)
    }
}

impl Default for Receiver<Crc16> {
    fn default() -> Self {
        Self::build(FrameConfig::default(), Crc16)
    }
}

impl<C: Checksum> Receiver<C> {
    /// Create a receiver with a custom checksum primitive.
    pub fn with_checksum(config: FrameConfig, checksum: C) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config, checksum))
    }

    fn build(config: FrameConfig, checksum: C) -> Self {
        Self {
            unescaper: Unescaper::new(config.start_symbol, config.escape_symbol),
            buffer: vec![0u8; config.buffer_capacity].into_boxed_slice(),
            config,
            checksum,
            state: RxState::AwaitStart,
            received_length: 0,
        }
    }

    /// Drive the machine with one byte, or `None` when no byte is available.
    pub fn feed(&mut self, byte: Option<u8>) -> RxStatus {
        let Some(byte) = byte else {
            return RxStatus::NotReady;
        };

        let symbol = self.unescaper.classify(byte);
        match (self.state, symbol) {
            (RxState::AwaitStart, Symbol::Start) => {
                self.state = RxState::LengthLow;
                RxStatus::NotReady
            }
            // Scanning for sync: everything else is noise.
            (RxState::AwaitStart, _) => RxStatus::NotReady,
            (_, Symbol::Escape) => RxStatus::NotReady,
            // A start byte inside a frame is never taken as the next frame's
            // start: resync only happens from AwaitStart.
            (_, Symbol::Start) | (_, Symbol::Invalid) => self.abort(Corruption::FrameDesync),
            (RxState::LengthLow, Symbol::Data(low)) => {
                self.state = RxState::LengthHigh { low };
                RxStatus::NotReady
            }
            (RxState::LengthHigh { low }, Symbol::Data(high)) => {
                let length = u16::from_le_bytes([low, high]);
                self.received_length = length;
                if usize::from(length) > self.buffer.len() {
                    return self.abort(Corruption::OversizedPacket {
                        declared: length,
                        capacity: self.buffer.len(),
                    });
                }
                if length == 0 {
                    return self.payload_done(0);
                }
                self.state = RxState::Payload {
                    length,
                    received: 0,
                };
                RxStatus::NotReady
            }
            (RxState::Payload { length, received }, Symbol::Data(byte)) => {
                self.buffer[usize::from(received)] = byte;
                let received = received + 1;
                if received == length {
                    return self.payload_done(length);
                }
                self.state = RxState::Payload { length, received };
                RxStatus::NotReady
            }
            (RxState::ChecksumLow { length }, Symbol::Data(low)) => {
                self.state = RxState::ChecksumHigh { length, low };
                RxStatus::NotReady
            }
            (RxState::ChecksumHigh { length, low }, Symbol::Data(high)) => {
                let expected = u16::from_le_bytes([low, high]);
                let computed = frame_checksum(
                    &self.checksum,
                    length,
                    &self.buffer[..usize::from(length)],
                );
                if computed == expected {
                    self.finish()
                } else {
                    self.abort(Corruption::ChecksumMismatch { expected, computed })
                }
            }
        }
    }

    /// Feed bytes until a frame completes or is dropped.
    ///
    /// Returns the number of bytes consumed and the status of the last one.
    /// Bytes after a terminal status are left for the next call so the
    /// completed payload is not overwritten.
    pub fn feed_slice(&mut self, bytes: &[u8]) -> (usize, RxStatus) {
        for (idx, &byte) in bytes.iter().enumerate() {
            let status = self.feed(Some(byte));
            if status != RxStatus::NotReady {
                return (idx + 1, status);
            }
        }
        (bytes.len(), RxStatus::NotReady)
    }

    /// Length field of the most recent frame header.
    ///
    /// Matches `payload().len()` right after [`RxStatus::Complete`].
    pub fn received_length(&self) -> u16 {
        self.received_length
    }

    /// Payload of the last completed frame.
    pub fn payload(&self) -> &[u8] {
        let len = usize::from(self.received_length).min(self.buffer.len());
        &self.buffer[..len]
    }

    /// Maximum payload length this receiver accepts.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// True while scanning for a start symbol.
    pub fn is_idle(&self) -> bool {
        self.state == RxState::AwaitStart
    }

    /// Drop any frame in progress, e.g. after an idle timeout.
    pub fn reset(&mut self) {
        self.state = RxState::AwaitStart;
        self.unescaper.reset();
        self.received_length = 0;
    }

    pub fn config(&self) -> &FrameConfig {
        &self.config
    }

    fn payload_done(&mut self, length: u16) -> RxStatus {
        if self.config.checksum {
            self.state = RxState::ChecksumLow { length };
            RxStatus::NotReady
        } else {
            self.finish()
        }
    }

    fn finish(&mut self) -> RxStatus {
        self.state = RxState::AwaitStart;
        self.unescaper.reset();
        RxStatus::Complete
    }

    fn abort(&mut self, cause: Corruption) -> RxStatus {
        trace!(state = ?self.state, %cause, "dropping frame");
        self.state = RxState::AwaitStart;
        self.unescaper.reset();
        RxStatus::Corrupt(cause)
    }
}
