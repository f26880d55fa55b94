//! Byte-at-a-time frame emission with backpressure.

use crate::checksum::{frame_checksum, Checksum, Crc16};
use crate::config::{FrameConfig, MAX_WIRE_PAYLOAD};
use crate::error::{FrameError, Result};
use crate::sink::ByteSink;
use crate::symbol::Escaper;

/// Outcome of one [`Transmitter::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxStatus {
    /// The sink declined a byte; call `step` again later.
    NotDone,
    /// The whole frame is on the wire.
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TxState {
    Idle,
    SendStart,
    LengthLow,
    LengthHigh,
    Payload { cursor: u16 },
    ChecksumLow,
    ChecksumHigh,
    Done,
}

/// Transmitting half of a link.
///
/// The payload is borrowed for `'a`, so it cannot be mutated or dropped
/// while a frame is in flight. Start a new frame with [`start`](Self::start).
#[derive(Debug)]
pub struct Transmitter<'a, C = Crc16> {
    start_symbol: u8,
    with_checksum: bool,
    checksum: C,
    escaper: Escaper,
    state: TxState,
    source: &'a [u8],
    length: u16,
    crc: u16,
}

impl<'a> Transmitter<'a, Crc16> {
    /// Create an idle transmitter using the default CRC16.
    pub fn new(config: &FrameConfig) -> Result<Self> {
        Self::with_checksum(config, Crc16)
    }
}

impl<'a, C: Checksum> Transmitter<'a, C> {
    /// Create an idle transmitter with a custom checksum primitive.
    pub fn with_checksum(config: &FrameConfig, checksum: C) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            start_symbol: config.start_symbol,
            with_checksum: config.checksum,
            checksum,
            escaper: Escaper::new(config.start_symbol, config.escape_symbol),
            state: TxState::Idle,
            source: &[],
            length: 0,
            crc: 0,
        })
    }

    /// Arm the transmitter with a new payload, abandoning any frame in flight.
    pub fn start(&mut self, payload: &'a [u8]) -> Result<()> {
        let length = u16::try_from(payload.len()).map_err(|_| FrameError::PayloadTooLarge {
            size: payload.len(),
            max: MAX_WIRE_PAYLOAD,
        })?;

        self.source = payload;
        self.length = length;
        self.escaper.reset();
        self.crc = if self.with_checksum {
            frame_checksum(&self.checksum, length, payload)
        } else {
            0
        };
        self.state = TxState::SendStart;
        Ok(())
    }

    /// Push as many bytes as `sink` accepts.
    ///
    /// Returns [`TxStatus::NotDone`] as soon as the sink declines; the next
    /// call resumes with the same byte. Idle and finished transmitters
    /// report [`TxStatus::Done`] without touching the sink.
    pub fn step<S: ByteSink + ?Sized>(&mut self, sink: &mut S) -> TxStatus {
        loop {
            match self.state {
                TxState::Idle | TxState::Done => return TxStatus::Done,
                TxState::SendStart => {
                    if !sink.try_send(self.start_symbol) {
                        return TxStatus::NotDone;
                    }
                    self.state = TxState::LengthLow;
                }
                TxState::LengthLow => {
                    if !self.put(self.length.to_le_bytes()[0], sink) {
                        return TxStatus::NotDone;
                    }
                    self.state = TxState::LengthHigh;
                }
                TxState::LengthHigh => {
                    if !self.put(self.length.to_le_bytes()[1], sink) {
                        return TxStatus::NotDone;
                    }
                    self.state = TxState::Payload { cursor: 0 };
                }
                TxState::Payload { cursor } if cursor >= self.length => {
                    if !self.with_checksum {
                        self.state = TxState::Done;
                        return TxStatus::Done;
                    }
                    self.state = TxState::ChecksumLow;
                }
                TxState::Payload { cursor } => {
                    if !self.put(self.source[usize::from(cursor)], sink) {
                        return TxStatus::NotDone;
                    }
                    self.state = TxState::Payload { cursor: cursor + 1 };
                }
                TxState::ChecksumLow => {
                    if !self.put(self.crc.to_le_bytes()[0], sink) {
                        return TxStatus::NotDone;
                    }
                    self.state = TxState::ChecksumHigh;
                }
                TxState::ChecksumHigh => {
                    if !self.put(self.crc.to_le_bytes()[1], sink) {
                        return TxStatus::NotDone;
                    }
                    self.state = TxState::Done;
                    return TxStatus::Done;
                }
            }
        }
    }

    /// True when no frame is in flight.
    pub fn is_done(&self) -> bool {
        matches!(self.state, TxState::Idle | TxState::Done)
    }

    /// Payload bytes already handed to the sink.
    pub fn progress(&self) -> usize {
        match self.state {
            TxState::Idle | TxState::SendStart | TxState::LengthLow | TxState::LengthHigh => 0,
            TxState::Payload { cursor } => usize::from(cursor),
            TxState::ChecksumLow | TxState::ChecksumHigh | TxState::Done => self.source.len(),
        }
    }

    /// Checksum that trails the current payload (0 with checksums disabled).
    pub fn checksum(&self) -> u16 {
        self.crc
    }

    // Emit one field byte; a freshly accepted escape gets its companion
    // offered straight away.
    fn put<S: ByteSink + ?Sized>(&mut self, byte: u8, sink: &mut S) -> bool {
        let was_awaiting = self.escaper.awaiting_companion();
        if self.escaper.emit(byte, sink) {
            return true;
        }
        !was_awaiting && self.escaper.awaiting_companion() && self.escaper.emit(byte, sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::BoundedSink;

    const START: u8 = 0xF5;
    const ESC: u8 = 0xF4;

    #[test]
    fn idle_transmitter_reports_done() {
        let mut tx = Transmitter::new(&FrameConfig::default()).unwrap();
        let mut wire = Vec::new();
        assert_eq!(tx.step(&mut wire), TxStatus::Done);
        assert!(wire.is_empty());
    }

    #[test]
    fn escapes_start_byte_in_payload() {
        let payload = [START];
        let mut tx = Transmitter::new(&FrameConfig::default()).unwrap();
        tx.start(&payload).unwrap();

        let mut wire = Vec::new();
        assert_eq!(tx.step(&mut wire), TxStatus::Done);
        assert_eq!(wire, vec![START, 0x01, 0x00, ESC, START, 0x16, 0x44]);
        assert_eq!(tx.checksum(), 0x4416);
    }

    #[test]
    fn omits_checksum_when_disabled() {
        let payload = [ESC, 0x00];
        let cfg = FrameConfig::default().with_checksum(false);
        let mut tx = Transmitter::new(&cfg).unwrap();
        tx.start(&payload).unwrap();

        let mut wire = Vec::new();
        assert_eq!(tx.step(&mut wire), TxStatus::Done);
        assert_eq!(wire, vec![START, 0x02, 0x00, ESC, ESC, 0x00]);
    }

    #[test]
    fn escapes_length_bytes() {
        let payload = vec![0u8; 0xF4];
        let cfg = FrameConfig::default().with_checksum(false);
        let mut tx = Transmitter::new(&cfg).unwrap();
        tx.start(&payload).unwrap();

        let mut wire = Vec::new();
        tx.step(&mut wire);
        assert_eq!(&wire[..4], &[START, ESC, 0xF4, 0x00]);
        assert_eq!(wire.len(), 4 + 0xF4);
    }

    #[test]
    fn done_is_idempotent() {
        let payload = [1, 2, 3];
        let mut tx = Transmitter::new(&FrameConfig::default()).unwrap();
        tx.start(&payload).unwrap();

        let mut wire = Vec::new();
        assert_eq!(tx.step(&mut wire), TxStatus::Done);
        let sent = wire.len();
        assert_eq!(tx.step(&mut wire), TxStatus::Done);
        assert_eq!(wire.len(), sent);
        assert!(tx.is_done());
    }

    #[test]
    fn resumes_after_backpressure() {
        let payload = [START, ESC, 0x42];
        let mut tx = Transmitter::new(&FrameConfig::default()).unwrap();
        tx.start(&payload).unwrap();

        let mut sink = BoundedSink::new(Vec::new(), 0);
        let mut calls = 0;
        while tx.step(&mut sink) == TxStatus::NotDone {
            calls += 1;
            sink.refill(1);
        }
        assert!(calls > 1);

        let mut reference = Vec::new();
        let mut fresh = Transmitter::new(&FrameConfig::default()).unwrap();
        fresh.start(&payload).unwrap();
        fresh.step(&mut reference);

        assert_eq!(sink.into_inner(), reference);
    }

    #[test]
    fn progress_tracks_payload_cursor() {
        let payload = [0x10, 0x20, 0x30];
        let mut tx = Transmitter::new(&FrameConfig::default()).unwrap();
        tx.start(&payload).unwrap();

        // start + two length bytes + one payload byte
        let mut sink = BoundedSink::new(Vec::new(), 4);
        assert_eq!(tx.step(&mut sink), TxStatus::NotDone);
        assert_eq!(tx.progress(), 1);
        assert!(!tx.is_done());
    }

    #[test]
    fn restart_abandons_frame_in_flight() {
        let first = [START, START];
        let second = [0x01];
        let mut tx = Transmitter::new(&FrameConfig::default()).unwrap();
        tx.start(&first).unwrap();

        // leave an escape pending
        let mut sink = BoundedSink::new(Vec::new(), 4);
        tx.step(&mut sink);

        tx.start(&second).unwrap();
        let mut wire = Vec::new();
        assert_eq!(tx.step(&mut wire), TxStatus::Done);
        assert_eq!(&wire[..4], &[START, 0x01, 0x00, 0x01]);
    }

    #[test]
    fn rejects_payload_beyond_length_field() {
        let payload = vec![0u8; MAX_WIRE_PAYLOAD + 1];
        let mut tx = Transmitter::new(&FrameConfig::default()).unwrap();
        assert!(matches!(
            tx.start(&payload),
            Err(FrameError::PayloadTooLarge { .. })
        ));
        assert!(tx.is_done());
    }
}
