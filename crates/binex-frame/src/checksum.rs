//! 16-bit frame checksum.
//!
//! Both machines feed the checksum the *unescaped* length field (two bytes,
//! little-endian) followed by the unescaped payload. The algorithm is a
//! collaborator: anything with a seed and an incremental update fits.

use crc::{Crc, CRC_16_IBM_3740};

/// Incremental 16-bit checksum.
pub trait Checksum {
    /// Seed value for a fresh computation.
    fn start_value(&self) -> u16;

    /// Fold `bytes` into `running` and return the new running value.
    fn update(&self, bytes: &[u8], running: u16) -> u16;
}

static CRC16_IBM_3740: Crc<u16> = Crc::<u16>::new(&CRC_16_IBM_3740);

/// CRC-16/IBM-3740 (also known as CRC-16/CCITT-FALSE).
///
/// Polynomial 0x1021, seed 0xFFFF, no reflection, no final xor, so a running
/// value can be fed back in as the next seed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Crc16;

impl Checksum for Crc16 {
    fn start_value(&self) -> u16 {
        CRC_16_IBM_3740.init
    }

    fn update(&self, bytes: &[u8], running: u16) -> u16 {
        let mut digest = CRC16_IBM_3740.digest_with_initial(running);
        digest.update(bytes);
        digest.finalize()
    }
}

/// Checksum of one frame: length field then payload.
pub fn frame_checksum<C: Checksum + ?Sized>(checksum: &C, length: u16, payload: &[u8]) -> u16 {
    let running = checksum.update(&length.to_le_bytes(), checksum.start_value());
    checksum.update(payload, running)
}
