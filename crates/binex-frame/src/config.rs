use crate::error::{FrameError, Result};

/// Default start-of-frame symbol.
pub const DEFAULT_START_SYMBOL: u8 = 0xF5;

/// Default escape symbol.
pub const DEFAULT_ESCAPE_SYMBOL: u8 = 0xF4;

/// Default receive buffer capacity (maximum payload length).
pub const DEFAULT_BUFFER_CAPACITY: usize = 192;

/// Largest payload the 16-bit length field can describe.
pub const MAX_WIRE_PAYLOAD: usize = u16::MAX as usize;

/// Static configuration shared by both ends of a link.
///
/// Sender and receiver must agree on the symbols and on whether a checksum
/// trails the payload. A receiver with `checksum: false` tolerates senders
/// that append one; the reverse is not true.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameConfig {
    /// Byte that opens every frame. Never escaped at a frame boundary.
    pub start_symbol: u8,
    /// Byte that marks the following byte as literal.
    pub escape_symbol: u8,
    /// Maximum payload length accepted by a receiver. Default: 192.
    pub buffer_capacity: usize,
    /// Append (transmit) and verify (receive) a CRC16 after the payload.
    pub checksum: bool,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            start_symbol: DEFAULT_START_SYMBOL,
            escape_symbol: DEFAULT_ESCAPE_SYMBOL,
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            checksum: true,
        }
    }
}

impl FrameConfig {
    pub fn with_symbols(mut self, start_symbol: u8, escape_symbol: u8) -> Self {
        self.start_symbol = start_symbol;
        self.escape_symbol = escape_symbol;
        self
    }

    pub fn with_buffer_capacity(mut self, buffer_capacity: usize) -> Self {
        self.buffer_capacity = buffer_capacity;
        self
    }

    pub fn with_checksum(mut self, checksum: bool) -> Self {
        self.checksum = checksum;
        self
    }

    /// Check the invariants every machine relies on.
    pub fn validate(&self) -> Result<()> {
        if self.start_symbol == self.escape_symbol {
            return Err(FrameError::SymbolCollision(self.start_symbol));
        }
        if self.buffer_capacity > MAX_WIRE_PAYLOAD {
            return Err(FrameError::InvalidConfig(format!(
                "buffer capacity {} exceeds the 16-bit length field (max {MAX_WIRE_PAYLOAD})",
                self.buffer_capacity
            )));
        }
        Ok(())
    }

    /// Whether `byte` must be preceded by an escape on the wire.
    pub fn is_reserved(&self, byte: u8) -> bool {
        byte == self.start_symbol || byte == self.escape_symbol
    }

    /// Number of trailing checksum bytes (before escaping).
    pub fn trailer_len(&self) -> usize {
        if self.checksum {
            2
        } else {
            0
        }
    }
}
