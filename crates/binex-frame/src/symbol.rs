//! Byte stuffing shared by the receiver and the transmitter.
//!
//! Inside a frame, a literal start or escape byte is sent as the escape
//! symbol followed by the byte itself (`ESC START`, `ESC ESC`). An escape
//! followed by anything else is a protocol violation.

use crate::sink::ByteSink;

/// Meaning of one raw byte, in the context of the byte before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbol {
    /// Frame delimiter.
    Start,
    /// Escape consumed; the next byte is literal. Produces no data.
    Escape,
    /// A literal byte after unescaping.
    Data(u8),
    /// Escape followed by a byte that never needs escaping.
    Invalid,
}

/// Receive-side classifier.
#[derive(Debug, Clone, Copy)]
pub struct Unescaper {
    start_symbol: u8,
    escape_symbol: u8,
    pending_escape: bool,
}

impl Unescaper {
    pub fn new(start_symbol: u8, escape_symbol: u8) -> Self {
        Self {
            start_symbol,
            escape_symbol,
            pending_escape: false,
        }
    }

    pub fn classify(&mut self, byte: u8) -> Symbol {
        if self.pending_escape {
            self.pending_escape = false;
            return if byte == self.escape_symbol || byte == self.start_symbol {
                Symbol::Data(byte)
            } else {
                Symbol::Invalid
            };
        }

        if byte == self.escape_symbol {
            self.pending_escape = true;
            Symbol::Escape
        } else if byte == self.start_symbol {
            Symbol::Start
        } else {
            Symbol::Data(byte)
        }
    }

    pub fn pending_escape(&self) -> bool {
        self.pending_escape
    }

    pub fn reset(&mut self) {
        self.pending_escape = false;
    }
}

/// Transmit-side stuffer.
///
/// Commits nothing when the sink declines, so retrying the same byte is
/// always safe.
#[derive(Debug, Clone, Copy)]
pub struct Escaper {
    start_symbol: u8,
    escape_symbol: u8,
    awaiting_companion: bool,
}

impl Escaper {
    pub fn new(start_symbol: u8, escape_symbol: u8) -> Self {
        Self {
            start_symbol,
            escape_symbol,
            awaiting_companion: false,
        }
    }

    /// Try to put `byte` on the wire.
    ///
    /// Returns `true` once the literal byte itself has been accepted. A
    /// reserved byte needs two calls at minimum: the first sends the escape
    /// and returns `false`.
    pub fn emit<S: ByteSink + ?Sized>(&mut self, byte: u8, sink: &mut S) -> bool {
        if self.awaiting_companion {
            if sink.try_send(byte) {
                self.awaiting_companion = false;
                return true;
            }
            return false;
        }

        if byte == self.escape_symbol || byte == self.start_symbol {
            if sink.try_send(self.escape_symbol) {
                self.awaiting_companion = true;
            }
            return false;
        }

        sink.try_send(byte)
    }

    pub fn awaiting_companion(&self) -> bool {
        self.awaiting_companion
    }

    pub fn reset(&mut self) {
        self.awaiting_companion = false;
    }
}
