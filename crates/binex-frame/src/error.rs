/// Why the receiver dropped the frame it was assembling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Corruption {
    /// A start symbol or a malformed escape sequence appeared mid-frame.
    #[error("frame desync (unexpected start symbol or bad escape)")]
    FrameDesync,

    /// The length field declared more bytes than the receive buffer holds.
    #[error("declared length {declared} exceeds capacity {capacity}")]
    OversizedPacket { declared: u16, capacity: usize },

    /// The payload arrived intact in length but its checksum disagrees.
    #[error("checksum mismatch (wire 0x{expected:04X}, computed 0x{computed:04X})")]
    ChecksumMismatch { expected: u16, computed: u16 },
}

/// Errors that can occur during frame encoding/decoding.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The payload exceeds the configured maximum size.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// A frame was received but failed validation.
    #[error("corrupt frame: {0}")]
    Corrupt(#[from] Corruption),

    /// The input ended before a complete frame was decoded.
    #[error("incomplete frame")]
    Incomplete,

    /// Start and escape symbols must differ.
    #[error("start and escape symbols are both 0x{0:02X}")]
    SymbolCollision(u8),

    /// The frame configuration is unusable.
    #[error("invalid frame config: {0}")]
    InvalidConfig(String),

    /// An I/O error occurred while reading or writing frames.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stream was closed before a complete frame was received.
    #[error("connection closed (incomplete frame)")]
    ConnectionClosed,
}

pub type Result<T> = std::result::Result<T, FrameError>;
