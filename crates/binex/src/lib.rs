//! Byte-stuffed packet framing for serial links.
//!
//! binex delimits variable-length binary packets on streams that carry no
//! message boundaries of their own (UARTs, pipes, any `Read`/`Write`), and
//! optionally guards each packet with a CRC16.
//!
//! # Crate Structure
//!
//! - [`frame`]: receiver/transmitter state machines, escaping, checksum,
//!   and the blocking and async (behind `async`) stream adapters
//!
//! The `binex` command-line tool is built with the `cli` feature.

/// Re-export frame types.
pub mod frame {
    pub use binex_frame::*;
}
