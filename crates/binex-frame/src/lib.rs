//! Byte-stuffed packet framing for character streams such as UARTs.
//!
//! Every packet is framed as:
//! - a start symbol (default `0xF5`) that is never escaped
//! - a 2-byte little-endian payload length
//! - the payload
//! - an optional 2-byte little-endian CRC16 over length and payload
//!
//! Inside a frame, literal start and escape (default `0xF4`) bytes are
//! preceded by the escape symbol.
//!
//! The core is a pair of non-blocking state machines, [`Receiver`] and
//! [`Transmitter`], driven one byte at a time. [`FrameReader`],
//! [`FrameWriter`], and (with the `async` feature) `BinexCodec` wrap them
//! for `std::io` and `tokio_util::codec` users.

pub mod checksum;
pub mod codec;
pub mod config;
pub mod error;
pub mod reader;
pub mod receiver;
pub mod sink;
pub mod symbol;
pub mod transmitter;
pub mod writer;

#[cfg(feature = "async")]
pub mod async_codec;

pub use checksum::{frame_checksum, Checksum, Crc16};
pub use codec::{decode_frame, encode_frame, Frame};
pub use config::{
    FrameConfig, DEFAULT_BUFFER_CAPACITY, DEFAULT_ESCAPE_SYMBOL, DEFAULT_START_SYMBOL,
    MAX_WIRE_PAYLOAD,
};
pub use error::{Corruption, FrameError, Result};
pub use reader::FrameReader;
pub use receiver::{Receiver, RxStatus};
pub use sink::{BoundedSink, ByteSink};
pub use symbol::{Escaper, Symbol, Unescaper};
pub use transmitter::{Transmitter, TxStatus};
pub use writer::FrameWriter;

#[cfg(feature = "async")]
pub use async_codec::BinexCodec;
