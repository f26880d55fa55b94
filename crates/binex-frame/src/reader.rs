use std::io::{ErrorKind, Read};

use bytes::{Buf, Bytes, BytesMut};
use tracing::debug;

use crate::codec::Frame;
use crate::config::FrameConfig;
use crate::error::{FrameError, Result};
use crate::receiver::{Receiver, RxStatus};

const INITIAL_BUFFER_CAPACITY: usize = 1024;
const READ_CHUNK_SIZE: usize = 256;

/// Reads complete frames from any `Read` stream.
///
/// Handles partial reads and line noise internally. A corrupt frame is
/// reported as [`FrameError::Corrupt`]; the reader has already resynced, so
/// calling [`read_frame`](Self::read_frame) again picks up the next frame.
pub struct FrameReader<T> {
    inner: T,
    buf: BytesMut,
    rx: Receiver,
    corrupt_frames: u64,
}

impl<T: Read> FrameReader<T> {
    /// Create a new frame reader with default configuration.
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            rx: Receiver::default(),
            corrupt_frames: 0,
        }
    }

    /// Create a new frame reader with explicit configuration.
    pub fn with_config(inner: T, config: FrameConfig) -> Result<Self> {
        Ok(Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            rx: Receiver::new(config)?,
            corrupt_frames: 0,
        })
    }

    /// Read the next complete frame (blocking).
    ///
    /// Returns `Err(FrameError::ConnectionClosed)` when EOF is reached. A
    /// `TimedOut` or `WouldBlock` read error drops any partially received
    /// frame before being returned.
    pub fn read_frame(&mut self) -> Result<Frame> {
        loop {
            if !self.buf.is_empty() {
                let (used, status) = self.rx.feed_slice(&self.buf);
                self.buf.advance(used);
                match status {
                    RxStatus::Complete => {
                        let payload = Bytes::copy_from_slice(self.rx.payload());
                        debug!(len = payload.len(), "frame received");
                        return Ok(Frame::new(payload));
                    }
                    RxStatus::Corrupt(cause) => {
                        self.corrupt_frames = self.corrupt_frames.saturating_add(1);
                        debug!(%cause, "corrupt frame dropped");
                        return Err(FrameError::Corrupt(cause));
                    }
                    RxStatus::NotReady => {}
                }
            }

            let mut chunk = [0u8; READ_CHUNK_SIZE];
            let read = match self.inner.read(&mut chunk) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if matches!(err.kind(), ErrorKind::TimedOut | ErrorKind::WouldBlock) => {
                    if !self.rx.is_idle() {
                        debug!("read idle mid-frame, resetting receiver");
                        self.rx.reset();
                    }
                    return Err(FrameError::Io(err));
                }
                Err(err) => return Err(FrameError::Io(err)),
            };

            if read == 0 {
                return Err(FrameError::ConnectionClosed);
            }

            self.buf.extend_from_slice(&chunk[..read]);
        }
    }

    /// Number of frames dropped as corrupt so far.
    pub fn corrupt_frames(&self) -> u64 {
        self.corrupt_frames
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Current frame reader configuration.
    pub fn config(&self) -> &FrameConfig {
        self.rx.config()
    }
}

impl<T: Read> Iterator for FrameReader<T> {
    type Item = Result<Frame>;

    /// Yields frames and corruption errors until the stream closes.
    fn next(&mut self) -> Option<Self::Item> {
        match self.read_frame() {
            Err(FrameError::ConnectionClosed) => None,
            other => Some(other),
        }
    }
}
