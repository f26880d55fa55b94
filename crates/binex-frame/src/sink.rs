use bytes::{BufMut, BytesMut};

/// Push side of a transport, one byte at a time.
///
/// `try_send` returns `true` once the byte has been accepted. Returning
/// `false` is backpressure, not an error: the transmitter keeps its position
/// and offers the same byte again on the next [`step`].
///
/// [`step`]: crate::Transmitter::step
pub trait ByteSink {
    fn try_send(&mut self, byte: u8) -> bool;
}

impl<F> ByteSink for F
where
    F: FnMut(u8) -> bool,
{
    fn try_send(&mut self, byte: u8) -> bool {
        self(byte)
    }
}

impl ByteSink for Vec<u8> {
    fn try_send(&mut self, byte: u8) -> bool {
        self.push(byte);
        true
    }
}

impl ByteSink for BytesMut {
    fn try_send(&mut self, byte: u8) -> bool {
        self.put_u8(byte);
        true
    }
}

/// Sink that accepts at most `budget` bytes, then declines until refilled.
///
/// Models a UART FIFO or any transmit buffer with a fixed free space.
#[derive(Debug)]
pub struct BoundedSink<S> {
    inner: S,
    budget: usize,
}

impl<S: ByteSink> BoundedSink<S> {
    pub fn new(inner: S, budget: usize) -> Self {
        Self { inner, budget }
    }

    /// Allow `n` more bytes through.
    pub fn refill(&mut self, n: usize) {
        self.budget = self.budget.saturating_add(n);
    }

    pub fn remaining(&self) -> usize {
        self.budget
    }

    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: ByteSink> ByteSink for BoundedSink<S> {
    fn try_send(&mut self, byte: u8) -> bool {
        if self.budget == 0 {
            return false;
        }
        if self.inner.try_send(byte) {
            self.budget -= 1;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closure_sink_forwards_verdict() {
        let mut seen = Vec::new();
        let mut sink = |b: u8| {
            seen.push(b);
            b != 0
        };
        assert!(sink.try_send(1));
        assert!(!sink.try_send(0));
        drop(sink);
        assert_eq!(seen, vec![1, 0]);
    }

    #[test]
    fn bounded_sink_declines_when_exhausted() {
        let mut sink = BoundedSink::new(Vec::new(), 2);
        assert!(sink.try_send(0xAA));
        assert!(sink.try_send(0xBB));
        assert!(!sink.try_send(0xCC));
        assert_eq!(sink.remaining(), 0);

        sink.refill(1);
        assert!(sink.try_send(0xCC));
        assert_eq!(sink.into_inner(), vec![0xAA, 0xBB, 0xCC]);
    }

    #[test]
    fn bytes_mut_always_accepts() {
        let mut buf = BytesMut::new();
        assert!(buf.try_send(7));
        assert_eq!(buf.as_ref(), &[7]);
    }
}
