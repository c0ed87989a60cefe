//! Bounded I/O buffers
//!
//! Each device carries one outbound and one inbound buffer between the
//! script interpreter and the transport. Buffers are bounded; bytes
//! that would exceed the limit are dropped and counted rather than
//! blocking the single-threaded engine.

use bytes::BytesMut;
use std::io::{Read, Write};
use tracing::warn;

/// Lower bound on a usable buffer limit
pub const MIN_BUF: usize = 1024;
/// Default buffer limit
pub const MAX_BUF: usize = 64 * 1024;

/// A bounded byte queue between the interpreter and a transport
#[derive(Debug)]
pub struct IoBuffer {
    buf: BytesMut,
    limit: usize,
    dropped: u64,
}

impl Default for IoBuffer {
    fn default() -> Self {
        Self::new(MAX_BUF)
    }
}

impl IoBuffer {
    pub fn new(limit: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(MIN_BUF.min(limit)),
            limit: limit.max(MIN_BUF),
            dropped: 0,
        }
    }

    /// Append bytes, truncating at the limit. Returns the number of
    /// bytes accepted and the number dropped.
    pub fn write(&mut self, data: &[u8]) -> (usize, usize) {
        let room = self.limit - self.buf.len();
        let take = data.len().min(room);
        self.buf.extend_from_slice(&data[..take]);
        let dropped = data.len() - take;
        if dropped > 0 {
            self.dropped += dropped as u64;
            warn!(dropped, "buffer full, bytes dropped");
        }
        (take, dropped)
    }

    /// Fill the buffer from a reader, up to the remaining room.
    /// `Ok(0)` with room available means the reader hit end of file.
    pub fn write_from<R: Read + ?Sized>(&mut self, src: &mut R) -> std::io::Result<usize> {
        let room = self.limit - self.buf.len();
        if room == 0 {
            return Ok(0);
        }
        let start = self.buf.len();
        self.buf.resize(start + room, 0);
        match src.read(&mut self.buf[start..]) {
            Ok(n) => {
                self.buf.truncate(start + n);
                Ok(n)
            }
            Err(e) => {
                self.buf.truncate(start);
                Err(e)
            }
        }
    }

    /// Drain buffered bytes into a writer, consuming what was written
    pub fn read_to<W: Write + ?Sized>(&mut self, dst: &mut W) -> std::io::Result<usize> {
        if self.buf.is_empty() {
            return Ok(0);
        }
        let n = dst.write(&self.buf)?;
        self.consume(n);
        Ok(n)
    }

    /// Drop `n` bytes from the head
    pub fn consume(&mut self, n: usize) {
        let n = n.min(self.buf.len());
        let _ = self.buf.split_to(n);
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    /// Bytes of capacity left before the limit
    pub fn room(&self) -> usize {
        self.limit - self.buf.len()
    }

    pub fn clear(&mut self) {
        self.buf.clear();
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Total bytes dropped at the limit over the buffer's lifetime
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_and_consume() {
        let mut b = IoBuffer::new(MIN_BUF);
        assert_eq!(b.write(b"hello"), (5, 0));
        assert_eq!(b.as_slice(), b"hello");
        b.consume(3);
        assert_eq!(b.as_slice(), b"lo");
        b.consume(10);
        assert!(b.is_empty());
    }

    #[test]
    fn test_write_past_limit_drops() {
        let mut b = IoBuffer::new(MIN_BUF);
        let big = vec![b'x'; MIN_BUF + 100];
        let (took, dropped) = b.write(&big);
        assert_eq!(took, MIN_BUF);
        assert_eq!(dropped, 100);
        assert_eq!(b.dropped(), 100);
    }

    #[test]
    fn test_write_from_reader() {
        let mut b = IoBuffer::new(MIN_BUF);
        let mut src: &[u8] = b"stream data";
        let n = b.write_from(&mut src).unwrap();
        assert_eq!(n, 11);
        assert_eq!(b.as_slice(), b"stream data");
    }

    #[test]
    fn test_read_to_writer() {
        let mut b = IoBuffer::new(MIN_BUF);
        b.write(b"payload");
        let mut dst = Vec::new();
        let n = b.read_to(&mut dst).unwrap();
        assert_eq!(n, 7);
        assert_eq!(dst, b"payload");
        assert!(b.is_empty());
    }
}
