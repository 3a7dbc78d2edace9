use crate::{Error, Result};

/// Forward-only reader over a fixed byte buffer.
///
/// Every read advances the offset by exactly the requested width; the offset
/// never exceeds the buffer length. A short read is fatal to the decode and
/// surfaces as ``Error::Truncated``.
pub struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    #[must_use]
    pub fn new(buf: &'a [u8]) -> Self {
        Cursor { buf, pos: 0 }
    }

    /// Current read offset from the start of the buffer.
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Number of unread bytes.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Return the next `n` bytes and advance the offset by `n`.
    ///
    /// # Errors
    /// ``Error::Truncated`` if fewer than `n` bytes remain.
    pub fn read(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.remaining() < n {
            return Err(Error::Truncated {
                offset: self.pos,
                wanted: n,
                remaining: self.remaining(),
            });
        }
        let dat = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(dat)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        let d = self.read(2)?;
        Ok(u16::from_be_bytes([d[0], d[1]]))
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        let d = self.read(8)?;
        Ok(u64::from_be_bytes([
            d[0], d[1], d[2], d[3], d[4], d[5], d[6], d[7],
        ]))
    }
}
