//! A small, allocation-free byte cursor over a borrowed buffer.
//!
//! This plays the same role `zune_core::bytestream::ZByteReader` plays for
//! the teacher's decoders: fine-grained big-endian reads with both a
//! "give me zero on EOF" flavour and a "give me an error" flavour, so the
//! chunk walker can pick whichever suits the call site.

use crate::error::{PngError, Result};

pub struct ByteReader<'a>
{
    stream:   &'a [u8],
    position: usize
}

impl<'a> ByteReader<'a>
{
    pub const fn new(buf: &'a [u8]) -> ByteReader<'a>
    {
        ByteReader { stream: buf, position: 0 }
    }

    #[inline]
    pub const fn position(&self) -> usize
    {
        self.position
    }

    #[inline]
    pub fn skip(&mut self, num: usize)
    {
        self.position = self.position.saturating_add(num);
    }

    #[inline]
    pub fn rewind(&mut self, num: usize)
    {
        self.position = self.position.saturating_sub(num);
    }

    #[inline]
    pub const fn has(&self, num: usize) -> bool
    {
        self.position.saturating_add(num) <= self.stream.len()
    }

    #[inline]
    pub const fn remaining(&self) -> usize
    {
        self.stream.len().saturating_sub(self.position)
    }

    /// Peek `num_bytes` starting `offset` bytes ahead of the current
    /// position, without advancing the cursor.
    pub fn peek_at(&self, offset: usize, num_bytes: usize) -> Result<&'a [u8]>
    {
        let start = self.position.saturating_add(offset);
        let end = start.saturating_add(num_bytes);

        self.stream.get(start..end).ok_or(PngError::Truncated)
    }

    /// Take `num` bytes and advance the cursor past them.
    pub fn take(&mut self, num: usize) -> Result<&'a [u8]>
    {
        let bytes = self.peek_at(0, num)?;
        self.position += num;
        Ok(bytes)
    }

    pub fn get_u8(&mut self) -> Result<u8>
    {
        let byte = *self.stream.get(self.position).ok_or(PngError::Truncated)?;
        self.position += 1;
        Ok(byte)
    }

    pub fn get_u16_be(&mut self) -> Result<u16>
    {
        let bytes: [u8; 2] = self.take(2)?.try_into().unwrap();
        Ok(u16::from_be_bytes(bytes))
    }

    pub fn get_u32_be(&mut self) -> Result<u32>
    {
        let bytes: [u8; 4] = self.take(4)?.try_into().unwrap();
        Ok(u32::from_be_bytes(bytes))
    }

    pub fn get_u64_be(&mut self) -> Result<u64>
    {
        let bytes: [u8; 8] = self.take(8)?.try_into().unwrap();
        Ok(u64::from_be_bytes(bytes))
    }
}
