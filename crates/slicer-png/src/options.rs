//! Decoder configuration, grounded on `zune-png`'s `PngOptions` /
//! `zune-core`'s `DecoderOptions` (same builder-setter shape, same
//! "unknown chunk handler" function pointer, same strict-mode switch).

use log::trace;

use crate::bytestream::ByteReader;
use crate::error::Result;

pub type UnknownChunkHandler =
    fn(length: usize, chunk_type: [u8; 4], reader: &mut ByteReader, crc: u32) -> Result<()>;

pub fn default_chunk_handler(
    length: usize, chunk_type: [u8; 4], reader: &mut ByteReader, _crc: u32
) -> Result<()>
{
    let name = core::str::from_utf8(&chunk_type).unwrap_or("????");
    trace!("skipping unknown chunk {name} ({length} bytes)");
    reader.skip(length + 4);
    Ok(())
}

/// Knobs controlling how tolerant the decoder is and what bounds it
/// enforces. All fields have conservative defaults matching the spec; only
/// `strict_mode` and `confirm_crc` change decoder behaviour beyond what's
/// already mandated.
#[derive(Copy, Clone, Debug)]
pub struct PngOptions
{
    max_width:    usize,
    max_height:   usize,
    confirm_crc:  bool,
    strict_mode:  bool,
    chunk_handler: UnknownChunkHandler
}

/// The spec's bound on either image axis.
pub const MAX_DIMENSION: usize = 1_000_000;

impl Default for PngOptions
{
    fn default() -> Self
    {
        PngOptions {
            max_width:     MAX_DIMENSION,
            max_height:    MAX_DIMENSION,
            confirm_crc:   false,
            strict_mode:   false,
            chunk_handler: default_chunk_handler
        }
    }
}

impl PngOptions
{
    pub fn get_max_width(&self) -> usize
    {
        self.max_width
    }
    pub fn get_max_height(&self) -> usize
    {
        self.max_height
    }
    pub fn confirm_crc(&self) -> bool
    {
        self.confirm_crc
    }
    pub fn strict_mode(&self) -> bool
    {
        self.strict_mode
    }
    pub fn chunk_handler(&self) -> UnknownChunkHandler
    {
        self.chunk_handler
    }

    #[must_use]
    pub fn set_max_width(mut self, max_width: usize) -> Self
    {
        self.max_width = max_width.min(MAX_DIMENSION);
        self
    }
    #[must_use]
    pub fn set_max_height(mut self, max_height: usize) -> Self
    {
        self.max_height = max_height.min(MAX_DIMENSION);
        self
    }
    #[must_use]
    pub fn set_confirm_crc(mut self, yes: bool) -> Self
    {
        self.confirm_crc = yes;
        self
    }
    #[must_use]
    pub fn set_strict_mode(mut self, yes: bool) -> Self
    {
        self.strict_mode = yes;
        self
    }
    #[must_use]
    pub fn set_chunk_handler(mut self, handler: UnknownChunkHandler) -> Self
    {
        self.chunk_handler = handler;
        self
    }
}
