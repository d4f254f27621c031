//! zlib/deflate decompression behind a small capability trait.
//!
//! The original tool loaded a decompressor at runtime via `dlopen` so the
//! host application could swap in whichever `libdeflate` build it shipped.
//! Rust has no portable, idiomatic equivalent of that (a real `dlopen` call
//! here would just be an unsafe, non-portable indirection around a crate we
//! could depend on directly), so the same seam is kept as a trait instead:
//! [`Decompressor`] is the capability, [`ZuneInflate`] is the default,
//! statically-linked implementation, and tests are free to substitute a
//! fake that injects failures without touching the driver.

use log::trace;
use zune_inflate::DeflateDecoder;

use crate::error::{PngError, Result};

/// A capability that turns compressed IDAT bytes into raw scanline bytes.
pub trait Decompressor
{
    /// Inflate `input`, which may be a full zlib stream (2-byte header +
    /// deflate body + Adler-32 trailer) or a raw deflate stream. Returns
    /// exactly `expected_len` bytes or an error; a short/long result is
    /// itself an error, never silently truncated or padded.
    fn inflate(&self, input: &[u8], expected_len: usize) -> Result<Vec<u8>>;
}

/// The default backend, wrapping `zune_inflate`'s decoder.
pub struct ZuneInflate;

impl Decompressor for ZuneInflate
{
    fn inflate(&self, input: &[u8], expected_len: usize) -> Result<Vec<u8>>
    {
        let is_zlib = looks_like_zlib(input);
        trace!("inflating {} bytes (zlib header: {is_zlib})", input.len());

        // Preferred path for a well-formed zlib header: strip the 2-byte
        // header and 4-byte Adler-32 trailer and try raw deflate directly
        // on the body first, since that's the actual compressed data and
        // skips the checksum verification. Only fall back to decoding the
        // whole payload as zlib if that fails or yields the wrong length.
        if is_zlib && input.len() >= 6
        {
            let body = &input[2..input.len() - 4];
            if let Ok(out) = DeflateDecoder::new(body).decode_deflate()
            {
                if out.len() == expected_len
                {
                    return Ok(out);
                }
                trace!("raw-deflate-first path produced {} bytes, expected {expected_len}, falling back to zlib", out.len());
            }
            else
            {
                trace!("raw-deflate-first path failed, falling back to zlib");
            }
        }

        let mut decoder = DeflateDecoder::new(input);
        let out = if is_zlib
        {
            decoder.decode_zlib()
        }
        else
        {
            decoder.decode_deflate()
        }
        .map_err(PngError::from)?;

        if out.len() != expected_len
        {
            return Err(PngError::Corrupt(format!(
                "inflate produced {} bytes, expected {expected_len}",
                out.len()
            )));
        }

        Ok(out)
    }
}

/// Sniff the 2-byte zlib header: `CM` must be 8 (deflate), `CINFO` must be
/// at most 7, and the 16-bit header must be a multiple of 31. Streams
/// failing this check are treated as raw deflate.
fn looks_like_zlib(input: &[u8]) -> bool
{
    if input.len() < 2
    {
        return false;
    }

    let cmf = input[0];
    let flg = input[1];

    let cm = cmf & 0x0f;
    let cinfo = cmf >> 4;
    let fdict = (flg >> 5) & 1;

    if cm != 8 || cinfo > 7 || fdict != 0
    {
        return false;
    }

    let header = u16::from_be_bytes([cmf, flg]);
    header % 31 == 0
}
