use core::fmt::{Debug, Formatter};

/// Errors produced while decoding a PNG.
///
/// This mirrors the taxonomy in the design spec: each named variant maps to
/// one of `InvalidSignature` / `Truncated` / `Unsupported` / `Corrupt`, plus
/// `GenericStatic`/`Generic` escape hatches for detail that doesn't carry its
/// own variant, following the same shape the teacher uses for its decoder
/// errors.
pub enum PngError
{
    /// The 8-byte PNG magic did not match.
    BadSignature,
    /// A chunk declared a length the remaining input can't satisfy, or the
    /// stream ended before `IEND`.
    Truncated,
    /// The `IHDR` profile isn't the one this decoder accepts (bit depth,
    /// colour type, interlace, compression or filter method, or a dimension
    /// over the configured maximum).
    Unsupported(&'static str),
    /// CRC-32 did not match (only produced when `PngOptions::confirm_crc`).
    BadCrc { expected: u32, found: u32 },
    /// Inflate failed, produced the wrong byte count, or a row carried an
    /// unknown filter byte.
    Corrupt(String),
    /// An escape hatch for contextual errors that don't need their own
    /// variant.
    Generic(String),
    /// As [`Generic`](Self::Generic) but for `&'static str` messages that
    /// don't need allocation.
    GenericStatic(&'static str),
    /// The underlying decompressor failed.
    InflateError(zune_inflate::errors::InflateDecodeErrors)
}

pub type Result<T> = core::result::Result<T, PngError>;

impl Debug for PngError
{
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result
    {
        match self
        {
            Self::BadSignature => write!(f, "not a PNG file, bad signature"),
            Self::Truncated => write!(f, "truncated PNG stream"),
            Self::Unsupported(msg) => write!(f, "unsupported PNG profile: {msg}"),
            Self::BadCrc { expected, found } =>
            {
                write!(f, "CRC mismatch, expected {expected} but found {found}")
            }
            Self::Corrupt(msg) => write!(f, "corrupt PNG: {msg}"),
            Self::Generic(msg) => write!(f, "{msg}"),
            Self::GenericStatic(msg) => write!(f, "{msg}"),
            Self::InflateError(err) => write!(f, "inflate failed: {err:?}")
        }
    }
}

impl From<&'static str> for PngError
{
    fn from(value: &'static str) -> Self
    {
        Self::GenericStatic(value)
    }
}

impl From<String> for PngError
{
    fn from(value: String) -> Self
    {
        Self::Generic(value)
    }
}

impl From<zune_inflate::errors::InflateDecodeErrors> for PngError
{
    fn from(value: zune_inflate::errors::InflateDecodeErrors) -> Self
    {
        Self::InflateError(value)
    }
}
