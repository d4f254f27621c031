//! A from-scratch PNG decoder for 8-bit RGB/RGBA, non-interlaced images.
//!
//! The public surface is small: [`decode`]/[`decode_with_options`] take a
//! whole file already loaded into memory and return a packed RGBA
//! [`PngImage`]. Everything else (chunk walking, inflate, filter reversal,
//! RGB->RGBA expansion) is internal machinery exposed for testing and for
//! callers who want finer control than the top-level functions give.

pub mod bytestream;
#[cfg(feature = "crc")]
pub mod crc;
pub mod decoder;
pub mod error;
pub mod expand;
pub mod filters;
pub mod headers;
pub mod image;
pub mod inflate;
pub mod options;
pub mod paeth;

pub use decoder::{decode, decode_with_options, PngDecoder};
pub use error::{PngError, Result};
pub use headers::ColourType;
pub use image::PngImage;
pub use options::PngOptions;
