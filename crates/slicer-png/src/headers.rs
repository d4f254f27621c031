//! `IHDR`/`tRNS` parsing and validation, grounded on the teacher's
//! `headers.rs::parse_ihdr`/`parse_trns` (same validation order, same
//! categories of rejection, reduced to the profile this decoder accepts:
//! 8-bit RGB/RGBA, no interlacing, no palette).

use log::{info, warn};

use crate::bytestream::ByteReader;
use crate::error::{PngError, Result};
use crate::expand::TrnsKey;
use crate::options::PngOptions;

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum ColourType
{
    Rgb,
    Rgba
}

impl ColourType
{
    pub const fn components(self) -> usize
    {
        match self
        {
            ColourType::Rgb => 3,
            ColourType::Rgba => 4
        }
    }
}

#[derive(Copy, Clone, Debug)]
pub struct ImageHeader
{
    pub width:       u32,
    pub height:      u32,
    pub colour_type: ColourType
}

/// Validate and parse an `IHDR` chunk's 13-byte payload.
pub fn parse_ihdr(data: &[u8], options: &PngOptions) -> Result<ImageHeader>
{
    if data.len() != 13
    {
        return Err(PngError::Corrupt("IHDR must be exactly 13 bytes".into()));
    }

    let mut reader = ByteReader::new(data);
    let width = reader.get_u32_be()?;
    let height = reader.get_u32_be()?;
    let bit_depth = reader.get_u8()?;
    let colour_type = reader.get_u8()?;
    let compression_method = reader.get_u8()?;
    let filter_method = reader.get_u8()?;
    let interlace_method = reader.get_u8()?;

    if width == 0 || height == 0
    {
        return Err(PngError::Corrupt("zero-dimension image".into()));
    }
    if (width as usize) > options.get_max_width() || (height as usize) > options.get_max_height()
    {
        return Err(PngError::Unsupported("image dimensions exceed configured maximum"));
    }
    if bit_depth != 8
    {
        return Err(PngError::Unsupported("only 8-bit depth is supported"));
    }
    let colour_type = match colour_type
    {
        2 => ColourType::Rgb,
        6 => ColourType::Rgba,
        _ => return Err(PngError::Unsupported("only RGB and RGBA colour types are supported"))
    };
    if compression_method != 0
    {
        return Err(PngError::Unsupported("unknown compression method"));
    }
    if filter_method != 0
    {
        return Err(PngError::Unsupported("unknown filter method"));
    }
    if interlace_method != 0
    {
        return Err(PngError::Unsupported("interlaced PNGs are not supported"));
    }

    info!("IHDR: {width}x{height}, colour type {colour_type:?}, no interlacing");

    Ok(ImageHeader { width, height, colour_type })
}

/// Parse a `tRNS` chunk, valid only for RGB images per the accepted
/// profile. 16-bit samples (2 bytes each, big-endian) are reduced to 8
/// bits by taking the high byte when the sample exceeds 255, else the low
/// byte, matching the teacher's `expand_trns` reduction.
pub fn parse_trns(data: &[u8], colour_type: ColourType, options: &PngOptions) -> Result<TrnsKey>
{
    if colour_type != ColourType::Rgb
    {
        return Err(PngError::Unsupported("tRNS is only supported for RGB images"));
    }

    if data.len() != 6
    {
        if options.strict_mode()
        {
            return Err(PngError::Corrupt("tRNS length does not match RGB colour type".into()));
        }
        warn!("tRNS chunk has unexpected length {}, ignoring", data.len());
        return Err(PngError::Unsupported("malformed tRNS chunk"));
    }

    let mut reduce = |hi: u8, lo: u8| -> u8 {
        let sample = u16::from_be_bytes([hi, lo]);
        if sample > 255
        {
            hi
        }
        else
        {
            lo
        }
    };

    let r = reduce(data[0], data[1]);
    let g = reduce(data[2], data[3]);
    let b = reduce(data[4], data[5]);

    Ok([r, g, b])
}

#[cfg(test)]
mod tests
{
    use super::*;

    fn ihdr_bytes(width: u32, height: u32, bit_depth: u8, colour_type: u8, interlace: u8) -> Vec<u8>
    {
        let mut v = Vec::with_capacity(13);
        v.extend_from_slice(&width.to_be_bytes());
        v.extend_from_slice(&height.to_be_bytes());
        v.push(bit_depth);
        v.push(colour_type);
        v.push(0);
        v.push(0);
        v.push(interlace);
        v
    }

    #[test]
    fn accepts_8bit_rgb()
    {
        let data = ihdr_bytes(4, 4, 8, 2, 0);
        let header = parse_ihdr(&data, &PngOptions::default()).unwrap();
        assert_eq!(header.width, 4);
        assert_eq!(header.colour_type, ColourType::Rgb);
    }

    #[test]
    fn rejects_16bit_depth()
    {
        let data = ihdr_bytes(4, 4, 16, 2, 0);
        assert!(matches!(
            parse_ihdr(&data, &PngOptions::default()),
            Err(PngError::Unsupported(_))
        ));
    }

    #[test]
    fn rejects_interlaced()
    {
        let data = ihdr_bytes(4, 4, 8, 6, 1);
        assert!(matches!(
            parse_ihdr(&data, &PngOptions::default()),
            Err(PngError::Unsupported(_))
        ));
    }

    #[test]
    fn rejects_palette_colour_type()
    {
        let data = ihdr_bytes(4, 4, 8, 3, 0);
        assert!(matches!(
            parse_ihdr(&data, &PngOptions::default()),
            Err(PngError::Unsupported(_))
        ));
    }

    #[test]
    fn trns_reduces_16bit_samples_by_high_byte_when_over_255()
    {
        let data = [0x01, 0x00, 0x00, 0xFF, 0x00, 0x10];
        let key = parse_trns(&data, ColourType::Rgb, &PngOptions::default()).unwrap();
        assert_eq!(key, [0x01, 0xFF, 0x10]);
    }

    #[test]
    fn trns_rejected_for_rgba()
    {
        let data = [0u8; 6];
        assert!(parse_trns(&data, ColourType::Rgba, &PngOptions::default()).is_err());
    }
}
