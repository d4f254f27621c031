//! The chunk walker and decode driver, grounded on the teacher's
//! `decoder.rs::PngDecoder::decode` (same chunk dispatch shape: `IHDR`
//! exactly once and first, `IDAT` accumulated across possibly-many chunks,
//! `tRNS` optional, `IEND` terminates the walk), reduced to the accepted
//! 8-bit RGB/RGBA profile.

use std::sync::{Mutex, OnceLock};

use log::{info, trace};

use crate::bytestream::ByteReader;
use crate::error::{PngError, Result};
use crate::expand::{expand_rgb_to_rgba, TrnsKey};
use crate::filters::{unfilter_row, FilterType};
use crate::headers::{parse_ihdr, parse_trns, ColourType, ImageHeader};
use crate::image::PngImage;
use crate::inflate::{Decompressor, ZuneInflate};
use crate::options::PngOptions;

const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// At most one decode runs at a time per process; the inflate step is the
/// part worth serialising since a shared, statically-linked decompressor is
/// the whole point of the capability in `inflate.rs`.
fn decode_lock() -> &'static Mutex<()>
{
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
}

/// A decoder over a whole-file-in-memory PNG buffer.
pub struct PngDecoder<'a>
{
    reader:       ByteReader<'a>,
    options:      PngOptions,
    decompressor: Box<dyn Decompressor>
}

impl<'a> PngDecoder<'a>
{
    pub fn new(buf: &'a [u8]) -> PngDecoder<'a>
    {
        PngDecoder::with_options(buf, PngOptions::default())
    }

    pub fn with_options(buf: &'a [u8], options: PngOptions) -> PngDecoder<'a>
    {
        PngDecoder { reader: ByteReader::new(buf), options, decompressor: Box::new(ZuneInflate) }
    }

    /// Swap in a different decompressor, e.g. a fake for tests.
    pub fn with_decompressor(mut self, decompressor: Box<dyn Decompressor>) -> Self
    {
        self.decompressor = decompressor;
        self
    }

    pub fn decode(mut self) -> Result<PngImage>
    {
        let _guard = decode_lock().lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        self.read_signature()?;

        let mut header: Option<ImageHeader> = None;
        let mut idat = Vec::new();
        let mut trns: Option<TrnsKey> = None;
        let mut seen_iend = false;

        while !seen_iend
        {
            let length = self.reader.get_u32_be()? as usize;
            let chunk_type: [u8; 4] = self.reader.take(4)?.try_into().unwrap();

            if !self.reader.has(length + 4)
            {
                return Err(PngError::Truncated);
            }

            let data = self.reader.take(length)?;
            trace!(
                "chunk {:?} ({length} bytes)",
                core::str::from_utf8(&chunk_type).unwrap_or("????")
            );

            let crc = self.reader.get_u32_be()?;
            #[cfg(feature = "crc")]
            if self.options.confirm_crc()
            {
                let expected = crate::crc::crc32(chunk_type, data);
                if expected != crc
                {
                    return Err(PngError::BadCrc { expected, found: crc });
                }
            }

            match &chunk_type
            {
                b"IHDR" =>
                {
                    if header.is_some()
                    {
                        return Err(PngError::Corrupt("duplicate IHDR".into()));
                    }
                    header = Some(parse_ihdr(data, &self.options)?);
                }
                b"IDAT" =>
                {
                    if header.is_none()
                    {
                        return Err(PngError::Corrupt("IDAT before IHDR".into()));
                    }
                    idat.extend_from_slice(data);
                }
                b"tRNS" =>
                {
                    let header = header
                        .as_ref()
                        .ok_or_else(|| PngError::Corrupt("tRNS before IHDR".into()))?;
                    match parse_trns(data, header.colour_type, &self.options)
                    {
                        Ok(key) => trns = Some(key),
                        Err(_) if !self.options.strict_mode() => {}
                        Err(e) => return Err(e)
                    }
                }
                b"IEND" => seen_iend = true,
                _ =>
                {
                    let handler = self.options.chunk_handler();
                    // The handler receives a reader positioned just past
                    // this chunk's data; rewind so it can re-walk if it
                    // wants to, matching the teacher's contract.
                    self.reader.rewind(length + 4);
                    handler(length, chunk_type, &mut self.reader, crc)?;
                }
            }
        }

        let header = header.ok_or_else(|| PngError::Corrupt("missing IHDR".into()))?;

        if idat.is_empty()
        {
            return Err(PngError::Corrupt("no IDAT data".into()));
        }

        let image = self.reconstruct(header, &idat, trns)?;
        info!(
            "decoded {}x{} PNG, colour type {:?}, has_alpha={}",
            header.width, header.height, header.colour_type, image.has_alpha
        );
        Ok(image)
    }

    fn read_signature(&mut self) -> Result<()>
    {
        let sig = self.reader.take(8)?;
        if sig != PNG_SIGNATURE
        {
            return Err(PngError::BadSignature);
        }
        Ok(())
    }

    fn reconstruct(
        &self, header: ImageHeader, idat: &[u8], trns: Option<TrnsKey>
    ) -> Result<PngImage>
    {
        let width = header.width as usize;
        let height = header.height as usize;
        let bpp = header.colour_type.components();
        let row_bytes = width * bpp;
        let expected_len = (row_bytes + 1) * height;

        let raw = self.decompressor.inflate(idat, expected_len)?;

        let mut unfiltered = vec![0u8; row_bytes * height];

        for y in 0..height
        {
            let row_start = y * (row_bytes + 1);
            let filter_byte = raw[row_start];
            let filter = FilterType::from_u8(filter_byte).ok_or_else(|| {
                PngError::Corrupt(format!("unknown filter byte {filter_byte} at row {y}"))
            })?;

            let raw_row = &raw[row_start + 1..row_start + 1 + row_bytes];
            let (before, current) = unfiltered.split_at_mut(y * row_bytes);
            let current = &mut current[..row_bytes];
            let prev_row = if y == 0 { &[][..] } else { &before[before.len() - row_bytes..] };

            unfilter_row(filter, raw_row, prev_row, current, bpp);
        }

        let has_alpha = header.colour_type == ColourType::Rgba || trns.is_some();

        let rgba = match header.colour_type
        {
            ColourType::Rgba => unfiltered,
            ColourType::Rgb => expand_rgb_to_rgba(&unfiltered, width, height, trns)
        };

        Ok(PngImage { width: header.width, height: header.height, rgba, has_alpha })
    }
}

/// Decode a whole-file-in-memory PNG with default options.
pub fn decode(buf: &[u8]) -> Result<PngImage>
{
    PngDecoder::new(buf).decode()
}

/// Decode with caller-supplied options.
pub fn decode_with_options(buf: &[u8], options: PngOptions) -> Result<PngImage>
{
    PngDecoder::with_options(buf, options).decode()
}

#[cfg(test)]
mod tests
{
    use std::io::Write;

    use super::*;

    fn crc32_ieee(chunk_type: &[u8; 4], data: &[u8]) -> u32
    {
        crate::crc::crc32(*chunk_type, data)
    }

    fn chunk(chunk_type: &[u8; 4], data: &[u8]) -> Vec<u8>
    {
        let mut out = Vec::new();
        out.extend_from_slice(&(data.len() as u32).to_be_bytes());
        out.extend_from_slice(chunk_type);
        out.extend_from_slice(data);
        out.extend_from_slice(&crc32_ieee(chunk_type, data).to_be_bytes());
        out
    }

    fn zlib_compress(data: &[u8]) -> Vec<u8>
    {
        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    fn build_png(width: u32, height: u32, colour_type: u8, raw_rows: &[u8], trns: Option<&[u8]>) -> Vec<u8>
    {
        let mut buf = Vec::new();
        buf.extend_from_slice(&PNG_SIGNATURE);

        let mut ihdr = Vec::new();
        ihdr.extend_from_slice(&width.to_be_bytes());
        ihdr.extend_from_slice(&height.to_be_bytes());
        ihdr.push(8);
        ihdr.push(colour_type);
        ihdr.push(0);
        ihdr.push(0);
        ihdr.push(0);
        buf.extend_from_slice(&chunk(b"IHDR", &ihdr));

        if let Some(trns) = trns
        {
            buf.extend_from_slice(&chunk(b"tRNS", trns));
        }

        let compressed = zlib_compress(raw_rows);
        buf.extend_from_slice(&chunk(b"IDAT", &compressed));
        buf.extend_from_slice(&chunk(b"IEND", &[]));

        buf
    }

    #[test]
    fn decodes_1x1_opaque_red_rgb()
    {
        let raw_rows = [0u8, 255, 0, 0]; // filter None, then R G B
        let png = build_png(1, 1, 2, &raw_rows, None);

        let image = decode(&png).unwrap();
        assert_eq!(image.width, 1);
        assert_eq!(image.height, 1);
        assert_eq!(image.rgba, vec![255, 0, 0, 255]);
        assert!(!image.has_alpha);
    }

    #[test]
    fn decodes_2x1_rgb_with_trns_chroma_key()
    {
        let raw_rows = [0u8, 0, 255, 0, 255, 255, 255];
        let trns = [0u8, 0, 0, 255, 0, 0];
        let png = build_png(2, 1, 2, &raw_rows, Some(&trns));

        let image = decode(&png).unwrap();
        assert_eq!(image.rgba, vec![0, 255, 0, 0, 255, 255, 255, 255]);
        assert!(image.has_alpha);
    }

    #[test]
    fn decodes_1x2_rgba()
    {
        let raw_rows = [0u8, 10, 20, 30, 40, 0, 50, 60, 70, 80];
        let png = build_png(1, 2, 6, &raw_rows, None);

        let image = decode(&png).unwrap();
        assert_eq!(image.rgba, vec![10, 20, 30, 40, 50, 60, 70, 80]);
        assert!(image.has_alpha);
    }

    #[test]
    fn rejects_bad_signature()
    {
        let mut png = build_png(1, 1, 2, &[0, 1, 2, 3], None);
        png[0] = 0;
        assert!(matches!(decode(&png), Err(PngError::BadSignature)));
    }

    #[test]
    fn rejects_truncated_stream()
    {
        let png = build_png(1, 1, 2, &[0, 1, 2, 3], None);
        let truncated = &png[..png.len() - 10];
        assert!(decode(truncated).is_err());
    }

    #[test]
    fn rejects_missing_idat()
    {
        let mut buf = Vec::new();
        buf.extend_from_slice(&PNG_SIGNATURE);
        let mut ihdr = Vec::new();
        ihdr.extend_from_slice(&1u32.to_be_bytes());
        ihdr.extend_from_slice(&1u32.to_be_bytes());
        ihdr.extend_from_slice(&[8, 2, 0, 0, 0]);
        buf.extend_from_slice(&chunk(b"IHDR", &ihdr));
        buf.extend_from_slice(&chunk(b"IEND", &[]));

        assert!(matches!(decode(&buf), Err(PngError::Corrupt(_))));
    }
}
