//! The decoder's output type.

/// A decoded, packed RGBA raster.
#[derive(Clone, Debug)]
pub struct PngImage
{
    pub width:     u32,
    pub height:    u32,
    pub rgba:      Vec<u8>,
    pub has_alpha: bool
}

impl PngImage
{
    /// Bytes per row of the packed RGBA buffer.
    pub const fn stride(&self) -> usize
    {
        self.width as usize * 4
    }
}
