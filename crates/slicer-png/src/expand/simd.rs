//! SSSE3 shuffle fast path for RGB -> RGBA expansion (opaque only; tRNS
//! chroma-keying falls back to the scalar path since the byte-shuffle can't
//! express a per-pixel comparison cheaply).

#[cfg(target_arch = "x86")]
use core::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use core::arch::x86_64::*;

pub fn has_ssse3() -> bool
{
    is_x86_feature_detected!("ssse3")
}

/// Expand 16 source bytes (5 and a third RGB pixels) at a time using two
/// pshufb shuffles, each producing 16 bytes (4 RGBA pixels) with alpha
/// bytes forced to 0xFF. Falls back to scalar handling for the remainder.
///
/// # Safety
/// Caller must have verified `has_ssse3()`. `out.len()` must be
/// `rgb.len() / 3 * 4`.
#[target_feature(enable = "ssse3")]
pub unsafe fn expand_rgb_to_rgba_ssse3(rgb: &[u8], out: &mut [u8])
{
    let pixels = rgb.len() / 3;

    // Each iteration loads 16 bytes starting at pixel offset `i`, i.e. up
    // to byte `i*3 + 15`. Requiring that to stay inside `rgb` (`i*3 + 16
    // <= pixels*3`) means the SIMD loop may only run while at least 2
    // pixels' worth of trailing bytes remain unconsumed; everything past
    // that safe margin is left to the scalar tail below. Without this
    // margin the last iteration over-reads `rgb` by up to 4 bytes
    // whenever `pixels % 4` is 0 or 1.
    let simd_pixels = if pixels >= 6 { ((pixels - 2) / 4) * 4 } else { 0 };

    // Shuffle mask taking 12 packed RGB bytes (4 pixels) from a 16-byte
    // load and placing them at RGBA pixel boundaries; the 4 alpha lanes
    // are filled from a byte that's forced to 0xFF beforehand.
    let shuffle = _mm_setr_epi8(0, 1, 2, -1, 3, 4, 5, -1, 6, 7, 8, -1, 9, 10, 11, -1);
    let alpha_mask = _mm_set1_epi32(0xFF000000u32 as i32);

    let mut i = 0;
    while i < simd_pixels
    {
        let src = _mm_loadu_si128(rgb.as_ptr().add(i * 3) as *const __m128i);
        let shuffled = _mm_shuffle_epi8(src, shuffle);
        let with_alpha = _mm_or_si128(shuffled, alpha_mask);
        _mm_storeu_si128(out.as_mut_ptr().add(i * 4) as *mut __m128i, with_alpha);
        i += 4;
    }

    for p in simd_pixels..pixels
    {
        out[p * 4] = rgb[p * 3];
        out[p * 4 + 1] = rgb[p * 3 + 1];
        out[p * 4 + 2] = rgb[p * 3 + 2];
        out[p * 4 + 3] = 255;
    }
}
