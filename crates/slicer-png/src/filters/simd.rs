//! AVX2 fast path for the Up filter.
//!
//! Grounded on the original `add_bytes_avx2` row-add loop: Up is just a
//! 32-lane byte add with wraparound, so it vectorises trivially with no
//! carry/borrow handling required.

#[cfg(target_arch = "x86")]
use core::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use core::arch::x86_64::*;

pub fn has_avx2() -> bool
{
    is_x86_feature_detected!("avx2")
}

/// `current[i] = raw[i] + prev[i]` for every byte, 32 lanes at a time.
///
/// # Safety
/// Caller must have verified `has_avx2()` on this CPU. `raw`, `prev` and
/// `current` must all have equal length.
#[target_feature(enable = "avx2")]
pub unsafe fn add_bytes_avx2(current: &mut [u8], raw: &[u8], prev: &[u8])
{
    debug_assert_eq!(raw.len(), prev.len());
    debug_assert_eq!(raw.len(), current.len());

    let len = raw.len();
    let chunks = len / 32;

    for i in 0..chunks
    {
        let off = i * 32;
        let a = _mm256_loadu_si256(raw.as_ptr().add(off) as *const __m256i);
        let b = _mm256_loadu_si256(prev.as_ptr().add(off) as *const __m256i);
        let sum = _mm256_add_epi8(a, b);
        _mm256_storeu_si256(current.as_mut_ptr().add(off) as *mut __m256i, sum);
    }

    for i in (chunks * 32)..len
    {
        current[i] = raw[i].wrapping_add(prev[i]);
    }
}
