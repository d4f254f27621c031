//! RGB -> RGBA expansion, optional tRNS chroma-keying, optional worker
//! fan-out across rows.
//!
//! Grounded on the teacher's `utils.rs::expand_trns` for the chroma-key
//! matching and on `zune-imageprocs`' `box_blur.rs` for the
//! `std::thread::scope` row-range fan-out pattern.

use std::sync::OnceLock;

#[cfg(feature = "threads")]
use log::trace;

#[cfg(all(feature = "simd", any(target_arch = "x86", target_arch = "x86_64")))]
mod simd;

/// An opaque RGB triple to chroma-key against; rows matching it get
/// alpha 0 instead of 255.
pub type TrnsKey = [u8; 3];

/// Expand `rgb` (3 bytes/pixel, `width * height` pixels) into a freshly
/// allocated RGBA buffer (4 bytes/pixel). `trns`, if present, is matched
/// per-pixel to produce a transparent pixel.
pub fn expand_rgb_to_rgba(rgb: &[u8], width: usize, height: usize, trns: Option<TrnsKey>) -> Vec<u8>
{
    let mut out = vec![0u8; width * height * 4];

    #[cfg(feature = "threads")]
    {
        let worker_count = worker_count(width, height);
        if worker_count > 1
        {
            expand_threaded(rgb, &mut out, width, height, trns, worker_count);
            return out;
        }
    }

    expand_range(rgb, &mut out, trns);
    out
}

fn expand_range(rgb: &[u8], out: &mut [u8], trns: Option<TrnsKey>)
{
    #[cfg(all(feature = "simd", any(target_arch = "x86", target_arch = "x86_64")))]
    {
        if trns.is_none() && simd::has_ssse3()
        {
            // SAFETY: guarded by the runtime feature check above.
            unsafe { simd::expand_rgb_to_rgba_ssse3(rgb, out) };
            return;
        }
    }

    expand_scalar(rgb, out, trns);
}

fn expand_scalar(rgb: &[u8], out: &mut [u8], trns: Option<TrnsKey>)
{
    for (src, dst) in rgb.chunks_exact(3).zip(out.chunks_exact_mut(4))
    {
        dst[0] = src[0];
        dst[1] = src[1];
        dst[2] = src[2];
        dst[3] = match trns
        {
            Some(key) if key == [src[0], src[1], src[2]] => 0,
            _ => 255
        };
    }
}

/// A `Copy` view of a `&mut [u8]`, used to hand a row range to a spawned
/// closure without moving the original slice binding out of scope: if the
/// spawn fails, the caller still owns `out_chunk` and can finish the range
/// itself.
///
/// # Safety
/// Each `RawMut` handed to a worker covers a disjoint row range of the
/// destination buffer; no two live `RawMut`s (nor the caller's fallback use
/// of the same range) ever alias.
#[cfg(feature = "threads")]
#[derive(Clone, Copy)]
struct RawMut
{
    ptr: *mut u8,
    len: usize
}

#[cfg(feature = "threads")]
unsafe impl Send for RawMut {}

#[cfg(feature = "threads")]
impl RawMut
{
    fn from_slice(slice: &mut [u8]) -> Self
    {
        RawMut { ptr: slice.as_mut_ptr(), len: slice.len() }
    }

    /// # Safety
    /// Caller must ensure the memory behind this `RawMut` is still valid and
    /// not aliased for the lifetime `'a`.
    unsafe fn as_mut_slice<'a>(self) -> &'a mut [u8]
    {
        std::slice::from_raw_parts_mut(self.ptr, self.len)
    }
}

#[cfg(feature = "threads")]
fn expand_threaded(
    rgb: &[u8], out: &mut [u8], width: usize, height: usize, trns: Option<TrnsKey>,
    worker_count: usize
)
{
    let rows_per_worker = height.div_ceil(worker_count);

    std::thread::scope(|s| {
        let mut rgb_rest = rgb;
        let mut out_rest = out;
        let mut row = 0;

        let mut handles = Vec::with_capacity(worker_count);

        while row < height
        {
            let rows = rows_per_worker.min(height - row);
            let (rgb_chunk, rgb_tail) = rgb_rest.split_at(rows * width * 3);
            let (out_chunk, out_tail) = out_rest.split_at_mut(rows * width * 4);
            rgb_rest = rgb_tail;
            out_rest = out_tail;
            row += rows;

            // Reborrow rather than move `out_chunk`, so it's still usable
            // below if the spawn fails.
            let out_raw = RawMut::from_slice(&mut *out_chunk);

            match std::thread::Builder::new().spawn_scoped(s, move || {
                // SAFETY: `out_raw` covers exactly `out_chunk`'s disjoint
                // row range, which no other worker or the caller touches
                // while this closure runs.
                expand_range(rgb_chunk, unsafe { out_raw.as_mut_slice() }, trns)
            })
            {
                Ok(handle) => handles.push(handle),
                Err(e) =>
                {
                    trace!("expand worker spawn failed ({e}), finishing range on caller thread");
                    expand_range(rgb_chunk, out_chunk, trns);
                }
            }
        }

        for handle in handles
        {
            handle.join().expect("expand worker panicked");
        }
    });
}

/// How many workers to use for this image, honouring `SLICER_PNG_THREADS`
/// and the spec's minimum-size gate (height >= 64, width*height >= 400_000).
#[cfg(feature = "threads")]
fn worker_count(width: usize, height: usize) -> usize
{
    if height < 64 || width.saturating_mul(height) < 400_000
    {
        return 1;
    }
    configured_thread_count()
}

#[cfg(feature = "threads")]
fn configured_thread_count() -> usize
{
    static THREADS: OnceLock<usize> = OnceLock::new();

    *THREADS.get_or_init(|| {
        std::env::var("SLICER_PNG_THREADS")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .map(|n| n.clamp(1, 128))
            .unwrap_or(1)
    })
}
