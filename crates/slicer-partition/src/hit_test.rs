//! Integer-only hit testing: nearest cut to a screen point, and which
//! endpoint (if any) a point is near.
//!
//! Grounded on the original source's `distance_sq_to_segment_screen` /
//! `editor_find_cut_at_screen` / `editor_endpoint_hit`: the same `(c1, c2)`
//! projection test, the same 64/49 squared-pixel thresholds, the same
//! "A wins ties" rule.

use crate::cut::Cut;
use crate::editor::Endpoint;

const CUT_HIT_THRESHOLD_SQ: i64 = 64;
const ENDPOINT_HIT_THRESHOLD_SQ: i64 = 49;

/// Squared distance from `(px, py)` to the segment `(ax, ay)-(bx, by)`,
/// computed entirely in 64-bit integers via the standard closest-point
/// projection (`c1`/`c2` are the unnormalised dot products).
fn dist_sq_point_segment(px: i64, py: i64, ax: i64, ay: i64, bx: i64, by: i64) -> i64
{
    let abx = bx - ax;
    let aby = by - ay;
    let apx = px - ax;
    let apy = py - ay;

    let c1 = apx * abx + apy * aby;
    if c1 <= 0
    {
        return apx * apx + apy * apy;
    }

    let c2 = abx * abx + aby * aby;
    if c2 <= c1
    {
        let bpx = px - bx;
        let bpy = py - by;
        return bpx * bpx + bpy * bpy;
    }

    let ap_sq = apx * apx + apy * apy;
    ap_sq - (c1 * c1) / c2
}

/// The index of the cut nearest `(sx, sy)` within the hit threshold, ties
/// broken by minimum distance (first encountered wins a tie).
pub fn find_cut_at(cuts: &[Cut], sx: i32, sy: i32) -> Option<usize>
{
    let mut best: Option<(i64, usize)> = None;

    for (i, cut) in cuts.iter().enumerate()
    {
        let d = dist_sq_point_segment(
            i64::from(sx),
            i64::from(sy),
            i64::from(cut.x1),
            i64::from(cut.y1),
            i64::from(cut.x2),
            i64::from(cut.y2)
        );

        if d <= CUT_HIT_THRESHOLD_SQ && best.map_or(true, |(best_d, _)| d < best_d)
        {
            best = Some((d, i));
        }
    }

    best.map(|(_, i)| i)
}

/// Which endpoint of `cut` is within the endpoint hit threshold of
/// `(sx, sy)`, preferring `A` on a tie.
pub fn endpoint_hit(cut: &Cut, sx: i32, sy: i32) -> Option<Endpoint>
{
    let (ax, ay) = cut.endpoint_a();
    let (bx, by) = cut.endpoint_b();

    let da = sq_dist(sx, sy, ax, ay);
    let db = sq_dist(sx, sy, bx, by);

    match (da <= ENDPOINT_HIT_THRESHOLD_SQ, db <= ENDPOINT_HIT_THRESHOLD_SQ)
    {
        (true, true) =>
        {
            if da <= db
            {
                Some(Endpoint::A)
            }
            else
            {
                Some(Endpoint::B)
            }
        }
        (true, false) => Some(Endpoint::A),
        (false, true) => Some(Endpoint::B),
        (false, false) => None
    }
}

fn sq_dist(px: i32, py: i32, qx: i32, qy: i32) -> i64
{
    let dx = i64::from(px - qx);
    let dy = i64::from(py - qy);
    dx * dx + dy * dy
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::cut::Cut;

    #[test]
    fn finds_cut_within_threshold()
    {
        let cuts = vec![Cut::new(50, 0, 50, 99).unwrap()];
        assert_eq!(find_cut_at(&cuts, 50, 40), Some(0));
        assert_eq!(find_cut_at(&cuts, 58, 40), Some(0));
        assert_eq!(find_cut_at(&cuts, 60, 40), None);
    }

    #[test]
    fn endpoint_hit_prefers_a_on_tie()
    {
        // a horizontal cut of length 0... use a short real cut and probe
        // a point equidistant from both endpoints isn't generally
        // reachable with integer coordinates except at the midpoint of a
        // cut whose endpoints are themselves within range; construct one
        // short enough that the midpoint is within range of both.
        let cut = Cut::new(0, 0, 6, 0).unwrap();
        let hit = endpoint_hit(&cut, 3, 0);
        assert_eq!(hit, Some(Endpoint::A));
    }

    #[test]
    fn endpoint_hit_picks_nearer_endpoint()
    {
        let cut = Cut::new(0, 0, 100, 0).unwrap();
        assert_eq!(endpoint_hit(&cut, 2, 0), Some(Endpoint::A));
        assert_eq!(endpoint_hit(&cut, 98, 0), Some(Endpoint::B));
        assert_eq!(endpoint_hit(&cut, 50, 0), None);
    }
}
