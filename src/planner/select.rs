//! Value-biased candidate selection.
//!
//! Candidates are ranked by destination value, best first, with ties in
//! random order. The walk starts at the best candidate and keeps stepping
//! to the next one with a probability that shrinks as the value gap grows,
//! so strong options are usually taken but close runners-up get a chance.

use std::cmp::Reverse;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::board::RegionId;
use crate::config::PlannerConfig;

use super::destination::DestinationValues;

/// Sorts candidates by descending value; equal values end up in random order.
pub fn rank<R: Rng + ?Sized>(candidates: &mut [RegionId], values: &DestinationValues, rng: &mut R) {
    candidates.shuffle(rng);
    candidates.sort_by_key(|&r| Reverse(values.get(r)));
}

/// Sorts candidates by ascending value; equal values end up in random order.
pub fn rank_ascending<R: Rng + ?Sized>(
    candidates: &mut [RegionId],
    values: &DestinationValues,
    rng: &mut R,
) {
    candidates.shuffle(rng);
    candidates.sort_by_key(|&r| values.get(r));
}

/// How unattractive stepping from a candidate worth `cur` to one worth `next` is.
///
/// `round((cur - next) * scale / cur)`, rounding half up; 0 when `cur` is 0.
pub fn gap(cur: i64, next: i64, scale: f64) -> i64 {
    if cur == 0 {
        return 0;
    }
    ((cur - next) as f64 * scale / cur as f64 + 0.5).floor() as i64
}

/// Walks ranked candidates and returns the index of the chosen one.
///
/// For each next candidate two rolls in `[0, 100)` are drawn; the walk
/// steps on only when the first is below `skip_chance` and the second is at
/// least the gap. Returns `None` for an empty list.
pub fn walk<R: Rng + ?Sized>(
    candidates: &[RegionId],
    values: &DestinationValues,
    config: &PlannerConfig,
    rng: &mut R,
) -> Option<usize> {
    if candidates.is_empty() {
        return None;
    }
    let mut cur = 0;
    for next in 1..candidates.len() {
        let g = gap(values.get(candidates[cur]), values.get(candidates[next]), config.gap_scale);
        let first: u32 = rng.gen_range(0..100);
        let second: i64 = rng.gen_range(0..100);
        if first < config.skip_chance && second >= g {
            cur = next;
        } else {
            break;
        }
    }
    Some(cur)
}
