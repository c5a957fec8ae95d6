//! Constellation aggregation and small statistical helpers
//!
//! Systems that were never observed keep `None` for count and percentage.
//! Downstream charting treats a missing system differently from one with zero
//! measurements, so a zero must never be written in its place.

use crate::conversion::round_to;
use crate::types::{Constellation, ConstellationStats};

/// Count raw measurements per GNSS system and compute each system's share,
/// rounded to 2 decimals
pub fn aggregate_constellations(observations: &[Constellation]) -> ConstellationStats {
    let mut counts = [0u64; 8];
    for system in observations {
        counts[*system as usize] += 1;
    }

    let total = observations.len() as f64;
    let mut stats = ConstellationStats::empty();
    for system in Constellation::ALL {
        let count = counts[system as usize];
        if count == 0 {
            continue;
        }
        let entry = stats.get_mut(system);
        entry.count = Some(count);
        entry.percentage = Some(round_to(count as f64 / total, 2));
    }

    stats
}

/// Median of a dataset; the mean of the two middle values for even lengths
///
/// # Returns
/// `None` for an empty slice or when any value is NaN
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() || values.iter().any(|v| v.is_nan()) {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}
