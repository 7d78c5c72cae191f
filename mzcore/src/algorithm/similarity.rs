use std::collections::BTreeMap;

use itertools::{EitherOrBoth, Itertools};

use crate::algorithm::isotope::{merge_isotopes, normalize_isotope_pattern};
use crate::data::pattern::IsotopePattern;
use crate::error::PatternError;

/// Capability that compares two isotope patterns.
///
/// The returned score is in [0, 1], deterministic and symmetric in the two
/// patterns. The comparison must be insensitive to point ordering.
pub trait IsotopePatternScorer {
    fn similarity(
        &self,
        a: &IsotopePattern,
        b: &IsotopePattern,
        mz_tolerance: f64,
    ) -> Result<f64, PatternError>;
}

/// Reference scorer: normalized patterns are merged within the tolerance,
/// binned on an m/z grid derived from the tolerance, and compared by the
/// cosine of the two binned intensity vectors.
#[derive(Clone, Copy, Debug, Default)]
pub struct BinnedPatternScorer;

impl BinnedPatternScorer {
    fn binned(pattern: &IsotopePattern, mz_tolerance: f64) -> Result<BTreeMap<i64, f64>, PatternError> {
        let normalized = normalize_isotope_pattern(pattern, None)?;
        let merged = merge_isotopes(&normalized, mz_tolerance);

        let mut bins: BTreeMap<i64, f64> = BTreeMap::new();
        for (mz, intensity) in merged.points() {
            let key = (mz / mz_tolerance).round() as i64;
            *bins.entry(key).or_insert(0.0) += intensity;
        }
        Ok(bins)
    }
}

impl IsotopePatternScorer for BinnedPatternScorer {
    fn similarity(
        &self,
        a: &IsotopePattern,
        b: &IsotopePattern,
        mz_tolerance: f64,
    ) -> Result<f64, PatternError> {
        let bins_a = Self::binned(a, mz_tolerance)?;
        let bins_b = Self::binned(b, mz_tolerance)?;

        // Join the two sorted bin maps on their keys and accumulate the dot
        // product over shared bins.
        let dot: f64 = bins_a
            .iter()
            .merge_join_by(bins_b.iter(), |(ka, _), (kb, _)| ka.cmp(kb))
            .filter_map(|pair| match pair {
                EitherOrBoth::Both((_, ia), (_, ib)) => Some(*ia * *ib),
                _ => None,
            })
            .sum();

        let norm_a: f64 = bins_a.values().map(|i| i * i).sum::<f64>().sqrt();
        let norm_b: f64 = bins_b.values().map(|i| i * i).sum::<f64>().sqrt();

        let score = dot / (norm_a * norm_b);
        if !score.is_finite() {
            return Ok(0.0);
        }
        Ok(score.clamp(0.0, 1.0))
    }
}
