use serde::{Deserialize, Serialize};
use tracing::debug;

use mzcore::algorithm::similarity::IsotopePatternScorer;

use crate::model::peak_list::{compare_identities, PeakListRow};

/// Weights and windows of the row-vs-row match score.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScoreWeights {
    /// Maximum m/z difference between row averages, also the candidate window.
    pub mz_max_diff: f64,
    pub mz_weight: f64,
    /// Maximum RT difference between row averages, also the candidate window.
    pub rt_max_diff: f64,
    pub rt_weight: f64,
    /// Credit for rows sharing at least one identity.
    pub same_id_weight: f64,
    /// Enable the isotope-pattern similarity term.
    pub compare_isotopes: bool,
    /// m/z tolerance handed to the pattern scorer.
    pub isotope_mz_tolerance: f64,
    /// A similarity below this threshold is computed but not credited.
    pub isotope_score_threshold: f64,
    pub isotope_weight: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        ScoreWeights {
            mz_max_diff: 0.01,
            mz_weight: 1.0,
            rt_max_diff: 0.5,
            rt_weight: 1.0,
            same_id_weight: 0.0,
            compare_isotopes: false,
            isotope_mz_tolerance: 0.01,
            isotope_score_threshold: 0.8,
            isotope_weight: 0.0,
        }
    }
}

/// A scored pairing of one new-list row against one master row, consumed
/// once by the greedy commit phase.
#[derive(Clone, Debug)]
pub struct RowVsRowScore {
    /// Index of the row in the new list.
    pub new_row: usize,
    /// Index of the row in the master list.
    pub master_row: usize,
    pub score: f64,
    /// True when the isotope term was requested but had to fall back to a
    /// zero contribution (missing pattern or scorer failure).
    pub isotope_term_degraded: bool,
}

/// Compute the match score between a new-list row and a master row.
///
/// The m/z and RT terms scale linearly from full weight at zero difference
/// down to zero at the window edge; the arithmetic is deliberately left
/// unclamped beyond the edge, candidate generation is responsible for never
/// scoring pairs outside the windows. The isotope similarity is credited
/// only when it clears the threshold; a missing pattern or a scorer error
/// degrades that term to zero instead of failing the pair.
pub fn score_row_pair(
    new_row: &PeakListRow,
    master_row: &PeakListRow,
    indices: (usize, usize),
    weights: &ScoreWeights,
    scorer: &dyn IsotopePatternScorer,
) -> RowVsRowScore {
    let mz_diff = (new_row.average_mz() - master_row.average_mz()).abs();
    let rt_diff = (new_row.average_rt() - master_row.average_rt()).abs();

    let same_id_flag = if compare_identities(new_row, master_row) {
        1.0
    } else {
        0.0
    };

    let mut iso_score = 0.0;
    let mut effective_iso_weight = 0.0;
    let mut degraded = false;

    if weights.compare_isotopes {
        let pattern_a = new_row
            .best_isotope_pattern_peak()
            .and_then(|p| p.isotope_pattern.as_ref());
        let pattern_b = master_row
            .best_isotope_pattern_peak()
            .and_then(|p| p.isotope_pattern.as_ref());

        match (pattern_a, pattern_b) {
            (Some(a), Some(b)) => match scorer.similarity(a, b, weights.isotope_mz_tolerance) {
                Ok(similarity) => {
                    iso_score = similarity;
                    if similarity >= weights.isotope_score_threshold {
                        effective_iso_weight = weights.isotope_weight;
                    }
                }
                Err(error) => {
                    debug!(
                        new_row = new_row.id,
                        master_row = master_row.id,
                        %error,
                        "isotope similarity failed, term degraded to zero"
                    );
                    degraded = true;
                }
            },
            _ => {
                debug!(
                    new_row = new_row.id,
                    master_row = master_row.id,
                    "no qualifying isotope-pattern peak, term degraded to zero"
                );
                degraded = true;
            }
        }
    }

    let score = (1.0 - mz_diff / weights.mz_max_diff) * weights.mz_weight
        + (1.0 - rt_diff / weights.rt_max_diff) * weights.rt_weight
        + same_id_flag * weights.same_id_weight
        + iso_score * effective_iso_weight;

    RowVsRowScore {
        new_row: indices.0,
        master_row: indices.1,
        score,
        isotope_term_degraded: degraded,
    }
}
