use std::cmp::Reverse;
use std::collections::HashSet;

use ordered_float::OrderedFloat;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use mzcore::algorithm::similarity::IsotopePatternScorer;

use crate::align::score::{score_row_pair, RowVsRowScore, ScoreWeights};
use crate::align::task::CancelToken;
use crate::error::AlignmentError;
use crate::model::peak_list::PeakList;

/// Counters of one alignment pass, kept for diagnostics.
#[derive(Clone, Copy, Debug, Default, Serialize)]
pub struct AlignmentReport {
    pub candidates_scored: usize,
    pub rows_merged: usize,
    pub rows_appended: usize,
    pub isotope_terms_degraded: usize,
}

impl AlignmentReport {
    pub fn absorb(&mut self, other: &AlignmentReport) {
        self.candidates_scored += other.candidates_scored;
        self.rows_merged += other.rows_merged;
        self.rows_appended += other.rows_appended;
        self.isotope_terms_degraded += other.isotope_terms_degraded;
    }
}

/// Merge the rows of `new_list` into the growing `master` list by greedy
/// one-to-one matching on the row-vs-row score.
///
/// Three phases: candidate pairs inside the m/z and RT windows are scored in
/// parallel; the scores are brought into a total order; the order is
/// consumed greedily, committing each pair whose rows are both still free
/// and lazily skipping pairs made stale by an earlier commit. New-list rows
/// that never commit are appended to the master as fresh rows; master rows
/// are never removed.
///
/// Equal scores are resolved by candidate-generation order (the sort is
/// stable on the descending score key), so a pass is deterministic for
/// deterministic input ordering. Cancellation is honored between phases and
/// per pair inside the commit loop; a commit is always completed before the
/// check, leaving the master valid.
pub fn align_peak_list(
    master: &mut PeakList,
    new_list: &PeakList,
    weights: &ScoreWeights,
    scorer: &(dyn IsotopePatternScorer + Sync),
    cancel: &CancelToken,
) -> Result<AlignmentReport, AlignmentError> {
    if cancel.is_cancelled() {
        return Err(AlignmentError::Cancelled);
    }

    // Phase 1: score all candidate pairs inside the coarse windows. Pairs
    // outside the windows are never scored and can never match.
    let master_rows = master.rows();
    let mut scores: Vec<RowVsRowScore> = new_list
        .rows()
        .par_iter()
        .enumerate()
        .flat_map_iter(|(i, new_row)| {
            master_rows
                .iter()
                .enumerate()
                .filter(move |(_, master_row)| {
                    (new_row.average_mz() - master_row.average_mz()).abs() < weights.mz_max_diff
                        && (new_row.average_rt() - master_row.average_rt()).abs()
                            < weights.rt_max_diff
                })
                .map(move |(j, master_row)| {
                    score_row_pair(new_row, master_row, (i, j), weights, scorer)
                })
        })
        .collect();

    let mut report = AlignmentReport {
        candidates_scored: scores.len(),
        isotope_terms_degraded: scores.iter().filter(|s| s.isotope_term_degraded).count(),
        ..AlignmentReport::default()
    };

    if cancel.is_cancelled() {
        return Err(AlignmentError::Cancelled);
    }

    // Phase 2: total order, best score first. The stable sort keeps
    // equal-score pairs in candidate-generation order instead of collapsing
    // or arbitrarily reordering them.
    scores.sort_by_key(|s| Reverse(OrderedFloat(s.score)));

    // Phase 3: greedy commit with lazy invalidation through the committed
    // index sets.
    let mut committed_new: HashSet<usize> = HashSet::new();
    let mut committed_master: HashSet<usize> = HashSet::new();

    for pair in &scores {
        if cancel.is_cancelled() {
            return Err(AlignmentError::Cancelled);
        }
        if committed_new.contains(&pair.new_row) || committed_master.contains(&pair.master_row) {
            continue;
        }

        let source = &new_list.rows()[pair.new_row];
        let target = master.row_mut(pair.master_row);
        for peak in source.peaks() {
            target.add_peak(peak.clone());
        }

        committed_new.insert(pair.new_row);
        committed_master.insert(pair.master_row);
        report.rows_merged += 1;

        debug!(
            new_row = source.id,
            master_row = target.id,
            score = pair.score,
            "committed row pair"
        );
    }

    if cancel.is_cancelled() {
        return Err(AlignmentError::Cancelled);
    }

    // Leftovers: rows never committed become brand-new master rows.
    for (i, row) in new_list.rows().iter().enumerate() {
        if !committed_new.contains(&i) {
            master.append_row_copy(row);
            report.rows_appended += 1;
        }
    }

    // The aligned list spans the raw data files of every merged run.
    for file in new_list.raw_data_files() {
        master.add_raw_data_file(file.clone());
    }

    info!(
        new_list = %new_list.name,
        candidates = report.candidates_scored,
        merged = report.rows_merged,
        appended = report.rows_appended,
        degraded = report.isotope_terms_degraded,
        "alignment pass finished"
    );

    Ok(report)
}
