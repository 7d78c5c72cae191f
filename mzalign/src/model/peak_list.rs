use std::collections::BTreeMap;
use std::fmt;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::model::identity::PeakIdentity;
use crate::model::peak::ChromatographicPeak;
use crate::model::raw_file::{RawDataFile, RawFileId};

pub type RowId = usize;

/// The alignable unit: one chemical feature, holding at most one peak per
/// raw data file.
///
/// Average m/z and RT are cached and recomputed on every change to the
/// peak set, so reads stay O(1) during candidate generation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PeakListRow {
    pub id: RowId,
    peaks: BTreeMap<RawFileId, ChromatographicPeak>,
    identities: Vec<PeakIdentity>,
    preferred_identity: Option<usize>,
    comment: String,
    average_mz: f64,
    average_rt: f64,
}

impl PeakListRow {
    pub fn new(id: RowId) -> Self {
        PeakListRow {
            id,
            peaks: BTreeMap::new(),
            identities: Vec::new(),
            preferred_identity: None,
            comment: String::new(),
            average_mz: 0.0,
            average_rt: 0.0,
        }
    }

    /// Add a peak for its raw data file. A peak already present for the same
    /// file is replaced, keeping the one-peak-per-file invariant.
    pub fn add_peak(&mut self, peak: ChromatographicPeak) {
        self.peaks.insert(peak.raw_file, peak);
        self.recompute_averages();
    }

    /// Returns the peak for the given raw data file, if any.
    pub fn peak(&self, raw_file: RawFileId) -> Option<&ChromatographicPeak> {
        self.peaks.get(&raw_file)
    }

    pub fn raw_files(&self) -> impl Iterator<Item = RawFileId> + '_ {
        self.peaks.keys().copied()
    }

    pub fn peaks(&self) -> impl Iterator<Item = &ChromatographicPeak> {
        self.peaks.values()
    }

    pub fn number_of_peaks(&self) -> usize {
        self.peaks.len()
    }

    pub fn average_mz(&self) -> f64 {
        self.average_mz
    }

    pub fn average_rt(&self) -> f64 {
        self.average_rt
    }

    /// Returns the most intense peak in this row, or `None` for an empty row.
    pub fn best_peak(&self) -> Option<&ChromatographicPeak> {
        self.peaks
            .values()
            .max_by(|a, b| a.height.partial_cmp(&b.height).unwrap_or(std::cmp::Ordering::Equal))
    }

    /// Returns the most intense peak in this row that carries an isotope
    /// pattern, or `None` when no peak in the row has one attached.
    pub fn best_isotope_pattern_peak(&self) -> Option<&ChromatographicPeak> {
        self.peaks
            .values()
            .filter(|p| p.isotope_pattern.is_some())
            .max_by(|a, b| a.height.partial_cmp(&b.height).unwrap_or(std::cmp::Ordering::Equal))
    }

    pub fn add_identity(&mut self, identity: PeakIdentity, preferred: bool) {
        self.identities.push(identity);
        if preferred {
            self.preferred_identity = Some(self.identities.len() - 1);
        }
    }

    pub fn identities(&self) -> &[PeakIdentity] {
        &self.identities
    }

    pub fn preferred_identity(&self) -> Option<&PeakIdentity> {
        self.preferred_identity.and_then(|i| self.identities.get(i))
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub fn set_comment(&mut self, comment: &str) {
        self.comment = comment.to_string();
    }

    fn preferred_index(&self) -> Option<usize> {
        self.preferred_identity
    }

    fn recompute_averages(&mut self) {
        let n = self.peaks.len();
        if n == 0 {
            self.average_mz = 0.0;
            self.average_rt = 0.0;
            return;
        }
        self.average_mz = self.peaks.values().map(|p| p.mz).sum::<f64>() / n as f64;
        self.average_rt = self.peaks.values().map(|p| p.rt).sum::<f64>() / n as f64;
    }
}

/// Returns true when the two rows share at least one identity.
pub fn compare_identities(a: &PeakListRow, b: &PeakListRow) -> bool {
    a.identities()
        .iter()
        .any(|ia| b.identities().iter().any(|ib| ia == ib))
}

/// An ordered collection of rows. During alignment one list takes the
/// master/consensus role that new rows are merged into or appended to.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PeakList {
    pub name: String,
    raw_data_files: Vec<RawDataFile>,
    rows: Vec<PeakListRow>,
    next_row_id: RowId,
}

impl PeakList {
    pub fn new(name: &str) -> Self {
        PeakList {
            name: name.to_string(),
            raw_data_files: Vec::new(),
            rows: Vec::new(),
            next_row_id: 0,
        }
    }

    /// Register a raw data file covered by this list. A file with an id that
    /// is already registered is ignored.
    pub fn add_raw_data_file(&mut self, file: RawDataFile) {
        if !self.raw_data_files.iter().any(|f| f.id == file.id) {
            self.raw_data_files.push(file);
        }
    }

    pub fn raw_data_files(&self) -> &[RawDataFile] {
        &self.raw_data_files
    }

    /// Append a row built by the caller from a fresh id handed out by this
    /// list.
    pub fn add_row_with<F>(&mut self, build: F) -> RowId
    where
        F: FnOnce(RowId) -> PeakListRow,
    {
        let id = self.next_row_id;
        self.next_row_id += 1;
        self.rows.push(build(id));
        id
    }

    /// Append an existing row under a fresh id, copying its peaks and
    /// identities.
    pub fn append_row_copy(&mut self, source: &PeakListRow) -> RowId {
        self.add_row_with(|id| {
            let mut row = PeakListRow::new(id);
            for peak in source.peaks() {
                row.add_peak(peak.clone());
            }
            for (i, identity) in source.identities().iter().enumerate() {
                row.add_identity(identity.clone(), Some(i) == source.preferred_index());
            }
            row.set_comment(source.comment());
            row
        })
    }

    pub fn rows(&self) -> &[PeakListRow] {
        &self.rows
    }

    pub fn row_mut(&mut self, index: usize) -> &mut PeakListRow {
        &mut self.rows[index]
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl Display for PeakList {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "PeakList({}, rows: {})", self.name, self.rows.len())
    }
}
