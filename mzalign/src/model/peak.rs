use serde::{Deserialize, Serialize};

use mzcore::data::pattern::IsotopePattern;

use crate::model::raw_file::RawFileId;

/// A detected chromatographic feature within one raw data file.
///
/// Owned by exactly one raw data file; rows reference peaks by copying them
/// into their per-file map.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChromatographicPeak {
    pub raw_file: RawFileId,
    pub scan_number: usize,
    pub mz: f64,
    pub rt: f64,
    pub height: f64,
    pub isotope_pattern: Option<IsotopePattern>,
}

impl ChromatographicPeak {
    pub fn new(raw_file: RawFileId, scan_number: usize, mz: f64, rt: f64, height: f64) -> Self {
        ChromatographicPeak {
            raw_file,
            scan_number,
            mz,
            rt,
            height,
            isotope_pattern: None,
        }
    }

    pub fn with_isotope_pattern(mut self, pattern: IsotopePattern) -> Self {
        self.isotope_pattern = Some(pattern);
        self
    }
}
