use std::fmt;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Polarity of the ionization mode, carrying the sign multiplier used for
/// the electron-mass correction.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum Polarity {
    Positive,
    Negative,
}

impl Polarity {
    /// Returns the sign multiplier of the polarity, `+1` for positive mode
    /// and `-1` for negative mode.
    pub fn sign(&self) -> i32 {
        match self {
            Polarity::Positive => 1,
            Polarity::Negative => -1,
        }
    }
}

impl Display for Polarity {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Polarity::Positive => write!(f, "+"),
            Polarity::Negative => write!(f, "-"),
        }
    }
}

/// Provenance of an isotope pattern.
///
/// # Description
///
/// `Predicted` patterns come from a theoretical distribution for a molecular
/// formula, `Detected` patterns were picked from measured data.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum PatternStatus {
    Predicted,
    Detected,
}

impl Display for PatternStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            PatternStatus::Predicted => write!(f, "Predicted"),
            PatternStatus::Detected => write!(f, "Detected"),
        }
    }
}

/// An isotope pattern: ordered (m/z, intensity) points for a charged species.
///
/// Uses Arc<Vec<f64>> for efficient cloning - clone is O(1) instead of O(n).
/// Patterns are immutable; transforms produce new patterns.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IsotopePattern {
    pub mz: Arc<Vec<f64>>,
    pub intensity: Arc<Vec<f64>>,
    pub charge: i32,
    pub status: PatternStatus,
    pub description: String,
}

impl IsotopePattern {
    /// Constructs a new `IsotopePattern`.
    ///
    /// # Arguments
    ///
    /// * `mz` - A vector of m/z values.
    /// * `intensity` - A vector of intensity values corresponding to the m/z values.
    /// * `charge` - The charge state of the species.
    /// * `status` - Provenance of the pattern.
    /// * `description` - Free-text description, e.g. the source formula.
    ///
    /// # Example
    ///
    /// ```rust
    /// # use mzcore::data::pattern::{IsotopePattern, PatternStatus};
    /// let pattern = IsotopePattern::new(vec![100.0, 101.0], vec![1.0, 0.3], 1, PatternStatus::Predicted, "C6H12O6".to_string());
    /// assert_eq!(pattern.len(), 2);
    /// ```
    pub fn new(mz: Vec<f64>, intensity: Vec<f64>, charge: i32, status: PatternStatus, description: String) -> Self {
        IsotopePattern {
            mz: Arc::new(mz),
            intensity: Arc::new(intensity),
            charge,
            status,
            description,
        }
    }

    pub fn len(&self) -> usize {
        self.mz.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mz.is_empty()
    }

    /// Iterate over the (m/z, intensity) points in stored order.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.mz.iter().zip(self.intensity.iter()).map(|(&mz, &i)| (mz, i))
    }

    /// Returns the highest isotope, i.e. the point with maximum intensity,
    /// or `None` for an empty pattern.
    ///
    /// # Example
    ///
    /// ```rust
    /// # use mzcore::data::pattern::{IsotopePattern, PatternStatus};
    /// let pattern = IsotopePattern::new(vec![100.0, 101.0], vec![0.4, 0.9], 1, PatternStatus::Detected, String::new());
    /// assert_eq!(pattern.highest_isotope(), Some((101.0, 0.9)));
    /// ```
    pub fn highest_isotope(&self) -> Option<(f64, f64)> {
        self.points()
            .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
    }

    pub fn total_intensity(&self) -> f64 {
        self.intensity.iter().sum()
    }

    /// Returns a copy of this pattern with the point vectors replaced,
    /// keeping charge, status and description.
    pub fn with_points(&self, mz: Vec<f64>, intensity: Vec<f64>) -> Self {
        IsotopePattern {
            mz: Arc::new(mz),
            intensity: Arc::new(intensity),
            charge: self.charge,
            status: self.status,
            description: self.description.clone(),
        }
    }
}

/// Formats the `IsotopePattern` for display.
impl Display for IsotopePattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.highest_isotope() {
            Some((mz, i)) => write!(
                f,
                "IsotopePattern({}, points: {}, base peak: ({:.4}, {:.4}))",
                self.status,
                self.len(),
                mz,
                i
            ),
            None => write!(f, "IsotopePattern({}, empty)", self.status),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polarity_sign() {
        assert_eq!(Polarity::Positive.sign(), 1);
        assert_eq!(Polarity::Negative.sign(), -1);
    }

    #[test]
    fn test_highest_isotope_empty() {
        let pattern = IsotopePattern::new(vec![], vec![], 1, PatternStatus::Predicted, String::new());
        assert!(pattern.is_empty());
        assert_eq!(pattern.highest_isotope(), None);
    }

    #[test]
    fn test_total_intensity() {
        let pattern = IsotopePattern::new(vec![100.0, 101.0, 102.0], vec![1.0, 0.5, 0.25], 2, PatternStatus::Detected, String::new());
        assert!((pattern.total_intensity() - 1.75).abs() < 1e-12);
    }
}
