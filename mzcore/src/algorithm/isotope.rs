use crate::chemistry::constants::MASS_ELECTRON;
use crate::data::pattern::{IsotopePattern, PatternStatus, Polarity};
use crate::error::PatternError;

/// Minimum relative abundance of an isotope for it to be part of a computed
/// distribution, fixed at 0.1% of the most abundant isotope. Distribution
/// sources are expected to apply this cutoff before returning.
pub const MIN_ISOTOPE_ABUNDANCE: f64 = 0.001;

/// Capability that computes the raw isotope distribution of a molecular
/// formula.
///
/// Implementations wrap an isotope-physics engine; this crate only consumes
/// the computed distribution. The returned pairs are (isotope mass,
/// abundance), filtered to abundance >= `MIN_ISOTOPE_ABUNDANCE` relative to
/// the most abundant isotope, in ascending mass order.
pub trait IsotopeDistributionSource {
    fn isotope_distribution(&self, formula: &str) -> Result<Vec<(f64, f64)>, PatternError>;
}

/// calculate the predicted isotope pattern of a molecular formula as it would
/// appear at the given charge state and polarity
///
/// Arguments:
///
/// * `source` - capability computing the raw isotope distribution
/// * `formula` - molecular formula, becomes the description of the pattern
/// * `charge` - number of charge units, must be nonzero
/// * `polarity` - ionization polarity, carries the sign of the charge
///
/// Returns:
///
/// * `Result<IsotopePattern, PatternError>` - predicted pattern, or
///   `InvalidCharge` for charge 0, or `InvalidFormula` from the source
pub fn calculate_isotope_pattern(
    source: &dyn IsotopeDistributionSource,
    formula: &str,
    charge: i32,
    polarity: Polarity,
) -> Result<IsotopePattern, PatternError> {
    if charge == 0 {
        return Err(PatternError::InvalidCharge { charge });
    }

    let distribution = source.isotope_distribution(formula)?;

    let mut mz = Vec::with_capacity(distribution.len());
    let mut intensity = Vec::with_capacity(distribution.len());

    for (isotope_mass, abundance) in distribution {
        // For each unit of charge, one electron mass is removed (positive
        // polarity) or added (negative polarity).
        let mass = isotope_mass + (polarity.sign() * -1 * charge) as f64 * MASS_ELECTRON;
        mz.push(mass / charge as f64);
        intensity.push(abundance);
    }

    Ok(IsotopePattern::new(
        mz,
        intensity,
        charge,
        PatternStatus::Predicted,
        formula.to_string(),
    ))
}

/// normalize an isotope pattern so that its highest isotope reaches the
/// target intensity, keeping the ratios between all points
///
/// Arguments:
///
/// * `pattern` - the pattern to normalize
/// * `target_intensity` - intensity of the highest isotope after
///   normalization, defaults to 1.0
///
/// Returns:
///
/// * `Result<IsotopePattern, PatternError>` - normalized pattern, or
///   `EmptyPattern` when the pattern has no points
///
/// # Example
///
/// ```rust
/// use mzcore::algorithm::isotope::normalize_isotope_pattern;
/// use mzcore::data::pattern::{IsotopePattern, PatternStatus};
///
/// let pattern = IsotopePattern::new(vec![100.0, 101.0], vec![400.0, 100.0], 1, PatternStatus::Detected, String::new());
/// let normalized = normalize_isotope_pattern(&pattern, None).unwrap();
/// assert_eq!(*normalized.intensity, vec![1.0, 0.25]);
/// ```
pub fn normalize_isotope_pattern(
    pattern: &IsotopePattern,
    target_intensity: Option<f64>,
) -> Result<IsotopePattern, PatternError> {
    let target_intensity = target_intensity.unwrap_or(1.0);

    let (_, max_intensity) = pattern.highest_isotope().ok_or(PatternError::EmptyPattern)?;

    let intensity: Vec<f64> = pattern
        .intensity
        .iter()
        .map(|&i| i / max_intensity * target_intensity)
        .collect();

    Ok(pattern.with_points((*pattern.mz).clone(), intensity))
}

/// merge isotopes falling within the given m/z tolerance
///
/// Scans the points once from left to right. Whenever the current surviving
/// point and its right neighbor are closer than `mz_tolerance`, they are
/// combined: intensities are summed and the new m/z is the
/// intensity-weighted average. The combined point takes the right slot and
/// may absorb the next neighbor in turn; the consumed left point is dropped
/// and never reconsidered. No further passes are made.
///
/// # Example
///
/// ```rust
/// use mzcore::algorithm::isotope::merge_isotopes;
/// use mzcore::data::pattern::{IsotopePattern, PatternStatus};
///
/// let pattern = IsotopePattern::new(vec![100.0, 100.001, 101.0], vec![1.0, 3.0, 2.0], 1, PatternStatus::Predicted, String::new());
/// let merged = merge_isotopes(&pattern, 0.01);
/// assert_eq!(merged.len(), 2);
/// assert!((merged.mz[0] - 100.00075).abs() < 1e-9);
/// assert_eq!(merged.intensity[0], 4.0);
/// ```
pub fn merge_isotopes(pattern: &IsotopePattern, mz_tolerance: f64) -> IsotopePattern {
    let mut merged_mz: Vec<f64> = Vec::with_capacity(pattern.len());
    let mut merged_intensity: Vec<f64> = Vec::with_capacity(pattern.len());

    for (mz, intensity) in pattern.points() {
        if let (Some(&last_mz), Some(&last_intensity)) = (merged_mz.last(), merged_intensity.last()) {
            if (last_mz - mz).abs() < mz_tolerance {
                let new_intensity = last_intensity + intensity;
                let new_mz = (last_mz * last_intensity + mz * intensity) / new_intensity;
                let last = merged_mz.len() - 1;
                merged_mz[last] = new_mz;
                merged_intensity[last] = new_intensity;
                continue;
            }
        }
        merged_mz.push(mz);
        merged_intensity.push(intensity);
    }

    pattern.with_points(merged_mz, merged_intensity)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TableSource;

    impl IsotopeDistributionSource for TableSource {
        fn isotope_distribution(&self, formula: &str) -> Result<Vec<(f64, f64)>, PatternError> {
            match formula {
                // Glucose, truncated to the isotopes above the 0.1% cutoff
                "C6H12O6" => Ok(vec![
                    (180.06339, 1.0),
                    (181.06674, 0.06695),
                    (182.06771, 0.01305),
                ]),
                "X" => Ok(vec![(100.0, 1.0)]),
                _ => Err(PatternError::InvalidFormula {
                    formula: formula.to_string(),
                }),
            }
        }
    }

    #[test]
    fn test_calculate_pattern_positive_polarity() {
        let pattern =
            calculate_isotope_pattern(&TableSource, "X", 1, Polarity::Positive).unwrap();

        // Positive mode removes one electron mass per charge
        assert_eq!(pattern.len(), 1);
        assert!((pattern.mz[0] - (100.0 - MASS_ELECTRON)).abs() < 1e-12);
        assert_eq!(pattern.status, PatternStatus::Predicted);
        assert_eq!(pattern.description, "X");
    }

    #[test]
    fn test_calculate_pattern_negative_polarity() {
        let pattern =
            calculate_isotope_pattern(&TableSource, "X", 1, Polarity::Negative).unwrap();
        assert!((pattern.mz[0] - (100.0 + MASS_ELECTRON)).abs() < 1e-12);
    }

    #[test]
    fn test_calculate_pattern_charge_divides_mass() {
        let pattern =
            calculate_isotope_pattern(&TableSource, "C6H12O6", 2, Polarity::Positive).unwrap();
        let expected = (180.06339 - 2.0 * MASS_ELECTRON) / 2.0;
        assert!((pattern.mz[0] - expected).abs() < 1e-12);
        assert_eq!(pattern.charge, 2);
    }

    #[test]
    fn test_calculate_pattern_zero_charge() {
        let result = calculate_isotope_pattern(&TableSource, "X", 0, Polarity::Positive);
        assert_eq!(result.unwrap_err(), PatternError::InvalidCharge { charge: 0 });
    }

    #[test]
    fn test_calculate_pattern_bad_formula() {
        let result = calculate_isotope_pattern(&TableSource, "NotAFormula", 1, Polarity::Positive);
        assert!(matches!(result, Err(PatternError::InvalidFormula { .. })));
    }

    #[test]
    fn test_normalize_max_is_one_and_ratios_kept() {
        let pattern = IsotopePattern::new(
            vec![500.0, 501.0, 502.0],
            vec![200.0, 100.0, 50.0],
            1,
            PatternStatus::Detected,
            String::new(),
        );
        let normalized = normalize_isotope_pattern(&pattern, None).unwrap();

        let (_, max) = normalized.highest_isotope().unwrap();
        assert!((max - 1.0).abs() < 1e-12);
        // Ratios between points are preserved
        assert!((normalized.intensity[0] / normalized.intensity[1] - 2.0).abs() < 1e-12);
        assert!((normalized.intensity[1] / normalized.intensity[2] - 2.0).abs() < 1e-12);
        // m/z values are untouched
        assert_eq!(*normalized.mz, *pattern.mz);
    }

    #[test]
    fn test_normalize_to_target() {
        let pattern = IsotopePattern::new(
            vec![500.0],
            vec![4.0],
            1,
            PatternStatus::Detected,
            String::new(),
        );
        let normalized = normalize_isotope_pattern(&pattern, Some(100.0)).unwrap();
        assert!((normalized.intensity[0] - 100.0).abs() < 1e-12);
    }

    #[test]
    fn test_normalize_empty_pattern() {
        let pattern =
            IsotopePattern::new(vec![], vec![], 1, PatternStatus::Predicted, String::new());
        assert_eq!(
            normalize_isotope_pattern(&pattern, None).unwrap_err(),
            PatternError::EmptyPattern
        );
    }

    #[test]
    fn test_merge_disjoint_is_identity() {
        let pattern = IsotopePattern::new(
            vec![100.0, 101.0, 102.0],
            vec![1.0, 0.5, 0.1],
            1,
            PatternStatus::Predicted,
            String::new(),
        );
        let merged = merge_isotopes(&pattern, 0.1);
        assert_eq!(*merged.mz, *pattern.mz);
        assert_eq!(*merged.intensity, *pattern.intensity);
    }

    #[test]
    fn test_merge_weighted_average() {
        let pattern = IsotopePattern::new(
            vec![100.0, 100.004, 101.0],
            vec![3.0, 1.0, 2.0],
            1,
            PatternStatus::Predicted,
            String::new(),
        );
        let merged = merge_isotopes(&pattern, 0.01);

        assert_eq!(merged.len(), 2);
        // (100.0 * 3 + 100.004 * 1) / 4 = 100.001
        assert!((merged.mz[0] - 100.001).abs() < 1e-9);
        assert!((merged.intensity[0] - 4.0).abs() < 1e-12);
        assert!((merged.mz[1] - 101.0).abs() < 1e-12);
    }

    #[test]
    fn test_merge_conserves_total_intensity() {
        let pattern = IsotopePattern::new(
            vec![100.0, 100.001, 100.002, 100.5, 100.5005],
            vec![1.0, 2.0, 3.0, 4.0, 5.0],
            1,
            PatternStatus::Predicted,
            String::new(),
        );
        let merged = merge_isotopes(&pattern, 0.01);
        assert!((merged.total_intensity() - pattern.total_intensity()).abs() < 1e-9);
    }

    #[test]
    fn test_merge_absorbs_rightward_only() {
        // The merged point keeps absorbing its right neighbor while within
        // tolerance of the running weighted average.
        let pattern = IsotopePattern::new(
            vec![100.0, 100.004, 100.006],
            vec![1.0, 1.0, 1.0],
            1,
            PatternStatus::Predicted,
            String::new(),
        );
        let merged = merge_isotopes(&pattern, 0.005);

        // 100.0 + 100.004 merge to 100.002; 100.006 is within 0.005 of that
        // running average, so it is absorbed as well.
        assert_eq!(merged.len(), 1);
        assert!((merged.mz[0] - (300.01 / 3.0)).abs() < 1e-9);
        assert!((merged.intensity[0] - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_merge_empty_and_single() {
        let empty = IsotopePattern::new(vec![], vec![], 1, PatternStatus::Predicted, String::new());
        assert!(merge_isotopes(&empty, 0.01).is_empty());

        let single =
            IsotopePattern::new(vec![100.0], vec![1.0], 1, PatternStatus::Predicted, String::new());
        assert_eq!(merge_isotopes(&single, 0.01).len(), 1);
    }
}
