use thiserror::Error;

/// Errors raised by isotope-pattern construction and transforms.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("invalid molecular formula: {formula}")]
    InvalidFormula { formula: String },
    #[error("charge must be a nonzero integer, got {charge}")]
    InvalidCharge { charge: i32 },
    #[error("operation requires a non-empty isotope pattern")]
    EmptyPattern,
}
