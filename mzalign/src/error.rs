use thiserror::Error;

/// Errors that terminate an alignment pass. Scoring-level failures never
/// surface here; they degrade the affected term and are counted in the
/// pass report instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AlignmentError {
    #[error("alignment cancelled")]
    Cancelled,
}
