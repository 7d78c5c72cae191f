// src/lib.rs
pub mod model {
    pub mod raw_file;
    pub mod identity;
    pub mod peak;
    pub mod peak_list;
}

pub mod align {
    pub mod score;
    pub mod join;
    pub mod task;
}

pub mod error;

// Re-export commonly used types
pub use align::join::{align_peak_list, AlignmentReport};
pub use align::score::{score_row_pair, RowVsRowScore, ScoreWeights};
pub use align::task::{AlignmentTask, CancelToken, TaskStatus};
