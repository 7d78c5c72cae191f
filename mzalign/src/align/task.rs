use std::fmt;
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use mzcore::algorithm::similarity::IsotopePatternScorer;

use crate::align::join::{align_peak_list, AlignmentReport};
use crate::align::score::ScoreWeights;
use crate::error::AlignmentError;
use crate::model::peak_list::PeakList;

/// Terminal and intermediate states of an alignment unit of work.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum TaskStatus {
    Waiting,
    Processing,
    Finished,
    Cancelled,
    Error,
}

impl Display for TaskStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            TaskStatus::Waiting => write!(f, "waiting"),
            TaskStatus::Processing => write!(f, "processing"),
            TaskStatus::Finished => write!(f, "finished"),
            TaskStatus::Cancelled => write!(f, "cancelled"),
            TaskStatus::Error => write!(f, "error"),
        }
    }
}

/// Shared cancellation flag, checked by the aligner between phases and at
/// row granularity during commit.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        CancelToken(Arc::new(AtomicBool::new(false)))
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// One cancelable unit of work: aligns a sequence of source peak lists into
/// a master list, one pass per list, reporting progress and terminal status.
///
/// The task itself is sequential; only per-pair scoring inside a pass runs
/// on worker threads.
pub struct AlignmentTask<S> {
    weights: ScoreWeights,
    scorer: S,
    cancel: CancelToken,
    status: TaskStatus,
    lists_done: usize,
    lists_total: usize,
}

impl<S: IsotopePatternScorer + Sync> AlignmentTask<S> {
    pub fn new(weights: ScoreWeights, scorer: S) -> Self {
        AlignmentTask {
            weights,
            scorer,
            cancel: CancelToken::new(),
            status: TaskStatus::Waiting,
            lists_done: 0,
            lists_total: 0,
        }
    }

    /// A clone of the task's cancellation token, for handing to the caller
    /// that may want to cancel from another thread.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn status(&self) -> TaskStatus {
        self.status
    }

    /// Fraction of source lists fully processed, in [0, 1].
    pub fn finished_fraction(&self) -> f64 {
        if self.lists_total == 0 {
            return 0.0;
        }
        self.lists_done as f64 / self.lists_total as f64
    }

    /// Run one pass per source list against the master list. Stops at the
    /// first cancellation or failure; the master stays valid up to the last
    /// completed checkpoint.
    pub fn run(
        &mut self,
        master: &mut PeakList,
        sources: &[PeakList],
    ) -> Result<AlignmentReport, AlignmentError> {
        self.status = TaskStatus::Processing;
        self.lists_done = 0;
        self.lists_total = sources.len();

        let mut total = AlignmentReport::default();

        for source in sources {
            match align_peak_list(master, source, &self.weights, &self.scorer, &self.cancel) {
                Ok(report) => {
                    total.absorb(&report);
                    self.lists_done += 1;
                    info!(
                        source = %source.name,
                        done = self.lists_done,
                        total = self.lists_total,
                        "aligned peak list"
                    );
                }
                Err(AlignmentError::Cancelled) => {
                    self.status = TaskStatus::Cancelled;
                    return Err(AlignmentError::Cancelled);
                }
            }
        }

        self.status = TaskStatus::Finished;
        Ok(total)
    }
}
