//! Run status machine and progress snapshots.
//!
//! Progress has a single authoritative source: a monotonic step counter with
//! two steps per lesson (generate, summarize). The time estimate rides along
//! in the snapshot for display only and never drives the percentage.

use serde::Serialize;
use tracing::warn;

/// Lifecycle of one pipeline run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum RunStatus {
    Idle,
    Estimating,
    Generating,
    Summarizing,
    Completed,
    Failed,
}

impl RunStatus {
    /// Pure transition predicate for the state machine.
    pub fn can_transition_to(self, next: RunStatus) -> bool {
        use RunStatus::*;
        matches!(
            (self, next),
            (Idle, Estimating)
                | (Estimating, Generating)
                | (Generating, Summarizing)
                | (Summarizing, Generating)
                | (Summarizing, Completed)
                | (Estimating, Failed)
                | (Generating, Failed)
                | (Summarizing, Failed)
                | (Completed, Idle)
                | (Failed, Idle)
        )
    }

    pub fn is_active(self) -> bool {
        matches!(
            self,
            RunStatus::Estimating | RunStatus::Generating | RunStatus::Summarizing
        )
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RunStatus::Idle => "idle",
            RunStatus::Estimating => "estimating",
            RunStatus::Generating => "generating",
            RunStatus::Summarizing => "summarizing",
            RunStatus::Completed => "completed",
            RunStatus::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Snapshot of run progress, published after every state change.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RunProgress {
    pub status: RunStatus,
    /// Completed steps; two steps per lesson
    pub steps_done: u32,
    pub total_steps: u32,
    /// Time estimate for the whole run, display only
    pub estimated_time_seconds: f64,
}

impl RunProgress {
    pub fn idle() -> Self {
        Self {
            status: RunStatus::Idle,
            steps_done: 0,
            total_steps: 0,
            estimated_time_seconds: 0.0,
        }
    }

    /// Completion percentage derived from the step counter, clamped to 100.
    pub fn percent(&self) -> f64 {
        if self.total_steps == 0 {
            return 0.0;
        }
        (self.steps_done as f64 / self.total_steps as f64 * 100.0).min(100.0)
    }

    /// Transition to `next`, ignoring (with a warning) illegal transitions.
    pub fn transition(&mut self, next: RunStatus) {
        if self.status == next {
            return;
        }
        if !self.status.can_transition_to(next) {
            warn!("ignoring illegal status transition {} -> {}", self.status, next);
            return;
        }
        self.status = next;
    }

    /// Record one completed step. Monotonic; saturates at `total_steps`.
    pub fn advance_step(&mut self) {
        if self.steps_done < self.total_steps {
            self.steps_done += 1;
        }
    }
}
