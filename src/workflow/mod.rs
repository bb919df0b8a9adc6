//! Run workflow: state machine and the two-phase lesson pipeline.

pub mod lesson_pipeline;
pub mod run_state;

pub use lesson_pipeline::{LessonPipeline, ResponseValidator, RunReport, SentinelValidator};
pub use run_state::{RunProgress, RunStatus};
