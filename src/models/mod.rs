//! Domain models: lesson inputs and generated results.

pub mod lesson;

pub use lesson::{GeneratedLesson, LessonInput, SUMMARY_RETRY_PLACEHOLDER};
