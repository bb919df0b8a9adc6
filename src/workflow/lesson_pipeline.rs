//! Two-phase lesson pipeline.
//!
//! Strictly sequential: one lesson at a time, generate then summarize, no
//! concurrent model calls. Phase-1 errors are fatal and abort the run with the
//! completed lessons preserved; phase-2 failures are absorbed per lesson by a
//! three-attempt retry that falls back to the retry placeholder. Progress is
//! published through a watch channel after every step and status change.

use tokio::sync::watch;
use tracing::{error, info, warn};

use crate::error::{AppError, ValidationError};
use crate::flows::{LessonFlows, SummarizeInput};
use crate::models::{GeneratedLesson, LessonInput, SUMMARY_RETRY_PLACEHOLDER};
use crate::prompts::UNSTOP_SENTINEL;
use crate::workflow::run_state::{RunProgress, RunStatus};

/// Summarization attempts before storing the retry placeholder.
const MAX_SUMMARY_ATTEMPTS: usize = 3;

/// Decides whether a summarization response is format-compliant.
pub trait ResponseValidator {
    fn accepts(&self, response: &str) -> bool;
}

/// Default validator: the response must contain the Unstop sentinel.
#[derive(Clone, Debug)]
pub struct SentinelValidator {
    sentinel: &'static str,
}

impl Default for SentinelValidator {
    fn default() -> Self {
        Self {
            sentinel: UNSTOP_SENTINEL,
        }
    }
}

impl ResponseValidator for SentinelValidator {
    fn accepts(&self, response: &str) -> bool {
        response.contains(self.sentinel)
    }
}

/// Outcome of one pipeline run.
///
/// `lessons` is always a prefix of the requested batch in input order; on a
/// fatal phase-1 error it holds the lessons completed before the failure.
#[derive(Debug)]
pub struct RunReport {
    pub lessons: Vec<GeneratedLesson>,
    pub failure: Option<AppError>,
}

impl RunReport {
    pub fn is_completed(&self) -> bool {
        self.failure.is_none()
    }

    /// Lessons whose summary ended in the retry placeholder.
    pub fn retry_placeholder_count(&self) -> usize {
        self.lessons.iter().filter(|l| l.summary_needs_retry()).count()
    }
}

pub struct LessonPipeline<F, V = SentinelValidator> {
    flows: F,
    validator: V,
    progress_tx: watch::Sender<RunProgress>,
    seconds_per_call: u64,
}

impl<F: LessonFlows> LessonPipeline<F> {
    pub fn new(flows: F, progress_tx: watch::Sender<RunProgress>, seconds_per_call: u64) -> Self {
        Self {
            flows,
            validator: SentinelValidator::default(),
            progress_tx,
            seconds_per_call,
        }
    }
}

impl<F: LessonFlows, V: ResponseValidator> LessonPipeline<F, V> {
    pub fn with_validator(
        flows: F,
        validator: V,
        progress_tx: watch::Sender<RunProgress>,
        seconds_per_call: u64,
    ) -> Self {
        Self {
            flows,
            validator,
            progress_tx,
            seconds_per_call,
        }
    }

    /// The underlying flow implementation (used by tests to inspect stubs).
    pub fn flows(&self) -> &F {
        &self.flows
    }

    /// Execute one run over the batch. One run at a time; not cancelable.
    pub async fn run(&self, lessons: &[LessonInput]) -> RunReport {
        if lessons.is_empty() {
            return RunReport {
                lessons: Vec::new(),
                failure: Some(ValidationError::EmptyBatch.into()),
            };
        }

        let total = lessons.len();
        let mut progress = RunProgress::idle();
        // Two model calls per lesson
        progress.total_steps = (total * 2) as u32;

        progress.transition(RunStatus::Estimating);
        self.publish(&progress);

        progress.estimated_time_seconds = self.estimate_run_time(total).await;
        self.publish(&progress);

        let mut results: Vec<GeneratedLesson> = Vec::with_capacity(total);

        for (index, lesson) in lessons.iter().enumerate() {
            progress.transition(RunStatus::Generating);
            self.publish(&progress);

            info!(
                "[lesson {}/{}] ✍️ generating content for '{}'",
                index + 1,
                total,
                lesson.lesson_name
            );

            let markdown = match self.flows.generate(lesson).await {
                Ok(markdown) => markdown,
                Err(e) => {
                    error!(
                        "[lesson {}/{}] ❌ generation failed, aborting run: {}",
                        index + 1,
                        total,
                        e
                    );
                    progress.transition(RunStatus::Failed);
                    self.publish(&progress);
                    return RunReport {
                        lessons: results,
                        failure: Some(e),
                    };
                }
            };

            results.push(GeneratedLesson::from_generation(lesson, markdown));
            progress.advance_step();
            self.publish(&progress);

            progress.transition(RunStatus::Summarizing);
            self.publish(&progress);

            info!(
                "[lesson {}/{}] 📋 summarizing '{}'",
                index + 1,
                total,
                lesson.lesson_name
            );

            let summary = self.summarize_with_retry(index + 1, total, &results[index]).await;
            results[index].summarized_content = summary;

            progress.advance_step();
            self.publish(&progress);
        }

        progress.transition(RunStatus::Completed);
        self.publish(&progress);

        RunReport {
            lessons: results,
            failure: None,
        }
    }

    /// One estimate call for the whole run, with the fixed heuristic fallback.
    async fn estimate_run_time(&self, total_lessons: usize) -> f64 {
        // Two calls per lesson
        match self.flows.estimate(total_lessons * 2).await {
            Ok(seconds) => {
                info!("⏱️ estimated run time: {:.0}s for {} lessons", seconds, total_lessons);
                seconds
            }
            Err(e) => {
                let fallback = (total_lessons as u64 * 2 * self.seconds_per_call) as f64;
                warn!("estimate call failed ({}), falling back to {:.0}s", e, fallback);
                fallback
            }
        }
    }

    /// Retry summarization up to [`MAX_SUMMARY_ATTEMPTS`] times.
    ///
    /// An attempt fails when the call errors or the validator rejects the
    /// response. Exhausted attempts yield the retry placeholder; this phase
    /// never aborts the run.
    async fn summarize_with_retry(
        &self,
        lesson_num: usize,
        total: usize,
        lesson: &GeneratedLesson,
    ) -> String {
        let input = SummarizeInput {
            lesson_name: lesson.lesson_name.clone(),
            textual_content: lesson.markdown_content.clone(),
            slides: lesson.slides_content.clone(),
        };

        for attempt in 1..=MAX_SUMMARY_ATTEMPTS {
            match self.flows.summarize(&input).await {
                Ok(summary) if self.validator.accepts(&summary) => {
                    info!(
                        "[lesson {}/{}] ✓ summary accepted on attempt {}",
                        lesson_num, total, attempt
                    );
                    return summary;
                }
                Ok(_) => {
                    warn!(
                        "[lesson {}/{}] attempt {}/{}: response missing the format marker",
                        lesson_num, total, attempt, MAX_SUMMARY_ATTEMPTS
                    );
                }
                Err(e) => {
                    warn!(
                        "[lesson {}/{}] attempt {}/{}: summarize call failed: {}",
                        lesson_num, total, attempt, MAX_SUMMARY_ATTEMPTS, e
                    );
                }
            }
        }

        warn!(
            "[lesson {}/{}] ⚠️ all {} attempts failed, storing retry placeholder",
            lesson_num, total, MAX_SUMMARY_ATTEMPTS
        );
        SUMMARY_RETRY_PLACEHOLDER.to_string()
    }

    fn publish(&self, progress: &RunProgress) {
        // send_replace never fails, even with no subscribed renderer
        self.progress_tx.send_replace(progress.clone());
    }
}
