//! Application orchestrator.
//!
//! Resolves the lesson source (workbook or manual entry), runs the pipeline
//! with a live progress renderer, exports the results, and maps a fatal run
//! failure to a process-level error.

use tokio::sync::watch;
use tracing::{info, warn};

use crate::clients::LlmClient;
use crate::config::Config;
use crate::error::{AppResult, ConfigError, ValidationError};
use crate::flows::FlowRunner;
use crate::models::LessonInput;
use crate::presentation;
use crate::spreadsheet;
use crate::workflow::{LessonPipeline, RunProgress};

pub struct App {
    config: Config,
    lessons: Vec<LessonInput>,
    source: String,
}

impl App {
    /// Resolve and validate the lesson source before any model call.
    ///
    /// A CLI argument takes precedence over `HVSCRIBE_INPUT_FILE`; with no
    /// workbook the manual-entry variables must supply a single lesson.
    pub fn initialize(config: Config, input_override: Option<String>) -> AppResult<Self> {
        let input_file = input_override.or_else(|| config.input_file.clone());

        let (lessons, source) = match input_file {
            Some(path) => {
                let lessons = spreadsheet::parse(&path)?;
                (lessons, path)
            }
            None => match (&config.lesson_name, &config.slides_content) {
                (Some(name), Some(slides)) => {
                    let lesson = LessonInput::from_manual(name.clone(), slides.clone())?;
                    (vec![lesson], "manual entry".to_string())
                }
                _ => {
                    return Err(ConfigError::EnvVarNotFound {
                        var: "HVSCRIBE_INPUT_FILE",
                    }
                    .into())
                }
            },
        };

        if lessons.is_empty() {
            return Err(ValidationError::EmptyBatch.into());
        }

        Ok(Self {
            config,
            lessons,
            source,
        })
    }

    /// Execute one full run: pipeline, export, final stats.
    pub async fn run(&self) -> AppResult<()> {
        presentation::log_startup(&self.source, self.lessons.len());

        let client = LlmClient::new(&self.config);
        let flows = FlowRunner::new(client);

        let (progress_tx, progress_rx) = watch::channel(RunProgress::idle());
        let pipeline = LessonPipeline::new(flows, progress_tx, self.config.seconds_per_call);

        let renderer = tokio::spawn(presentation::render_progress(progress_rx));
        let report = pipeline.run(&self.lessons).await;
        // Dropping the pipeline closes the channel, so the renderer always exits
        drop(pipeline);
        if let Err(e) = renderer.await {
            warn!("progress renderer task failed: {}", e);
        }

        // Completed lessons are exported even when the run aborted mid-batch
        if !report.lessons.is_empty() {
            spreadsheet::write(&report.lessons, &self.config.output_file)?;
        }

        if self.config.verbose_logging {
            for lesson in &report.lessons {
                info!(
                    "📝 {}: {}",
                    lesson.lesson_name,
                    presentation::truncate_text(&lesson.summarized_content, 80)
                );
            }
        }

        presentation::print_final_stats(&report, &self.config.output_file);

        match report.failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
