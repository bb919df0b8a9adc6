//! # HVscribe
//!
//! Batch lesson scribing: turns slide scripts into long-form markdown lessons
//! and Unstop-format summaries through two sequential AI calls per lesson.
//!
//! ## Architecture
//!
//! Layered, bottom up:
//!
//! - `models` - lesson inputs and generated results
//! - `prompts` - the three static prompt templates and their sentinel
//! - `clients` - chat client over an OpenAI-compatible endpoint
//! - `flows` - typed template adapters with output-shape validation
//! - `spreadsheet` - workbook parsing and four-column result export
//! - `workflow` - the run state machine and the two-phase pipeline
//! - `presentation` - terminal status rendering
//! - `orchestrator` - application wiring and the run entry point

pub mod clients;
pub mod config;
pub mod error;
pub mod flows;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod presentation;
pub mod prompts;
pub mod spreadsheet;
pub mod workflow;

pub use clients::LlmClient;
pub use config::Config;
pub use error::{AppError, AppResult};
pub use flows::{FlowRunner, LessonFlows};
pub use models::{GeneratedLesson, LessonInput};
pub use orchestrator::App;
pub use workflow::{LessonPipeline, ResponseValidator, RunProgress, RunStatus, SentinelValidator};
