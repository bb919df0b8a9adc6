//! Typed adapters over the three prompt templates.
//!
//! Each flow renders its template, makes exactly one model call through
//! [`LlmClient`], and validates the response against the template's declared
//! output shape. A response that cannot be coerced into that shape is a
//! [`SchemaViolation`]; transport failures surface as `ServiceError` from the
//! client. Retry policy lives in the pipeline, not here.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::clients::LlmClient;
use crate::error::{AppResult, SchemaViolation};
use crate::models::LessonInput;
use crate::prompts;

/// Input contract of the summarize template.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummarizeInput {
    pub lesson_name: String,
    /// Phase-1 markdown output
    pub textual_content: String,
    /// Original slide text
    pub slides: String,
}

/// Output contract of the estimate template.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EstimateOutput {
    estimated_time_seconds: f64,
}

/// The seam between the pipeline and the model service.
///
/// The production implementation is [`FlowRunner`]; tests substitute stubs.
#[allow(async_fn_in_trait)]
pub trait LessonFlows {
    /// Phase 1: long-form markdown lesson content.
    async fn generate(&self, input: &LessonInput) -> AppResult<String>;

    /// Phase 2: one reformatting attempt (the caller owns the retry loop).
    async fn summarize(&self, input: &SummarizeInput) -> AppResult<String>;

    /// Estimated processing time in seconds for the given number of calls.
    async fn estimate(&self, number_of_calls: usize) -> AppResult<f64>;
}

/// Production flow runner backed by an injected [`LlmClient`].
pub struct FlowRunner {
    client: LlmClient,
}

impl FlowRunner {
    pub fn new(client: LlmClient) -> Self {
        Self { client }
    }
}

impl LessonFlows for FlowRunner {
    async fn generate(&self, input: &LessonInput) -> AppResult<String> {
        let prompt = prompts::render_generate(&input.lesson_name, &input.slides_content);
        let response = self
            .client
            .chat(&prompt, Some(prompts::GENERATE_SYSTEM), 0.6, 65_536)
            .await?;

        let markdown = strip_code_fence(&response);
        if markdown.is_empty() {
            return Err(SchemaViolation::EmptyOutput { flow: "generate" }.into());
        }

        debug!("generated {} chars for '{}'", markdown.len(), input.lesson_name);
        Ok(markdown)
    }

    async fn summarize(&self, input: &SummarizeInput) -> AppResult<String> {
        let json_data = serde_json::to_string(input)
            .map_err(|e| crate::error::AppError::Other(e.to_string()))?;
        let prompt = prompts::render_summarize(&json_data);
        let response = self
            .client
            .chat(&prompt, Some(prompts::SUMMARIZE_SYSTEM), 0.1, 65_536)
            .await?;

        let summary = strip_code_fence(&response);
        if summary.is_empty() {
            return Err(SchemaViolation::EmptyOutput { flow: "summarize" }.into());
        }

        Ok(summary)
    }

    async fn estimate(&self, number_of_calls: usize) -> AppResult<f64> {
        let prompt = prompts::render_estimate(number_of_calls);
        let response = self.client.chat(&prompt, None, 0.0, 256).await?;

        let seconds = parse_estimate(&response)?;
        debug!("model estimated {} seconds for {} calls", seconds, number_of_calls);
        Ok(seconds)
    }
}

/// Strip a surrounding markdown code fence, if the model added one.
fn strip_code_fence(response: &str) -> String {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    let fence = FENCE.get_or_init(|| {
        Regex::new(r"(?s)^```[a-zA-Z]*\s*\n?(.*?)\n?```$").expect("fence regex")
    });

    let trimmed = response.trim();
    match fence.captures(trimmed) {
        Some(caps) => caps[1].trim().to_string(),
        None => trimmed.to_string(),
    }
}

/// Coerce the estimate response into a number of seconds.
///
/// Accepts the declared `{"estimatedTimeSeconds": n}` shape, a bare number,
/// or (leniently) the first number found in the text.
fn parse_estimate(response: &str) -> Result<f64, SchemaViolation> {
    let cleaned = strip_code_fence(response);

    if let Ok(output) = serde_json::from_str::<EstimateOutput>(&cleaned) {
        return Ok(output.estimated_time_seconds);
    }

    if let Ok(seconds) = cleaned.trim().parse::<f64>() {
        return Ok(seconds);
    }

    static NUMBER: OnceLock<Regex> = OnceLock::new();
    let number = NUMBER.get_or_init(|| Regex::new(r"[-+]?\d+(?:\.\d+)?").expect("number regex"));
    if let Some(m) = number.find(&cleaned) {
        if let Ok(seconds) = m.as_str().parse::<f64>() {
            return Ok(seconds);
        }
    }

    Err(SchemaViolation::NotANumber {
        flow: "estimate",
        snippet: cleaned.chars().take(80).collect(),
    })
}
