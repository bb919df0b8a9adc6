use crate::error::{AppResult, ConfigError};

/// Application configuration, sourced from the environment.
#[derive(Clone, Debug)]
pub struct Config {
    /// OpenAI-compatible API base URL
    pub api_base_url: String,
    /// API key, required (never defaulted)
    pub api_key: String,
    /// Model used for all three flows
    pub model_name: String,
    /// Input workbook path (optional; manual lesson fields used otherwise)
    pub input_file: Option<String>,
    /// Output workbook path
    pub output_file: String,
    /// Manual lesson name (used when no input file is given)
    pub lesson_name: Option<String>,
    /// Manual slides content (used when no input file is given)
    pub slides_content: Option<String>,
    /// Rough per-call duration used by the estimate fallback
    pub seconds_per_call: u64,
    /// Emit per-lesson response previews
    pub verbose_logging: bool,
}

impl Config {
    pub const DEFAULT_OUTPUT_FILE: &'static str = "HVscribe_lessons.xlsx";

    /// Load configuration from environment variables.
    ///
    /// Everything has a sane default except `HVSCRIBE_API_KEY`, which must be set.
    pub fn from_env() -> AppResult<Self> {
        let api_key = std::env::var("HVSCRIBE_API_KEY")
            .map_err(|_| ConfigError::EnvVarNotFound { var: "HVSCRIBE_API_KEY" })?;

        Ok(Self {
            api_base_url: std::env::var("HVSCRIBE_API_BASE_URL").unwrap_or_else(|_| {
                "https://generativelanguage.googleapis.com/v1beta/openai".to_string()
            }),
            api_key,
            model_name: std::env::var("HVSCRIBE_MODEL_NAME")
                .unwrap_or_else(|_| "gemini-2.0-flash-lite".to_string()),
            input_file: std::env::var("HVSCRIBE_INPUT_FILE").ok(),
            output_file: std::env::var("HVSCRIBE_OUTPUT_FILE")
                .unwrap_or_else(|_| Self::DEFAULT_OUTPUT_FILE.to_string()),
            lesson_name: std::env::var("HVSCRIBE_LESSON_NAME").ok(),
            slides_content: std::env::var("HVSCRIBE_SLIDES_CONTENT").ok(),
            seconds_per_call: parse_env_or("HVSCRIBE_SECONDS_PER_CALL", 10)?,
            verbose_logging: parse_env_or("HVSCRIBE_VERBOSE_LOGGING", false)?,
        })
    }
}

fn parse_env_or<T: std::str::FromStr>(var: &'static str, default: T) -> AppResult<T> {
    match std::env::var(var) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| ConfigError::EnvVarParseFailed { var, value: raw }.into()),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_env_or_uses_default_when_unset() {
        assert_eq!(parse_env_or("HVSCRIBE_TEST_NOT_SET", 10u64).unwrap(), 10);
    }
}
