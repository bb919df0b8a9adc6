use thiserror::Error;

/// Top-level application error, one variant per failure domain.
#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed manual input, surfaced before a run starts
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
    /// Workbook parsing or writing failure
    #[error("spreadsheet error: {0}")]
    Spreadsheet(#[from] SpreadsheetError),
    /// AI call failed (network, quota, empty response)
    #[error("AI service error: {0}")]
    Service(#[from] ServiceError),
    /// AI response could not be parsed into the declared output shape
    #[error("schema violation: {0}")]
    Schema(#[from] SchemaViolation),
    /// Configuration error
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    /// Wrapper for third-party errors with no better home
    #[error("{0}")]
    Other(String),
}

/// Manual form input validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("lesson name must be at least {min} characters (got {len})")]
    NameTooShort { len: usize, min: usize },
    #[error("slides content must be at least {min} characters (got {len})")]
    SlidesTooShort { len: usize, min: usize },
    #[error("no lessons to process")]
    EmptyBatch,
}

/// Workbook input/output failures
#[derive(Debug, Error)]
pub enum SpreadsheetError {
    #[error("unsupported file type '{path}', expected a .xlsx workbook")]
    UnsupportedExtension { path: String },
    #[error("workbook contains no sheets")]
    NoSheets,
    #[error("sheet '{sheet}' is missing a required column: {column}")]
    MissingColumn { sheet: String, column: &'static str },
    #[error("failed to read workbook: {0}")]
    Read(#[from] calamine::XlsxError),
    #[error("failed to write workbook: {0}")]
    Write(#[from] rust_xlsxwriter::XlsxError),
    #[error("failed to open '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

/// Failures of the underlying model call
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("model call failed (model: {model}): {message}")]
    Api { model: String, message: String },
    #[error("model returned no choices (model: {model})")]
    EmptyResponse { model: String },
    #[error("model returned empty content (model: {model})")]
    EmptyContent { model: String },
}

/// The model answered, but not in the shape the template declared
#[derive(Debug, Error)]
pub enum SchemaViolation {
    #[error("{flow} flow returned empty output")]
    EmptyOutput { flow: &'static str },
    #[error("{flow} flow returned no parsable number: '{snippet}'")]
    NotANumber { flow: &'static str, snippet: String },
}

/// Environment configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("required environment variable {var} is not set")]
    EnvVarNotFound { var: &'static str },
    #[error("environment variable {var} has unparsable value '{value}'")]
    EnvVarParseFailed { var: &'static str, value: String },
}

/// Application result type
pub type AppResult<T> = Result<T, AppError>;
