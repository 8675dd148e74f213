//! Error types for every fallible operation in the crate.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Structural problems that abort a spreadsheet parse.
///
/// Row-level problems never surface here; they are reported as
/// [`SkippedRow`](crate::data::SkippedRow) entries instead.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Could not read the spreadsheet: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("The Excel file contains no sheets.")]
    EmptyWorkbook,

    #[error("The Excel file is empty or has no data rows.")]
    NoDataRows,

    #[error("Excel file is missing required headers: {}", .0.join(", "))]
    MissingHeaders(Vec<String>),
}

/// Failures of the AI question generator.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Number of questions must be between 1 and {max}, got {requested}")]
    InvalidCount { requested: usize, max: usize },

    #[error("{0} environment variable not set")]
    MissingApiKey(String),

    #[error("Question generation request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Question generation service returned HTTP {status}: {message}")]
    Service { status: u16, message: String },

    #[error("AI response did not match the expected format: {0}")]
    Malformed(String),

    #[error("AI response contained no usable questions")]
    NoUsableQuestions,
}

/// Misuse of a test session.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("No test has been configured yet")]
    NotConfigured,

    #[error("The test is not in progress")]
    NotInProgress,

    #[error("Option {0} does not exist; questions have 4 options")]
    OptionOutOfRange(usize),
}

/// Invariant violations when building a question or test configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidTest {
    #[error("Correct answer index {0} is out of range; expected 0-3")]
    AnswerOutOfRange(usize),

    #[error("A test needs at least one question")]
    NoQuestions,

    #[error("Time limit must be greater than zero.")]
    ZeroTimeLimit,
}

/// Persistence store failures.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to access store entry {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to serialize test configuration: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Failures loading a JSON question bank.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{0} must contain at least one valid question")]
    Empty(PathBuf),
}

/// Failures loading [`Settings`](crate::config::Settings).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Wrong tutor secret.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid secret code. Please try again.")]
pub struct AuthError;

/// Top-level error for running the application.
#[derive(Debug, Error)]
pub enum QuizError {
    #[error("Failed to load settings: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to load questions: {0}")]
    Parse(#[from] ParseError),

    #[error("Failed to load questions: {0}")]
    Load(#[from] LoadError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Invalid(#[from] InvalidTest),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}
