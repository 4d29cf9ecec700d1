use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ViolationError {
    #[error("Category name must not be empty")]
    EmptyCategoryName,

    #[error("Category name must not have surrounding whitespace: '{name}'")]
    PaddedCategoryName { name: String },

    #[error("Category '{category}' has no patterns")]
    EmptyPatterns { category: String },

    #[error("Category '{category}' contains an empty pattern")]
    EmptyPattern { category: String },

    #[error("Invalid pattern in '{category}': {pattern} ({message})")]
    InvalidPattern {
        category: String,
        pattern: String,
        message: String,
    },

    #[error("Category already exists: {name}")]
    CategoryAlreadyExists { name: String },

    #[error("Category not found: {name}")]
    CategoryNotFound { name: String },

    #[error("Matcher '{strategy}' failed on category '{category}': {message}")]
    MatchExecution {
        strategy: String,
        category: String,
        message: String,
    },

    #[error("Unsupported rule-set format: {path} (expected .toml or .json)")]
    UnsupportedFormat { path: PathBuf },

    #[error("Failed to parse rule-set file {path}: {message}")]
    PersistenceParse { path: PathBuf, message: String },

    #[error("Failed to parse config file {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    #[error("Unknown config key: {key}")]
    ConfigKeyNotFound { key: String },

    #[error("Invalid value for {key}: {message}")]
    ConfigInvalidValue { key: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Home directory not found")]
    HomeNotFound,
}

pub type Result<T> = std::result::Result<T, ViolationError>;

/// Coarse failure class, for callers that render success/failure results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    MatchExecution,
    Persistence,
    Config,
}

impl ViolationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyCategoryName
            | Self::PaddedCategoryName { .. }
            | Self::EmptyPatterns { .. }
            | Self::EmptyPattern { .. }
            | Self::InvalidPattern { .. }
            | Self::CategoryAlreadyExists { .. } => ErrorKind::Validation,
            Self::CategoryNotFound { .. } => ErrorKind::NotFound,
            Self::MatchExecution { .. } => ErrorKind::MatchExecution,
            Self::UnsupportedFormat { .. }
            | Self::PersistenceParse { .. }
            | Self::Io(_)
            | Self::TomlSer(_)
            | Self::TomlDe(_)
            | Self::Json(_) => ErrorKind::Persistence,
            Self::ConfigParse { .. }
            | Self::ConfigKeyNotFound { .. }
            | Self::ConfigInvalidValue { .. }
            | Self::HomeNotFound => ErrorKind::Config,
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self.kind() {
            ErrorKind::NotFound => 2,
            ErrorKind::Validation => 3,
            ErrorKind::Persistence => 4,
            ErrorKind::Config => 5,
            ErrorKind::MatchExecution => 1,
        }
    }
}
