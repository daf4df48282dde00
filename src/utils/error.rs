use thiserror::Error;

#[derive(Error, Debug)]
pub enum SiteError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Content parse error in {path}: {message}")]
    ParseError { path: String, message: String },

    #[error("Slug '{slug}' is produced by both {first} and {second}")]
    SlugCollision {
        slug: String,
        first: String,
        second: String,
    },

    #[error("Metadata of '{slug}' does not match schema: {message}")]
    SchemaError { slug: String, message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Request has no Host header")]
    MissingHostHeader,

    #[error("Server error: {message}")]
    ServerError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Content,
    Configuration,
    Request,
    System,
}

impl SiteError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SiteError::ParseError { .. }
            | SiteError::SlugCollision { .. }
            | SiteError::SchemaError { .. } => ErrorCategory::Content,
            SiteError::ConfigError { .. }
            | SiteError::ConfigValidationError { .. }
            | SiteError::InvalidConfigValueError { .. }
            | SiteError::MissingConfigError { .. } => ErrorCategory::Configuration,
            SiteError::MissingHostHeader => ErrorCategory::Request,
            SiteError::IoError(_)
            | SiteError::SerializationError(_)
            | SiteError::ServerError { .. } => ErrorCategory::System,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            SiteError::ParseError { .. } => {
                "Make sure the file starts with a '---' header block and closes it with another '---' line"
            }
            SiteError::SlugCollision { .. } => {
                "Rename or remove one of the files so every slug is produced by a single file"
            }
            SiteError::SchemaError { .. } => {
                "Add the missing header fields to the content file"
            }
            SiteError::ConfigError { .. }
            | SiteError::ConfigValidationError { .. }
            | SiteError::InvalidConfigValueError { .. }
            | SiteError::MissingConfigError { .. } => {
                "Check the site configuration file against the documented sections"
            }
            SiteError::MissingHostHeader => "Send the request with a Host header",
            SiteError::IoError(_) => "Check that the content directories exist and are readable",
            SiteError::SerializationError(_) | SiteError::ServerError { .. } => {
                "Re-run with --verbose and inspect the logs"
            }
        }
    }

    /// 依錯誤類別決定 CLI 結束碼
    pub fn exit_code(&self) -> i32 {
        match self.category() {
            ErrorCategory::Content => 2,
            ErrorCategory::Configuration => 1,
            ErrorCategory::Request => 4,
            ErrorCategory::System => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, SiteError>;
