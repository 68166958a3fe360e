use thiserror::Error;

#[derive(Error, Debug)]
pub enum PddError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Directory walk failed: {0}")]
    ScanError(#[from] walkdir::Error),

    #[error("Failed to decode {what}: {reason}")]
    DecodeError { what: String, reason: String },

    #[error("GitHub API error ({status}) on {endpoint}: {message}")]
    GitHubApiError {
        status: u16,
        endpoint: String,
        message: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported event '{event}': only pull_request and workflow_dispatch are handled")]
    UnsupportedEventError { event: String },

    #[error("Invalid GITHUB_REF format: {git_ref}")]
    InvalidRefError { git_ref: String },

    #[error("Unsupported file type: {path}")]
    UnsupportedFileError { path: String },

    #[error("Line number {line} is out of range for file {path}")]
    LineOutOfRangeError { path: String, line: usize },

    #[error("Failed to create issue for comment in {path} (line {line}): {source}")]
    IssueCreationError {
        path: String,
        line: usize,
        #[source]
        source: Box<PddError>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Network,
    Remote,
    Filesystem,
    Parsing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl PddError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::UnsupportedEventError { .. }
            | Self::InvalidRefError { .. } => ErrorCategory::Configuration,
            Self::HttpError(_) => ErrorCategory::Network,
            Self::GitHubApiError { .. } => ErrorCategory::Remote,
            Self::IssueCreationError { source, .. } => source.category(),
            Self::IoError(_) | Self::ScanError(_) => ErrorCategory::Filesystem,
            Self::DecodeError { .. }
            | Self::UnsupportedFileError { .. }
            | Self::LineOutOfRangeError { .. } => ErrorCategory::Parsing,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnsupportedFileError { .. } | Self::LineOutOfRangeError { .. } => {
                ErrorSeverity::Low
            }
            Self::HttpError(_) => ErrorSeverity::Medium,
            Self::GitHubApiError { status, .. } if *status == 429 || *status >= 500 => {
                ErrorSeverity::Medium
            }
            Self::IssueCreationError { source, .. } => source.severity(),
            Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::UnsupportedEventError { .. }
            | Self::InvalidRefError { .. } => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::MissingConfigError { .. } => {
                "Set the missing action input or the matching PDD_* environment variable"
            }
            Self::InvalidConfigValueError { .. } => "Check the action inputs and pdd.toml values",
            Self::UnsupportedEventError { .. } => {
                "Trigger the workflow on pull_request (closed) or workflow_dispatch"
            }
            Self::InvalidRefError { .. } => "GITHUB_REF should look like refs/pull/<number>/merge",
            Self::HttpError(_) => "Check network access to the GitHub API and retry",
            Self::GitHubApiError { status: 401, .. } | Self::GitHubApiError { status: 403, .. } => {
                "Make sure the token has issues:write and contents:write permissions"
            }
            Self::GitHubApiError { status: 404, .. } => {
                "Check the repository name, branch and file path"
            }
            Self::GitHubApiError { .. } => "Retry later; GitHub may be rate limiting",
            Self::IssueCreationError { source, .. } => source.recovery_suggestion(),
            Self::IoError(_) | Self::ScanError(_) => {
                "Check that the workspace exists and is readable"
            }
            Self::LineOutOfRangeError { .. } => {
                "The file changed on the branch since it was scanned; rerun the action"
            }
            _ => "Rerun with --verbose for details",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Network => format!("Could not reach GitHub: {}", self),
            ErrorCategory::Remote => format!("GitHub rejected the request: {}", self),
            ErrorCategory::Filesystem => format!("Workspace problem: {}", self),
            ErrorCategory::Parsing => format!("Could not process a source file: {}", self),
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, PddError>;
