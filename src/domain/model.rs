use serde::{Deserialize, Serialize};

/// A TODO block found in a source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoComment {
    /// Path relative to the scanned root, `/`-separated.
    pub file_path: String,
    /// 1-based line of the `TODO:` marker.
    pub line_number: usize,
    pub title: String,
    pub description: Vec<String>,
    pub labels: Vec<String>,
    pub issue_url: Option<String>,
}

impl TodoComment {
    pub fn new(file_path: impl Into<String>, line_number: usize, title: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            line_number,
            title: title.into(),
            description: Vec::new(),
            labels: Vec::new(),
            issue_url: None,
        }
    }

    pub fn is_processed(&self) -> bool {
        self.issue_url.is_some()
    }
}

/// Comment syntax for a family of file extensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Language {
    pub extensions: &'static [&'static str],
    pub line_comment: Option<&'static str>,
    pub block_comment: Option<(&'static str, &'static str)>,
}

impl Language {
    pub fn block_start(&self) -> Option<&'static str> {
        self.block_comment.map(|(start, _)| start)
    }

    pub fn block_end(&self) -> Option<&'static str> {
        self.block_comment.map(|(_, end)| end)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewIssue {
    pub title: String,
    pub body: String,
    pub labels: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreatedIssue {
    pub number: u64,
    pub html_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequest {
    pub number: u64,
    pub merged: bool,
    pub base_ref: String,
    pub head_ref: String,
}

/// A file fetched from the repository, already decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoFile {
    pub path: String,
    pub content: String,
    pub sha: String,
}

/// Workflow events the action knows how to handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    PullRequest,
    WorkflowDispatch,
}

impl EventKind {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "pull_request" => Some(Self::PullRequest),
            "workflow_dispatch" => Some(Self::WorkflowDispatch),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PullRequest => "pull_request",
            Self::WorkflowDispatch => "workflow_dispatch",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub scanned: usize,
    pub unprocessed: usize,
    pub created: Vec<TodoComment>,
    pub updated_files: usize,
    pub failed_updates: usize,
    pub skipped_reason: Option<String>,
}

impl RunSummary {
    pub fn skipped(reason: impl Into<String>) -> Self {
        Self {
            skipped_reason: Some(reason.into()),
            ..Self::default()
        }
    }

    pub fn is_skipped(&self) -> bool {
        self.skipped_reason.is_some()
    }
}
