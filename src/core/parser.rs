use crate::core::language::language_for_path;
use crate::domain::model::{Language, TodoComment};
use crate::utils::error::Result;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

static TODO_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"TODO:(.+)").unwrap());
static LABELS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"Labels:(.+)").unwrap());
static ISSUE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"Issue:(.+)").unwrap());

/// Reads `path` and extracts its TODO blocks. Unsupported file types yield nothing.
pub fn parse_todo_comments<P: AsRef<Path>>(path: P) -> Result<Vec<TodoComment>> {
    let path = path.as_ref();
    let Some(language) = language_for_path(path) else {
        return Ok(Vec::new());
    };

    let bytes = std::fs::read(path)?;
    let content = String::from_utf8_lossy(&bytes);
    Ok(parse_source(&content, &path.to_string_lossy(), language))
}

/// Line-based state machine over `content`.
///
/// A block starts at a comment line matching `TODO:` and runs until the first
/// non-comment line (blank lines included). `Issue:` and `Labels:` lines inside
/// a block are directives; other non-empty comment text becomes description.
pub fn parse_source(content: &str, file_path: &str, language: &Language) -> Vec<TodoComment> {
    let mut comments = Vec::new();
    let mut current: Option<TodoComment> = None;
    let mut in_block = false;

    for (index, line) in content.lines().enumerate() {
        let trimmed = line.trim();

        if let Some(start) = language.block_start() {
            if trimmed.contains(start) {
                in_block = true;
            }
        }
        if let Some(end) = language.block_end() {
            if trimmed.contains(end) {
                in_block = false;
                continue;
            }
        }

        let comment_text = match language.line_comment {
            Some(marker) if trimmed.starts_with(marker) => Some(trimmed[marker.len()..].trim()),
            _ if in_block => Some(trimmed),
            _ => None,
        };

        let Some(text) = comment_text else {
            if let Some(done) = current.take() {
                comments.push(done);
            }
            continue;
        };

        if let Some(caps) = TODO_RE.captures(text) {
            if let Some(done) = current.take() {
                comments.push(done);
            }
            current = Some(TodoComment::new(file_path, index + 1, caps[1].trim()));
            continue;
        }

        let Some(comment) = current.as_mut() else {
            continue;
        };

        if let Some(caps) = ISSUE_RE.captures(text) {
            comment.issue_url = Some(caps[1].trim().to_string());
        } else if let Some(caps) = LABELS_RE.captures(text) {
            comment.labels = split_labels(&caps[1]);
        } else if !text.is_empty() {
            comment.description.push(text.to_string());
        }
    }

    if let Some(done) = current {
        comments.push(done);
    }

    comments
}

fn split_labels(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .map(String::from)
        .collect()
}

pub fn filter_unprocessed(comments: Vec<TodoComment>) -> Vec<TodoComment> {
    comments
        .into_iter()
        .filter(|comment| !comment.is_processed())
        .collect()
}
