use crate::domain::model::{NewIssue, TodoComment};

pub fn issue_title(comment: &TodoComment, prefix: Option<&str>) -> String {
    match prefix.map(str::trim).filter(|p| !p.is_empty()) {
        Some(prefix) => format!("{} {}", prefix, comment.title),
        None => comment.title.clone(),
    }
}

pub fn issue_body(comment: &TodoComment) -> String {
    format!(
        "Created from TODO comment in `{}` (line {}):\n\n{}",
        comment.file_path,
        comment.line_number,
        comment.description.join("\n")
    )
}

pub fn new_issue(comment: &TodoComment, prefix: Option<&str>) -> NewIssue {
    NewIssue {
        title: issue_title(comment, prefix),
        body: issue_body(comment),
        labels: comment.labels.clone(),
    }
}
