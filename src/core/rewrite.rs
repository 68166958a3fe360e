use crate::domain::model::Language;
use crate::utils::error::{PddError, Result};

/// Inserts an `Issue: <url>` comment right after the TODO marker at `line_number`.
///
/// Returns `Ok(None)` when the line below the marker already links an issue.
pub fn insert_issue_line(
    content: &str,
    path: &str,
    line_number: usize,
    language: &Language,
    url: &str,
) -> Result<Option<String>> {
    let mut lines: Vec<&str> = content.split('\n').collect();
    if line_number == 0 || line_number > lines.len() {
        return Err(PddError::LineOutOfRangeError {
            path: path.to_string(),
            line: line_number,
        });
    }

    let todo_line = lines[line_number - 1];
    if lines
        .get(line_number)
        .is_some_and(|next| next.contains("Issue:"))
    {
        return Ok(None);
    }

    let indent = &todo_line[..todo_line.len() - todo_line.trim_start().len()];
    let eol = if todo_line.ends_with('\r') { "\r" } else { "" };
    let todo_text = todo_line.trim_end_matches('\r');
    let mut issue_line = match (language.line_comment, language.block_comment) {
        (Some(marker), _) => format!("{}{} Issue: {}", indent, marker, url),
        // Scans never yield a TODO on the closing line of a block; direct callers can.
        (None, Some((start, end))) if todo_text.ends_with(end) => {
            format!("{}{} Issue: {} {}", indent, start, url, end)
        }
        (None, _) => format!("{}Issue: {}", indent, url),
    };
    issue_line.push_str(eol);

    lines.insert(line_number, issue_line.as_str());
    Ok(Some(lines.join("\n")))
}

/// Applies several `(line_number, url)` links to one file.
///
/// Line numbers refer to `content` as scanned. Links are inserted bottom-up so
/// earlier insertions never shift the markers still to be linked. Returns
/// `Ok(None)` when every marker was already linked.
pub fn insert_issue_lines(
    content: &str,
    path: &str,
    language: &Language,
    links: &[(usize, &str)],
) -> Result<Option<String>> {
    let mut ordered = links.to_vec();
    ordered.sort_by(|a, b| b.0.cmp(&a.0));

    let mut current = content.to_string();
    let mut changed = false;
    for (line_number, url) in ordered {
        if let Some(updated) = insert_issue_line(&current, path, line_number, language, url)? {
            current = updated;
            changed = true;
        }
    }

    Ok(changed.then_some(current))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::language::language_for_path;

    #[test]
    fn test_insert_after_todo_keeps_indent() {
        let content = "func x() {\n\t// TODO: Task\n\t// Labels: bug\n}\n";
        let go = language_for_path("x.go").unwrap();

        let updated = insert_issue_line(content, "x.go", 2, go, "https://gh/o/r/issues/1")
            .unwrap()
            .unwrap();

        assert_eq!(
            updated,
            "func x() {\n\t// TODO: Task\n\t// Issue: https://gh/o/r/issues/1\n\t// Labels: bug\n}\n"
        );
    }

    #[test]
    fn test_python_marker() {
        let content = "    # TODO: Add type hints\n    # Labels: enhancement";
        let python = language_for_path("sample.py").unwrap();

        let updated = insert_issue_line(content, "sample.py", 1, python, "U")
            .unwrap()
            .unwrap();
        assert_eq!(
            updated,
            "    # TODO: Add type hints\n    # Issue: U\n    # Labels: enhancement"
        );
    }

    #[test]
    fn test_already_linked_is_noop() {
        let content = "// TODO: Task\n// Issue: https://gh/o/r/issues/1\n";
        let go = language_for_path("x.go").unwrap();

        assert_eq!(insert_issue_line(content, "x.go", 1, go, "other").unwrap(), None);
    }

    #[test]
    fn test_out_of_range() {
        let go = language_for_path("x.go").unwrap();
        let err = insert_issue_line("// TODO: a", "x.go", 5, go, "u").unwrap_err();
        assert!(matches!(err, PddError::LineOutOfRangeError { line: 5, .. }));
        assert!(insert_issue_line("// TODO: a", "x.go", 0, go, "u").is_err());
    }

    #[test]
    fn test_multiple_links_in_one_file() {
        let content = "def f():\n    # TODO: First\n    # one\n\n    # TODO: Second\n    # two\n    return 1\n";
        let python = language_for_path("f.py").unwrap();

        let updated = insert_issue_lines(content, "f.py", python, &[(2, "U1"), (5, "U2")])
            .unwrap()
            .unwrap();

        assert_eq!(
            updated,
            "def f():\n    # TODO: First\n    # Issue: U1\n    # one\n\n    # TODO: Second\n    # Issue: U2\n    # two\n    return 1\n"
        );
    }

    #[test]
    fn test_multiple_links_skip_already_linked() {
        let content = "// TODO: A\n// Issue: old\n\n// TODO: B\n";
        let go = language_for_path("x.go").unwrap();

        let updated = insert_issue_lines(content, "x.go", go, &[(4, "new"), (1, "dup")])
            .unwrap()
            .unwrap();
        assert_eq!(updated, "// TODO: A\n// Issue: old\n\n// TODO: B\n// Issue: new\n");

        assert_eq!(
            insert_issue_lines(content, "x.go", go, &[(1, "dup")]).unwrap(),
            None
        );
    }

    #[test]
    fn test_crlf_line_endings_are_kept() {
        let content = "# TODO: Task\r\nprint(1)\r\n";
        let python = language_for_path("x.py").unwrap();

        let updated = insert_issue_line(content, "x.py", 1, python, "U")
            .unwrap()
            .unwrap();
        assert_eq!(updated, "# TODO: Task\r\n# Issue: U\r\nprint(1)\r\n");
    }

    #[test]
    fn test_block_only_languages() {
        let html = language_for_path("index.html").unwrap();

        let single = "<!-- TODO: Fix nav -->\n<nav></nav>";
        let updated = insert_issue_line(single, "index.html", 1, html, "U")
            .unwrap()
            .unwrap();
        assert_eq!(
            updated,
            "<!-- TODO: Fix nav -->\n<!-- Issue: U -->\n<nav></nav>"
        );

        let multi = "<!--\n  TODO: Fix nav\n-->";
        let updated = insert_issue_line(multi, "index.html", 2, html, "U")
            .unwrap()
            .unwrap();
        assert_eq!(updated, "<!--\n  TODO: Fix nav\n  Issue: U\n-->");
    }
}
