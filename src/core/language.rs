use crate::domain::model::Language;
use std::path::Path;

const C_BLOCK: Option<(&str, &str)> = Some(("/*", "*/"));

pub static SUPPORTED_LANGUAGES: &[Language] = &[
    Language {
        extensions: &[".go"],
        line_comment: Some("//"),
        block_comment: None,
    },
    Language {
        extensions: &[
            ".java", ".js", ".ts", ".jsx", ".tsx", ".c", ".cpp", ".cs", ".h", ".hpp", ".swift",
            ".kt", ".rs", ".php", ".scala", ".groovy",
        ],
        line_comment: Some("//"),
        block_comment: C_BLOCK,
    },
    Language {
        extensions: &[".py", ".rb", ".pl", ".r", ".sh", ".bash"],
        line_comment: Some("#"),
        block_comment: None,
    },
    Language {
        extensions: &[".lua"],
        line_comment: Some("--"),
        block_comment: None,
    },
    Language {
        extensions: &[".sql"],
        line_comment: Some("--"),
        block_comment: C_BLOCK,
    },
    Language {
        extensions: &[".html", ".xml"],
        line_comment: None,
        block_comment: Some(("<!--", "-->")),
    },
    Language {
        extensions: &[".css"],
        line_comment: None,
        block_comment: C_BLOCK,
    },
    Language {
        extensions: &[".ex", ".exs"],
        line_comment: Some("#"),
        block_comment: None,
    },
    Language {
        extensions: &[".erl", ".hrl"],
        line_comment: Some("%"),
        block_comment: None,
    },
    Language {
        extensions: &[".hs"],
        line_comment: Some("--"),
        block_comment: Some(("{-", "-}")),
    },
    Language {
        extensions: &[".ps1"],
        line_comment: Some("#"),
        block_comment: None,
    },
    Language {
        extensions: &[".fs"],
        line_comment: Some("//"),
        block_comment: Some(("(*", "*)")),
    },
    Language {
        extensions: &[".m"],
        line_comment: Some("//"),
        block_comment: C_BLOCK,
    },
    Language {
        extensions: &[".md", ".markdown"],
        line_comment: Some("//"),
        block_comment: None,
    },
];

/// Looks up comment syntax by extension. Matching is case-sensitive.
pub fn language_for_path<P: AsRef<Path>>(path: P) -> Option<&'static Language> {
    let ext = path.as_ref().extension()?.to_str()?;
    let dotted = format!(".{}", ext);
    SUPPORTED_LANGUAGES
        .iter()
        .find(|lang| lang.extensions.iter().any(|known| *known == dotted))
}
