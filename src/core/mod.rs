pub mod action;
pub mod issue;
pub mod language;
pub mod parser;
pub mod rewrite;
pub mod scanner;

pub use crate::domain::model::{Language, RunSummary, TodoComment};
pub use crate::domain::ports::{ConfigProvider, IssueTracker};
pub use crate::utils::error::Result;
