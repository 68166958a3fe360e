pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliArgs;

pub use adapters::github::{GitHubClient, RepoSlug};
pub use config::{toml_config::TomlConfig, ActionConfig};
pub use core::action::PddAction;
pub use domain::model::{RunSummary, TodoComment};
pub use utils::error::{PddError, Result};
