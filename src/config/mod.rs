pub mod action;
#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

pub use action::ActionConfig;
