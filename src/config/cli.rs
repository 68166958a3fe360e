use crate::config::action::ActionConfig;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "pdd-action")]
#[command(about = "Turn TODO comments into GitHub issues and link them back into the code")]
pub struct CliArgs {
    /// Path to a pdd.toml with overrides
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory to scan instead of GITHUB_WORKSPACE
    #[arg(long)]
    pub workspace: Option<PathBuf>,

    /// Extra directories to skip, relative to the workspace
    #[arg(long, value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// Report what would be created without calling GitHub
    #[arg(long)]
    pub dry_run: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,
}

impl CliArgs {
    /// Flags take precedence over everything else.
    pub fn apply(&self, config: &mut ActionConfig) {
        if let Some(workspace) = &self.workspace {
            config.workspace = workspace.clone();
        }
        if self.config.is_some() {
            config.config_path = self.config.clone();
        }
        config.exclude_dirs.extend(self.exclude.iter().cloned());
        config.dry_run |= self.dry_run;
    }
}
