use crate::adapters::github::DEFAULT_API_URL;
use crate::config::toml_config::TomlConfig;
use crate::core::action::extract_pr_number;
use crate::domain::model::EventKind;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{PddError, Result};
use crate::utils::validation::{
    validate_directory, validate_non_empty_string, validate_repo_slug, validate_url, Validate,
};
use std::path::{Path, PathBuf};

pub const DEFAULT_BRANCH: &str = "main";

/// Settings resolved from action inputs and the runner environment.
#[derive(Debug, Clone)]
pub struct ActionConfig {
    pub github_token: Option<String>,
    pub repository: String,
    pub branch_name: String,
    pub issue_title_prefix: Option<String>,
    pub event: EventKind,
    pub pr_number: Option<u64>,
    pub workspace: PathBuf,
    pub api_url: String,
    pub dispatch_branch: Option<String>,
    pub exclude_dirs: Vec<String>,
    pub config_path: Option<PathBuf>,
    pub dry_run: bool,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Action input `name` (`INPUT_<NAME>`), falling back to the `fallback` variable.
fn input<F>(lookup: &F, name: &str, fallback: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    let key = format!("INPUT_{}", name.replace(' ', "_").to_uppercase());
    non_empty(lookup(&key)).or_else(|| non_empty(lookup(fallback)))
}

fn required<F>(lookup: &F, name: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    non_empty(lookup(name)).ok_or_else(|| PddError::MissingConfigError {
        field: name.to_string(),
    })
}

impl ActionConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let event_name = required(&lookup, "GITHUB_EVENT_NAME")?;
        let event = EventKind::parse(&event_name).ok_or(PddError::UnsupportedEventError {
            event: event_name.clone(),
        })?;

        let pr_number = match event {
            EventKind::PullRequest => Some(extract_pr_number(&required(&lookup, "GITHUB_REF")?)?),
            EventKind::WorkflowDispatch => None,
        };

        Ok(Self {
            github_token: input(&lookup, "github_token", "PDD_GITHUB_TOKEN"),
            repository: required(&lookup, "GITHUB_REPOSITORY")?,
            branch_name: input(&lookup, "branch_name", "PDD_BRANCH_NAME")
                .unwrap_or_else(|| DEFAULT_BRANCH.to_string()),
            issue_title_prefix: input(&lookup, "issue_title_prefix", "PDD_ISSUE_PREFIX"),
            event,
            pr_number,
            workspace: non_empty(lookup("GITHUB_WORKSPACE"))
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
            api_url: non_empty(lookup("GITHUB_API_URL"))
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            dispatch_branch: non_empty(lookup("GITHUB_REF_NAME")),
            exclude_dirs: Vec::new(),
            config_path: input(&lookup, "config_path", "PDD_CONFIG_PATH").map(PathBuf::from),
            dry_run: false,
        })
    }

    /// Values set in the file win over inputs; exclude lists are merged.
    pub fn apply_toml(&mut self, toml: &TomlConfig) {
        if let Some(action) = &toml.action {
            if let Some(branch) = non_empty(action.branch_name.clone()) {
                self.branch_name = branch;
            }
            if let Some(prefix) = non_empty(action.issue_title_prefix.clone()) {
                self.issue_title_prefix = Some(prefix);
            }
            if let Some(branch) = non_empty(action.dispatch_branch.clone()) {
                self.dispatch_branch = Some(branch);
            }
        }
        if let Some(scan) = &toml.scan {
            self.exclude_dirs.extend(scan.exclude_dirs.iter().cloned());
        }
    }

    pub fn token(&self) -> &str {
        self.github_token.as_deref().unwrap_or_default()
    }
}

impl ConfigProvider for ActionConfig {
    fn branch_name(&self) -> &str {
        &self.branch_name
    }

    fn issue_title_prefix(&self) -> Option<&str> {
        self.issue_title_prefix.as_deref()
    }

    fn event(&self) -> EventKind {
        self.event
    }

    fn pr_number(&self) -> Option<u64> {
        self.pr_number
    }

    fn workspace(&self) -> &Path {
        &self.workspace
    }

    fn exclude_dirs(&self) -> &[String] {
        &self.exclude_dirs
    }

    fn dispatch_branch(&self) -> &str {
        self.dispatch_branch.as_deref().unwrap_or(&self.branch_name)
    }

    fn dry_run(&self) -> bool {
        self.dry_run
    }
}

impl Validate for ActionConfig {
    fn validate(&self) -> Result<()> {
        // A dry run never talks to GitHub, so it can go without a token.
        if !self.dry_run && self.github_token.is_none() {
            return Err(PddError::MissingConfigError {
                field: "github_token".to_string(),
            });
        }
        validate_repo_slug("GITHUB_REPOSITORY", &self.repository)?;
        validate_non_empty_string("branch_name", &self.branch_name)?;
        validate_url("GITHUB_API_URL", &self.api_url)?;
        validate_directory("GITHUB_WORKSPACE", &self.workspace)?;
        Ok(())
    }
}
