use crate::utils::error::{PddError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Optional `pdd.toml` overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    pub action: Option<ActionSection>,
    pub scan: Option<ScanSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ActionSection {
    pub branch_name: Option<String>,
    pub issue_title_prefix: Option<String>,
    pub dispatch_branch: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScanSection {
    #[serde(default)]
    pub exclude_dirs: Vec<String>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(PddError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| PddError::InvalidConfigValueError {
            field: "pdd.toml".to_string(),
            value: String::new(),
            reason: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left as-is.
    fn substitute_env_vars(content: &str) -> String {
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let config = TomlConfig::from_toml_str(
            r#"
[action]
branch_name = "develop"
issue_title_prefix = "[PDD]"

[scan]
exclude_dirs = ["target"]
"#,
        )
        .unwrap();

        let action = config.action.unwrap();
        assert_eq!(action.branch_name.as_deref(), Some("develop"));
        assert_eq!(action.issue_title_prefix.as_deref(), Some("[PDD]"));
        assert!(action.dispatch_branch.is_none());
        assert_eq!(config.scan.unwrap().exclude_dirs, vec!["target"]);
    }

    #[test]
    fn test_empty_config() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert!(config.action.is_none());
        assert!(config.scan.is_none());
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        assert!(TomlConfig::from_toml_str("[action]\nbranch = \"x\"\n").is_err());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("PDD_TEST_PREFIX", "[ENV]");

        let config = TomlConfig::from_toml_str(
            "[action]\nissue_title_prefix = \"${PDD_TEST_PREFIX}\"\nbranch_name = \"${PDD_TEST_UNSET_VAR}\"\n",
        )
        .unwrap();
        let action = config.action.unwrap();
        assert_eq!(action.issue_title_prefix.as_deref(), Some("[ENV]"));
        assert_eq!(action.branch_name.as_deref(), Some("${PDD_TEST_UNSET_VAR}"));

        std::env::remove_var("PDD_TEST_PREFIX");
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[scan]\nexclude_dirs = [\"dist\", \"build\"]\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.scan.unwrap().exclude_dirs, vec!["dist", "build"]);
    }
}
