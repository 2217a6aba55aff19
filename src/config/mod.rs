//! Configuration for docs-sync.
//!
//! Two sources:
//! - [`Config`]: execution context taken from the environment (credential, CI
//!   and development flags).
//! - [`Settings`]: optional `docs-sync.toml` describing what gets uploaded and
//!   how it is published.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Environment variable holding the hosting platform credential.
pub const CREDENTIAL_VAR: &str = "GITHUB_TOKEN";

/// Set (to anything but an empty/false value) by CI providers.
pub const CI_VAR: &str = "CI";

/// `development` marks a local development run.
pub const ENV_VAR: &str = "DOCS_SYNC_ENV";

/// Default settings file name, looked up in the repository root.
pub const SETTINGS_FILE: &str = "docs-sync.toml";

/// Execution context.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Token used by the pull-request tooling.
    pub credential: Option<String>,
    /// Running under continuous integration.
    pub ci: bool,
    /// Running on a developer machine.
    pub dev: bool,
}

impl Config {
    /// Read the execution context from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the execution context from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let credential = lookup(CREDENTIAL_VAR).filter(|v| !v.trim().is_empty());
        let ci = lookup(CI_VAR).map(|v| is_truthy(&v)).unwrap_or(false);
        let dev = lookup(ENV_VAR)
            .map(|v| v.eq_ignore_ascii_case("development"))
            .unwrap_or(false);

        Self {
            credential,
            ci,
            dev,
        }
    }

    /// The credential is required unless running in CI or development mode.
    pub fn validate(&self) -> Result<(), Error> {
        if self.credential.is_none() && !self.ci && !self.dev {
            return Err(Error::MissingCredential);
        }
        Ok(())
    }
}

fn is_truthy(value: &str) -> bool {
    let value = value.trim();
    !(value.is_empty() || value == "0" || value.eq_ignore_ascii_case("false"))
}

/// Upload and publication settings, stored in `docs-sync.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Settings {
    /// File whose modification gates publishing.
    #[serde(default = "default_tracked_file")]
    pub tracked_file: String,

    #[serde(default)]
    pub upload: UploadSettings,

    #[serde(default)]
    pub publish: PublishSettings,
}

/// Translation upload command.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UploadSettings {
    /// Program followed by its arguments.
    #[serde(default = "default_upload_command")]
    pub command: Vec<String>,
}

/// Commit identity and branch layout used when publishing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PublishSettings {
    #[serde(default = "default_remote")]
    pub remote: String,

    /// Main line that receives direct pushes and pull requests.
    #[serde(default = "default_base_branch")]
    pub base_branch: String,

    /// Branch used when new files require review.
    #[serde(default = "default_pr_branch")]
    pub pr_branch: String,

    #[serde(default = "default_author_email")]
    pub author_email: String,

    #[serde(default = "default_author_name")]
    pub author_name: String,

    #[serde(default = "default_commit_message")]
    pub commit_message: String,

    #[serde(default = "default_pr_body")]
    pub pr_body: String,
}

fn default_tracked_file() -> String {
    "package.json".to_string()
}

fn default_upload_command() -> Vec<String> {
    vec!["yarn".to_string(), "crowdin:upload".to_string()]
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_base_branch() -> String {
    "main".to_string()
}

fn default_pr_branch() -> String {
    "chore/docs-updates".to_string()
}

fn default_author_email() -> String {
    "electron@github.com".to_string()
}

fn default_author_name() -> String {
    "electron-bot".to_string()
}

fn default_commit_message() -> String {
    "chore: update ref to docs (🤖)".to_string()
}

fn default_pr_body() -> String {
    "New documents are available and need review before they are published.".to_string()
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            command: default_upload_command(),
        }
    }
}

impl Default for PublishSettings {
    fn default() -> Self {
        Self {
            remote: default_remote(),
            base_branch: default_base_branch(),
            pr_branch: default_pr_branch(),
            author_email: default_author_email(),
            author_name: default_author_name(),
            commit_message: default_commit_message(),
            pr_body: default_pr_body(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tracked_file: default_tracked_file(),
            upload: UploadSettings::default(),
            publish: PublishSettings::default(),
        }
    }
}

impl Settings {
    /// Default settings path for a repository.
    pub fn path(repo_root: &Path) -> PathBuf {
        repo_root.join(SETTINGS_FILE)
    }

    /// Load settings from an explicit file. The file must exist.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let content = fs::read_to_string(path)?;
        let settings: Settings =
            toml::from_str(&content).map_err(|e| Error::ConfigParse(e.to_string()))?;
        settings.check()?;
        Ok(settings)
    }

    /// Load `docs-sync.toml` from the repository root, or defaults if absent.
    pub fn load_or_default(repo_root: &Path) -> Result<Self, Error> {
        let path = Self::path(repo_root);
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(&path)
    }

    fn check(&self) -> Result<(), Error> {
        if self.upload.command.first().map_or(true, |p| p.trim().is_empty()) {
            return Err(Error::ConfigParse("upload.command must name a program".to_string()));
        }
        if self.tracked_file.trim().is_empty() {
            return Err(Error::ConfigParse("tracked_file must not be empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_missing_credential_fails() {
        let config = Config::from_lookup(lookup(&[]));
        assert!(matches!(config.validate(), Err(Error::MissingCredential)));
    }

    #[test]
    fn test_empty_credential_counts_as_missing() {
        let config = Config::from_lookup(lookup(&[(CREDENTIAL_VAR, "  ")]));
        assert!(config.credential.is_none());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_credential_present() {
        let config = Config::from_lookup(lookup(&[(CREDENTIAL_VAR, "ghp_abc")]));
        assert_eq!(config.credential.as_deref(), Some("ghp_abc"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_ci_and_dev_waive_credential() {
        let ci = Config::from_lookup(lookup(&[(CI_VAR, "true")]));
        assert!(ci.ci);
        assert!(ci.validate().is_ok());

        let dev = Config::from_lookup(lookup(&[(ENV_VAR, "development")]));
        assert!(dev.dev);
        assert!(dev.validate().is_ok());
    }

    #[test]
    fn test_falsey_ci_values() {
        for value in ["", "0", "false", "FALSE"] {
            let config = Config::from_lookup(lookup(&[(CI_VAR, value)]));
            assert!(!config.ci, "{:?}", value);
        }
        let config = Config::from_lookup(lookup(&[(ENV_VAR, "production")]));
        assert!(!config.dev);
    }

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.tracked_file, "package.json");
        assert_eq!(settings.upload.command, vec!["yarn", "crowdin:upload"]);
        assert_eq!(settings.publish.base_branch, "main");
        assert_eq!(settings.publish.pr_branch, "chore/docs-updates");
        assert_eq!(settings.publish.author_name, "electron-bot");
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::load_or_default(dir.path()).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_load_partial_file() {
        let dir = TempDir::new().unwrap();
        fs::write(
            Settings::path(dir.path()),
            "tracked_file = \"docs/manifest.json\"\n\n[publish]\nbase_branch = \"trunk\"\n",
        )
        .unwrap();

        let settings = Settings::load_or_default(dir.path()).unwrap();
        assert_eq!(settings.tracked_file, "docs/manifest.json");
        assert_eq!(settings.publish.base_branch, "trunk");
        assert_eq!(settings.publish.pr_branch, "chore/docs-updates");
        assert_eq!(settings.upload, UploadSettings::default());
    }

    #[test]
    fn test_load_rejects_empty_upload_command() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(&path, "[upload]\ncommand = []\n").unwrap();

        assert!(matches!(Settings::load(&path), Err(Error::ConfigParse(_))));
    }

    #[test]
    fn test_load_rejects_invalid_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.toml");
        fs::write(&path, "tracked_file = [").unwrap();

        assert!(matches!(Settings::load(&path), Err(Error::ConfigParse(_))));
    }
}
