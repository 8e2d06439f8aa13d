use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ImpactError;

/// Top-level configuration loaded from `.impactlens.toml`.
///
/// Supports layered resolution: CLI flags > env vars > local config > defaults.
/// Secrets and branch names never live here; they come from the CI job
/// environment.
///
/// # Examples
///
/// ```
/// use impactlens_core::ImpactConfig;
///
/// let config = ImpactConfig::default();
/// assert_eq!(config.collect.max_content_bytes, 100_000);
/// assert_eq!(config.report.timeout_secs, 30);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImpactConfig {
    /// Diff collection settings.
    #[serde(default)]
    pub collect: CollectConfig,
    /// Impact analysis submission settings.
    #[serde(default)]
    pub report: ReportConfig,
}

impl ImpactConfig {
    /// Load configuration from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ImpactError::Io`] if the file cannot be read, or
    /// [`ImpactError::Toml`] if the content is not valid TOML.
    pub fn from_file(path: &Path) -> Result<Self, ImpactError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`ImpactError::Toml`] if parsing fails, or
    /// [`ImpactError::Config`] if a value is out of range.
    ///
    /// # Examples
    ///
    /// ```
    /// use impactlens_core::ImpactConfig;
    ///
    /// let toml = r#"
    /// [report]
    /// timeout_secs = 10
    /// "#;
    /// let config = ImpactConfig::from_toml(toml).unwrap();
    /// assert_eq!(config.report.timeout_secs, 10);
    /// assert_eq!(config.collect.output.to_str(), Some("structured_diff.json"));
    /// ```
    pub fn from_toml(content: &str) -> Result<Self, ImpactError> {
        let config: Self = toml::from_str(content)?;
        if config.report.timeout_secs == 0 {
            return Err(ImpactError::Config(
                "report.timeout_secs must be at least 1".into(),
            ));
        }
        Ok(config)
    }
}

/// Settings for `impactlens collect`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectConfig {
    /// Tab-separated changed-files list (default: `changed_files.txt`).
    #[serde(default = "default_changed_files")]
    pub changed_files: PathBuf,
    /// Where the structured diff is written (default: `structured_diff.json`).
    #[serde(default = "default_structured_diff")]
    pub output: PathBuf,
    /// Content at or above this many bytes is omitted (default: 100000).
    #[serde(default = "default_max_content_bytes")]
    pub max_content_bytes: usize,
}

fn default_changed_files() -> PathBuf {
    PathBuf::from("changed_files.txt")
}

fn default_structured_diff() -> PathBuf {
    PathBuf::from("structured_diff.json")
}

fn default_max_content_bytes() -> usize {
    100_000
}

impl Default for CollectConfig {
    fn default() -> Self {
        Self {
            changed_files: default_changed_files(),
            output: default_structured_diff(),
            max_content_bytes: default_max_content_bytes(),
        }
    }
}

/// Settings for `impactlens report`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Structured diff to submit (default: `structured_diff.json`).
    #[serde(default = "default_structured_diff")]
    pub input: PathBuf,
    /// Where the returned job id is written (default: `impact_analysis_job.txt`).
    #[serde(default = "default_job_file")]
    pub job_file: PathBuf,
    /// HTTP request timeout in seconds (default: 30).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_job_file() -> PathBuf {
    PathBuf::from("impact_analysis_job.txt")
}

fn default_timeout_secs() -> u64 {
    30
}

impl ReportConfig {
    /// Request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            input: default_structured_diff(),
            job_file: default_job_file(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Commented template written by `impactlens init`.
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# impactlens configuration
#
# Branch names, tokens and the API endpoint come from the CI environment
# (SOURCE_BRANCH, TARGET_BRANCH, IMPACT_API_URL, API_ACCESS_TOKEN, ...).

[collect]
# changed_files = "changed_files.txt"
# output = "structured_diff.json"
# max_content_bytes = 100000

[report]
# input = "structured_diff.json"
# job_file = "impact_analysis_job.txt"
# timeout_secs = 30
"#;
