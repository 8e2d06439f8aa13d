use std::time::Duration;

use impactlens_core::{ImpactError, PrMetadata};

/// Raw configuration values as gathered from flags and the environment.
///
/// Nothing here is validated yet; see [`ReportSettings::validate`].
#[derive(Debug, Clone, Default)]
pub struct ReportInputs {
    /// `IMPACT_API_URL`
    pub api_url: Option<String>,
    /// `API_ACCESS_TOKEN`
    pub api_token: Option<String>,
    /// `PROJECT_ID`
    pub project_id: Option<String>,
    /// `SOURCE_BRANCH`
    pub source_branch: Option<String>,
    /// `TARGET_BRANCH`
    pub target_branch: Option<String>,
    /// `GITHUB_TOKEN`
    pub github_token: Option<String>,
    /// `PR_NUMBER`
    pub pr_number: Option<String>,
    /// `PR_TITLE`
    pub pr_title: Option<String>,
    /// `PR_AUTHOR`
    pub pr_author: Option<String>,
    /// `REPO_FULL_NAME`
    pub repo_full_name: Option<String>,
}

/// Validated, immutable settings for one report run.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use impactlens_report::settings::{ReportInputs, ReportSettings};
///
/// let inputs = ReportInputs {
///     api_url: Some("https://impact.example.com/analyze".into()),
///     api_token: Some("secret".into()),
///     project_id: Some("proj-1".into()),
///     source_branch: Some("feature".into()),
///     target_branch: Some("main".into()),
///     ..ReportInputs::default()
/// };
/// let settings = ReportSettings::validate(inputs, Duration::from_secs(30)).unwrap();
/// assert_eq!(settings.project_id, "proj-1");
/// assert!(settings.pr_metadata.pr_number.is_none());
/// ```
#[derive(Debug, Clone)]
pub struct ReportSettings {
    /// Endpoint receiving the POST.
    pub api_url: String,
    /// Sent as `X-API-Access-Token`.
    pub api_token: String,
    /// Project identifier on the impact analysis service.
    pub project_id: String,
    /// Branch carrying the changes.
    pub source_branch: String,
    /// Branch the changes are compared against.
    pub target_branch: String,
    /// Token for the version-control host, forwarded as-is.
    pub github_token: Option<String>,
    /// Pull-request metadata, forwarded as-is.
    pub pr_metadata: PrMetadata,
    /// Request timeout.
    pub timeout: Duration,
}

impl ReportSettings {
    /// Check that every required value is present and non-empty.
    ///
    /// Required values are checked in a fixed order and the first missing one
    /// is reported. Pull-request metadata and the GitHub token are optional.
    ///
    /// # Errors
    ///
    /// Returns [`ImpactError::MissingConfig`] naming the missing variable.
    pub fn validate(inputs: ReportInputs, timeout: Duration) -> Result<Self, ImpactError> {
        let ReportInputs {
            api_url,
            api_token,
            project_id,
            source_branch,
            target_branch,
            github_token,
            pr_number,
            pr_title,
            pr_author,
            repo_full_name,
        } = inputs;

        Ok(Self {
            api_url: required(api_url, "IMPACT_API_URL")?,
            api_token: required(api_token, "API_ACCESS_TOKEN")?,
            project_id: required(project_id, "PROJECT_ID")?,
            source_branch: required(source_branch, "SOURCE_BRANCH")?,
            target_branch: required(target_branch, "TARGET_BRANCH")?,
            github_token,
            pr_metadata: PrMetadata {
                pr_number,
                pr_title,
                pr_author,
                repository: repo_full_name,
            },
            timeout,
        })
    }
}

fn required(value: Option<String>, name: &'static str) -> Result<String, ImpactError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => {
            tracing::error!("missing required environment variable: {name}");
            Err(ImpactError::MissingConfig(name))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> ReportInputs {
        ReportInputs {
            api_url: Some("https://impact.example.com".into()),
            api_token: Some("token".into()),
            project_id: Some("p".into()),
            source_branch: Some("feature".into()),
            target_branch: Some("main".into()),
            ..ReportInputs::default()
        }
    }

    fn missing(inputs: ReportInputs) -> &'static str {
        match ReportSettings::validate(inputs, Duration::from_secs(30)) {
            Err(ImpactError::MissingConfig(name)) => name,
            other => panic!("expected MissingConfig, got {other:?}"),
        }
    }

    #[test]
    fn complete_inputs_validate() {
        let settings = ReportSettings::validate(complete(), Duration::from_secs(30)).unwrap();
        assert_eq!(settings.api_token, "token");
        assert_eq!(settings.timeout, Duration::from_secs(30));
        assert!(settings.github_token.is_none());
    }

    #[test]
    fn each_required_value_is_checked() {
        let mut inputs = complete();
        inputs.api_url = None;
        assert_eq!(missing(inputs), "IMPACT_API_URL");

        let mut inputs = complete();
        inputs.api_token = None;
        assert_eq!(missing(inputs), "API_ACCESS_TOKEN");

        let mut inputs = complete();
        inputs.project_id = None;
        assert_eq!(missing(inputs), "PROJECT_ID");

        let mut inputs = complete();
        inputs.source_branch = None;
        assert_eq!(missing(inputs), "SOURCE_BRANCH");

        let mut inputs = complete();
        inputs.target_branch = None;
        assert_eq!(missing(inputs), "TARGET_BRANCH");
    }

    #[test]
    fn empty_string_counts_as_missing() {
        let mut inputs = complete();
        inputs.api_token = Some(String::new());
        assert_eq!(missing(inputs), "API_ACCESS_TOKEN");
    }

    #[test]
    fn first_missing_value_wins() {
        assert_eq!(missing(ReportInputs::default()), "IMPACT_API_URL");
    }

    #[test]
    fn optional_values_pass_through() {
        let mut inputs = complete();
        inputs.github_token = Some("ghp".into());
        inputs.pr_number = Some("42".into());
        inputs.repo_full_name = Some("octo/repo".into());
        let settings = ReportSettings::validate(inputs, Duration::from_secs(1)).unwrap();
        assert_eq!(settings.github_token.as_deref(), Some("ghp"));
        assert_eq!(settings.pr_metadata.pr_number.as_deref(), Some("42"));
        assert_eq!(settings.pr_metadata.repository.as_deref(), Some("octo/repo"));
        assert!(settings.pr_metadata.pr_title.is_none());
    }
}
