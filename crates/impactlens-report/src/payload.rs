//! Loading the structured diff and shaping the request body.

use std::path::Path;

use impactlens_core::{ImpactError, ImpactRequestPayload, StructuredDiffDocument};

use crate::settings::ReportSettings;

/// Read the structured diff written by `impactlens collect`.
///
/// # Errors
///
/// Returns [`ImpactError::FileNotFound`] if `path` does not exist,
/// [`ImpactError::Io`] if it cannot be read, or
/// [`ImpactError::Serialization`] if it is not a structured diff document.
pub fn load_document(path: &Path) -> Result<StructuredDiffDocument, ImpactError> {
    if !path.exists() {
        return Err(ImpactError::FileNotFound(path.to_path_buf()));
    }
    let content = std::fs::read_to_string(path)?;
    let document: StructuredDiffDocument = serde_json::from_str(&content)?;
    tracing::info!("read structured diff with {} files", document.len());
    Ok(document)
}

/// Reject a document with no file entries.
///
/// # Errors
///
/// Returns [`ImpactError::EmptyInput`] when `document.files` is empty.
pub fn validate_document(document: &StructuredDiffDocument) -> Result<(), ImpactError> {
    if document.is_empty() {
        return Err(ImpactError::EmptyInput(
            "structured diff is empty or invalid".into(),
        ));
    }
    Ok(())
}

/// Web URL for a repository full name.
///
/// An empty name still produces a URL; the service tolerates it.
///
/// # Examples
///
/// ```
/// use impactlens_report::payload::repo_url;
///
/// assert_eq!(repo_url("octo/widgets"), "https://github.com/octo/widgets");
/// assert_eq!(repo_url(""), "https://github.com/");
/// ```
pub fn repo_url(full_name: &str) -> String {
    format!("https://github.com/{full_name}")
}

/// Combine settings and the collected document into the request body.
pub fn build_payload(
    settings: &ReportSettings,
    document: StructuredDiffDocument,
) -> ImpactRequestPayload {
    let repo_url = repo_url(settings.pr_metadata.repository.as_deref().unwrap_or_default());
    tracing::info!(%repo_url, "building impact analysis payload");

    ImpactRequestPayload {
        project_id: settings.project_id.clone(),
        source_branch: settings.source_branch.clone(),
        target_branch: settings.target_branch.clone(),
        structured_diff: document,
        github_token: settings.github_token.clone(),
        pr_metadata: settings.pr_metadata.clone(),
        repo_url,
    }
}
