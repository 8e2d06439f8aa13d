//! Assembly and persistence of the structured diff document.

use std::path::Path;

use impactlens_core::{ChangeRecord, FileDiffEntry, ImpactError, StructuredDiffDocument};

use crate::changes::read_changed_files;
use crate::vcs::VersionControl;

/// Resolved, immutable inputs for one collection run.
///
/// # Examples
///
/// ```
/// use impactlens_collect::document::CollectSettings;
///
/// let settings = CollectSettings::new(Some("feature".into()), Some("main".into()), 100_000).unwrap();
/// assert_eq!(settings.target_branch, "main");
/// assert!(CollectSettings::new(Some("feature".into()), Some(String::new()), 100_000).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct CollectSettings {
    /// Branch carrying the changes.
    pub source_branch: String,
    /// Branch the changes are compared against.
    pub target_branch: String,
    /// Content of this many bytes or more is left out of the document.
    pub max_content_bytes: usize,
}

impl CollectSettings {
    /// Validate branch names and build the settings.
    ///
    /// # Errors
    ///
    /// Returns [`ImpactError::MissingConfig`] if either branch is absent or empty.
    pub fn new(
        source_branch: Option<String>,
        target_branch: Option<String>,
        max_content_bytes: usize,
    ) -> Result<Self, ImpactError> {
        let source_branch =
            non_empty(source_branch).ok_or(ImpactError::MissingConfig("SOURCE_BRANCH"))?;
        let target_branch =
            non_empty(target_branch).ok_or(ImpactError::MissingConfig("TARGET_BRANCH"))?;
        Ok(Self {
            source_branch,
            target_branch,
            max_content_bytes,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Build one [`FileDiffEntry`] per record, in input order.
///
/// Retrieval failures never abort the build: a failed diff becomes an empty
/// string and failed content lookups leave the content out. Content is only
/// requested from a branch the file can exist on, and is dropped rather than
/// truncated when it reaches `max_content_bytes`.
pub fn build_document(
    records: &[ChangeRecord],
    vcs: &dyn VersionControl,
    settings: &CollectSettings,
) -> StructuredDiffDocument {
    let mut files = Vec::with_capacity(records.len());

    for record in records {
        if record.file.is_empty() {
            tracing::debug!(status = %record.status, "skipping change record without a path");
            continue;
        }
        files.push(build_entry(record, vcs, settings));
    }

    StructuredDiffDocument { files }
}

fn build_entry(
    record: &ChangeRecord,
    vcs: &dyn VersionControl,
    settings: &CollectSettings,
) -> FileDiffEntry {
    let path = record.file.as_str();
    let status = record.file_status();

    let diff = match vcs.file_diff(path, &settings.source_branch, &settings.target_branch) {
        Ok(diff) => diff,
        Err(e) => {
            tracing::error!(file = path, "error getting diff: {e}");
            String::new()
        }
    };

    let mut entry = FileDiffEntry::new(path, status, diff);

    if status.has_before() {
        entry.before_content = fetch_content(vcs, path, &settings.target_branch)
            .filter(|content| fits(content, settings.max_content_bytes, path));
    }
    if status.has_after() {
        entry.after_content = fetch_content(vcs, path, &settings.source_branch)
            .filter(|content| fits(content, settings.max_content_bytes, path));
    }

    entry
}

fn fetch_content(vcs: &dyn VersionControl, path: &str, branch: &str) -> Option<String> {
    match vcs.file_content(path, branch) {
        Ok(content) => content,
        Err(e) => {
            tracing::error!(file = path, branch, "error getting content: {e}");
            None
        }
    }
}

fn fits(content: &str, limit: usize, path: &str) -> bool {
    let fits = content.len() < limit;
    if !fits {
        tracing::debug!(file = path, bytes = content.len(), "omitting oversized content");
    }
    fits
}

/// Write `document` to `path` as pretty-printed JSON.
///
/// # Errors
///
/// Returns [`ImpactError::Serialization`] or [`ImpactError::Io`] on failure.
pub fn write_document(document: &StructuredDiffDocument, path: &Path) -> Result<(), ImpactError> {
    let content = serde_json::to_string_pretty(document)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Run a full collection: read the changed-files list, build the document,
/// and write it to `output`.
///
/// # Errors
///
/// Returns [`ImpactError::EmptyInput`] without writing anything when the list
/// has no usable records, or an I/O error if the document cannot be written.
pub fn collect(
    changed_files: &Path,
    output: &Path,
    vcs: &dyn VersionControl,
    settings: &CollectSettings,
) -> Result<StructuredDiffDocument, ImpactError> {
    let records = read_changed_files(changed_files);
    if records.is_empty() {
        return Err(ImpactError::EmptyInput("no changed files found".into()));
    }
    tracing::info!("found {} changed files", records.len());

    let document = build_document(&records, vcs, settings);
    write_document(&document, output)?;
    tracing::info!(
        path = %output.display(),
        "generated structured diff with {} files",
        document.len()
    );
    Ok(document)
}
