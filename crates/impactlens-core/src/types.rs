use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// One line of the changed-files list: a raw status code and a path.
///
/// # Examples
///
/// ```
/// use impactlens_core::{ChangeRecord, FileStatus};
///
/// let record = ChangeRecord {
///     status: "R100".into(),
///     file: "src/new_name.rs".into(),
/// };
/// assert_eq!(record.file_status(), FileStatus::Renamed);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRecord {
    /// Raw version-control status code (e.g. `M`, `A`, `R086`).
    pub status: String,
    /// Repository-relative path.
    pub file: String,
}

impl ChangeRecord {
    /// Classify this record by the first character of its status code.
    pub fn file_status(&self) -> FileStatus {
        FileStatus::from_code(&self.status)
    }
}

/// Readable status of a changed file.
///
/// # Examples
///
/// ```
/// use impactlens_core::FileStatus;
///
/// assert_eq!(FileStatus::from_code("M"), FileStatus::Modified);
/// assert_eq!(FileStatus::from_code("C075"), FileStatus::Copied);
/// assert_eq!(FileStatus::from_code("T"), FileStatus::Unknown);
/// assert_eq!(format!("{}", FileStatus::Added), "added");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    /// File exists only on the source branch.
    Added,
    /// File changed in place.
    Modified,
    /// File exists only on the target branch.
    Deleted,
    /// File moved to a new path.
    Renamed,
    /// File copied to a new path.
    Copied,
    /// Any status code outside the known set.
    #[serde(other)]
    Unknown,
}

impl FileStatus {
    /// Map a raw status code to a [`FileStatus`].
    ///
    /// Only the first character is significant, so scored codes such as
    /// `R100` classify the same as `R`. Empty and unrecognized codes map to
    /// [`FileStatus::Unknown`].
    pub fn from_code(code: &str) -> Self {
        match code.chars().next() {
            Some('A') => FileStatus::Added,
            Some('M') => FileStatus::Modified,
            Some('D') => FileStatus::Deleted,
            Some('R') => FileStatus::Renamed,
            Some('C') => FileStatus::Copied,
            _ => FileStatus::Unknown,
        }
    }

    /// Whether the file can have content on the target branch.
    pub fn has_before(self) -> bool {
        self != FileStatus::Added
    }

    /// Whether the file can have content on the source branch.
    pub fn has_after(self) -> bool {
        self != FileStatus::Deleted
    }
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileStatus::Added => write!(f, "added"),
            FileStatus::Modified => write!(f, "modified"),
            FileStatus::Deleted => write!(f, "deleted"),
            FileStatus::Renamed => write!(f, "renamed"),
            FileStatus::Copied => write!(f, "copied"),
            FileStatus::Unknown => write!(f, "unknown"),
        }
    }
}

/// One file in the structured diff document.
///
/// `before_content` and `after_content` are omitted from the JSON entirely
/// when absent rather than written as `null`.
///
/// # Examples
///
/// ```
/// use impactlens_core::{FileDiffEntry, FileStatus};
///
/// let entry = FileDiffEntry::new("new.txt", FileStatus::Added, String::new());
/// assert_eq!(entry.extension, "txt");
/// let json = serde_json::to_value(&entry).unwrap();
/// assert!(json.get("before_content").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDiffEntry {
    /// Repository-relative path.
    pub file_path: String,
    /// Readable change status.
    pub status: FileStatus,
    /// Unified diff between the target and source branch versions.
    pub diff: String,
    /// File extension without the leading dot, empty if none.
    pub extension: String,
    /// Full text on the target branch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before_content: Option<String>,
    /// Full text on the source branch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after_content: Option<String>,
}

impl FileDiffEntry {
    /// Create an entry with no content attached.
    pub fn new(file_path: impl Into<String>, status: FileStatus, diff: String) -> Self {
        let file_path = file_path.into();
        let extension = extension_of(&file_path);
        Self {
            file_path,
            status,
            diff,
            extension,
            before_content: None,
            after_content: None,
        }
    }
}

/// Extension of `path` without the leading dot.
///
/// Dotfiles such as `.gitignore` have no extension; only the last suffix of
/// `archive.tar.gz` counts.
///
/// # Examples
///
/// ```
/// use impactlens_core::FileDiffEntry;
/// use impactlens_core::FileStatus;
///
/// let e = FileDiffEntry::new("dist/archive.tar.gz", FileStatus::Added, String::new());
/// assert_eq!(e.extension, "gz");
/// let e = FileDiffEntry::new(".gitignore", FileStatus::Added, String::new());
/// assert_eq!(e.extension, "");
/// ```
fn extension_of(path: &str) -> String {
    Path::new(path)
        .extension()
        .map(|ext| ext.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// The hand-off artifact between the collector and the reporter.
///
/// # Examples
///
/// ```
/// use impactlens_core::StructuredDiffDocument;
///
/// let doc: StructuredDiffDocument = serde_json::from_str(r#"{"files": []}"#).unwrap();
/// assert!(doc.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredDiffDocument {
    /// Entries in changed-files input order.
    #[serde(default)]
    pub files: Vec<FileDiffEntry>,
}

impl StructuredDiffDocument {
    /// Whether the document has no file entries.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Number of file entries.
    pub fn len(&self) -> usize {
        self.files.len()
    }
}

/// Pull-request metadata forwarded to the impact analysis service.
///
/// Every field is optional; absent values serialize as `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrMetadata {
    /// Pull-request number as provided by the CI platform.
    pub pr_number: Option<String>,
    /// Pull-request title.
    pub pr_title: Option<String>,
    /// Login of the pull-request author.
    pub pr_author: Option<String>,
    /// Repository full name (`owner/name`).
    pub repository: Option<String>,
}

/// Request body sent to the impact analysis API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpactRequestPayload {
    /// Project identifier on the impact analysis service.
    pub project_id: String,
    /// Branch carrying the changes.
    pub source_branch: String,
    /// Branch the changes are compared against.
    pub target_branch: String,
    /// The collected structured diff.
    pub structured_diff: StructuredDiffDocument,
    /// Token for the version-control host, if provided.
    pub github_token: Option<String>,
    /// Pull-request metadata.
    pub pr_metadata: PrMetadata,
    /// Web URL of the repository.
    pub repo_url: String,
}

/// The job identifier returned by a successful submission.
///
/// # Examples
///
/// ```
/// use impactlens_core::JobRecord;
///
/// let job = JobRecord { impact_analysis_id: "job-123".into() };
/// assert_eq!(job.to_string(), "job-123");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    /// Opaque identifier of the submitted analysis.
    pub impact_analysis_id: String,
}

impl fmt::Display for JobRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.impact_analysis_id)
    }
}
