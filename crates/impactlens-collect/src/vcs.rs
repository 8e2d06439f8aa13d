//! Version-control access for diff collection.
//!
//! The collector only needs two questions answered per file: "what is the
//! unified diff between the branches" and "what is the file's text on a
//! branch". [`VersionControl`] is that seam; [`GitCli`] answers it by
//! shelling out to `git` against `origin/*` remote-tracking branches.

use std::path::PathBuf;
use std::process::{Command, Output};

use impactlens_core::ImpactError;

/// Remote whose tracking branches are compared.
pub const REMOTE: &str = "origin";

/// Source of per-file diffs and branch contents.
pub trait VersionControl {
    /// Unified diff of `path` from `target_branch` to `source_branch`.
    ///
    /// # Errors
    ///
    /// Returns [`ImpactError::Git`] if the diff cannot be produced.
    fn file_diff(
        &self,
        path: &str,
        source_branch: &str,
        target_branch: &str,
    ) -> Result<String, ImpactError>;

    /// Full text of `path` as stored on `branch`.
    ///
    /// Returns `Ok(None)` when the file does not exist on that branch, which
    /// the backend cannot always tell apart from other lookup failures.
    ///
    /// # Errors
    ///
    /// Returns [`ImpactError::Git`] if the backend could not be queried at all.
    fn file_content(&self, path: &str, branch: &str) -> Result<Option<String>, ImpactError>;
}

/// [`VersionControl`] backed by the `git` command line.
///
/// # Examples
///
/// ```no_run
/// use impactlens_collect::vcs::{GitCli, VersionControl};
///
/// let git = GitCli::new(".");
/// let diff = git.file_diff("src/lib.rs", "feature", "main").unwrap();
/// print!("{diff}");
/// ```
#[derive(Debug, Clone)]
pub struct GitCli {
    repo: PathBuf,
}

impl GitCli {
    /// Create a backend operating on the repository at `repo`.
    pub fn new(repo: impl Into<PathBuf>) -> Self {
        Self { repo: repo.into() }
    }

    fn git(&self, args: &[&str]) -> Result<Output, ImpactError> {
        Command::new("git")
            .arg("-C")
            .arg(&self.repo)
            .args(args)
            .output()
            .map_err(|e| ImpactError::Git(format!("failed to run git {}: {e}", args.join(" "))))
    }
}

fn remote_ref(branch: &str) -> String {
    format!("{REMOTE}/{branch}")
}

impl VersionControl for GitCli {
    fn file_diff(
        &self,
        path: &str,
        source_branch: &str,
        target_branch: &str,
    ) -> Result<String, ImpactError> {
        let target = remote_ref(target_branch);
        let source = remote_ref(source_branch);
        let output = self.git(&["diff", target.as_str(), source.as_str(), "--", path])?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ImpactError::Git(format!(
                "git diff {target} {source} -- {path} exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn file_content(&self, path: &str, branch: &str) -> Result<Option<String>, ImpactError> {
        let object = format!("{}:{path}", remote_ref(branch));
        let output = self.git(&["show", object.as_str()])?;

        if !output.status.success() {
            tracing::debug!(
                "git show {object} exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
            return Ok(None);
        }

        Ok(Some(String::from_utf8_lossy(&output.stdout).into_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_ref_prefixes_origin() {
        assert_eq!(remote_ref("main"), "origin/main");
        assert_eq!(remote_ref("feature/x"), "origin/feature/x");
    }

    #[test]
    fn diff_outside_repository_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let git = GitCli::new(dir.path());
        let result = git.file_diff("a.txt", "feature", "main");
        assert!(matches!(result, Err(ImpactError::Git(_))));
    }

    #[test]
    fn content_outside_repository_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let git = GitCli::new(dir.path());
        assert!(!matches!(git.file_content("a.txt", "main"), Ok(Some(_))));
    }
}
