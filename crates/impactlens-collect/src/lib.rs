//! Structured diff collection.
//!
//! Reads the tab-separated changed-files list produced by the CI job, asks a
//! [`vcs::VersionControl`] backend for each file's diff and branch contents,
//! and assembles the [`impactlens_core::StructuredDiffDocument`] handed to
//! the reporter.

pub mod changes;
pub mod document;
pub mod vcs;
