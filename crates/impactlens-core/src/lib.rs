//! Core types, configuration, and error handling for impactlens.
//!
//! This crate provides the shared foundation used by the collector and the
//! reporter:
//! - [`ImpactError`]: unified error type using `thiserror`
//! - [`ImpactConfig`]: configuration loaded from `.impactlens.toml`
//! - Shared types: [`ChangeRecord`], [`FileStatus`], [`FileDiffEntry`],
//!   [`StructuredDiffDocument`], [`ImpactRequestPayload`], [`PrMetadata`],
//!   [`JobRecord`]

mod config;
mod error;
mod types;

pub use config::{CollectConfig, ImpactConfig, ReportConfig, DEFAULT_CONFIG_TEMPLATE};
pub use error::ImpactError;
pub use types::{
    ChangeRecord, FileDiffEntry, FileStatus, ImpactRequestPayload, JobRecord, PrMetadata,
    StructuredDiffDocument,
};

/// A convenience `Result` type for impactlens operations.
pub type Result<T> = std::result::Result<T, ImpactError>;
