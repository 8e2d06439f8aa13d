//! Impact analysis submission.
//!
//! Loads the structured diff written by the collector, validates the CI
//! configuration, posts the enriched payload to the impact analysis API, and
//! records the returned job id for later pipeline steps.

pub mod client;
pub mod output;
pub mod payload;
pub mod pipeline;
pub mod settings;
