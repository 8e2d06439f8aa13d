use std::path::PathBuf;

/// Errors that can occur while collecting or reporting a structured diff.
///
/// Library crates return this type directly; the binary renders it through
/// `miette`, and any error that reaches `main` ends the run with exit status 1.
///
/// # Examples
///
/// ```
/// use impactlens_core::ImpactError;
///
/// let err = ImpactError::MissingConfig("API_ACCESS_TOKEN");
/// assert!(err.to_string().contains("API_ACCESS_TOKEN"));
/// ```
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum ImpactError {
    /// Filesystem I/O failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// A required setting was absent or empty.
    #[error("missing required environment variable: {0}")]
    #[diagnostic(help("set the variable in the CI job environment or pass the matching flag"))]
    MissingConfig(&'static str),

    /// Version-control command failure.
    #[error("git error: {0}")]
    Git(String),

    /// JSON serialization / deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML deserialization failure.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Transport-level HTTP failure (timeout, DNS, connection reset).
    #[error("request error: {0}")]
    Http(String),

    /// The impact analysis API answered with a non-success status.
    #[error("API returned status code {status}: {body}")]
    ApiStatus {
        /// HTTP status code.
        status: u16,
        /// Leading part of the response body.
        body: String,
    },

    /// There was nothing to process.
    #[error("{0}")]
    EmptyInput(String),

    /// A required file was not found.
    #[error("file not found: {}", .0.display())]
    #[diagnostic(help("run `impactlens collect` first to produce the structured diff"))]
    FileNotFound(PathBuf),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_converts() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: ImpactError = io_err.into();
        assert!(err.to_string().contains("gone"));
    }

    #[test]
    fn missing_config_names_variable() {
        let err = ImpactError::MissingConfig("PROJECT_ID");
        assert_eq!(
            err.to_string(),
            "missing required environment variable: PROJECT_ID"
        );
    }

    #[test]
    fn api_status_shows_code_and_body() {
        let err = ImpactError::ApiStatus {
            status: 500,
            body: "boom".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("500"));
        assert!(msg.contains("boom"));
    }

    #[test]
    fn file_not_found_shows_path() {
        let err = ImpactError::FileNotFound(PathBuf::from("/tmp/structured_diff.json"));
        assert!(err.to_string().contains("/tmp/structured_diff.json"));
    }
}
