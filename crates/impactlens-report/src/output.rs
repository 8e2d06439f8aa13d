//! Recording the job id for later pipeline steps.

use std::io::Write;
use std::path::{Path, PathBuf};

use impactlens_core::{ImpactError, JobRecord};

/// Output name under which the job id is exposed to downstream steps.
pub const OUTPUT_NAME: &str = "impact_analysis_id";

/// Write the job id to `path` as a single line with no trailing newline.
///
/// # Errors
///
/// Returns [`ImpactError::Io`] if the file cannot be written.
pub fn write_job_file(path: &Path, job: &JobRecord) -> Result<(), ImpactError> {
    std::fs::write(path, &job.impact_analysis_id)?;
    Ok(())
}

/// Where step outputs are declared.
///
/// # Examples
///
/// ```
/// use impactlens_report::output::CiOutput;
///
/// assert_eq!(CiOutput::from_env_value(None), CiOutput::Stdout);
/// assert_eq!(CiOutput::from_env_value(Some("".into())), CiOutput::Stdout);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CiOutput {
    /// Append `name=value` lines to the file named by `GITHUB_OUTPUT`.
    File(PathBuf),
    /// Print the legacy `::set-output` workflow command.
    Stdout,
}

impl CiOutput {
    /// Pick the channel from the value of `GITHUB_OUTPUT`.
    pub fn from_env_value(value: Option<String>) -> Self {
        match value {
            Some(path) if !path.is_empty() => CiOutput::File(PathBuf::from(path)),
            _ => CiOutput::Stdout,
        }
    }

    /// Declare `job` as the [`OUTPUT_NAME`] output.
    ///
    /// # Errors
    ///
    /// Returns [`ImpactError::Io`] if the output file cannot be appended to.
    pub fn emit(&self, job: &JobRecord) -> Result<(), ImpactError> {
        match self {
            CiOutput::File(path) => {
                let mut file = std::fs::OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)?;
                writeln!(file, "{OUTPUT_NAME}={job}")?;
            }
            CiOutput::Stdout => println!("{}", set_output_command(job)),
        }
        Ok(())
    }
}

fn set_output_command(job: &JobRecord) -> String {
    format!("::set-output name={OUTPUT_NAME}::{job}")
}
