//! End-to-end report run.

use impactlens_core::{ImpactError, ReportConfig};

use crate::client::{ImpactClient, SubmitOutcome};
use crate::output::{write_job_file, CiOutput};
use crate::payload::{build_payload, load_document, validate_document};
use crate::settings::{ReportInputs, ReportSettings};

/// Load, validate, submit, and record.
///
/// The document is loaded before configuration is validated, and nothing is
/// sent until both pass. The job file and CI output are only written when
/// the API returns a job id.
///
/// # Errors
///
/// Any error returned here is fatal for the run: unreadable document,
/// missing configuration, empty document, transport failure, non-success
/// status, or failure to record the job id.
pub async fn run(
    inputs: ReportInputs,
    config: &ReportConfig,
    ci_output: &CiOutput,
) -> Result<SubmitOutcome, ImpactError> {
    tracing::info!(
        repository = inputs.repo_full_name.as_deref().unwrap_or_default(),
        "starting impact analysis report"
    );

    let document = load_document(&config.input)?;
    let settings = ReportSettings::validate(inputs, config.timeout())?;
    validate_document(&document)?;

    let payload = build_payload(&settings, document);
    let client = ImpactClient::new(settings.timeout)?;
    let outcome = client
        .submit(&payload, &settings.api_url, &settings.api_token)
        .await?;

    if let SubmitOutcome::Created(job) = &outcome {
        write_job_file(&config.job_file, job)?;
        ci_output.emit(job)?;
    }

    Ok(outcome)
}
