use std::time::{Duration, Instant};

use impactlens_core::{ImpactError, ImpactRequestPayload, JobRecord};

/// Header carrying the impact analysis access token.
pub const ACCESS_TOKEN_HEADER: &str = "X-API-Access-Token";

/// Response field holding the job identifier.
pub const JOB_ID_FIELD: &str = "impact_analysis_id";

/// Characters of an error response body kept in logs and errors.
const ERROR_BODY_CHARS: usize = 500;

/// Characters of an unparseable success body kept in logs.
const WARNING_BODY_CHARS: usize = 200;

/// Result of a request the API accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The response named the created job.
    Created(JobRecord),
    /// The request was accepted but no job id could be read from the response.
    AcceptedWithoutId,
}

/// HTTP client for the impact analysis API.
///
/// Each submission is a single attempt; nothing is retried.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use impactlens_report::client::ImpactClient;
///
/// let client = ImpactClient::new(Duration::from_secs(30)).unwrap();
/// ```
pub struct ImpactClient {
    client: reqwest::Client,
}

impl ImpactClient {
    /// Create a client whose requests give up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`ImpactError::Http`] if the HTTP client cannot be built.
    pub fn new(timeout: Duration) -> Result<Self, ImpactError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ImpactError::Http(format!("failed to create HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// POST `payload` as JSON to `endpoint`.
    ///
    /// Status 200, 201 and 202 count as accepted. An accepted response whose
    /// body is not JSON, or lacks [`JOB_ID_FIELD`], is logged as a warning and
    /// reported as [`SubmitOutcome::AcceptedWithoutId`].
    ///
    /// # Errors
    ///
    /// Returns [`ImpactError::Http`] on transport failures (timeout, DNS,
    /// connection reset) and [`ImpactError::ApiStatus`] for any other status,
    /// carrying the first 500 characters of the body.
    pub async fn submit(
        &self,
        payload: &ImpactRequestPayload,
        endpoint: &str,
        token: &str,
    ) -> Result<SubmitOutcome, ImpactError> {
        tracing::info!("sending impact analysis request to {endpoint}");
        let started = Instant::now();

        let response = self
            .client
            .post(endpoint)
            .header("Content-Type", "application/json")
            .header(ACCESS_TOKEN_HEADER, token)
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("request error: {e}");
                ImpactError::Http(e.to_string())
            })?;

        let status = response.status();
        tracing::info!(
            "request completed in {:.2}s with status code {}",
            started.elapsed().as_secs_f64(),
            status.as_u16()
        );

        let body = response.text().await.map_err(|e| {
            tracing::error!("failed to read response body: {e}");
            ImpactError::Http(e.to_string())
        })?;

        if !matches!(status.as_u16(), 200 | 201 | 202) {
            let body = truncate_chars(&body, ERROR_BODY_CHARS);
            tracing::error!(
                status = status.as_u16(),
                response = %body,
                "API returned an error status"
            );
            return Err(ImpactError::ApiStatus {
                status: status.as_u16(),
                body,
            });
        }

        Ok(parse_accepted(&body))
    }
}

/// Interpret the body of an accepted response.
fn parse_accepted(body: &str) -> SubmitOutcome {
    let value: serde_json::Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(_) => {
            tracing::warn!(
                "could not parse response as JSON: {}...",
                truncate_chars(body, WARNING_BODY_CHARS)
            );
            return SubmitOutcome::AcceptedWithoutId;
        }
    };

    if let Ok(pretty) = serde_json::to_string_pretty(&value) {
        tracing::debug!("response: {pretty}");
    }

    match job_id(&value) {
        Some(id) => {
            tracing::info!("impact analysis job created successfully. Job ID: {id}");
            SubmitOutcome::Created(JobRecord {
                impact_analysis_id: id,
            })
        }
        None => {
            tracing::warn!("response has no {JOB_ID_FIELD}");
            SubmitOutcome::AcceptedWithoutId
        }
    }
}

/// Job id from the response, if it can be written as a single output line.
fn job_id(value: &serde_json::Value) -> Option<String> {
    match value.get(JOB_ID_FIELD)? {
        serde_json::Value::String(s) if s.contains(['\r', '\n']) => {
            tracing::warn!("{JOB_ID_FIELD} spans multiple lines: {s:?}");
            None
        }
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// First `max` characters of `text`, never splitting a character.
fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
