use solar_analysis::{AnalysisOutput, AnalysisParams, SolarAnalyzer};
use std::time::{Duration, Instant};

use crate::error::ApiError;
use crate::models::AnalysisConfig;

/// Runs the analysis pipeline off the async runtime.
pub struct AnalysisService {
    defaults: AnalysisParams,
    timeout: Option<Duration>,
}

impl AnalysisService {
    /// A `timeout_secs` of 0 means no deadline.
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            defaults: config.params(),
            timeout: config
                .timeout_secs
                .filter(|&secs| secs > 0)
                .map(Duration::from_secs),
        }
    }

    /// Parameters used when a request does not override them
    pub fn defaults(&self) -> AnalysisParams {
        self.defaults
    }

    /// Analyze encoded image bytes.
    ///
    /// Uses spawn_blocking so that clustering never stalls the runtime. When a
    /// deadline is configured and exceeded, the request fails with
    /// [`ApiError::Timeout`] and the late result is dropped. The blocking
    /// task itself is not cancelled; it holds its pool thread until
    /// clustering finishes.
    pub async fn analyze(
        &self,
        bytes: Vec<u8>,
        params: AnalysisParams,
    ) -> Result<AnalysisOutput, ApiError> {
        let started = Instant::now();
        let size_bytes = bytes.len();
        let task =
            tokio::task::spawn_blocking(move || SolarAnalyzer::from_params(params).analyze(&bytes));

        let joined = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, task)
                .await
                .map_err(|_| ApiError::Timeout(limit.as_secs()))?,
            None => task.await,
        };

        let output = joined.map_err(|e| ApiError::Internal(format!("Analysis task failed: {e}")))??;

        tracing::info!(
            size_bytes,
            k = params.k,
            avg_brightness = output.metrics.avg_brightness,
            score = output.metrics.solar_potential_score,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Analysis finished"
        );

        Ok(output)
    }
}
