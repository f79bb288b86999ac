//! Upstream sources: the Statistics Canada table service and the Job Bank
//! wage report page.

pub mod job_bank;
pub mod statcan;

use metrics::histogram;
use std::time::Instant;

use crate::app::ports::{HttpClientPort, HttpGetResult};
use crate::error::{PipelineError, Result};

/// GET `url`, treating any non-2xx status as fatal.
pub(crate) async fn get_checked(
    http: &dyn HttpClientPort,
    source: &'static str,
    url: &str,
) -> Result<HttpGetResult> {
    let started = Instant::now();
    let resp = http.get(url).await?;
    histogram!("alberta_wages_fetch_duration_seconds", "source" => source)
        .record(started.elapsed().as_secs_f64());

    if !resp.is_success() {
        return Err(PipelineError::HttpStatus {
            status: resp.status,
            url: url.to_string(),
        });
    }
    Ok(resp)
}
