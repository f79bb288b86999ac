use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;
use tracing::debug;

use crate::app::ports::{HttpClientPort, HttpGetResult};
use crate::error::Result;

pub struct ReqwestHttp {
    client: reqwest::Client,
}

impl ReqwestHttp {
    /// Build the shared client. Builder failures (TLS backend, proxy
    /// settings) are returned to the caller.
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("alberta_wages/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(300))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClientPort for ReqwestHttp {
    async fn get(&self, url: &str) -> Result<HttpGetResult> {
        let resp = self.client.get(url).send().await?;
        let status = resp.status().as_u16();
        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = resp.bytes().await?.to_vec();
        debug!(url, status, content_type = %content_type, bytes = bytes.len(), "GET complete");
        Ok(HttpGetResult {
            status,
            bytes,
            content_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_builds_client() {
        assert!(ReqwestHttp::new().is_ok());
    }

    #[tokio::test]
    async fn test_unreachable_host_is_http_error() {
        let http = ReqwestHttp::new().unwrap();
        let err = http.get("http://127.0.0.1:9/unreachable").await.unwrap_err();
        assert!(matches!(err, crate::error::PipelineError::Http(_)));
    }
}
