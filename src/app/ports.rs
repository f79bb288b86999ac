use async_trait::async_trait;

use crate::error::Result;

/// Outbound HTTP boundary. The pipeline only ever issues GETs against fixed
/// URLs, so a single method is enough; tests substitute canned responses.
#[async_trait]
pub trait HttpClientPort: Send + Sync {
    async fn get(&self, url: &str) -> Result<HttpGetResult>;
}

#[derive(Clone, Debug)]
pub struct HttpGetResult {
    pub status: u16,
    pub bytes: Vec<u8>,
    pub content_type: String,
}

impl HttpGetResult {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
