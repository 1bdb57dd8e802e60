use crate::error::ApiError;
use crate::types::verse::{UpstreamVerse, Verse};
use backon::{ExponentialBuilder, Retryable};
use rand::Rng;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Ayah numbers the proxy picks from (the opening surah).
pub const AYAH_RANGE: std::ops::RangeInclusive<u32> = 1..=7;

fn default_retry_policy() -> ExponentialBuilder {
    ExponentialBuilder::default()
        .with_min_delay(Duration::from_millis(100))
        .with_max_delay(Duration::from_millis(400))
        .with_max_times(2)
}

/// Outbound client for the random-verse endpoint.
#[derive(Clone)]
pub struct VerseApi {
    client: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

impl VerseApi {
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("accounts-gateway/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            base_url,
            timeout,
        })
    }

    pub fn verse_url(&self, ayah: u32) -> Result<Url, ApiError> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}/{ayah}.json"))?)
    }

    pub async fn random_verse(&self) -> Result<Verse, ApiError> {
        let ayah = rand::thread_rng().gen_range(AYAH_RANGE);
        self.fetch_verse(ayah).await
    }

    /// Fetch one ayah. The whole exchange, retries included, is capped by `timeout`.
    pub async fn fetch_verse(&self, ayah: u32) -> Result<Verse, ApiError> {
        let url = self.verse_url(ayah)?;
        debug!(%url, "fetching verse");

        let attempt = || async {
            let resp = self.client.get(url.clone()).send().await?;
            let status = resp.status();
            if status.is_server_error() {
                warn!(%status, "verse upstream server error (will retry)");
                return Err(ApiError::UpstreamStatus(status));
            }
            if !status.is_success() {
                return Err(ApiError::UpstreamStatus(status));
            }
            let upstream: UpstreamVerse = resp.json().await?;
            Ok::<_, ApiError>(upstream)
        };

        let upstream = tokio::time::timeout(
            self.timeout,
            attempt
                .retry(default_retry_policy())
                .when(|e| matches!(e, ApiError::UpstreamStatus(s) if s.is_server_error())),
        )
        .await
        .map_err(|_| ApiError::UpstreamTimeout(self.timeout))??;

        Ok(upstream.into())
    }
}
