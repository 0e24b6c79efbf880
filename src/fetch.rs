use crate::error::ScrapeError;
use reqwest::Client;
use tokio::sync::Mutex;
use tokio::time::{sleep, Duration, Instant};
use tracing::{debug, warn};
use url::Url;

const REQUEST_DELAY: Duration = Duration::from_millis(200);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const BACKOFF_BASE: Duration = Duration::from_millis(500);
const MAX_ATTEMPTS: u32 = 3;

/// Page retrieval boundary. Parsers only ever see the returned HTML text.
#[async_trait::async_trait]
pub trait Fetch {
    async fn fetch(&self, url: &Url) -> Result<String, ScrapeError>;
}

pub struct HttpFetcher {
    client: Client,
    last_request: Mutex<Option<Instant>>,
}

impl HttpFetcher {
    pub fn new() -> Result<HttpFetcher, reqwest::Error> {
        Ok(HttpFetcher {
            client: Client::builder().timeout(REQUEST_TIMEOUT).build()?,
            last_request: Mutex::new(None),
        })
    }

    async fn get(&self, url: &Url) -> Result<String, reqwest::Error> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await?
            .error_for_status()?;
        response.text().await
    }

    async fn wait_for_slot(&self) {
        let mut last_request = self.last_request.lock().await;
        if let Some(last) = last_request.take() {
            let elapsed = last.elapsed();
            if elapsed < REQUEST_DELAY {
                sleep(REQUEST_DELAY - elapsed).await;
            }
        }
        last_request.replace(Instant::now());
    }
}

#[async_trait::async_trait]
impl Fetch for HttpFetcher {
    // Transport and HTTP status failures are retried with a doubling backoff;
    // anything the caller makes of the page content is not.
    async fn fetch(&self, url: &Url) -> Result<String, ScrapeError> {
        let mut attempt = 0;
        loop {
            self.wait_for_slot().await;
            debug!("Visit {}", url);
            match self.get(url).await {
                Ok(html) => return Ok(html),
                Err(source) => {
                    attempt += 1;
                    if attempt >= MAX_ATTEMPTS {
                        return Err(ScrapeError::Fetch {
                            url: url.clone(),
                            source,
                        });
                    }
                    let backoff = BACKOFF_BASE * 2u32.pow(attempt - 1);
                    warn!(
                        "Attempt {} for {} failed ({}), retrying in {:?}",
                        attempt, url, source, backoff
                    );
                    sleep(backoff).await;
                }
            }
        }
    }
}
