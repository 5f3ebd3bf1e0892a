//! HTTP client with retry for reads and fail-fast writes.

use anyhow::{Context, Result};
use log::{debug, warn};
use reqwest::Client;
use serde::de::DeserializeOwned;

use super::retry::{MAX_ATTEMPTS, NonRetryableError, RETRY_DELAY_MS, check_response};

/// Thin wrapper over a configured `reqwest::Client`.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// GET and deserialize a JSON body. Retries transient failures.
    #[tracing::instrument(skip(self))]
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        self.get_json_with_query(url, &[]).await
    }

    /// GET with query parameters and deserialize a JSON body. Retries transient failures.
    #[tracing::instrument(skip(self, query))]
    pub async fn get_json_with_query<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        debug!("GET {} with query {:?}...", url, query);

        self.with_retry("GET", || async {
            let response = self
                .client
                .get(url)
                .query(query)
                .send()
                .await
                .context("Failed to send request to GitHub API")?;

            let response = check_response(response)?;

            response
                .json::<T>()
                .await
                .context("Failed to parse JSON response from GitHub API")
        })
        .await
    }

    /// DELETE a resource. Never retried: a failed delete is reported as is.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, url: &str) -> Result<()> {
        debug!("DELETE {}...", url);

        let response = self
            .client
            .delete(url)
            .send()
            .await
            .context("Failed to send request to GitHub API")?;

        check_response(response)?;
        Ok(())
    }

    async fn with_retry<F, Fut, T>(&self, operation_name: &str, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let mut last_error = None;

        for attempt in 1..=MAX_ATTEMPTS {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    if !is_retryable_error(&e) {
                        debug!("{}: non-retryable error: {}", operation_name, e);
                        return Err(e);
                    }

                    if attempt < MAX_ATTEMPTS {
                        warn!(
                            "{}: attempt {}/{} failed ({}), retrying in {}ms...",
                            operation_name, attempt, MAX_ATTEMPTS, e, RETRY_DELAY_MS
                        );
                        tokio::time::sleep(std::time::Duration::from_millis(RETRY_DELAY_MS)).await;
                    }
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            anyhow::anyhow!("{}: failed after {} attempts", operation_name, MAX_ATTEMPTS)
        }))
    }
}

fn is_retryable_error(e: &anyhow::Error) -> bool {
    if e.downcast_ref::<NonRetryableError>().is_some() {
        return false;
    }
    // A body that does not parse will not parse next time either.
    if e.downcast_ref::<reqwest::Error>().is_some_and(|re| re.is_decode()) {
        return false;
    }
    true
}
