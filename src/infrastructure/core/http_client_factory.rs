use crate::config::ProviderConfig;
use anyhow::{Context, Result};
use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use std::time::Duration;

const MAX_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

pub struct HttpClientFactory;

impl HttpClientFactory {
    /// Creates an HTTP client bounded by the provider timeout.
    ///
    /// Transient failures are retried with exponential backoff only when
    /// `max_retries` is non-zero; by default each fetch is a single attempt.
    pub fn create_client(config: &ProviderConfig) -> Result<ClientWithMiddleware> {
        let timeout = config.timeout();
        let client = Client::builder()
            .pool_max_idle_per_host(5)
            .timeout(timeout)
            .connect_timeout(timeout.min(MAX_CONNECT_TIMEOUT))
            .build()
            .context("Failed to build HTTP client")?;

        let mut builder = ClientBuilder::new(client);
        if config.max_retries > 0 {
            let retry_policy =
                ExponentialBackoff::builder().build_with_max_retries(config.max_retries);
            builder = builder.with(RetryTransientMiddleware::new_with_policy(retry_policy));
        }
        Ok(builder.build())
    }
}
