use super::common::normalize_response;
use crate::config::ProviderConfig;
use crate::domain::errors::ProviderError;
use crate::domain::market::{Series, WindowSpec};
use crate::domain::ports::PriceHistoryProvider;
use crate::infrastructure::core::HttpClientFactory;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest_middleware::ClientWithMiddleware;
use serde_json::Value;
use tracing::{debug, error};
use url::Url;

/// Fetches price histories from the upstream stock price API.
///
/// `GET {base_url}/stocks/{ticker}?minutes={n}` with a bearer token.
pub struct HttpPriceProvider {
    client: ClientWithMiddleware,
    base_url: Url,
    api_token: String,
}

impl HttpPriceProvider {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .with_context(|| format!("Invalid PRICE_API_BASE_URL: {}", config.base_url))?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("PRICE_API_BASE_URL must be a hierarchical URL: {}", base_url);
        }

        Ok(Self {
            client: HttpClientFactory::create_client(config)?,
            base_url,
            api_token: config.api_token.clone(),
        })
    }

    /// URL of an instrument's price history; the ticker is percent-encoded as a path segment.
    pub fn history_url(&self, instrument: &str, window: WindowSpec) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("stocks").push(instrument);
        }
        url.query_pairs_mut()
            .append_pair("minutes", &window.minutes().to_string());
        url
    }
}

#[async_trait]
impl PriceHistoryProvider for HttpPriceProvider {
    async fn fetch_raw_series(
        &self,
        instrument: &str,
        window: WindowSpec,
    ) -> Result<Series, ProviderError> {
        let url = self.history_url(instrument, window);
        debug!("HttpPriceProvider: GET {}", url);

        let response = self
            .client
            .get(url)
            .header(AUTHORIZATION, format!("Bearer {}", self.api_token))
            .send()
            .await
            .map_err(|e| ProviderError::Transport {
                instrument: instrument.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(
                "HttpPriceProvider: {} returned {}: {}",
                instrument, status, body
            );
            return Err(ProviderError::Status {
                instrument: instrument.to_string(),
                status: status.as_u16(),
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ProviderError::MalformedResponse {
                instrument: instrument.to_string(),
                reason: e.to_string(),
            })?;

        let series = normalize_response(instrument, body)?;
        debug!(
            "HttpPriceProvider: {} observations for {}",
            series.len(),
            instrument
        );
        Ok(series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    fn provider(base_url: &str) -> Result<HttpPriceProvider> {
        HttpPriceProvider::new(&ProviderConfig {
            base_url: base_url.to_string(),
            ..ProviderConfig::default()
        })
    }

    #[test]
    fn test_history_url() {
        let provider = provider("http://20.244.56.144/evaluation-service").unwrap();
        let url = provider.history_url("NVDA", WindowSpec::new(50).unwrap());

        assert_eq!(
            url.as_str(),
            "http://20.244.56.144/evaluation-service/stocks/NVDA?minutes=50"
        );
    }

    #[test]
    fn test_history_url_trailing_slash_and_encoding() {
        let provider = provider("http://localhost:3000/api/").unwrap();
        let url = provider.history_url("BRK/B", WindowSpec::new(5).unwrap());

        assert_eq!(url.as_str(), "http://localhost:3000/api/stocks/BRK%2FB?minutes=5");
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        assert!(provider("not a url").is_err());
        assert!(provider("mailto:prices@example.com").is_err());
    }

    /// Serves one canned HTTP response on a local port. The handle yields the
    /// raw request head the client sent.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&request).into_owned()
        });

        (base_url, handle)
    }

    fn authed_provider(base_url: &str) -> HttpPriceProvider {
        HttpPriceProvider::new(&ProviderConfig {
            base_url: base_url.to_string(),
            api_token: "test-token".to_string(),
            ..ProviderConfig::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_fetch_sends_bearer_token_and_parses_history() {
        let (base_url, server) = serve_once(
            "200 OK",
            r#"[{"price":231.95,"lastUpdatedAt":"2025-05-08T04:11:42Z"},{"price":124.95,"lastUpdatedAt":"2025-05-08T04:14:39Z"}]"#,
        )
        .await;

        let series = authed_provider(&base_url)
            .fetch_raw_series("NVDA", WindowSpec::new(30).unwrap())
            .await
            .unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].price, 231.95);

        let request = server.await.unwrap().to_lowercase();
        assert!(request.starts_with("get /stocks/nvda?minutes=30 "), "{}", request);
        assert!(request.contains("authorization: bearer test-token"), "{}", request);
    }

    #[tokio::test]
    async fn test_fetch_maps_error_status() {
        let (base_url, server) =
            serve_once("503 Service Unavailable", r#"{"message":"down"}"#).await;

        let err = authed_provider(&base_url)
            .fetch_raw_series("PYPL", WindowSpec::new(10).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ProviderError::Status { ref instrument, status: 503 } if instrument == "PYPL"
        ));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_fetch_maps_undecodable_body() {
        let (base_url, server) = serve_once("200 OK", "<html>maintenance</html>").await;

        let err = authed_provider(&base_url)
            .fetch_raw_series("AMD", WindowSpec::new(10).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::MalformedResponse { .. }));
        server.await.unwrap();
    }
}
