use std::time::Duration;

use rand::Rng;
use reqwest::{Method, StatusCode, header};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::page::Page;

/// Authenticated client for the control-plane API.
///
/// All requests carry HTTP Basic auth and `Accept: application/json`.
/// HTTP 429 responses are retried with exponential backoff; 404 and 204
/// map to `Ok(None)`.
pub struct ApiClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        // Fail fast on a malformed endpoint instead of per request.
        url::Url::parse(&config.endpoint)?;
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .danger_accept_invalid_certs(config.danger_accept_invalid_certs)
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { http, config })
    }

    /// The configured endpoint base URL.
    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.endpoint, path)
    }

    pub async fn get(&self, path: &str) -> Result<Option<Value>, ApiError> {
        self.execute(Method::GET, &self.url(path), &[], None).await
    }

    pub async fn get_query(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Option<Value>, ApiError> {
        self.execute(Method::GET, &self.url(path), query, None).await
    }

    pub async fn post(&self, path: &str, body: &Value) -> Result<Option<Value>, ApiError> {
        self.execute(Method::POST, &self.url(path), &[], Some(body))
            .await
    }

    pub async fn patch(&self, path: &str, body: &Value) -> Result<Option<Value>, ApiError> {
        self.execute(Method::PATCH, &self.url(path), &[], Some(body))
            .await
    }

    pub async fn put(&self, path: &str, body: Option<&Value>) -> Result<Option<Value>, ApiError> {
        self.execute(Method::PUT, &self.url(path), &[], body).await
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.execute(Method::DELETE, &self.url(path), &[], None)
            .await?;
        Ok(())
    }

    pub async fn delete_query(&self, path: &str, query: &[(&str, String)]) -> Result<(), ApiError> {
        self.execute(Method::DELETE, &self.url(path), query, None)
            .await?;
        Ok(())
    }

    /// Fetches a whole collection, following `metadata.next` cursors until
    /// exhausted. Always requests `page_size=100` unless the caller set one.
    pub async fn get_all_pages(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<Value>, ApiError> {
        let mut query: Vec<(&str, String)> = query.to_vec();
        if !query.iter().any(|(key, _)| *key == "page_size") {
            query.push(("page_size", "100".to_string()));
        }

        let Some(first) = self
            .execute(Method::GET, &self.url(path), &query, None)
            .await?
        else {
            return Ok(Vec::new());
        };

        let mut page: Page = serde_json::from_value(first)?;
        let mut rows = std::mem::take(&mut page.data);
        let mut next = page.metadata.next;

        // The cursor is an absolute URL minted by the server; follow it
        // verbatim, without re-applying the original query string.
        while let Some(next_url) = next {
            debug!(url = %next_url, "following pagination cursor");
            let Some(value) = self.execute(Method::GET, &next_url, &[], None).await? else {
                break;
            };
            let mut p: Page = serde_json::from_value(value)?;
            rows.append(&mut p.data);
            next = p.metadata.next;
        }

        Ok(rows)
    }

    async fn execute(
        &self,
        method: Method,
        url: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<Option<Value>, ApiError> {
        let mut attempt: u32 = 0;
        loop {
            debug!(%method, url, attempt, "control-plane request");
            let mut request = self
                .http
                .request(method.clone(), url)
                .basic_auth(&self.config.api_key, Some(&self.config.api_secret))
                .header(header::ACCEPT, "application/json");
            if !query.is_empty() {
                request = request.query(query);
            }
            if let Some(body) = body {
                request = request.json(body);
            }

            let response = request.send().await?;
            let status = response.status();

            if status == StatusCode::TOO_MANY_REQUESTS && attempt < self.config.retries {
                let delay = backoff_delay(attempt, self.config.retry_max_delay);
                warn!(
                    url,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "rate limited, backing off"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
                continue;
            }

            return handle_response(response).await;
        }
    }
}

/// Exponential backoff with jitter: 2^attempt seconds capped at
/// `max_delay`, plus up to one second of randomness.
fn backoff_delay(attempt: u32, max_delay: Duration) -> Duration {
    let base = Duration::from_secs(2u64.saturating_pow(attempt)).min(max_delay);
    let jitter = Duration::from_millis(rand::thread_rng().gen_range(0..1000));
    base + jitter
}

async fn handle_response(response: reqwest::Response) -> Result<Option<Value>, ApiError> {
    let status = response.status();

    // An absent resource is an ordinary current state, not an error.
    if status == StatusCode::NOT_FOUND || status == StatusCode::NO_CONTENT {
        return Ok(None);
    }

    let body = response.text().await.unwrap_or_default();

    if !status.is_success() {
        return Err(ApiError::Status { status, body });
    }

    if body.is_empty() {
        return Ok(None);
    }

    Ok(Some(serde_json::from_str(&body)?))
}
