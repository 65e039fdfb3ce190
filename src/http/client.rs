//! Low-level HTTP client — `NorenHttp`.
//!
//! Every OMS endpoint is a POST whose body is `jData=<json>`, followed by
//! `&jKey=<session token>` once logged in. Replies are JSON. This layer
//! only moves bytes: it returns the decoded reply (or `None` if the body
//! was not JSON) and leaves the `stat` check to the sub-clients.

use crate::config::ServiceConfig;
use crate::error::HttpError;
use crate::http::retry::{RetryConfig, RetryPolicy};

use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

/// Fields scrubbed from payloads and replies before they are logged.
const REDACTED_FIELDS: &[&str] = &["pwd", "appkey", "factor2", "susertoken"];

/// Low-level HTTP client for the OMS REST API.
#[derive(Debug, Clone)]
pub struct NorenHttp {
    config: ServiceConfig,
    client: Client,
}

impl NorenHttp {
    pub fn new(config: ServiceConfig) -> Result<Self, HttpError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .pool_max_idle_per_host(10)
            .build()?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// POST `payload` to `route`.
    ///
    /// `token` is appended as `jKey` when present. Returns `Ok(None)` when
    /// the reply body is not valid JSON.
    pub async fn post<B: Serialize>(
        &self,
        route: &str,
        payload: &B,
        token: Option<&str>,
        retry: RetryPolicy,
    ) -> Result<Option<Value>, HttpError> {
        let url = self.config.url(route);
        let body = form_body(payload, token)?;

        if tracing::enabled!(tracing::Level::DEBUG) {
            tracing::debug!(url = %url, payload = %redacted(payload), "POST");
        }

        let text = self.request_with_retry(&url, &body, retry).await?;

        match serde_json::from_str::<Value>(&text) {
            Ok(value) => {
                if tracing::enabled!(tracing::Level::DEBUG) {
                    tracing::debug!(url = %url, reply = %redacted(&value), "Reply");
                }
                Ok(Some(value))
            }
            Err(e) => {
                tracing::warn!(url = %url, len = text.len(), "Reply is not JSON: {}", e);
                Ok(None)
            }
        }
    }

    // ── Internal HTTP methods ────────────────────────────────────────────

    async fn request_with_retry(
        &self,
        url: &str,
        body: &str,
        retry: RetryPolicy,
    ) -> Result<String, HttpError> {
        let config = match &retry {
            RetryPolicy::None => {
                return self.do_request(url, body).await;
            }
            RetryPolicy::Idempotent => RetryConfig::idempotent(),
            RetryPolicy::Custom(c) => c.clone(),
        };

        let mut last_error = None;

        for attempt in 0..=config.max_retries {
            match self.do_request(url, body).await {
                Ok(resp) => return Ok(resp),
                Err(e) => {
                    let should_retry = match &e {
                        HttpError::ServerError { status, .. } => {
                            config.retryable_statuses.contains(status)
                        }
                        HttpError::RateLimited { retry_after_ms } => {
                            if let Some(ms) = retry_after_ms {
                                futures_timer::Delay::new(Duration::from_millis(*ms)).await;
                            }
                            config.retryable_statuses.contains(&429)
                        }
                        HttpError::Timeout => true,
                        HttpError::Reqwest(re) => {
                            re.is_connect() || re.is_timeout() || re.is_request()
                        }
                        _ => false,
                    };

                    if should_retry && attempt < config.max_retries {
                        let delay = config.delay_for_attempt(attempt);
                        tracing::debug!(
                            attempt = attempt + 1,
                            max = config.max_retries,
                            delay_ms = delay.as_millis() as u64,
                            "Retrying request to {}",
                            url
                        );
                        futures_timer::Delay::new(delay).await;
                        last_error = Some(e);
                    } else {
                        return Err(e);
                    }
                }
            }
        }

        Err(HttpError::MaxRetriesExceeded {
            attempts: config.max_retries + 1,
            last_error: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "unknown".to_string()),
        })
    }

    async fn do_request(&self, url: &str, body: &str) -> Result<String, HttpError> {
        let resp = self
            .client
            .post(url)
            .body(body.to_string())
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    HttpError::Timeout
                } else {
                    HttpError::Reqwest(e)
                }
            })?;
        let status = resp.status();

        if status.is_success() {
            return Ok(resp.text().await?);
        }

        let status_code = status.as_u16();
        let retry_after_ms = resp
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(|secs| secs * 1000);
        let body_text = resp.text().await.unwrap_or_default();

        match status_code {
            401 => Err(HttpError::Unauthorized),
            404 => Err(HttpError::NotFound(body_text)),
            429 => Err(HttpError::RateLimited { retry_after_ms }),
            400..=499 => Err(HttpError::BadRequest(body_text)),
            _ => Err(HttpError::ServerError {
                status: status_code,
                body: body_text,
            }),
        }
    }
}

/// `jData=<json>[&jKey=<token>]`. The JSON is sent as-is, not URL-encoded.
pub(crate) fn form_body<B: Serialize>(payload: &B, token: Option<&str>) -> Result<String, HttpError> {
    let json = serde_json::to_string(payload)
        .map_err(|e| HttpError::BadRequest(format!("unserializable payload: {}", e)))?;
    Ok(match token {
        Some(token) => format!("jData={}&jKey={}", json, token),
        None => format!("jData={}", json),
    })
}

fn redacted<B: Serialize>(payload: &B) -> String {
    let mut value = match serde_json::to_value(payload) {
        Ok(v) => v,
        Err(_) => return "<unserializable>".into(),
    };
    scrub(&mut value);
    value.to_string()
}

fn scrub(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, v) in map.iter_mut() {
                if REDACTED_FIELDS.contains(&key.as_str()) {
                    *v = Value::String("<redacted>".into());
                } else {
                    scrub(v);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(scrub),
        _ => {}
    }
}
