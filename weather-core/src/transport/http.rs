use async_trait::async_trait;
use reqwest::{Client, Proxy};
use serde_json::Value;
use std::time::Duration;

use super::{Transport, TransportError, TransportOptions};

/// Default [`Transport`] backed by `reqwest`.
///
/// Recognised options:
/// - `timeout`, `connect_timeout`: seconds (fractions allowed, `0` disables)
/// - `proxy`: proxy URL applied to every scheme
/// - `user_agent`: User-Agent header value
/// - `verify`: `false` accepts invalid TLS certificates
/// - `http_errors`: `false` returns non-2xx bodies instead of failing
///
/// Unknown keys are kept and reported by [`Transport::option`] but otherwise ignored.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: Client,
    options: TransportOptions,
    http_errors: bool,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self { http: Client::new(), options: TransportOptions::default(), http_errors: true }
    }

    pub fn from_options(options: TransportOptions) -> Result<Self, TransportError> {
        let mut builder = Client::builder();
        let mut http_errors = true;

        for (key, value) in options.iter() {
            match key.as_str() {
                "timeout" => {
                    if let Some(d) = seconds(key, value)? {
                        builder = builder.timeout(d);
                    }
                }
                "connect_timeout" => {
                    if let Some(d) = seconds(key, value)? {
                        builder = builder.connect_timeout(d);
                    }
                }
                "proxy" => {
                    let url = string(key, value)?;
                    let proxy = Proxy::all(url).map_err(|e| {
                        TransportError::new(format!("Invalid proxy URL '{url}'")).caused_by(e)
                    })?;
                    builder = builder.proxy(proxy);
                }
                "user_agent" => builder = builder.user_agent(string(key, value)?),
                "verify" => builder = builder.danger_accept_invalid_certs(!boolean(key, value)?),
                "http_errors" => http_errors = boolean(key, value)?,
                other => tracing::debug!(option = other, "ignoring unrecognised transport option"),
            }
        }

        let http = builder.build()?;

        Ok(Self { http, options, http_errors })
    }

    pub fn options(&self) -> &TransportOptions {
        &self.options
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, url: &str, query: &[(&str, String)]) -> Result<String, TransportError> {
        tracing::debug!(url, params = query.len(), "sending GET request");

        let res = self.http.get(url).query(query).send().await?;

        let status = res.status();
        let body = res.text().await?;

        tracing::trace!(%status, bytes = body.len(), "received response");

        if self.http_errors && !status.is_success() {
            return Err(TransportError::with_code(
                format!("GET {url} failed with status {status}: {}", truncate_body(&body)),
                status.as_u16(),
            ));
        }

        Ok(body)
    }

    fn option(&self, key: &str) -> Option<&Value> {
        self.options.get(key)
    }
}

fn seconds(key: &str, value: &Value) -> Result<Option<Duration>, TransportError> {
    let invalid = || invalid_option(key, "a non-negative number of seconds", value);

    let secs = value.as_f64().ok_or_else(invalid)?;
    if secs == 0.0 {
        return Ok(None);
    }

    Duration::try_from_secs_f64(secs).map(Some).map_err(|_| invalid())
}

fn string<'a>(key: &str, value: &'a Value) -> Result<&'a str, TransportError> {
    value.as_str().ok_or_else(|| invalid_option(key, "a string", value))
}

fn boolean(key: &str, value: &Value) -> Result<bool, TransportError> {
    value.as_bool().ok_or_else(|| invalid_option(key, "a boolean", value))
}

fn invalid_option(key: &str, expected: &str, value: &Value) -> TransportError {
    TransportError::new(format!("Transport option '{key}' must be {expected}, got {value}"))
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
