//! HTTP transport abstraction used by [`WeatherClient`](crate::WeatherClient).
//!
//! The client only needs "GET this URL with these query parameters and give
//! me the body back". Anything richer (timeouts, proxies, TLS policy) lives
//! in the transport and is driven by [`TransportOptions`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::Debug;
use thiserror::Error;

pub mod http;

pub use http::ReqwestTransport;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[async_trait]
pub trait Transport: Send + Sync + Debug {
    /// Perform a GET request and return the full response body as text.
    async fn get(&self, url: &str, query: &[(&str, String)]) -> Result<String, TransportError>;

    /// Look up a configuration value this transport was built with.
    fn option(&self, _key: &str) -> Option<&Value> {
        None
    }
}

/// Failure reported by a [`Transport`].
#[derive(Debug, Error)]
#[error("{message}")]
pub struct TransportError {
    message: String,
    code: Option<u16>,
    #[source]
    source: Option<BoxError>,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into(), code: None, source: None }
    }

    pub fn with_code(message: impl Into<String>, code: u16) -> Self {
        Self { message: message.into(), code: Some(code), source: None }
    }

    /// Attach the underlying error so callers can walk the cause chain.
    pub fn caused_by(mut self, source: impl Into<BoxError>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn code(&self) -> Option<u16> {
        self.code
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        Self {
            message: err.to_string(),
            code: err.status().map(|s| s.as_u16()),
            source: Some(Box::new(err)),
        }
    }
}

/// Loosely-typed transport configuration.
///
/// The client never looks inside; it hands the whole map to the transport
/// constructor. See [`ReqwestTransport::from_options`] for the keys the
/// default transport understands.
///
/// Example TOML:
/// [transport]
/// timeout = 5
/// proxy = "http://127.0.0.1:8080"
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransportOptions(Map<String, Value>);

impl TransportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

impl<K, V> FromIterator<(K, V)> for TransportOptions
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
