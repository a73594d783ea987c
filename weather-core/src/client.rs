use std::sync::Arc;

use crate::{
    WeatherError,
    model::{QueryType, ResponseFormat, WeatherQuery, WeatherResult},
    transport::{ReqwestTransport, Transport, TransportOptions},
};

/// AMap weather endpoint.
pub const ENDPOINT: &str = "https://restapi.amap.com/v3/weather/weatherInfo";

/// Stateless client for the AMap weather API.
///
/// Every call builds its own transport from the current
/// [`TransportOptions`], unless one was injected with
/// [`WeatherClient::with_transport`].
#[derive(Debug, Clone)]
pub struct WeatherClient {
    api_key: String,
    transport_options: TransportOptions,
    transport: Option<Arc<dyn Transport>>,
}

impl WeatherClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            transport_options: TransportOptions::default(),
            transport: None,
        }
    }

    /// Use `transport` for every request instead of building one from options.
    pub fn with_transport(api_key: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        Self { transport: Some(transport), ..Self::new(api_key) }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Replace the transport options wholesale.
    pub fn configure_transport(&mut self, options: TransportOptions) {
        self.transport_options = options;
    }

    pub fn transport_options(&self) -> &TransportOptions {
        &self.transport_options
    }

    /// Transport used for the next request.
    pub fn transport(&self) -> Result<Arc<dyn Transport>, WeatherError> {
        if let Some(transport) = &self.transport {
            return Ok(Arc::clone(transport));
        }

        let transport = ReqwestTransport::from_options(self.transport_options.clone())?;
        Ok(Arc::new(transport))
    }

    /// Query the provider.
    ///
    /// `kind` is `live` or `forecast` and `format` is `json` or `xml`, both
    /// case-insensitive. [`QueryType`] and [`ResponseFormat`] are accepted
    /// directly. Validation happens before any network activity.
    pub async fn query(
        &self,
        city: &str,
        kind: impl AsRef<str>,
        format: impl AsRef<str>,
    ) -> Result<WeatherResult, WeatherError> {
        let format = ResponseFormat::try_from(format.as_ref())?;
        let kind = QueryType::try_from(kind.as_ref())?;

        let query = WeatherQuery {
            key: self.api_key.clone(),
            city: city.to_owned(),
            output: format,
            extensions: kind,
        };

        tracing::debug!(city, %kind, %format, "querying weather");

        let body = self.transport()?.get(ENDPOINT, &query.params()).await?;

        WeatherResult::decode(format, body)
    }

    pub async fn get_live_weather(
        &self,
        city: &str,
        format: impl AsRef<str>,
    ) -> Result<WeatherResult, WeatherError> {
        self.query(city, QueryType::Live, format).await
    }

    pub async fn get_forecast_weather(
        &self,
        city: &str,
        format: impl AsRef<str>,
    ) -> Result<WeatherResult, WeatherError> {
        self.query(city, QueryType::Forecast, format).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::TransportError;
    use async_trait::async_trait;
    use serde_json::json;
    use std::error::Error as _;
    use std::sync::Mutex;

    type Call = (String, Vec<(String, String)>);

    #[derive(Debug)]
    struct FakeTransport {
        reply: Result<String, String>,
        calls: Mutex<Vec<Call>>,
    }

    impl FakeTransport {
        fn replying(body: &str) -> Arc<Self> {
            Arc::new(Self { reply: Ok(body.to_string()), calls: Mutex::default() })
        }

        fn failing(message: &str) -> Arc<Self> {
            Arc::new(Self { reply: Err(message.to_string()), calls: Mutex::default() })
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for FakeTransport {
        async fn get(&self, url: &str, query: &[(&str, String)]) -> Result<String, TransportError> {
            let params = query.iter().map(|(k, v)| (k.to_string(), v.clone())).collect();
            self.calls.lock().unwrap().push((url.to_string(), params));

            self.reply.clone().map_err(TransportError::new)
        }
    }

    fn expected_params(city: &str, output: &str, extensions: &str) -> Vec<(String, String)> {
        vec![
            ("key".into(), "mock-key".into()),
            ("city".into(), city.into()),
            ("output".into(), output.into()),
            ("extensions".into(), extensions.into()),
        ]
    }

    #[tokio::test]
    async fn json_query_with_defaults() {
        let fake = FakeTransport::replying(r#"{"success": true}"#);
        let client = WeatherClient::with_transport("mock-key", fake.clone());

        let result = client
            .query("深圳", QueryType::default(), ResponseFormat::default())
            .await
            .expect("query should succeed");

        assert_eq!(result.as_json(), json!({ "success": true }).as_object());
        assert_eq!(
            fake.calls(),
            vec![(ENDPOINT.to_string(), expected_params("深圳", "json", "base"))]
        );
    }

    #[tokio::test]
    async fn xml_forecast_returns_raw_body() {
        let fake = FakeTransport::replying("<hello>content</hello>");
        let client = WeatherClient::with_transport("mock-key", fake.clone());

        let result = client.query("深圳", "forecast", "xml").await.expect("query should succeed");

        assert_eq!(result, WeatherResult::Xml("<hello>content</hello>".to_string()));
        assert_eq!(fake.calls()[0].1, expected_params("深圳", "xml", "all"));
    }

    #[tokio::test]
    async fn type_and_format_are_case_insensitive() {
        let fake = FakeTransport::replying("<ok/>");
        let client = WeatherClient::with_transport("mock-key", fake.clone());

        client.query("深圳", "LIVE", "XML").await.expect("query should succeed");

        assert_eq!(fake.calls()[0].1, expected_params("深圳", "xml", "base"));
    }

    #[tokio::test]
    async fn invalid_format_fails_before_any_request() {
        let fake = FakeTransport::replying("{}");
        let client = WeatherClient::with_transport("mock-key", fake.clone());

        let err = client.query("深圳", "base", "array").await.unwrap_err();

        assert!(err.is_invalid_argument());
        assert_eq!(err.to_string(), "Invalid response format: array");
        assert!(fake.calls().is_empty());
    }

    #[tokio::test]
    async fn invalid_type_fails_before_any_request() {
        let fake = FakeTransport::replying("{}");
        let client = WeatherClient::with_transport("mock-key", fake.clone());

        let err = client.query("深圳", "foo", "json").await.unwrap_err();

        assert!(err.is_invalid_argument());
        assert_eq!(err.to_string(), "Invalid type value(live/forecast): foo");
        assert!(fake.calls().is_empty());
    }

    #[tokio::test]
    async fn transport_failure_becomes_http_error() {
        let client =
            WeatherClient::with_transport("mock-key", FakeTransport::failing("request timeout"));

        let err = client.get_live_weather("深圳", "json").await.unwrap_err();

        match &err {
            WeatherError::Http { message, code, .. } => {
                assert_eq!(message, "request timeout");
                assert_eq!(*code, None);
            }
            other => panic!("expected Http error, got {other:?}"),
        }
        assert_eq!(err.to_string(), "request timeout");
        assert!(err.source().is_some());
    }

    #[tokio::test]
    async fn malformed_json_is_a_decode_error() {
        let client = WeatherClient::with_transport("mock-key", FakeTransport::replying("<html>"));

        let err = client.get_live_weather("深圳", "json").await.unwrap_err();

        assert!(matches!(err, WeatherError::Decode(_)));
    }

    #[tokio::test]
    async fn empty_key_and_city_are_omitted() {
        let fake = FakeTransport::replying("{}");
        let client = WeatherClient::with_transport("", fake.clone());

        client.get_forecast_weather("", "json").await.expect("query should succeed");

        assert_eq!(
            fake.calls()[0].1,
            vec![
                ("output".to_string(), "json".to_string()),
                ("extensions".to_string(), "all".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn convenience_methods_match_query() {
        let fake = FakeTransport::replying(r#"{"success": true}"#);
        let client = WeatherClient::with_transport("mock-key", fake.clone());

        let live = client.get_live_weather("深圳", ResponseFormat::Json).await.unwrap();
        let queried = client.query("深圳", QueryType::Live, ResponseFormat::Json).await.unwrap();
        assert_eq!(live, queried);

        let forecast = client.get_forecast_weather("深圳", "json").await.unwrap();
        let queried = client.query("深圳", "forecast", "json").await.unwrap();
        assert_eq!(forecast, queried);

        let calls = fake.calls();
        assert_eq!(calls[0], calls[1]);
        assert_eq!(calls[2], calls[3]);
        assert_eq!(calls[2].1, expected_params("深圳", "json", "all"));
    }

    #[test]
    fn default_transport_is_reqwest() {
        let client = WeatherClient::new("mock-key");
        let transport = client.transport().expect("default transport builds");

        assert_eq!(transport.option("timeout"), None);
        assert_eq!(client.api_key(), "mock-key");
    }

    #[test]
    fn configure_transport_replaces_options() {
        let mut client = WeatherClient::new("mock-key");

        client.configure_transport(
            TransportOptions::new().with("timeout", 5000).with("proxy", "http://127.0.0.1:3128"),
        );
        client.configure_transport(TransportOptions::new().with("timeout", 5000));

        let transport = client.transport().expect("transport builds");
        assert_eq!(transport.option("timeout"), Some(&json!(5000)));
        assert_eq!(transport.option("proxy"), None);
        assert_eq!(client.transport_options().len(), 1);
    }

    #[test]
    fn bad_transport_options_surface_as_http_error() {
        let mut client = WeatherClient::new("mock-key");
        client.configure_transport(TransportOptions::new().with("timeout", "forever"));

        let err = client.transport().unwrap_err();
        assert!(matches!(err, WeatherError::Http { .. }));

        client.configure_transport(TransportOptions::new().with("timeout", 1e20));
        let err = client.transport().unwrap_err();
        assert!(matches!(err, WeatherError::Http { .. }));
    }
}
