use serde_json::{Map, Value};
use std::fmt;

use crate::{WeatherError, report::WeatherReport};

/// Which dataset to request from the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum QueryType {
    /// Current conditions.
    #[default]
    Live,
    /// Multi-day forecast.
    Forecast,
}

impl QueryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryType::Live => "live",
            QueryType::Forecast => "forecast",
        }
    }

    /// Value of the provider's `extensions` parameter.
    pub fn code(&self) -> &'static str {
        match self {
            QueryType::Live => "base",
            QueryType::Forecast => "all",
        }
    }

    pub const fn all() -> &'static [QueryType] {
        &[QueryType::Live, QueryType::Forecast]
    }
}

impl fmt::Display for QueryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for QueryType {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl TryFrom<&str> for QueryType {
    type Error = WeatherError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "live" => Ok(QueryType::Live),
            "forecast" => Ok(QueryType::Forecast),
            _ => Err(WeatherError::invalid_argument(format!(
                "Invalid type value(live/forecast): {value}"
            ))),
        }
    }
}

/// Body format requested from the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ResponseFormat {
    #[default]
    Json,
    Xml,
}

impl ResponseFormat {
    /// Value of the provider's `output` parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseFormat::Json => "json",
            ResponseFormat::Xml => "xml",
        }
    }

    pub const fn all() -> &'static [ResponseFormat] {
        &[ResponseFormat::Json, ResponseFormat::Xml]
    }
}

impl fmt::Display for ResponseFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for ResponseFormat {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl TryFrom<&str> for ResponseFormat {
    type Error = WeatherError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "json" => Ok(ResponseFormat::Json),
            "xml" => Ok(ResponseFormat::Xml),
            _ => Err(WeatherError::invalid_argument(format!("Invalid response format: {value}"))),
        }
    }
}

/// Parameters of a single provider request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherQuery {
    pub key: String,
    pub city: String,
    pub output: ResponseFormat,
    pub extensions: QueryType,
}

impl WeatherQuery {
    /// Query-string pairs in provider order, with empty values dropped.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        [
            ("key", self.key.as_str()),
            ("city", self.city.as_str()),
            ("output", self.output.as_str()),
            ("extensions", self.extensions.code()),
        ]
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(name, value)| (name, value.to_owned()))
        .collect()
    }
}

/// Decoded provider response.
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherResult {
    Json(Map<String, Value>),
    /// Raw XML text, untouched.
    Xml(String),
}

impl WeatherResult {
    pub fn decode(format: ResponseFormat, body: String) -> Result<Self, WeatherError> {
        match format {
            ResponseFormat::Json => Ok(WeatherResult::Json(serde_json::from_str(&body)?)),
            ResponseFormat::Xml => Ok(WeatherResult::Xml(body)),
        }
    }

    pub fn format(&self) -> ResponseFormat {
        match self {
            WeatherResult::Json(_) => ResponseFormat::Json,
            WeatherResult::Xml(_) => ResponseFormat::Xml,
        }
    }

    pub fn as_json(&self) -> Option<&Map<String, Value>> {
        match self {
            WeatherResult::Json(map) => Some(map),
            WeatherResult::Xml(_) => None,
        }
    }

    pub fn as_xml(&self) -> Option<&str> {
        match self {
            WeatherResult::Json(_) => None,
            WeatherResult::Xml(text) => Some(text),
        }
    }

    /// Typed view over a JSON result.
    pub fn report(&self) -> Result<WeatherReport, WeatherError> {
        match self {
            WeatherResult::Json(map) => Ok(WeatherReport::deserialize_map(map)?),
            WeatherResult::Xml(_) => Err(WeatherError::invalid_argument(
                "A structured report requires a JSON response",
            )),
        }
    }
}
