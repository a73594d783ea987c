use thiserror::Error;

use crate::transport::TransportError;

/// Errors returned by [`WeatherClient`](crate::WeatherClient).
#[derive(Debug, Error)]
pub enum WeatherError {
    /// Caller supplied a malformed query type or response format.
    /// Raised before any network activity.
    #[error("{0}")]
    InvalidArgument(String),

    /// The transport failed to deliver a response.
    #[error("{message}")]
    Http {
        message: String,
        code: Option<u16>,
        #[source]
        source: TransportError,
    },

    /// The provider answered `output=json` with a body that is not a JSON object.
    #[error("Failed to decode weather response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl WeatherError {
    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// HTTP status or transport error code, when the failure carried one.
    pub fn code(&self) -> Option<u16> {
        match self {
            Self::Http { code, .. } => *code,
            _ => None,
        }
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }
}

impl From<TransportError> for WeatherError {
    fn from(err: TransportError) -> Self {
        Self::Http {
            message: err.message().to_owned(),
            code: err.code(),
            source: err,
        }
    }
}
