use thiserror::Error;

/// Classified failure outcomes of a provider call.
///
/// Every variant is a user-reportable value; callers surface them as readable
/// messages and return to the menu rather than terminating the session.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("City '{city}' not found. Please check the spelling.")]
    NotFound { city: String },

    #[error("Invalid API key. Please check your configuration.")]
    Unauthorized,

    #[error("Request timed out. Please check your internet connection.")]
    Timeout,

    #[error("Connection error. Please check your internet connection.")]
    ConnectionFailure,

    #[error("API error: {status} - {body}")]
    Provider { status: u16, body: String },

    #[error("Unexpected error: {0:#}")]
    Unexpected(#[from] anyhow::Error),
}
