/*!
 * Error types for the dubwai application.
 *
 * This module contains custom error types for the different stages of a run,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur when working with provider APIs
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

impl ProviderError {
    /// Classify a non-success HTTP response into the matching variant
    pub fn from_status(status_code: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status_code {
            401 | 403 => Self::AuthenticationError(message),
            429 => Self::RateLimitExceeded(message),
            _ => Self::ApiError { status_code, message },
        }
    }

    /// Classify a transport-level reqwest failure
    pub fn from_reqwest(error: reqwest::Error) -> Self {
        if error.is_connect() || error.is_timeout() {
            Self::ConnectionError(error.to_string())
        } else if error.is_decode() {
            Self::ParseError(error.to_string())
        } else {
            Self::RequestFailed(error.to_string())
        }
    }
}

/// Input errors raised before any external call is made
#[derive(Error, Debug)]
pub enum TranscriptError {
    /// The payload is not valid UTF-8
    #[error("Input file must be UTF-8 text")]
    InvalidEncoding,

    /// No speaker header was found in the transcript
    #[error("No speaker segments detected")]
    NoSegments,

    /// The speaker-to-voice mapping could not be parsed
    #[error("Invalid voice map JSON: {0}")]
    InvalidVoiceMap(String),
}

/// Errors that can occur during translation
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Error from the provider API
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// The provider answered without any text
    #[error("{provider} returned empty translation")]
    EmptyTranslation {
        /// Display name of the provider
        provider: String,
    },
}

/// Errors that can occur during speech synthesis
#[derive(Error, Debug)]
pub enum SynthesisError {
    /// Error from the synthesis API
    #[error("TTS request failed: {0}")]
    Provider(#[from] ProviderError),

    /// The API answered without audio
    #[error("No audio content returned from TTS API")]
    EmptyAudio,

    /// The audio payload could not be decoded
    #[error("Invalid audio content: {0}")]
    InvalidAudio(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Invalid or incomplete configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error in the submitted transcript or its options
    #[error("{0}")]
    Transcript(#[from] TranscriptError),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Error from speech synthesis
    #[error("Synthesis error: {0}")]
    Synthesis(#[from] SynthesisError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}

/// A failed run: the error plus the log of steps completed before it
#[derive(Error, Debug)]
#[error("Processing failed: {error}")]
pub struct RunFailure {
    /// What went wrong
    pub error: AppError,

    /// Step log up to the failure
    pub logs: Vec<String>,
}

impl RunFailure {
    /// Whether the failure was caused by the submitted input rather than a service
    pub fn is_input_error(&self) -> bool {
        matches!(self.error, AppError::Transcript(_))
    }
}
