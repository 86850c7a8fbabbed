use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::errors::ProviderError;
use crate::providers::{error_from_response, http_client, Provider};

/// Google Cloud Text-to-Speech client
#[derive(Debug)]
pub struct GoogleTts {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// API endpoint URL
    endpoint: String,
}

/// SSML input of a synthesis request
#[derive(Debug, Serialize)]
pub struct SynthesisInput {
    pub ssml: String,
}

/// Voice selection of a synthesis request
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceSelectionParams {
    pub language_code: String,

    /// Explicit voice; voices chosen inside the SSML take precedence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Audio output settings of a synthesis request
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioConfig {
    pub audio_encoding: String,
    pub sample_rate_hertz: u32,
    pub volume_gain_db: f64,
}

/// text:synthesize request body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TtsRequest {
    pub input: SynthesisInput,
    pub voice: VoiceSelectionParams,
    pub audio_config: AudioConfig,
}

/// text:synthesize response body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TtsResponse {
    /// Base64 encoded audio
    #[serde(default)]
    pub audio_content: String,
}

impl TtsRequest {
    /// Create a request for an SSML document
    pub fn new(ssml: impl Into<String>, language_code: impl Into<String>) -> Self {
        Self {
            input: SynthesisInput { ssml: ssml.into() },
            voice: VoiceSelectionParams {
                language_code: language_code.into(),
                name: None,
            },
            audio_config: AudioConfig {
                audio_encoding: "MP3".to_string(),
                sample_rate_hertz: 24000,
                volume_gain_db: 0.0,
            },
        }
    }

    /// Select a voice by name
    pub fn voice_name(mut self, name: Option<String>) -> Self {
        self.voice.name = name.filter(|n| !n.is_empty());
        self
    }

    /// Set encoding, sample rate and gain
    pub fn audio(mut self, encoding: impl Into<String>, sample_rate_hertz: u32, volume_gain_db: f64) -> Self {
        self.audio_config = AudioConfig {
            audio_encoding: encoding.into(),
            sample_rate_hertz,
            volume_gain_db,
        };
        self
    }
}

impl TtsResponse {
    /// Decode the audio payload
    pub fn decode_audio(&self) -> Result<Vec<u8>, ProviderError> {
        BASE64.decode(self.audio_content.as_bytes())
            .map_err(|e| ProviderError::ParseError(format!("Invalid base64 audio content: {}", e)))
    }
}

impl GoogleTts {
    /// Create a new Text-to-Speech client
    pub fn new(api_key: impl Into<String>, endpoint: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            client: http_client(timeout_secs),
            api_key: api_key.into(),
            endpoint: endpoint.into(),
        }
    }

    fn api_url(&self) -> String {
        let base = if self.endpoint.is_empty() {
            "https://texttospeech.googleapis.com"
        } else {
            self.endpoint.trim_end_matches('/')
        };
        format!("{}/v1/text:synthesize", base)
    }
}

#[async_trait]
impl Provider for GoogleTts {
    type Request = TtsRequest;
    type Response = TtsResponse;

    async fn complete(&self, request: TtsRequest) -> Result<TtsResponse, ProviderError> {
        let response = self.client.post(self.api_url())
            .header("Content-Type", "application/json; charset=utf-8")
            .header("X-Goog-Api-Key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(ProviderError::from_reqwest)?;

        if !response.status().is_success() {
            return Err(error_from_response("Google TTS", response).await);
        }

        response.json::<TtsResponse>().await
            .map_err(|e| ProviderError::ParseError(format!("Failed to parse TTS response: {}", e)))
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        let request = TtsRequest::new("<speak>ok</speak>", "en-US");
        self.complete(request).await?;
        Ok(())
    }

    // Audio is binary; the text view is the raw base64 payload
    fn extract_text(response: &TtsResponse) -> String {
        response.audio_content.clone()
    }
}
