/*!
 * Speech synthesis of prepared markup.
 *
 * The controller talks to a `Synthesizer`; `SynthesisService` is the
 * implementation backed by Google Cloud Text-to-Speech.
 */

use async_trait::async_trait;
use log::{debug, error};

use crate::app_config::SynthesisConfig;
use crate::errors::SynthesisError;
use crate::providers::Provider;
use crate::providers::google_tts::{GoogleTts, TtsRequest};

/// One synthesis call
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisRequest {
    /// Complete `<speak>` document
    pub ssml: String,

    /// Explicit voice, `None` lets the markup choose
    pub voice_name: Option<String>,

    /// Language tag of the speech
    pub language_code: String,

    pub sample_rate_hz: u32,

    pub volume_gain_db: f64,
}

impl SynthesisRequest {
    /// Request for a document using the configured audio defaults
    pub fn new(ssml: impl Into<String>, language_code: impl Into<String>, config: &SynthesisConfig) -> Self {
        Self {
            ssml: ssml.into(),
            voice_name: None,
            language_code: language_code.into(),
            sample_rate_hz: config.sample_rate_hz,
            volume_gain_db: config.volume_gain_db,
        }
    }
}

/// Turns markup into audio bytes
#[async_trait]
pub trait Synthesizer: Send + Sync {
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<Vec<u8>, SynthesisError>;
}

/// Synthesizer backed by the Cloud Text-to-Speech REST API
pub struct SynthesisService {
    client: GoogleTts,
    config: SynthesisConfig,
}

impl SynthesisService {
    pub fn new(config: SynthesisConfig) -> Self {
        let client = GoogleTts::new(config.api_key.clone(), config.endpoint.clone(), config.timeout_secs);
        Self { client, config }
    }

    /// Configuration the service was built with
    pub fn config(&self) -> &SynthesisConfig {
        &self.config
    }
}

#[async_trait]
impl Synthesizer for SynthesisService {
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<Vec<u8>, SynthesisError> {
        let body = TtsRequest::new(request.ssml.clone(), request.language_code.clone())
            .voice_name(request.voice_name.clone())
            .audio(self.config.audio_encoding.clone(), request.sample_rate_hz, request.volume_gain_db);

        let response = self.client.complete(body)
            .await
            .inspect_err(|e| error!("Text-to-Speech request failed: {}", e))?;

        if response.audio_content.is_empty() {
            return Err(SynthesisError::EmptyAudio);
        }

        let audio = response.decode_audio()
            .map_err(|e| SynthesisError::InvalidAudio(e.to_string()))?;
        if audio.is_empty() {
            return Err(SynthesisError::EmptyAudio);
        }

        debug!("Received {} bytes of audio", audio.len());
        Ok(audio)
    }
}
