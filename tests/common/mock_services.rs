/*!
 * Mock translation and synthesis services
 *
 * The controller only sees the `Translator` and `Synthesizer` traits, so
 * these mocks let runs go end to end without any network access. Each mock
 * records what it was asked to do.
 */

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use dubwai::errors::{ProviderError, SynthesisError, TranslationError};
use dubwai::synthesis::{SynthesisRequest, Synthesizer};
use dubwai::translation::Translator;

/// How the mock translator answers
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TranslatorMode {
    /// Prefix the text with "EN:"
    Prefix,
    /// Fail the call with this 1-based index
    FailAt(usize),
    /// Answer with an empty translation
    Empty,
    /// Translate like `Prefix` but fail the connection check
    Offline,
}

/// Mock implementation of the translator
#[derive(Debug, Clone)]
pub struct MockTranslator {
    mode: TranslatorMode,
    /// Texts received, in call order
    pub calls: Arc<Mutex<Vec<String>>>,
}

impl MockTranslator {
    pub fn new(mode: TranslatorMode) -> Self {
        MockTranslator {
            mode,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl Translator for MockTranslator {
    async fn translate(&self, text: &str, _source_language: &str, _target_language: &str) -> Result<String, TranslationError> {
        let index = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(text.to_string());
            calls.len()
        };

        match self.mode {
            TranslatorMode::Prefix | TranslatorMode::Offline => Ok(format!("EN: {}", text)),
            TranslatorMode::FailAt(n) if n == index => Err(TranslationError::Provider(
                ProviderError::from_status(503, "model overloaded"),
            )),
            TranslatorMode::FailAt(_) => Ok(format!("EN: {}", text)),
            TranslatorMode::Empty => Err(TranslationError::EmptyTranslation {
                provider: "Mock".to_string(),
            }),
        }
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        match self.mode {
            TranslatorMode::Offline => Err(ProviderError::ConnectionError("connection refused".to_string())),
            _ => Ok(()),
        }
    }
}

/// How the mock synthesizer answers
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SynthesizerMode {
    /// Return a few fake MP3 bytes
    Audio,
    /// No audio in the response
    Empty,
    /// The API rejects the request
    Fail,
}

/// Mock implementation of the synthesizer
#[derive(Debug, Clone)]
pub struct MockSynthesizer {
    mode: SynthesizerMode,
    /// Requests received, in call order
    pub requests: Arc<Mutex<Vec<SynthesisRequest>>>,
}

/// Bytes returned by the mock synthesizer
pub const FAKE_AUDIO: &[u8] = b"ID3\x04mock-audio";

impl MockSynthesizer {
    pub fn new(mode: SynthesizerMode) -> Self {
        MockSynthesizer {
            mode,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn requests(&self) -> Vec<SynthesisRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Synthesizer for MockSynthesizer {
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<Vec<u8>, SynthesisError> {
        self.requests.lock().unwrap().push(request.clone());

        match self.mode {
            SynthesizerMode::Audio => Ok(FAKE_AUDIO.to_vec()),
            SynthesizerMode::Empty => Err(SynthesisError::EmptyAudio),
            SynthesizerMode::Fail => Err(SynthesisError::Provider(
                ProviderError::from_status(400, "Invalid SSML"),
            )),
        }
    }
}
