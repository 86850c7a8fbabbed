/*!
 * Core translation service implementation.
 *
 * This module contains the `Translator` seam used by the controller and the
 * `TranslationService` that implements it over the configured LLM provider.
 */

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use log::{debug, error};
use std::time::Instant;
use url::Url;

use crate::app_config::{TranslationConfig, TranslationProvider as ConfigTranslationProvider};
use crate::errors::{ProviderError, TranslationError};
use crate::language_utils::same_language_tag;
use crate::providers::Provider;
use crate::providers::anthropic::{Anthropic, AnthropicRequest};
use crate::providers::gemini::{Gemini, GeminiRequest};
use crate::providers::ollama::{GenerationRequest, Ollama};
use super::cache::TranslationCache;

/// Translates one text between two languages
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text`; returns it unchanged when both tags are equal
    async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, TranslationError>;

    /// Check that the backing provider is reachable before a run
    async fn test_connection(&self) -> Result<(), ProviderError> {
        Ok(())
    }
}

/// Parse an endpoint string into host and port
fn parse_endpoint(endpoint: &str) -> Result<(String, u16)> {
    if endpoint.is_empty() {
        return Err(anyhow!("Endpoint cannot be empty"));
    }

    let url = if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        Url::parse(endpoint)?
    } else {
        Url::parse(&format!("http://{}", endpoint))?
    };

    let host = url.host_str()
        .ok_or_else(|| anyhow!("Invalid host in endpoint: {}", endpoint))?
        .to_string();

    let port = url.port().unwrap_or(if url.scheme() == "https" { 443 } else { 80 });

    Ok((host, port))
}

/// Translation provider implementation variants
#[derive(Debug)]
enum TranslationProviderImpl {
    /// Google Gemini API
    Gemini {
        /// Client instance
        client: Gemini,
    },

    /// Ollama LLM service
    Ollama {
        /// Client instance
        client: Ollama,
    },

    /// Anthropic API service
    Anthropic {
        /// Client instance
        client: Anthropic,
    },
}

/// Output token budget for a translation
const MAX_OUTPUT_TOKENS: u32 = 4096;

/// Main translation service for transcript segments
pub struct TranslationService {
    /// Provider implementation
    provider: TranslationProviderImpl,

    /// Configuration for the translation service
    pub config: TranslationConfig,

    /// Translation cache for storing and retrieving translations
    pub cache: TranslationCache,
}

impl TranslationService {
    /// Create a new translation service with the given configuration
    pub fn new(config: TranslationConfig) -> Result<Self> {
        let timeout_secs = config.get_timeout_secs();
        let provider = match config.provider {
            ConfigTranslationProvider::Gemini => TranslationProviderImpl::Gemini {
                client: Gemini::new(config.get_api_key(), config.get_endpoint(), config.get_model(), timeout_secs),
            },
            ConfigTranslationProvider::Ollama => {
                let (host, port) = parse_endpoint(&config.get_endpoint())?;
                TranslationProviderImpl::Ollama {
                    client: Ollama::from_host(&host, port, timeout_secs),
                }
            },
            ConfigTranslationProvider::Anthropic => TranslationProviderImpl::Anthropic {
                client: Anthropic::new(config.get_api_key(), config.get_endpoint(), config.get_model(), timeout_secs),
            },
        };

        let cache = TranslationCache::new(config.common.enable_cache);

        Ok(Self {
            provider,
            config,
            cache,
        })
    }

    /// Display name of the active provider
    pub fn provider_name(&self) -> &str {
        self.config.provider.display_name()
    }

    /// Send one translation prompt to the provider and return the raw text
    async fn request_translation(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, ProviderError> {
        let instructions = self.config.render_prompt(source_language, target_language);
        let temperature = self.config.common.temperature;
        let model = self.config.get_model();

        match &self.provider {
            TranslationProviderImpl::Gemini { client } => {
                let request = GeminiRequest::new(model)
                    .add_user_text(format!("{}\n\n{}", instructions, text))
                    .temperature(temperature);
                let response = client.complete(request).await?;
                Ok(Gemini::extract_text(&response))
            },
            TranslationProviderImpl::Ollama { client } => {
                let request = GenerationRequest::new(model, text)
                    .system(instructions)
                    .temperature(temperature);
                let response = client.complete(request).await?;
                Ok(Ollama::extract_text(&response))
            },
            TranslationProviderImpl::Anthropic { client } => {
                let request = AnthropicRequest::new(model, MAX_OUTPUT_TOKENS)
                    .system(instructions)
                    .user(text)
                    .temperature(temperature);
                let response = client.complete(request).await?;
                Ok(Anthropic::extract_text(&response))
            },
        }
    }
}

#[async_trait]
impl Translator for TranslationService {
    async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, TranslationError> {
        if same_language_tag(source_language, target_language) {
            return Ok(text.to_string());
        }

        if let Some(cached) = self.cache.get(text, source_language, target_language) {
            return Ok(cached);
        }

        let start_time = Instant::now();
        let raw = self.request_translation(text, source_language, target_language)
            .await
            .inspect_err(|e| error!("{} translation error: {}", self.provider_name(), e))?;

        let translated = raw.trim().to_string();
        if translated.is_empty() {
            return Err(TranslationError::EmptyTranslation {
                provider: self.provider_name().to_string(),
            });
        }

        debug!("{} response received in {:?}", self.provider_name(), start_time.elapsed());
        self.cache.store(text, source_language, target_language, &translated);
        if self.cache.is_enabled() {
            let (hits, misses, _) = self.cache.stats();
            debug!("Translation cache: {} hits, {} misses", hits, misses);
        }
        Ok(translated)
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        let result = match &self.provider {
            TranslationProviderImpl::Gemini { client } => client.test_connection().await,
            TranslationProviderImpl::Ollama { client } => client.test_connection().await,
            TranslationProviderImpl::Anthropic { client } => client.test_connection().await,
        };

        if let Err(e) = &result {
            error!("Failed to connect to {}: {}", self.provider_name(), e);
        }
        result
    }
}
