/*!
 * Tests for the translation service
 */

use dubwai::app_config::{TranslationConfig, TranslationProvider};
use dubwai::errors::{ProviderError, TranslationError};
use dubwai::translation::{TranslationService, Translator};

use crate::common::http_stub::StubServer;

fn gemini_config(endpoint: &str) -> TranslationConfig {
    let mut config = TranslationConfig::default();
    let provider = config.active_provider_config_mut();
    provider.endpoint = endpoint.to_string();
    provider.api_key = "test-key".to_string();
    provider.timeout_secs = 5;
    config
}

fn gemini_answer(text: &str) -> String {
    serde_json::json!({"candidates": [{"content": {"parts": [{"text": text}]}}]}).to_string()
}

#[tokio::test]
async fn test_translate_withSameLanguage_shouldReturnInputWithoutCall() {
    // Nothing listens on this endpoint, so any request would fail
    let service = TranslationService::new(gemini_config("http://127.0.0.1:9")).unwrap();

    let result = service.translate("Привет", "ru-RU", "RU-ru").await.unwrap();
    assert_eq!(result, "Привет");
}

#[tokio::test]
async fn test_translate_withGemini_shouldSendPromptAndTrimResult() {
    let stub = StubServer::start(200, &gemini_answer("  Hello, friend.\n")).await;
    let service = TranslationService::new(gemini_config(&stub.url)).unwrap();

    let result = service.translate("Привет, друг.", "ru-RU", "en-US").await.unwrap();
    assert_eq!(result, "Hello, friend.");

    let raw = stub.request().await;
    let body: serde_json::Value = serde_json::from_str(raw.split("\r\n\r\n").nth(1).unwrap()).unwrap();
    assert_eq!(
        body["contents"][0]["parts"][0]["text"],
        "Translate the following text from ru-RU to en-US. Return only the translated text without commentary.\n\nПривет, друг."
    );
    let temperature = body["generationConfig"]["temperature"].as_f64().unwrap();
    assert!((temperature - 0.2).abs() < 1e-6);
}

#[tokio::test]
async fn test_translate_withEmptyAnswer_shouldReturnEmptyTranslationError() {
    let stub = StubServer::start(200, &gemini_answer("   ")).await;
    let service = TranslationService::new(gemini_config(&stub.url)).unwrap();

    let err = service.translate("Привет", "ru-RU", "en-US").await.unwrap_err();
    assert!(matches!(err, TranslationError::EmptyTranslation { .. }));
    assert_eq!(err.to_string(), "Gemini returned empty translation");
}

#[tokio::test]
async fn test_translate_withServerError_shouldReturnProviderError() {
    let stub = StubServer::start(500, r#"{"error":"boom"}"#).await;
    let service = TranslationService::new(gemini_config(&stub.url)).unwrap();

    let err = service.translate("Привет", "ru-RU", "en-US").await.unwrap_err();
    assert!(matches!(err, TranslationError::Provider(ProviderError::ApiError { status_code: 500, .. })));
}

#[tokio::test]
async fn test_translate_withRepeatedText_shouldUseCache() {
    // The stub answers once; a second request would fail to connect
    let stub = StubServer::start(200, &gemini_answer("Yes.")).await;
    let service = TranslationService::new(gemini_config(&stub.url)).unwrap();

    assert_eq!(service.translate("Да.", "ru-RU", "en-US").await.unwrap(), "Yes.");
    assert_eq!(service.translate("Да.", "ru-RU", "en-US").await.unwrap(), "Yes.");
    assert_eq!(service.cache.stats().0, 1);
}

#[tokio::test]
async fn test_translate_withOllama_shouldUseSystemPrompt() {
    let stub = StubServer::start(200, r#"{"model":"llama3.2:3b","response":" Hello ","done":true}"#).await;
    let mut config = TranslationConfig {
        provider: TranslationProvider::Ollama,
        ..TranslationConfig::default()
    };
    config.active_provider_config_mut().endpoint = stub.url.clone();
    let service = TranslationService::new(config).unwrap();

    assert_eq!(service.translate("Привет", "ru-RU", "en-US").await.unwrap(), "Hello");

    let raw = stub.request().await;
    assert!(raw.starts_with("POST /api/generate "));
    let body: serde_json::Value = serde_json::from_str(raw.split("\r\n\r\n").nth(1).unwrap()).unwrap();
    assert_eq!(body["prompt"], "Привет");
    assert_eq!(body["model"], "llama3.2:3b");
    assert!(body["system"].as_str().unwrap().contains("from ru-RU to en-US"));
}

#[test]
fn test_new_withInvalidOllamaEndpoint_shouldFail() {
    let mut config = TranslationConfig {
        provider: TranslationProvider::Ollama,
        ..TranslationConfig::default()
    };
    config.active_provider_config_mut().endpoint = "http://".to_string();

    assert!(TranslationService::new(config).is_err());
}

#[test]
fn test_providerName_shouldFollowConfiguredProvider() {
    let config = TranslationConfig {
        provider: TranslationProvider::Anthropic,
        ..TranslationConfig::default()
    };
    let service = TranslationService::new(config).unwrap();

    assert_eq!(service.provider_name(), "Anthropic");
}

#[tokio::test]
async fn test_testConnection_withOllama_shouldQueryVersion() {
    let stub = StubServer::start(200, r#"{"version":"0.5.7"}"#).await;
    let mut config = TranslationConfig {
        provider: TranslationProvider::Ollama,
        ..TranslationConfig::default()
    };
    config.active_provider_config_mut().endpoint = stub.url.clone();
    let service = TranslationService::new(config).unwrap();

    service.test_connection().await.unwrap();

    assert!(stub.request().await.starts_with("GET /api/version "));
}

#[tokio::test]
async fn test_testConnection_withRejectedKey_shouldReturnAuthenticationError() {
    let stub = StubServer::start(401, r#"{"error":{"message":"API key not valid"}}"#).await;
    let service = TranslationService::new(gemini_config(&stub.url)).unwrap();

    let err = service.test_connection().await.unwrap_err();
    assert!(matches!(err, ProviderError::AuthenticationError(_)));
}
