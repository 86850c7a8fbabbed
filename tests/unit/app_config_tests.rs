/*!
 * Tests for application configuration
 */

use std::str::FromStr;

use dubwai::app_config::{Config, LogLevel, SynthesisConfig, TranslationConfig, TranslationProvider};

fn valid_config() -> Config {
    let mut config = Config::default();
    config.apply_google_api_key("google-key");
    config
}

#[test]
fn test_default_shouldMatchDocumentedValues() {
    let config = Config::default();

    assert_eq!(config.source_language, "ru-RU");
    assert_eq!(config.target_language, "en-US");
    assert_eq!(config.translation.provider, TranslationProvider::Gemini);
    assert_eq!(config.translation.get_model(), "gemini-2.5-pro");
    assert!((config.translation.common.temperature - 0.2).abs() < f32::EPSILON);
    assert_eq!(config.translation.get_timeout_secs(), 60);
    assert_eq!(config.synthesis.audio_encoding, "MP3");
    assert_eq!(config.synthesis.sample_rate_hz, 24000);
    assert_eq!(config.synthesis.volume_gain_db, 0.0);
    assert_eq!(config.synthesis.timeout_secs, 120);
    assert_eq!(config.storage.max_ssml_chars, 5000);
    assert_eq!(config.log_level, LogLevel::Info);
}

#[test]
fn test_validate_withGoogleKey_shouldPass() {
    assert!(valid_config().validate().is_ok());
}

#[test]
fn test_validate_withoutSynthesisKey_shouldFail() {
    let mut config = valid_config();
    config.synthesis.api_key.clear();

    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("Text-to-Speech API key"));
}

#[test]
fn test_validate_withoutGeminiKey_shouldFail() {
    let mut config = valid_config();
    config.translation.active_provider_config_mut().api_key.clear();

    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withOllamaWithoutKey_shouldPass() {
    let mut config = valid_config();
    config.translation.provider = TranslationProvider::Ollama;

    assert!(config.validate().is_ok());
}

#[test]
fn test_validate_withInvalidLanguage_shouldFail() {
    let mut config = valid_config();
    config.target_language = "zz-ZZ".to_string();

    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withZeroLimits_shouldFail() {
    let mut config = valid_config();
    config.storage.max_ssml_chars = 0;
    assert!(config.validate().is_err());

    let mut config = valid_config();
    config.synthesis.sample_rate_hz = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_applyGoogleApiKey_shouldNotOverrideExistingKeys() {
    let mut config = Config::default();
    config.synthesis.api_key = "own-tts-key".to_string();
    config.apply_google_api_key("shared");

    assert_eq!(config.synthesis.api_key, "own-tts-key");
    assert_eq!(config.translation.get_api_key(), "shared");
}

#[test]
fn test_deserialize_withPartialJson_shouldFillDefaults() {
    let config: Config = serde_json::from_str(r#"{
        "target_language": "de-DE",
        "translation": {"provider": "ollama"},
        "storage": {"max_ssml_chars": 1200}
    }"#).unwrap();

    assert_eq!(config.source_language, "ru-RU");
    assert_eq!(config.target_language, "de-DE");
    assert_eq!(config.translation.provider, TranslationProvider::Ollama);
    assert_eq!(config.translation.get_model(), "llama3.2:3b");
    assert_eq!(config.translation.get_endpoint(), "http://localhost:11434");
    assert_eq!(config.storage.max_ssml_chars, 1200);
    assert_eq!(config.synthesis.endpoint, "https://texttospeech.googleapis.com");
}

#[test]
fn test_serialize_roundTrip_shouldKeepProviderTypeField() {
    let json = serde_json::to_string_pretty(&Config::default()).unwrap();
    assert!(json.contains("\"type\": \"gemini\""));

    let parsed: Config = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.translation.available_providers.len(), 3);
}

#[test]
fn test_activeProviderConfigMut_withMissingEntry_shouldCreateIt() {
    let mut config = TranslationConfig {
        provider: TranslationProvider::Anthropic,
        available_providers: Vec::new(),
        ..TranslationConfig::default()
    };
    config.active_provider_config_mut().model = "claude-custom".to_string();

    assert_eq!(config.get_model(), "claude-custom");
    assert_eq!(config.get_endpoint(), "https://api.anthropic.com");
}

#[test]
fn test_renderPrompt_shouldFillLanguagePlaceholders() {
    let config = TranslationConfig::default();
    assert_eq!(
        config.render_prompt("ru-RU", "en-US"),
        "Translate the following text from ru-RU to en-US. Return only the translated text without commentary."
    );
}

#[test]
fn test_translationProvider_fromStr_shouldBeCaseInsensitive() {
    assert_eq!(TranslationProvider::from_str("Gemini").unwrap(), TranslationProvider::Gemini);
    assert_eq!(TranslationProvider::from_str("OLLAMA").unwrap(), TranslationProvider::Ollama);
    assert!(TranslationProvider::from_str("openai").is_err());
    assert_eq!(TranslationProvider::Anthropic.to_string(), "anthropic");
}

#[test]
fn test_audioExtension_shouldFollowEncoding() {
    let mut synthesis = SynthesisConfig::default();
    assert_eq!(synthesis.audio_extension(), "mp3");

    synthesis.audio_encoding = "OGG_OPUS".to_string();
    assert_eq!(synthesis.audio_extension(), "ogg");

    synthesis.audio_encoding = "linear16".to_string();
    assert_eq!(synthesis.audio_extension(), "wav");
}

#[test]
fn test_storageDirs_shouldLiveUnderDataDir() {
    let mut config = Config::default();
    config.storage.data_dir = "/tmp/dub".into();

    assert_eq!(config.storage.upload_dir(), std::path::PathBuf::from("/tmp/dub/uploads"));
    assert_eq!(config.storage.artifact_dir(), std::path::PathBuf::from("/tmp/dub/artifacts"));
    assert_eq!(config.storage.audio_dir(), std::path::PathBuf::from("/tmp/dub/audio"));
}

#[test]
fn test_logLevel_shouldMapToLevelFilter() {
    assert_eq!(LogLevel::Debug.to_level_filter(), log::LevelFilter::Debug);
    assert_eq!(LogLevel::Error.to_level_filter(), log::LevelFilter::Error);
}
