/*!
 * Tests for provider request and response shapes, and for the clients
 * against a local HTTP stub
 */

use serde_json::{json, Value};

use dubwai::errors::ProviderError;
use dubwai::providers::Provider;
use dubwai::providers::anthropic::{Anthropic, AnthropicRequest, AnthropicResponse};
use dubwai::providers::gemini::{Gemini, GeminiRequest, GeminiResponse};
use dubwai::providers::google_tts::{GoogleTts, TtsRequest, TtsResponse};
use dubwai::providers::ollama::{GenerationRequest, GenerationResponse, Ollama};

use crate::common::http_stub::StubServer;

fn request_body(raw_request: &str) -> Value {
    let body = raw_request.split("\r\n\r\n").nth(1).unwrap_or_default();
    serde_json::from_str(body).unwrap()
}

#[test]
fn test_geminiRequest_shouldSerializeCamelCaseBodyWithoutModel() {
    let request = GeminiRequest::new("gemini-2.5-pro")
        .add_user_text("Translate this")
        .temperature(0.5);
    let value = serde_json::to_value(&request).unwrap();

    assert_eq!(value["contents"][0]["role"], "user");
    assert_eq!(value["contents"][0]["parts"][0]["text"], "Translate this");
    assert_eq!(value["generationConfig"]["temperature"], 0.5);
    assert!(value["generationConfig"].get("maxOutputTokens").is_none());
    assert!(value.get("model").is_none());
    assert_eq!(request.model(), "gemini-2.5-pro");
}

#[test]
fn test_geminiExtractText_shouldJoinPartsOfFirstCandidate() {
    let response: GeminiResponse = serde_json::from_value(json!({
        "candidates": [
            {"content": {"role": "model", "parts": [{"text": "Hello, "}, {"text": "world"}]}, "finishReason": "STOP"},
            {"content": {"role": "model", "parts": [{"text": "ignored"}]}}
        ],
        "usageMetadata": {"promptTokenCount": 12, "candidatesTokenCount": 3}
    })).unwrap();

    assert_eq!(Gemini::extract_text(&response), "Hello, world");
}

#[test]
fn test_geminiExtractText_withoutCandidates_shouldReturnEmpty() {
    let response: GeminiResponse = serde_json::from_value(json!({})).unwrap();
    assert_eq!(Gemini::extract_text(&response), "");
}

#[test]
fn test_anthropicExtractText_shouldKeepOnlyTextBlocks() {
    let response: AnthropicResponse = serde_json::from_value(json!({
        "content": [
            {"type": "text", "text": "Hello"},
            {"type": "tool_use"},
            {"type": "text", "text": " there"}
        ],
        "stop_reason": "end_turn",
        "usage": {"input_tokens": 10, "output_tokens": 2}
    })).unwrap();

    assert_eq!(Anthropic::extract_text(&response), "Hello there");
    assert!(!response.is_truncated());
}

#[test]
fn test_anthropicResponse_withMaxTokensStop_shouldBeTruncated() {
    let response: AnthropicResponse = serde_json::from_value(json!({
        "content": [{"type": "text", "text": "Hel"}],
        "stop_reason": "max_tokens"
    })).unwrap();

    assert!(response.is_truncated());
    assert_eq!(response.usage.output_tokens, 0);
}

#[test]
fn test_anthropicRequest_shouldSerializeSystemAndMessages() {
    let request = AnthropicRequest::new("claude-3-haiku-20240307", 256)
        .system("Translate")
        .user("Привет");
    let value = serde_json::to_value(&request).unwrap();

    assert_eq!(value["system"], "Translate");
    assert_eq!(value["messages"][0]["role"], "user");
    assert_eq!(value["messages"][0]["content"], "Привет");
    assert_eq!(value["max_tokens"], 256);
    assert!(value.get("temperature").is_none());
}

#[test]
fn test_ollamaRequest_shouldDisableStreaming() {
    let request = GenerationRequest::new("llama3.2:3b", "Привет")
        .system("Translate")
        .temperature(0.25)
        .num_predict(64);
    let value = serde_json::to_value(&request).unwrap();

    assert_eq!(value["stream"], false);
    assert_eq!(value["options"]["temperature"], 0.25);
    assert_eq!(value["options"]["num_predict"], 64);

    let response: GenerationResponse = serde_json::from_value(json!({
        "model": "llama3.2:3b", "response": "Hello", "done": true
    })).unwrap();
    assert_eq!(Ollama::extract_text(&response), "Hello");
}

#[test]
fn test_ttsRequest_shouldSerializeSynthesisBody() {
    let request = TtsRequest::new("<speak>Hi</speak>", "en-US")
        .voice_name(Some("en-US-Neural2-F".to_string()))
        .audio("MP3", 24000, -2.5);
    let value = serde_json::to_value(&request).unwrap();

    assert_eq!(value, json!({
        "input": {"ssml": "<speak>Hi</speak>"},
        "voice": {"languageCode": "en-US", "name": "en-US-Neural2-F"},
        "audioConfig": {"audioEncoding": "MP3", "sampleRateHertz": 24000, "volumeGainDb": -2.5}
    }));
}

#[test]
fn test_ttsRequest_withoutVoiceName_shouldOmitName() {
    let request = TtsRequest::new("<speak/>", "en-US").voice_name(Some(String::new()));
    let value = serde_json::to_value(&request).unwrap();

    assert!(value["voice"].get("name").is_none());
}

#[test]
fn test_ttsResponse_decodeAudio_shouldDecodeBase64() {
    let response: TtsResponse = serde_json::from_value(json!({"audioContent": "aGVsbG8="})).unwrap();
    assert_eq!(response.decode_audio().unwrap(), b"hello");

    let broken: TtsResponse = serde_json::from_value(json!({"audioContent": "***"})).unwrap();
    assert!(matches!(broken.decode_audio(), Err(ProviderError::ParseError(_))));
}

#[tokio::test]
async fn test_geminiComplete_withStub_shouldPostToModelUrlWithKey() {
    let stub = StubServer::start(200, r#"{"candidates":[{"content":{"parts":[{"text":"Hello"}]}}]}"#).await;
    let client = Gemini::new("secret-key", stub.url.clone(), "gemini-2.5-pro", 5);

    let response = client.complete(GeminiRequest::new("gemini-2.5-pro").add_user_text("Привет")).await.unwrap();
    assert_eq!(Gemini::extract_text(&response), "Hello");

    let raw = stub.request().await;
    assert!(raw.starts_with("POST /v1beta/models/gemini-2.5-pro:generateContent "));
    assert!(raw.to_lowercase().contains("x-goog-api-key: secret-key"));
    assert_eq!(request_body(&raw)["contents"][0]["parts"][0]["text"], "Привет");
}

#[tokio::test]
async fn test_geminiComplete_withRateLimit_shouldReturnRateLimitError() {
    let stub = StubServer::start(429, r#"{"error":"quota"}"#).await;
    let client = Gemini::new("key", stub.url.clone(), "gemini-2.5-pro", 5);

    let result = client.complete(GeminiRequest::new("gemini-2.5-pro").add_user_text("x")).await;
    assert!(matches!(result, Err(ProviderError::RateLimitExceeded(_))));
}

#[tokio::test]
async fn test_googleTtsComplete_withStub_shouldPostToSynthesizeUrl() {
    let stub = StubServer::start(200, r#"{"audioContent":"aGVsbG8="}"#).await;
    let client = GoogleTts::new("tts-key", stub.url.clone(), 5);

    let response = client.complete(TtsRequest::new("<speak>Hi</speak>", "en-US")).await.unwrap();
    assert_eq!(response.decode_audio().unwrap(), b"hello");

    let raw = stub.request().await;
    assert!(raw.starts_with("POST /v1/text:synthesize "));
    assert!(raw.to_lowercase().contains("x-goog-api-key: tts-key"));
    assert_eq!(request_body(&raw)["input"]["ssml"], "<speak>Hi</speak>");
}

#[tokio::test]
async fn test_googleTtsComplete_withForbidden_shouldReturnAuthenticationError() {
    let stub = StubServer::start(403, r#"{"error":{"message":"API key not valid"}}"#).await;
    let client = GoogleTts::new("bad-key", stub.url.clone(), 5);

    let result = client.complete(TtsRequest::new("<speak/>", "en-US")).await;
    match result {
        Err(ProviderError::AuthenticationError(message)) => assert!(message.contains("API key not valid")),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn test_ollamaVersion_withStub_shouldReturnVersion() {
    let stub = StubServer::start(200, r#"{"version":"0.5.7"}"#).await;
    let client = Ollama::new(stub.url.clone(), 5);

    assert_eq!(client.version().await.unwrap(), "0.5.7");
    assert!(stub.request().await.starts_with("GET /api/version "));
}

#[tokio::test]
async fn test_anthropicComplete_withStub_shouldSendVersionHeader() {
    let stub = StubServer::start(200, r#"{"content":[{"type":"text","text":"Hi"}],"usage":{"input_tokens":1,"output_tokens":1}}"#).await;
    let client = Anthropic::new("ak", stub.url.clone(), "claude-3-haiku-20240307", 5);

    let response = client.complete(AnthropicRequest::new("claude-3-haiku-20240307", 64).user("Привет")).await.unwrap();
    assert_eq!(Anthropic::extract_text(&response), "Hi");

    let raw = stub.request().await.to_lowercase();
    assert!(raw.starts_with("post /v1/messages "));
    assert!(raw.contains("anthropic-version: 2023-06-01"));
    assert!(raw.contains("x-api-key: ak"));
}

#[tokio::test]
async fn test_client_withUnreachableEndpoint_shouldReturnConnectionError() {
    // Port 9 on localhost is the discard service and is normally closed
    let client = GoogleTts::new("key", "http://127.0.0.1:9", 2);
    let result = client.complete(TtsRequest::new("<speak/>", "en-US")).await;

    assert!(matches!(result, Err(ProviderError::ConnectionError(_))));
}
