/*!
 * # dubwai - transcript dubbing with AI
 *
 * A Rust library that turns a speaker-labelled transcript into translated,
 * synthesized speech.
 *
 * ## Features
 *
 * - Parse transcripts made of `Speaker HH:MM:SS` headers and text blocks
 * - Detect a short-sentence introduction for reporting
 * - Translate each segment with an LLM provider:
 *   - Google Gemini (default)
 *   - Ollama (local LLM)
 *   - Anthropic API
 * - Turn `[pause: 1s]`, `[sfx: laughter]` and `[style: whisper]...[/style]`
 *   annotations into SSML, with Russian keyword synonyms
 * - Build one `<speak>` document with per-speaker voices, split it into
 *   chunks when it exceeds the synthesis size limit
 * - Synthesize audio with Google Cloud Text-to-Speech
 *
 * ## Architecture
 *
 * - `transcript`: segment parsing, intro detection, chunk splitting
 * - `ssml`: annotation translation, voice maps, markup building
 * - `translation`: the `Translator` seam, provider-backed service and cache
 * - `synthesis`: the `Synthesizer` seam and the Text-to-Speech service
 * - `providers`: HTTP clients for Gemini, Ollama, Anthropic and Cloud TTS
 * - `app_controller`: one run from uploaded file to audio files
 * - `app_config`: configuration management
 * - `file_utils`: file system operations
 * - `language_utils`: ISO language code utilities
 * - `errors`: custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod providers;
pub mod ssml;
pub mod synthesis;
pub mod transcript;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{Controller, RunReport, RunRequest};
pub use errors::{AppError, ProviderError, RunFailure, SynthesisError, TranscriptError, TranslationError};
pub use ssml::{apply_non_speech_and_style, build_ssml, estimate_chunking_need};
pub use synthesis::{SynthesisRequest, SynthesisService, Synthesizer};
pub use transcript::{detect_intro, parse_speaker_segments, split_segments_for_chunks, IntroInfo, Segment};
pub use translation::{TranslationService, Translator};
