/*!
 * Speech Synthesis Markup Language (SSML) generation.
 *
 * - `annotations`: inline bracket tags to SSML directives
 * - `builder`: composes segments into one `<speak>` document
 * - `voices`: speaker-to-voice mapping
 */

pub mod annotations;
pub mod builder;
pub mod voices;

pub use self::annotations::{apply_non_speech_and_style, normalize_text, SpeechStyle};
pub use self::builder::{build_ssml, estimate_chunking_need};
pub use self::voices::{parse_voice_map, VoiceMap};
