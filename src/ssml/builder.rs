use crate::transcript::Segment;

use super::annotations::{apply_non_speech_and_style, normalize_text};
use super::voices::VoiceMap;

// @const: Pause appended after every segment
pub const SEGMENT_BREAK: &str = "<break time=\"400ms\"/>";

pub const SPEAK_OPEN: &str = "<speak>";
pub const SPEAK_CLOSE: &str = "</speak>";

/// Escape text content so it cannot break the surrounding markup
pub fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escape an attribute value written between double quotes
pub fn escape_attribute(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}

/// Markup for the text of one segment, annotations included
pub fn prepare_content(text: &str) -> String {
    apply_non_speech_and_style(&normalize_text(&escape_text(text)))
}

fn segment_markup(segment: &Segment, voice_map: &VoiceMap, output_language: &str) -> String {
    let mut content = prepare_content(&segment.text);

    if !output_language.is_empty() {
        content = format!(
            "<lang xml:lang=\"{}\">{}</lang>",
            escape_attribute(output_language),
            content
        );
    }

    if let Some(voice) = voice_map.get(&segment.speaker) {
        content = format!("<voice name=\"{}\">{}</voice>", escape_attribute(voice), content);
    }

    content.push_str(SEGMENT_BREAK);
    content
}

/// Compose one `<speak>` document for a sequence of segments
///
/// Each segment becomes `[voice [lang content]]` followed by a 400 ms break.
/// The voice wrapper is only emitted for speakers present in `voice_map`, the
/// language wrapper only for a non-empty `output_language`.
pub fn build_ssml(segments: &[Segment], voice_map: &VoiceMap, output_language: &str) -> String {
    let mut ssml = String::from(SPEAK_OPEN);
    for segment in segments {
        ssml.push_str(&segment_markup(segment, voice_map, output_language));
    }
    ssml.push_str(SPEAK_CLOSE);
    ssml
}

/// Whether a markup document exceeds the per-call size limit
pub fn estimate_chunking_need(ssml: &str, max_chars: usize) -> bool {
    ssml.chars().count() > max_chars
}
