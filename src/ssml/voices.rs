use std::collections::HashMap;

use crate::errors::TranscriptError;

/// Speaker label to synthesis voice name
pub type VoiceMap = HashMap<String, String>;

/// Parse a JSON object such as `{"Speaker 1": "en-US-Neural2-D"}`
///
/// Voice names are trimmed. Speakers mapped to a blank name are dropped, so
/// they get no voice wrapper in the markup, same as unmapped speakers.
pub fn parse_voice_map(json: &str) -> Result<VoiceMap, TranscriptError> {
    let map: VoiceMap = serde_json::from_str(json)
        .map_err(|e| TranscriptError::InvalidVoiceMap(e.to_string()))?;

    Ok(map.into_iter()
        .map(|(speaker, voice)| (speaker, voice.trim().to_string()))
        .filter(|(_, voice)| !voice.is_empty())
        .collect())
}
