/*!
 * Inline annotation tags to SSML directives.
 *
 * Transcripts carry bracket tags written by editors:
 * - `[pause: 500ms]` becomes a timed `<break/>`
 * - `[sfx: laughter]` becomes an interjection `<say-as>`
 * - `[style: whisper]...[/style]` wraps its content in a `<prosody>` element
 *
 * Tag keywords and style names are matched case-insensitively against the
 * synonym tables below. Supporting another source language means adding rows
 * to those tables; the patterns are generated from them.
 */

use std::borrow::Cow;
use std::cmp::Reverse;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Keywords opening a pause tag
pub const PAUSE_KEYWORDS: &[&str] = &["pause", "пауза", "паузу"];

/// Keywords opening a sound-effect tag
pub const SOUND_EFFECT_KEYWORDS: &[&str] = &["sfx", "sound", "sound effect", "звук"];

/// Keywords opening and closing a style span
pub const STYLE_KEYWORDS: &[&str] = &["style", "стиль"];

/// Vocal styles a style span can request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeechStyle {
    Whisper,
    Shout,
    Fast,
    Slow,
    Soft,
}

/// Style names per style, compared after lowercasing and trimming
pub const STYLE_SYNONYMS: &[(SpeechStyle, &[&str])] = &[
    (SpeechStyle::Whisper, &["whisper", "шепот", "шёпот"]),
    (SpeechStyle::Shout, &["shout", "крик"]),
    (SpeechStyle::Fast, &["fast", "быстро"]),
    (SpeechStyle::Slow, &["slow", "медленно"]),
    (SpeechStyle::Soft, &["soft", "тихо"]),
];

impl SpeechStyle {
    /// Look up a style by any of its names
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_lowercase();
        STYLE_SYNONYMS.iter()
            .find(|(_, names)| names.contains(&name.as_str()))
            .map(|(style, _)| *style)
    }

    /// Prosody attribute and value for this style
    pub fn prosody(&self) -> (&'static str, &'static str) {
        match self {
            Self::Whisper => ("volume", "x-soft"),
            Self::Shout => ("volume", "x-loud"),
            Self::Fast => ("rate", "fast"),
            Self::Slow => ("rate", "slow"),
            Self::Soft => ("volume", "soft"),
        }
    }

    /// Wrap content in the matching prosody element
    pub fn wrap(&self, content: &str) -> String {
        let (attribute, value) = self.prosody();
        format!("<prosody {}=\"{}\">{}</prosody>", attribute, value, content)
    }
}

// Longest keyword first so "sound effect" wins over "sound"
fn keyword_alternation(keywords: &[&str]) -> String {
    let mut sorted = keywords.to_vec();
    sorted.sort_by_key(|keyword| Reverse(keyword.chars().count()));
    sorted.iter()
        .map(|keyword| regex::escape(keyword))
        .collect::<Vec<_>>()
        .join("|")
}

static PAUSE_TAG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)\[(?:{})\s*:?\s*(?P<duration>\d+(?:\.\d+)?)(?P<unit>ms|s)\]",
        keyword_alternation(PAUSE_KEYWORDS)
    )).unwrap()
});

static SFX_TAG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)\[(?:{})\s*:?\s*(?P<name>[^\]]+)\]",
        keyword_alternation(SOUND_EFFECT_KEYWORDS)
    )).unwrap()
});

static STYLE_TAG_REGEX: Lazy<Regex> = Lazy::new(|| {
    let keywords = keyword_alternation(STYLE_KEYWORDS);
    Regex::new(&format!(
        r"(?is)\[(?:{kw})\s*:?\s*(?P<style>[^\]]+)\](?P<content>.+?)\[/\s*(?:{kw})\s*\]",
        kw = keywords
    )).unwrap()
});

static WHITESPACE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Replace ellipsis characters, collapse whitespace runs and trim
pub fn normalize_text(text: &str) -> String {
    let expanded = text.replace('…', "...");
    WHITESPACE_REGEX.replace_all(&expanded, " ").trim().to_string()
}

fn replace_pauses(text: &str) -> Cow<'_, str> {
    PAUSE_TAG_REGEX.replace_all(text, |caps: &Captures| {
        format!("<break time=\"{}{}\"/>", &caps["duration"], &caps["unit"])
    })
}

fn replace_sound_effects(text: &str) -> Cow<'_, str> {
    SFX_TAG_REGEX.replace_all(text, |caps: &Captures| {
        format!("<say-as interpret-as=\"interjection\">{}</say-as>", caps["name"].trim())
    })
}

fn replace_style_spans(text: &str) -> Cow<'_, str> {
    STYLE_TAG_REGEX.replace_all(text, |caps: &Captures| {
        let content = caps["content"].trim();
        match SpeechStyle::from_name(&caps["style"]) {
            Some(style) => style.wrap(content),
            None => content.to_string(),
        }
    })
}

/// Rewrite pause, sound-effect and style tags into SSML directives
///
/// Pauses and sound effects are substituted first, so a style span may
/// enclose the directives they produce. Unknown style names keep the span
/// content without any markup.
pub fn apply_non_speech_and_style(text: &str) -> String {
    let with_pause = replace_pauses(text);
    let with_sfx = replace_sound_effects(&with_pause);
    replace_style_spans(&with_sfx).into_owned()
}
