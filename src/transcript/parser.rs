use std::fmt;

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

// @module: Transcript segment parsing

// @const: Speaker header line, e.g. "Speaker 1 00:01:05"
static SPEAKER_LINE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<speaker>.+?)\s+(?P<ts>\d{2}:\d{2}:\d{2})\s*$").unwrap()
});

// Every character that ends a line, control separators included
const LINE_BREAKS: [char; 10] = [
    '\n', '\r', '\u{000B}', '\u{000C}', '\u{001C}', '\u{001D}', '\u{001E}',
    '\u{0085}', '\u{2028}', '\u{2029}',
];

/// One contiguous block of dialogue attributed to a single speaker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Speaker label as written in the header
    pub speaker: String,

    /// Header timestamp (HH:MM:SS)
    pub timestamp: Option<String>,

    /// Per-line trimmed text joined by newlines
    pub text: String,
}

impl Segment {
    pub fn new(speaker: impl Into<String>, timestamp: Option<String>, text: impl Into<String>) -> Self {
        Segment {
            speaker: speaker.into(),
            timestamp,
            text: text.into(),
        }
    }

    /// Copy of this segment carrying different text, e.g. its translation
    pub fn with_text(&self, text: impl Into<String>) -> Self {
        Segment {
            speaker: self.speaker.clone(),
            timestamp: self.timestamp.clone(),
            text: text.into(),
        }
    }

    /// Length used for chunk budgeting, in characters
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.timestamp {
            Some(ts) => writeln!(f, "{} {}", self.speaker, ts)?,
            None => writeln!(f, "{}", self.speaker)?,
        }
        writeln!(f, "{}", self.text)
    }
}

/// Accumulates the lines following a speaker header
struct SegmentBuffer {
    speaker: Option<String>,
    timestamp: Option<String>,
    lines: Vec<String>,
}

impl SegmentBuffer {
    fn new() -> Self {
        SegmentBuffer {
            speaker: None,
            timestamp: None,
            lines: Vec::new(),
        }
    }

    // Lines seen before the first header have no speaker and are dropped here
    fn flush_into(&mut self, segments: &mut Vec<Segment>) {
        let lines = std::mem::take(&mut self.lines);
        let Some(speaker) = &self.speaker else {
            return;
        };

        let text = lines.join("\n").trim().to_string();
        if !text.is_empty() {
            segments.push(Segment::new(speaker.clone(), self.timestamp.clone(), text));
        }
    }

    fn start(&mut self, speaker: &str, timestamp: &str) {
        self.speaker = Some(speaker.trim().to_string());
        self.timestamp = Some(timestamp.to_string());
    }
}

/// Parse a transcript into ordered speaker segments
///
/// A header line is `<label> HH:MM:SS` with nothing after the timestamp.
/// Every following non-blank line belongs to that speaker until the next
/// header. Headers without any text produce no segment, and text before the
/// first header is discarded. Input without any header yields an empty vector.
pub fn parse_speaker_segments(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut buffer = SegmentBuffer::new();

    for raw_line in text.split(LINE_BREAKS) {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(caps) = SPEAKER_LINE_REGEX.captures(line) {
            buffer.flush_into(&mut segments);
            buffer.start(&caps["speaker"], &caps["ts"]);
        } else {
            buffer.lines.push(line.to_string());
        }
    }

    buffer.flush_into(&mut segments);
    debug!("Parsed {} speaker segments", segments.len());
    segments
}

/// Unique speakers in order of first appearance
pub fn extract_speakers(segments: &[Segment]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for segment in segments {
        if !seen.contains(&segment.speaker) {
            seen.push(segment.speaker.clone());
        }
    }
    seen
}

/// Per-speaker segment counts rendered as a JSON object, in speaker order
pub fn summarize_speakers(segments: &[Segment]) -> String {
    let mut counts = serde_json::Map::new();
    for segment in segments {
        let count = counts.get(&segment.speaker).and_then(|v| v.as_u64()).unwrap_or(0);
        counts.insert(segment.speaker.clone(), (count + 1).into());
    }
    serde_json::Value::Object(counts).to_string()
}

/// Render segments back into transcript text that parses to the same segments
pub fn render_transcript(segments: &[Segment]) -> String {
    segments.iter()
        .map(|segment| segment.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
