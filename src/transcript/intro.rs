use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use super::parser::Segment;

// @module: Heuristic intro detection

// @const: Sentence delimiters; a run of them counts once
static SENTENCE_SPLIT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[.!?…]+").unwrap()
});

/// Only the leading segments are considered
const MAX_INTRO_SEGMENTS: usize = 6;

/// Word budget of an intro
const MAX_INTRO_WORDS: usize = 140;

/// Sentences up to this many words count as short
const SHORT_SENTENCE_WORDS: usize = 12;

/// Share of short sentences required for an intro
const MIN_SHORT_RATIO: f64 = 0.6;

/// Outcome of intro detection
///
/// Reporting only: detection never removes or changes segments.
#[derive(Debug, Clone, PartialEq)]
pub struct IntroInfo {
    /// Space-joined candidate text, empty when no intro was detected
    pub text: String,

    /// Number of candidate segments examined
    pub segment_count: usize,

    /// Human-readable justification
    pub reason: String,
}

impl IntroInfo {
    fn none(reason: &str) -> Self {
        IntroInfo {
            text: String::new(),
            segment_count: 0,
            reason: reason.to_string(),
        }
    }

    /// Whether an intro was detected
    pub fn is_detected(&self) -> bool {
        !self.text.is_empty()
    }

    /// First `max_chars` characters of the intro text
    pub fn preview(&self, max_chars: usize) -> String {
        self.text.chars().take(max_chars).collect()
    }
}

#[derive(Default)]
struct SentenceStats {
    total_words: usize,
    short_hits: usize,
    sentences: usize,
}

impl SentenceStats {
    fn short_ratio(&self) -> f64 {
        self.short_hits as f64 / self.sentences.max(1) as f64
    }
}

fn split_sentences(text: &str) -> Vec<&str> {
    SENTENCE_SPLIT_REGEX
        .split(text)
        .map(str::trim)
        .filter(|sentence| !sentence.is_empty())
        .collect()
}

/// Detect whether the transcript opens with an intro
///
/// Up to the first six segments are scanned. Segments without any sentence
/// are skipped; every other segment becomes a candidate. Scanning stops once
/// more than 140 words have been seen. The candidates form an intro when they
/// total at most 140 words and at least 60% of their sentences have twelve
/// words or fewer.
pub fn detect_intro(segments: &[Segment]) -> IntroInfo {
    if segments.is_empty() {
        return IntroInfo::none("no segments");
    }

    let mut candidates: Vec<&Segment> = Vec::new();
    let mut stats = SentenceStats::default();

    for segment in segments.iter().take(MAX_INTRO_SEGMENTS) {
        let sentences = split_sentences(&segment.text);
        if sentences.is_empty() {
            continue;
        }

        candidates.push(segment);
        for sentence in sentences {
            let words = sentence.split_whitespace().count();
            stats.total_words += words;
            stats.sentences += 1;
            if words <= SHORT_SENTENCE_WORDS {
                stats.short_hits += 1;
            }
        }

        if stats.total_words > MAX_INTRO_WORDS {
            break;
        }
    }

    if candidates.is_empty() {
        return IntroInfo::none("no intro candidates");
    }

    let short_ratio = stats.short_ratio();
    let is_intro = stats.total_words <= MAX_INTRO_WORDS && short_ratio >= MIN_SHORT_RATIO;
    debug!(
        "Intro scan: {} candidates, {} sentences, {} short",
        candidates.len(), stats.sentences, stats.short_hits
    );

    let text = if is_intro {
        candidates.iter()
            .map(|segment| segment.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    } else {
        String::new()
    };

    IntroInfo {
        text,
        segment_count: candidates.len(),
        reason: format!("short_ratio={:.2}, total_words={}", short_ratio, stats.total_words),
    }
}
