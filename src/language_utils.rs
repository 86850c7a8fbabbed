/*!
 * Language utilities for language tag handling.
 *
 * Transcripts and synthesis voices are addressed with BCP-47 style tags such
 * as `ru-RU` or `en-US`. The primary subtag is validated against ISO 639-1
 * (2-letter) and ISO 639-2 (3-letter) codes; region and script subtags are
 * passed through untouched.
 */

use anyhow::{Result, anyhow};
use isolang::Language;

/// Split a tag into its primary language subtag
pub fn primary_subtag(tag: &str) -> &str {
    tag.trim()
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
}

/// Map ISO 639-2/B codes to their ISO 639-2/T form
fn bibliographic_to_terminology(code: &str) -> Option<&'static str> {
    match code {
        "fre" => Some("fra"),
        "ger" => Some("deu"),
        "dut" => Some("nld"),
        "gre" => Some("ell"),
        "chi" => Some("zho"),
        "cze" => Some("ces"),
        "ice" => Some("isl"),
        "alb" => Some("sqi"),
        "arm" => Some("hye"),
        "baq" => Some("eus"),
        "bur" => Some("mya"),
        "per" => Some("fas"),
        "geo" => Some("kat"),
        "may" => Some("msa"),
        "mac" => Some("mkd"),
        "rum" => Some("ron"),
        "slo" => Some("slk"),
        "wel" => Some("cym"),
        _ => None,
    }
}

/// Resolve the primary subtag of a tag to an ISO language
fn resolve_language(tag: &str) -> Option<Language> {
    let code = primary_subtag(tag).to_lowercase();
    match code.len() {
        2 => Language::from_639_1(&code),
        3 => {
            let part2t = bibliographic_to_terminology(&code).unwrap_or(code.as_str());
            Language::from_639_3(part2t)
        }
        _ => None,
    }
}

/// Validate that a tag starts with a known ISO 639 language code
pub fn validate_language_tag(tag: &str) -> Result<()> {
    if resolve_language(tag).is_some() {
        Ok(())
    } else {
        Err(anyhow!("Invalid language tag: {}", tag))
    }
}

/// Case-insensitive equality of two tags
pub fn same_language_tag(tag1: &str, tag2: &str) -> bool {
    tag1.trim().to_lowercase() == tag2.trim().to_lowercase()
}

/// Get the English language name for a tag
pub fn get_language_name(tag: &str) -> Result<String> {
    let lang = resolve_language(tag)
        .ok_or_else(|| anyhow!("Failed to get language from tag: {}", tag))?;

    Ok(lang.to_name().to_string())
}
