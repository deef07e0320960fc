//! Name extraction from name-revealing utterances.

use regex::Regex;
use std::sync::OnceLock;

static NAME_PATTERN: OnceLock<Regex> = OnceLock::new();

/// Trigger phrases followed by a single name token: letters with optional
/// hyphens or apostrophes. Only the first token after the trigger is
/// captured; multi-word names are not attempted.
fn name_pattern() -> &'static Regex {
    NAME_PATTERN.get_or_init(|| {
        Regex::new(r"(?i)\b(?:my name is|i am|i'm)\s+([A-Za-z][A-Za-z'-]+)")
            .expect("name pattern is valid")
    })
}

/// Extract a name from phrases like "my name is Alex" or "i'm Jordan".
///
/// The captured token is returned with its first letter uppercased and the
/// rest lowercased. Returns `None` when no trigger phrase is present or no
/// name token follows it.
pub fn extract_name(text: &str) -> Option<String> {
    let captures = name_pattern().captures(text)?;
    let token = captures.get(1)?.as_str();
    Some(capitalize(token))
}

fn capitalize(token: &str) -> String {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) => {
            let mut out = String::with_capacity(token.len());
            out.push(first.to_ascii_uppercase());
            out.extend(chars.map(|c| c.to_ascii_lowercase()));
            out
        }
        None => String::new(),
    }
}
