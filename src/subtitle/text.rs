//! Text normalization shared by all subtitle formats (spec §4.4): HTML
//! entity decoding, markup tag stripping, and whitespace collapsing.

use regex::Regex;
use std::sync::OnceLock;

fn tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"</?[a-zA-Z][^>]*>").unwrap())
}

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[ \t]+").unwrap())
}

/// Decode the handful of named/numeric HTML entities that show up in
/// subtitle text (`&amp;`, `&lt;`, `&#39;`, ...).
pub fn decode_html_entities(input: &str) -> String {
    if !input.contains('&') {
        return input.to_string();
    }
    let mut out = String::with_capacity(input.len());
    let mut chars = input.char_indices().peekable();
    let bytes = input.as_bytes();

    while let Some((i, c)) = chars.next() {
        if c != '&' {
            out.push(c);
            continue;
        }
        let rest = &input[i..];
        if let Some(end) = rest.find(';') {
            if end <= 10 {
                let entity = &rest[1..end];
                if let Some(decoded) = decode_one_entity(entity) {
                    out.push(decoded);
                    for _ in 0..end {
                        if chars.peek().is_some() {
                            chars.next();
                        }
                    }
                    continue;
                }
            }
        }
        let _ = bytes;
        out.push('&');
    }
    out
}

fn decode_one_entity(entity: &str) -> Option<char> {
    match entity {
        "amp" => return Some('&'),
        "lt" => return Some('<'),
        "gt" => return Some('>'),
        "quot" => return Some('"'),
        "apos" | "#39" => return Some('\''),
        "nbsp" => return Some('\u{00A0}'),
        _ => {}
    }
    if let Some(code) = entity.strip_prefix("#x").or_else(|| entity.strip_prefix("#X")) {
        return u32::from_str_radix(code, 16).ok().and_then(char::from_u32);
    }
    if let Some(code) = entity.strip_prefix('#') {
        return code.parse::<u32>().ok().and_then(char::from_u32);
    }
    None
}

/// Strip HTML-style markup tags (`<i>`, `<b>`, `<font ...>`, ...).
pub fn strip_tags(input: &str) -> String {
    tag_re().replace_all(input, "").into_owned()
}

/// Collapse runs of horizontal whitespace and trim each line, without
/// touching line breaks.
pub fn collapse_whitespace(input: &str) -> String {
    input
        .lines()
        .map(|line| whitespace_re().replace_all(line.trim(), " ").into_owned())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Full normalization pipeline applied to subtitle text before it is
/// stored as a [`crate::subtitle::SubtitleEntry::text`].
pub fn normalize(input: &str) -> String {
    let decoded = decode_html_entities(input);
    let stripped = strip_tags(&decoded);
    collapse_whitespace(&stripped).trim().to_string()
}
