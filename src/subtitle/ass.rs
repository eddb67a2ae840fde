//! Advanced SubStation Alpha / SubStation Alpha parsing and generation
//! (spec §4.4), plus the MKV embedded-block bridge to plain text.
//!
//! Two distinct shapes of ASS data appear in this crate: a full `.ass`
//! document (`[Script Info]`, `[V4+ Styles]`, `[Events]` sections) handled
//! by [`parse`]/[`generate`], and a single Matroska subtitle block, which
//! is just one Dialogue line's fields without the `Dialogue:` prefix or a
//! Format header, handled by [`plain_text_from_mkv_block`].

use super::text::normalize;
use super::SubtitleEntry;
use crate::error::Result;
use regex::Regex;
use std::sync::OnceLock;

fn override_tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{[^}]*\}").unwrap())
}

/// Strip ASS override tags (`{\b1}`, `{\pos(...)}`, ...) and convert
/// ASS/SSA hard line breaks (`\N`, `\n`) to real newlines.
fn strip_ass_markup(text: &str) -> String {
    let without_overrides = override_tag_re().replace_all(text, "");
    without_overrides.replace("\\N", "\n").replace("\\n", "\n")
}

/// Convert one Matroska SSA/ASS subtitle block payload (the Dialogue
/// fields `ReadOrder,Layer,Style,Name,MarginL,MarginR,MarginV,Effect,Text`
/// without the `Dialogue:` prefix) into normalized plain text and its
/// style name.
pub fn plain_text_from_mkv_block(payload: &str) -> (String, Option<String>) {
    let fields: Vec<&str> = payload.splitn(9, ',').collect();
    if fields.len() < 9 {
        return (normalize(&strip_ass_markup(payload)), None);
    }
    let style = fields[2].trim();
    let text = strip_ass_markup(fields[8]);
    let normalized = normalize_preserving_newlines(&text);
    let style = if style.is_empty() { None } else { Some(style.to_string()) };
    (normalized, style)
}

/// Like [`normalize`], but keeps line breaks intact (ASS dialogue lines
/// legitimately contain multi-line text via `\N`).
fn normalize_preserving_newlines(text: &str) -> String {
    text.lines()
        .map(normalize)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Parse a full `.ass`/`.ssa` document's `[Events]` section into entries.
/// `[Script Info]` and `[V4+ Styles]` are ignored here; they are carried
/// through verbatim via `codec_private` when regenerating (spec §4.4).
pub fn parse(data: &str) -> Result<Vec<SubtitleEntry>> {
    let mut entries = Vec::new();
    let mut in_events = false;
    let mut format_fields: Vec<String> = Vec::new();

    for raw_line in data.lines() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with('[') {
            in_events = line.eq_ignore_ascii_case("[Events]");
            continue;
        }
        if !in_events {
            continue;
        }
        if let Some(rest) = strip_prefix_ci(line, "Format:") {
            format_fields = rest.split(',').map(|f| f.trim().to_lowercase()).collect();
            continue;
        }
        let Some(rest) = strip_prefix_ci(line, "Dialogue:") else {
            continue;
        };
        if format_fields.is_empty() {
            continue;
        }
        let n_fixed = format_fields.len() - 1;
        let parts: Vec<&str> = rest.splitn(format_fields.len(), ',').collect();
        if parts.len() < format_fields.len() {
            continue;
        }
        let mut start_ms = None;
        let mut end_ms = None;
        let mut style = None;
        for (i, field_name) in format_fields.iter().enumerate().take(n_fixed) {
            let value = parts[i].trim();
            match field_name.as_str() {
                "start" => start_ms = parse_ass_timestamp(value),
                "end" => end_ms = parse_ass_timestamp(value),
                "style" => style = Some(value.to_string()),
                _ => {}
            }
        }
        let (Some(start_ms), Some(end_ms)) = (start_ms, end_ms) else {
            continue;
        };
        let raw_text = parts[n_fixed];
        let text = normalize_preserving_newlines(&strip_ass_markup(raw_text));
        if text.is_empty() {
            continue;
        }
        entries.push(SubtitleEntry {
            index: entries.len() + 1,
            start_ms,
            end_ms,
            text,
            style: style.filter(|s| !s.is_empty()),
        });
    }

    Ok(entries)
}

fn strip_prefix_ci<'a>(line: &'a str, prefix: &str) -> Option<&'a str> {
    if line.len() >= prefix.len() && line[..prefix.len()].eq_ignore_ascii_case(prefix) {
        Some(line[prefix.len()..].trim_start())
    } else {
        None
    }
}

fn parse_ass_timestamp(s: &str) -> Option<i64> {
    let mut parts = s.split(':');
    let h: i64 = parts.next()?.trim().parse().ok()?;
    let m: i64 = parts.next()?.trim().parse().ok()?;
    let sec_field = parts.next()?.trim();
    let (sec, centi) = sec_field.split_once('.')?;
    let sec: i64 = sec.parse().ok()?;
    let centi: i64 = centi.parse().ok()?;
    Some(((h * 60 + m) * 60 + sec) * 1000 + centi * 10)
}

fn format_ass_timestamp(ms: i64) -> String {
    let ms = ms.max(0);
    let total_seconds = ms / 1000;
    let centis = (ms % 1000) / 10;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{hours}:{minutes:02}:{seconds:02}.{centis:02}")
}

const DEFAULT_SCRIPT_HEADER: &str = "[Script Info]\nScriptType: v4.00+\n\n[V4+ Styles]\nFormat: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, OutlineColour, BackColour, Bold, Italic, Underline, StrikeOut, ScaleX, ScaleY, Spacing, Angle, BorderStyle, Outline, Shadow, Alignment, MarginL, MarginR, MarginV, Encoding\nStyle: Default,Arial,20,&H00FFFFFF,&H000000FF,&H00000000,&H00000000,0,0,0,0,100,100,0,0,1,2,0,2,10,10,10,1\n";

/// Generate a full `.ass` document. `codec_private` is the original
/// `[Script Info]`/`[V4+ Styles]` header, reused verbatim when present so
/// style definitions survive unchanged; otherwise a minimal default
/// header is emitted.
pub fn generate(entries: &[SubtitleEntry], codec_private: Option<&str>) -> String {
    let mut out = String::new();
    let header = codec_private.unwrap_or(DEFAULT_SCRIPT_HEADER).trim_end();
    out.push_str(header);
    out.push('\n');
    if !header.to_lowercase().contains("[events]") {
        out.push_str("\n[Events]\nFormat: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text\n");
    }
    for e in entries {
        let style = e.style.as_deref().unwrap_or("Default");
        let text = e.text.replace('\n', "\\N");
        out.push_str(&format!(
            "Dialogue: 0,{},{},{},,0,0,0,,{}\n",
            format_ass_timestamp(e.start_ms),
            format_ass_timestamp(e.end_ms),
            style,
            text
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mkv_block_strips_overrides_and_converts_hard_breaks() {
        let (text, style) = plain_text_from_mkv_block("0,0,Default,,0,0,0,,{\\b1}Hi\\Nthere");
        assert_eq!(text, "Hi\nthere");
        assert_eq!(style.as_deref(), Some("Default"));
    }

    #[test]
    fn mkv_block_keeps_commas_inside_text_field() {
        let (text, _) = plain_text_from_mkv_block("0,0,Default,,0,0,0,,Hello, world, again");
        assert_eq!(text, "Hello, world, again");
    }

    #[test]
    fn parses_full_document_events_section() {
        let doc = "[Script Info]\nScriptType: v4.00+\n\n[Events]\nFormat: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text\nDialogue: 0,0:00:01.00,0:00:02.50,Default,,0,0,0,,{\\i1}Hello{\\i0}\\Nworld\n";
        let entries = parse(doc).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].start_ms, 1000);
        assert_eq!(entries[0].end_ms, 2500);
        assert_eq!(entries[0].text, "Hello\nworld");
        assert_eq!(entries[0].style.as_deref(), Some("Default"));
    }

    #[test]
    fn generate_preserves_supplied_header_verbatim() {
        let header = "[Script Info]\nCustom: yes\n\n[V4+ Styles]\nStyle: Default,Arial,20\n\n[Events]\nFormat: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text\n";
        let entries = vec![SubtitleEntry {
            index: 1,
            start_ms: 0,
            end_ms: 1000,
            text: "Hi".into(),
            style: Some("Default".into()),
        }];
        let out = generate(&entries, Some(header));
        assert!(out.starts_with("[Script Info]\nCustom: yes"));
        assert!(out.contains("Dialogue: 0,0:00:00.00,0:00:01.00,Default"));
    }

    #[test]
    fn format_and_parse_ass_timestamp_round_trip() {
        assert_eq!(parse_ass_timestamp("1:02:03.45"), Some(3_723_450));
        assert_eq!(format_ass_timestamp(3_723_450), "1:02:03.45");
    }
}
