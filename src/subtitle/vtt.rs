//! WebVTT parsing and generation (spec §4.4).

use super::text::normalize;
use super::SubtitleEntry;
use crate::error::Result;

/// Parse a WebVTT document. The `WEBVTT` header line and any `NOTE`/region
/// blocks are skipped; cue identifiers (a line before the timing line that
/// is not itself a timing line) are accepted but discarded.
pub fn parse(data: &str) -> Result<Vec<SubtitleEntry>> {
    let normalized = data.replace("\r\n", "\n");
    let mut entries = Vec::new();

    for block in normalized.split("\n\n") {
        let block = block.trim();
        if block.is_empty() || block.starts_with("WEBVTT") || block.starts_with("NOTE") || block.starts_with("STYLE")
        {
            continue;
        }
        let mut lines = block.lines();
        let Some(first) = lines.next() else { continue };

        let time_line = if first.contains("-->") {
            first
        } else {
            match lines.next() {
                Some(l) if l.contains("-->") => l,
                _ => continue,
            }
        };

        let Some((start_ms, end_ms)) = parse_time_range(time_line) else {
            continue;
        };

        let text: Vec<&str> = lines.collect();
        let text = normalize(&text.join("\n"));
        if text.is_empty() {
            continue;
        }

        entries.push(SubtitleEntry {
            index: entries.len() + 1,
            start_ms,
            end_ms,
            text,
            style: None,
        });
    }

    Ok(entries)
}

fn parse_time_range(line: &str) -> Option<(i64, i64)> {
    let (start, rest) = line.split_once("-->")?;
    let end = rest.split_whitespace().next()?;
    Some((parse_timestamp(start.trim())?, parse_timestamp(end.trim())?))
}

fn parse_timestamp(s: &str) -> Option<i64> {
    let (hms, ms) = s.split_once('.')?;
    let mut parts: Vec<&str> = hms.split(':').collect();
    let ms: i64 = ms.parse().ok()?;
    let secs: i64 = parts.pop()?.parse().ok()?;
    let mins: i64 = parts.pop().unwrap_or("0").parse().ok()?;
    let hours: i64 = parts.pop().unwrap_or("0").parse().ok()?;
    Some(((hours * 60 + mins) * 60 + secs) * 1000 + ms)
}

/// Format a millisecond timestamp as `HH:MM:SS.mmm`.
pub fn format_timestamp(ms: i64) -> String {
    let ms = ms.max(0);
    let total_seconds = ms / 1000;
    let millis = ms % 1000;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}.{millis:03}")
}

/// Generate a WebVTT document from entries.
pub fn generate(entries: &[SubtitleEntry]) -> String {
    let mut out = String::from("WEBVTT\n\n");
    for e in entries {
        out.push_str(&format_timestamp(e.start_ms));
        out.push_str(" --> ");
        out.push_str(&format_timestamp(e.end_ms));
        out.push('\n');
        out.push_str(&e.text);
        out.push_str("\n\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "WEBVTT\n\n00:00:01.000 --> 00:00:02.500\nHello\n\n00:00:02.500 --> 00:00:04.000\nWorld\n";

    #[test]
    fn parses_header_and_two_cues() {
        let entries = parse(SAMPLE).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].start_ms, 1000);
        assert_eq!(entries[1].text, "World");
    }

    #[test]
    fn accepts_cue_identifiers() {
        let data = "WEBVTT\n\ncue-1\n00:00:00.000 --> 00:00:01.000\nHi\n";
        let entries = parse(data).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].text, "Hi");
    }

    #[test]
    fn skips_note_blocks() {
        let data = "WEBVTT\n\nNOTE this is a comment\n\n00:00:00.000 --> 00:00:01.000\nHi\n";
        let entries = parse(data).unwrap();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn generate_then_parse_round_trips() {
        let entries = parse(SAMPLE).unwrap();
        let generated = generate(&entries);
        let reparsed = parse(&generated).unwrap();
        assert_eq!(entries, reparsed);
    }
}
