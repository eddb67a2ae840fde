//! SubRip (.srt) parsing and generation (spec §4.4).

use super::text::normalize;
use super::SubtitleEntry;
use crate::error::{LitesubError, Result};

/// Parse an SRT document. Blocks are separated by one or more blank lines;
/// a block is `index\nHH:MM:SS,mmm --> HH:MM:SS,mmm\ntext...`. Malformed
/// blocks are skipped rather than failing the whole document, mirroring
/// how lenient real-world SRT files tend to be.
pub fn parse(data: &str) -> Result<Vec<SubtitleEntry>> {
    let normalized = data.replace("\r\n", "\n");
    let mut entries = Vec::new();

    for block in normalized.split("\n\n") {
        let block = block.trim();
        if block.is_empty() {
            continue;
        }
        let mut lines = block.lines();
        let Some(first) = lines.next() else { continue };

        let time_line = if first.trim().parse::<usize>().is_ok() {
            match lines.next() {
                Some(l) => l,
                None => continue,
            }
        } else {
            first
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
    let (start, end) = line.split_once("-->")?;
    Some((parse_timestamp(start.trim())?, parse_timestamp(end.trim())?))
}

fn parse_timestamp(s: &str) -> Option<i64> {
    let s = s.split_whitespace().next()?;
    let (hms, ms) = s.split_once(',').or_else(|| s.split_once('.'))?;
    let mut parts = hms.split(':');
    let h: i64 = parts.next()?.parse().ok()?;
    let m: i64 = parts.next()?.parse().ok()?;
    let s: i64 = parts.next()?.parse().ok()?;
    let ms: i64 = ms.parse().ok()?;
    Some(((h * 60 + m) * 60 + s) * 1000 + ms)
}

/// Format a millisecond timestamp as `HH:MM:SS,mmm`.
pub fn format_timestamp(ms: i64) -> String {
    let ms = ms.max(0);
    let total_seconds = ms / 1000;
    let millis = ms % 1000;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02},{millis:03}")
}

/// Generate an SRT document from entries, renumbering sequentially.
pub fn generate(entries: &[SubtitleEntry]) -> String {
    let mut out = String::new();
    for (i, e) in entries.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&(i + 1).to_string());
        out.push('\n');
        out.push_str(&format_timestamp(e.start_ms));
        out.push_str(" --> ");
        out.push_str(&format_timestamp(e.end_ms));
        out.push('\n');
        out.push_str(&e.text);
        out.push('\n');
    }
    out
}
