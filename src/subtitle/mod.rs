//! Subtitle codec layer (spec §4.4): parsing and generation for SRT,
//! ASS/SSA, and WebVTT, plus the text normalization shared by all three.
//!
//! Every format converges on the same in-memory shape, [`SubtitleEntry`]:
//! millisecond timestamps and plain text, so the orchestrator never has to
//! know which wire format a track came from.

pub mod ass;
pub mod srt;
pub mod text;
pub mod vtt;

use crate::error::{LitesubError, Result};

/// A recognized text subtitle wire format (spec §3 "Subtitle Track").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubtitleFormat {
    Srt,
    Ass,
    Ssa,
    WebVtt,
}

impl SubtitleFormat {
    pub fn extension(self) -> &'static str {
        match self {
            SubtitleFormat::Srt => "srt",
            SubtitleFormat::Ass => "ass",
            SubtitleFormat::Ssa => "ssa",
            SubtitleFormat::WebVtt => "vtt",
        }
    }
}

/// One timed subtitle entry (spec §3 "Subtitle Entry"). `text` is always
/// plain text: ASS override tags are already stripped and `\N`/`\n`
/// already converted to real line breaks, regardless of source format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleEntry {
    pub index: usize,
    pub start_ms: i64,
    pub end_ms: i64,
    pub text: String,
    /// ASS/SSA style name, if the entry came from (or targets) an ASS/SSA
    /// script. `None` for SRT/WebVTT.
    pub style: Option<String>,
}

/// Parse a subtitle document of the given format into entries.
pub fn parse(data: &str, format: SubtitleFormat) -> Result<Vec<SubtitleEntry>> {
    match format {
        SubtitleFormat::Srt => srt::parse(data),
        SubtitleFormat::Ass | SubtitleFormat::Ssa => ass::parse(data),
        SubtitleFormat::WebVtt => vtt::parse(data),
    }
}

/// Generate a subtitle document of the given format from entries.
///
/// `codec_private` is the original ASS/SSA script header (the `[Script
/// Info]`/`[V4+ Styles]` sections from Matroska's CodecPrivate), reused
/// verbatim when generating ASS/SSA so style definitions survive
/// translation untouched (spec §4.4 "ASS generation preserves style
/// lines").
pub fn generate(entries: &[SubtitleEntry], format: SubtitleFormat, codec_private: Option<&str>) -> Result<String> {
    match format {
        SubtitleFormat::Srt => Ok(srt::generate(entries)),
        SubtitleFormat::Ass | SubtitleFormat::Ssa => Ok(ass::generate(entries, codec_private)),
        SubtitleFormat::WebVtt => Ok(vtt::generate(entries)),
    }
}

/// Parse a subtitle document, inferring the format from a file extension
/// such as `"srt"`, `"ass"`, `"ssa"`, or `"vtt"`.
pub fn parse_by_extension(data: &str, extension: &str) -> Result<(Vec<SubtitleEntry>, SubtitleFormat)> {
    let format = format_from_extension(extension)?;
    Ok((parse(data, format)?, format))
}

fn format_from_extension(extension: &str) -> Result<SubtitleFormat> {
    match extension.to_ascii_lowercase().as_str() {
        "srt" => Ok(SubtitleFormat::Srt),
        "ass" => Ok(SubtitleFormat::Ass),
        "ssa" => Ok(SubtitleFormat::Ssa),
        "vtt" | "webvtt" => Ok(SubtitleFormat::WebVtt),
        other => Err(LitesubError::UnsupportedCodec(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_lookup_is_case_insensitive() {
        assert_eq!(format_from_extension("SRT").unwrap(), SubtitleFormat::Srt);
        assert_eq!(format_from_extension("Vtt").unwrap(), SubtitleFormat::WebVtt);
        assert!(format_from_extension("sub").is_err());
    }

    #[test]
    fn srt_round_trips_plain_entries() {
        let entries = vec![
            SubtitleEntry { index: 1, start_ms: 0, end_ms: 1500, text: "Hello".into(), style: None },
            SubtitleEntry { index: 2, start_ms: 1500, end_ms: 3000, text: "World".into(), style: None },
        ];
        let generated = generate(&entries, SubtitleFormat::Srt, None).unwrap();
        let parsed = parse(&generated, SubtitleFormat::Srt).unwrap();
        assert_eq!(parsed, entries);
    }
}
