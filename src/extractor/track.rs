//! Subtitle track metadata (spec §3 "Subtitle Track") and codec-ID mapping.

use crate::ebml::ids;
use crate::subtitle::SubtitleFormat;

/// A subtitle track entry parsed out of the Matroska `Tracks` element.
#[derive(Debug, Clone)]
pub struct SubtitleTrack {
    pub number: u64,
    pub codec_id: String,
    pub codec_private: Vec<u8>,
    pub language: String,
    pub name: Option<String>,
    pub default: bool,
    pub forced: bool,
    /// Default block duration in nanoseconds, if declared on the track.
    pub default_duration_ns: Option<u64>,
}

impl SubtitleTrack {
    /// Map this track's codec ID to a subtitle format, if it is one of the
    /// four recognized text codecs (spec §3). Bitmap/image subtitle codecs
    /// and anything else yield `None` and are filtered out of track
    /// selection.
    pub fn format(&self) -> Option<SubtitleFormat> {
        codec_id_to_format(&self.codec_id)
    }
}

/// Map a Matroska `CodecID` string to a [`SubtitleFormat`].
pub fn codec_id_to_format(codec_id: &str) -> Option<SubtitleFormat> {
    match codec_id {
        ids::CODEC_ID_SRT => Some(SubtitleFormat::Srt),
        ids::CODEC_ID_ASS => Some(SubtitleFormat::Ass),
        ids::CODEC_ID_SSA => Some(SubtitleFormat::Ssa),
        ids::CODEC_ID_WEBVTT => Some(SubtitleFormat::WebVtt),
        _ => None,
    }
}
