//! Streaming Matroska (MKV/EBML) subtitle extractor (spec §4.3).
//!
//! Parses only what is needed to find one subtitle track's blocks: the
//! EBML header, the Segment's SeekHead/Info/Tracks (and Cues, when
//! present), then either the cue-referenced clusters or a full linear scan
//! of clusters. Video/audio blocks are skipped by size, never decoded.

pub mod track;

use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;

use crate::bytesource::ByteSource;
use crate::ebml::{ids, EbmlReader, ElementHeader, ElementSize};
use crate::error::{LitesubError, Result};
use crate::subtitle::{ass, SubtitleEntry, SubtitleFormat};

pub use track::{codec_id_to_format, SubtitleTrack};

const DEFAULT_TIMECODE_SCALE: u64 = 1_000_000;
/// Fallback duration (spec §4.3 step 7) applied to the final block of a
/// track, or any block whose duration is otherwise unknown.
const FALLBACK_DURATION_MS: i64 = 3000;

/// One timed subtitle block as read off the wire (spec §3 "Subtitle Block").
#[derive(Debug, Clone)]
pub struct SubtitleBlock {
    pub track_number: u64,
    pub start_ms: i64,
    pub duration_ms: i64,
    pub payload: Vec<u8>,
}

/// Result of extracting one subtitle track out of an MKV container.
pub struct ExtractedTrack {
    pub entries: Vec<SubtitleEntry>,
    pub format: SubtitleFormat,
    pub codec_private: Vec<u8>,
    /// Blocks whose payload decoded to empty/whitespace-only text, and
    /// were therefore discarded rather than emitted as an entry (spec §8).
    pub discarded_empty: usize,
}

pub struct MatroskaExtractor<R> {
    source: ByteSource<R>,
    segment_data_start: u64,
    segment_size: ElementSize,
    timecode_scale: u64,
    /// Element ID -> segment-relative data offset, from SeekHead.
    seek_head: HashMap<u32, u64>,
    tracks_inline: Option<Vec<SubtitleTrack>>,
    cues_inline_offset: Option<u64>,
}

impl MatroskaExtractor<File> {
    /// Open a local MKV file and scan its headers.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let source = ByteSource::open(path)?;
        Self::from_source(source)
    }
}

impl<R: Read + Seek> MatroskaExtractor<R> {
    pub fn from_source(source: ByteSource<R>) -> Result<Self> {
        let mut this = Self {
            source,
            segment_data_start: 0,
            segment_size: ElementSize::Unknown,
            timecode_scale: DEFAULT_TIMECODE_SCALE,
            seek_head: HashMap::new(),
            tracks_inline: None,
            cues_inline_offset: None,
        };
        this.parse_header_and_segment()?;
        this.scan_segment_top_level()?;
        Ok(this)
    }

    fn ebml(&mut self) -> EbmlReader<'_, R> {
        EbmlReader::new(&mut self.source)
    }

    fn read_header_with_start(&mut self) -> Result<(ElementHeader, u64)> {
        let start = self.source.position();
        let header = self.ebml().read_element_header().map_err(map_ebml_err)?;
        Ok((header, start))
    }

    fn read_payload(&mut self, len: u64) -> Result<Vec<u8>> {
        Ok(self.source.read_exact(len as usize)?)
    }

    fn skip_element(&mut self, header: &ElementHeader) -> Result<()> {
        match header.size.known() {
            Some(n) => Ok(self.ebml().skip(n).map_err(map_ebml_err)?),
            None => Err(LitesubError::MalformedContainer(
                "cannot skip element of unknown size".into(),
            )),
        }
    }

    fn parse_header_and_segment(&mut self) -> Result<()> {
        let header = self.ebml().read_element_header().map_err(map_ebml_err)?;
        if header.id != ids::EBML_HEADER {
            return Err(LitesubError::MalformedContainer(format!(
                "expected EBML header, got element 0x{:X}",
                header.id
            )));
        }
        self.skip_element(&header)?;

        let segment = self.ebml().read_element_header().map_err(map_ebml_err)?;
        if segment.id != ids::SEGMENT {
            return Err(LitesubError::MalformedContainer(format!(
                "expected Segment, got element 0x{:X}",
                segment.id
            )));
        }
        self.segment_data_start = segment.data_offset;
        self.segment_size = segment.size;
        Ok(())
    }

    /// Scan Segment children up to the first Cluster or until both
    /// SeekHead and Tracks have been observed, whichever is earlier
    /// (spec §4.3 step 2).
    fn scan_segment_top_level(&mut self) -> Result<()> {
        let mut seen_seek_head = false;
        loop {
            if self.at_segment_end()? {
                break;
            }
            let (header, header_start) = self.read_header_with_start()?;
            match header.id {
                ids::SEEK_HEAD => {
                    self.parse_seek_head(header)?;
                    seen_seek_head = true;
                }
                ids::INFO => self.parse_info(header)?,
                ids::TRACKS => {
                    let tracks = self.parse_tracks(header)?;
                    self.tracks_inline = Some(tracks);
                }
                ids::CUES => {
                    self.cues_inline_offset = Some(header_start - self.segment_data_start);
                    self.skip_element(&header)?;
                }
                ids::CLUSTER => {
                    // Rewind: cluster parsing happens lazily during extract().
                    self.source.seek_absolute(header_start)?;
                    break;
                }
                _ => self.skip_element(&header)?,
            }
            if seen_seek_head && self.tracks_inline.is_some() {
                break;
            }
        }

        if self.tracks_inline.is_none() {
            self.resolve_tracks_via_seek_head()?;
        }
        Ok(())
    }

    fn at_segment_end(&mut self) -> Result<bool> {
        if let Some(size) = self.segment_size.known() {
            let end = self.segment_data_start + size;
            if self.source.position() >= end {
                return Ok(true);
            }
        }
        // Unbounded segment: rely on a short read to terminate the scan.
        Ok(false)
    }

    fn parse_seek_head(&mut self, header: ElementHeader) -> Result<()> {
        let end = header.size.known().map(|n| header.data_offset + n);
        loop {
            if let Some(end) = end {
                if self.source.position() >= end {
                    break;
                }
            }
            let child = match self.ebml().read_element_header() {
                Ok(h) => h,
                Err(_) => break,
            };
            if child.id != ids::SEEK {
                self.skip_element(&child)?;
                continue;
            }
            let seek_end = child
                .size
                .known()
                .map(|n| child.data_offset + n)
                .unwrap_or(end.unwrap_or(child.data_offset));
            let mut seek_id: Option<u32> = None;
            let mut seek_pos: Option<u64> = None;
            while self.source.position() < seek_end {
                let gc = self.ebml().read_element_header().map_err(map_ebml_err)?;
                match gc.id {
                    ids::SEEK_ID => {
                        let bytes = self.read_payload(gc.size.known().unwrap_or(0))?;
                        seek_id = Some(crate::ebml::vint::read_uint_be(&bytes) as u32);
                    }
                    ids::SEEK_POSITION => {
                        let bytes = self.read_payload(gc.size.known().unwrap_or(0))?;
                        seek_pos = Some(crate::ebml::vint::read_uint_be(&bytes));
                    }
                    _ => self.skip_element(&gc)?,
                }
            }
            if let (Some(id), Some(pos)) = (seek_id, seek_pos) {
                self.seek_head.insert(id, pos);
            }
        }
        Ok(())
    }

    fn parse_info(&mut self, header: ElementHeader) -> Result<()> {
        let end = header
            .size
            .known()
            .map(|n| header.data_offset + n)
            .ok_or_else(|| LitesubError::MalformedContainer("Info element has unknown size".into()))?;
        while self.source.position() < end {
            let child = self.ebml().read_element_header().map_err(map_ebml_err)?;
            if child.id == ids::TIMECODE_SCALE {
                let bytes = self.read_payload(child.size.known().unwrap_or(0))?;
                self.timecode_scale = crate::ebml::vint::read_uint_be(&bytes);
            } else {
                self.skip_element(&child)?;
            }
        }
        Ok(())
    }

    fn parse_tracks(&mut self, header: ElementHeader) -> Result<Vec<SubtitleTrack>> {
        let end = header
            .size
            .known()
            .map(|n| header.data_offset + n)
            .ok_or_else(|| LitesubError::MalformedContainer("Tracks element has unknown size".into()))?;
        let mut tracks = Vec::new();
        while self.source.position() < end {
            let child = self.ebml().read_element_header().map_err(map_ebml_err)?;
            if child.id == ids::TRACK_ENTRY {
                if let Some(t) = self.parse_track_entry(child)? {
                    tracks.push(t);
                }
            } else {
                self.skip_element(&child)?;
            }
        }
        Ok(tracks)
    }

    fn parse_track_entry(&mut self, header: ElementHeader) -> Result<Option<SubtitleTrack>> {
        let end = header
            .size
            .known()
            .map(|n| header.data_offset + n)
            .ok_or_else(|| LitesubError::MalformedContainer("TrackEntry has unknown size".into()))?;

        let mut number = None;
        let mut track_type = None;
        let mut codec_id = None;
        let mut codec_private = Vec::new();
        let mut language = None;
        let mut language_bcp47 = None;
        let mut name = None;
        let mut default = true; // FlagDefault defaults to 1 per Matroska spec
        let mut forced = false;
        let mut default_duration_ns = None;

        while self.source.position() < end {
            let child = self.ebml().read_element_header().map_err(map_ebml_err)?;
            let len = child.size.known().unwrap_or(0);
            match child.id {
                ids::TRACK_NUMBER => {
                    number = Some(crate::ebml::vint::read_uint_be(&self.read_payload(len)?));
                }
                ids::TRACK_TYPE => {
                    track_type = Some(crate::ebml::vint::read_uint_be(&self.read_payload(len)?));
                }
                ids::CODEC_ID => {
                    codec_id = Some(String::from_utf8_lossy(&self.read_payload(len)?).into_owned());
                }
                ids::CODEC_PRIVATE => {
                    codec_private = self.read_payload(len)?;
                }
                ids::LANGUAGE => {
                    language = Some(String::from_utf8_lossy(&self.read_payload(len)?).into_owned());
                }
                ids::LANGUAGE_BCP47 => {
                    language_bcp47 = Some(String::from_utf8_lossy(&self.read_payload(len)?).into_owned());
                }
                ids::NAME => {
                    name = Some(String::from_utf8_lossy(&self.read_payload(len)?).into_owned());
                }
                ids::FLAG_DEFAULT => {
                    default = crate::ebml::vint::read_uint_be(&self.read_payload(len)?) != 0;
                }
                ids::FLAG_FORCED => {
                    forced = crate::ebml::vint::read_uint_be(&self.read_payload(len)?) != 0;
                }
                ids::DEFAULT_DURATION => {
                    default_duration_ns = Some(crate::ebml::vint::read_uint_be(&self.read_payload(len)?));
                }
                _ => self.skip_element(&child)?,
            }
        }

        let number = match number {
            Some(n) => n,
            None => return Ok(None),
        };
        if track_type != Some(ids::TRACK_TYPE_SUBTITLE) {
            return Ok(None);
        }
        let codec_id = codec_id.unwrap_or_default();
        // BCP-47 overrides legacy Language when both present (spec §6).
        let language = language_bcp47.or(language).unwrap_or_else(|| "und".to_string());

        Ok(Some(SubtitleTrack {
            number,
            codec_id,
            codec_private,
            language,
            name,
            default,
            forced,
            default_duration_ns,
        }))
    }

    fn resolve_tracks_via_seek_head(&mut self) -> Result<()> {
        let Some(&offset) = self.seek_head.get(&ids::TRACKS) else {
            self.tracks_inline = Some(Vec::new());
            return Ok(());
        };
        let abs = self.segment_data_start + offset;
        self.source.seek_absolute(abs)?;
        let header = self.ebml().read_element_header().map_err(map_ebml_err)?;
        if header.id != ids::TRACKS {
            return Err(LitesubError::MalformedContainer(
                "SeekHead pointed at a non-Tracks element".into(),
            ));
        }
        let tracks = self.parse_tracks(header)?;
        self.tracks_inline = Some(tracks);
        Ok(())
    }

    /// All text subtitle tracks, in the order they were encountered
    /// (spec §4.3 step 4: "Select target track by zero-based index among
    /// text subtitle tracks").
    pub fn text_tracks(&self) -> Vec<&SubtitleTrack> {
        self.tracks_inline
            .as_ref()
            .into_iter()
            .flatten()
            .filter(|t| t.format().is_some())
            .collect()
    }

    /// Extract one subtitle track by its zero-based index among text
    /// subtitle tracks.
    pub fn extract(&mut self, track_index: usize) -> Result<ExtractedTrack> {
        let text_tracks: Vec<SubtitleTrack> = self.text_tracks().into_iter().cloned().collect();
        let target = text_tracks.get(track_index).cloned().ok_or_else(|| {
            LitesubError::TrackIndexOutOfRange {
                requested: track_index,
                available: text_tracks.len(),
            }
        })?;
        let format = target.format().ok_or_else(|| {
            LitesubError::UnsupportedCodec(target.codec_id.clone())
        })?;

        let blocks = self.collect_blocks(target.number)?;
        let (entries, discarded) = reassemble(blocks, format);

        Ok(ExtractedTrack {
            entries,
            format,
            codec_private: target.codec_private,
            discarded_empty: discarded,
        })
    }

    fn collect_blocks(&mut self, target_track: u64) -> Result<Vec<SubtitleBlock>> {
        let cue_clusters = self.cue_driven_cluster_offsets(target_track)?;
        if !cue_clusters.is_empty() {
            let mut blocks = Vec::new();
            for abs_offset in cue_clusters {
                self.source.seek_absolute(abs_offset)?;
                let header = self.ebml().read_element_header().map_err(map_ebml_err)?;
                if header.id != ids::CLUSTER {
                    continue;
                }
                blocks.extend(self.parse_cluster(header, target_track)?);
            }
            return Ok(blocks);
        }
        self.linear_scan(target_track)
    }

    /// Parse the Cues element (if any) and return the absolute file offsets
    /// of clusters that contain at least one block on `target_track`
    /// (spec §4.3 step 5). Returns an empty vec if there is no usable Cues
    /// index, signalling the caller to fall back to a linear scan.
    fn cue_driven_cluster_offsets(&mut self, target_track: u64) -> Result<Vec<u64>> {
        let Some(cues_rel_offset) = self.cues_inline_offset.or_else(|| self.seek_head.get(&ids::CUES).copied())
        else {
            return Ok(Vec::new());
        };
        let abs = self.segment_data_start + cues_rel_offset;
        self.source.seek_absolute(abs)?;
        let header = self.ebml().read_element_header().map_err(map_ebml_err)?;
        if header.id != ids::CUES {
            return Ok(Vec::new());
        }
        let end = match header.size.known() {
            Some(n) => header.data_offset + n,
            None => return Ok(Vec::new()),
        };

        let mut offsets = Vec::new();
        while self.source.position() < end {
            let cp = self.ebml().read_element_header().map_err(map_ebml_err)?;
            if cp.id != ids::CUE_POINT {
                self.skip_element(&cp)?;
                continue;
            }
            let cp_end = cp.size.known().map(|n| cp.data_offset + n).unwrap_or(end);
            let mut references_target = false;
            let mut cluster_pos = None;
            while self.source.position() < cp_end {
                let child = self.ebml().read_element_header().map_err(map_ebml_err)?;
                match child.id {
                    ids::CUE_TRACK_POSITIONS => {
                        let ctp_end = child.size.known().map(|n| child.data_offset + n).unwrap_or(cp_end);
                        while self.source.position() < ctp_end {
                            let gc = self.ebml().read_element_header().map_err(map_ebml_err)?;
                            let len = gc.size.known().unwrap_or(0);
                            match gc.id {
                                ids::CUE_TRACK => {
                                    let t = crate::ebml::vint::read_uint_be(&self.read_payload(len)?);
                                    if t == target_track {
                                        references_target = true;
                                    }
                                }
                                ids::CUE_CLUSTER_POSITION => {
                                    cluster_pos =
                                        Some(crate::ebml::vint::read_uint_be(&self.read_payload(len)?));
                                }
                                _ => self.skip_element(&gc)?,
                            }
                        }
                    }
                    _ => self.skip_element(&child)?,
                }
            }
            if references_target {
                if let Some(pos) = cluster_pos {
                    offsets.push(self.segment_data_start + pos);
                }
            }
        }
        offsets.sort_unstable();
        offsets.dedup();
        Ok(offsets)
    }

    /// Linear scan of every Segment child looking for Clusters (spec §4.3
    /// step 6, used when there is no usable Cues index).
    fn linear_scan(&mut self, target_track: u64) -> Result<Vec<SubtitleBlock>> {
        self.source.seek_absolute(self.segment_data_start)?;
        let mut blocks = Vec::new();
        loop {
            if self.at_segment_end()? {
                break;
            }
            let (header, header_start) = match self.read_header_with_start() {
                Ok(h) => h,
                Err(_) => break,
            };
            match header.id {
                ids::CLUSTER => {
                    let cluster_blocks = self.parse_cluster(header, target_track)?;
                    blocks.extend(cluster_blocks);
                }
                id if ids::TOP_LEVEL_SEGMENT_CHILDREN.contains(&id) => {
                    match header.size.known() {
                        Some(n) => self.ebml().skip(n).map_err(map_ebml_err)?,
                        None => break,
                    }
                }
                _ => {
                    // Unknown top-level element; stop rather than risk
                    // misinterpreting stray bytes as subtitle data.
                    let _ = header_start;
                    break;
                }
            }
        }
        Ok(blocks)
    }

    /// Parse one Cluster's children (Timestamp, SimpleBlock, BlockGroup),
    /// collecting blocks that belong to `target_track`. Handles an
    /// unknown-size Cluster by stopping at the next top-level Segment-child
    /// sentinel ID (spec §4.3 invariants, the documented ambiguity).
    fn parse_cluster(&mut self, header: ElementHeader, target_track: u64) -> Result<Vec<SubtitleBlock>> {
        let known_end = header.size.known().map(|n| header.data_offset + n);
        let mut cluster_timestamp: u64 = 0;
        let mut blocks = Vec::new();

        loop {
            if let Some(end) = known_end {
                if self.source.position() >= end {
                    break;
                }
            }
            let (child, child_start) = match self.read_header_with_start() {
                Ok(h) => h,
                Err(_) => break,
            };

            if known_end.is_none() && ids::TOP_LEVEL_SEGMENT_CHILDREN.contains(&child.id) {
                // Unknown-size cluster ended; rewind so the caller's loop
                // reprocesses this header as the next top-level element.
                self.source.seek_absolute(child_start)?;
                break;
            }

            match child.id {
                ids::TIMESTAMP => {
                    let len = child.size.known().unwrap_or(0);
                    cluster_timestamp = crate::ebml::vint::read_uint_be(&self.read_payload(len)?);
                }
                ids::SIMPLE_BLOCK => {
                    let len = child.size.known().ok_or_else(|| {
                        LitesubError::MalformedContainer("SimpleBlock has unknown size".into())
                    })?;
                    let data = self.read_payload(len)?;
                    if let Some(b) = self.decode_block(&data, cluster_timestamp, target_track, 0) {
                        blocks.push(b);
                    }
                }
                ids::BLOCK_GROUP => {
                    let bg_end = child
                        .size
                        .known()
                        .map(|n| child.data_offset + n)
                        .unwrap_or(known_end.unwrap_or(child.data_offset));
                    let mut block_bytes = None;
                    let mut duration_scale_units = 0u64;
                    while self.source.position() < bg_end {
                        let gc = self.ebml().read_element_header().map_err(map_ebml_err)?;
                        let len = gc.size.known().unwrap_or(0);
                        match gc.id {
                            ids::BLOCK => block_bytes = Some(self.read_payload(len)?),
                            ids::BLOCK_DURATION => {
                                duration_scale_units = crate::ebml::vint::read_uint_be(&self.read_payload(len)?);
                            }
                            _ => self.skip_element(&gc)?,
                        }
                    }
                    if let Some(data) = block_bytes {
                        if let Some(b) = self.decode_block(
                            &data,
                            cluster_timestamp,
                            target_track,
                            duration_scale_units,
                        ) {
                            blocks.push(b);
                        }
                    }
                }
                _ => {
                    if let Some(n) = child.size.known() {
                        self.ebml().skip(n).map_err(map_ebml_err)?;
                    } else {
                        break;
                    }
                }
            }
        }
        Ok(blocks)
    }

    /// Decode one Block/SimpleBlock payload: VINT track number, signed
    /// int16 timestamp offset, flags byte, then raw payload (spec §4.3
    /// step 5). Rejects laced blocks (lacing is never used for subtitles).
    fn decode_block(
        &self,
        data: &[u8],
        cluster_timestamp: u64,
        target_track: u64,
        duration_scale_units: u64,
    ) -> Option<SubtitleBlock> {
        if data.len() < 4 {
            return None;
        }
        let (track_number, vint_len) = decode_vint_slice(data)?;
        if track_number != target_track {
            return None;
        }
        let rest = &data[vint_len..];
        if rest.len() < 3 {
            return None;
        }
        let ts_offset = i16::from_be_bytes([rest[0], rest[1]]);
        let flags = rest[2];
        if flags & 0x06 != 0 {
            // Lacing present: out of scope for subtitle tracks (spec §4.3/§9).
            return None;
        }
        let payload = rest[3..].to_vec();

        let start_ms = ((cluster_timestamp as i64 + ts_offset as i64) * self.timecode_scale as i64)
            / 1_000_000;
        let duration_ms = (duration_scale_units as i64 * self.timecode_scale as i64) / 1_000_000;

        Some(SubtitleBlock {
            track_number,
            start_ms,
            duration_ms,
            payload,
        })
    }
}

/// Decode an EBML VINT embedded directly in a byte slice (used for the
/// track-number field inside a Block/SimpleBlock, which is not read
/// through the streaming [`EbmlReader`]).
fn decode_vint_slice(data: &[u8]) -> Option<(u64, usize)> {
    let first = *data.first()?;
    if first == 0 {
        return None;
    }
    let length = (first.leading_zeros() as usize) + 1;
    if length > 8 || data.len() < length {
        return None;
    }
    let marker_bit = 0x80u8 >> (length - 1);
    let mut value = (first & !marker_bit) as u64;
    for &b in &data[1..length] {
        value = (value << 8) | b as u64;
    }
    Some((value, length))
}

fn map_ebml_err(e: crate::ebml::EbmlError) -> LitesubError {
    match e {
        crate::ebml::EbmlError::Malformed(m) => LitesubError::MalformedContainer(m),
        crate::ebml::EbmlError::Source(s) => s.into(),
    }
}

/// Reassemble raw blocks into ordered, timed entries (spec §4.3 steps 7-8).
/// Blocks with no explicit duration inherit the start of the following
/// block as their end, or `+3000ms` if there is none. Blocks whose payload
/// decodes to empty/whitespace-only text are discarded.
fn reassemble(mut blocks: Vec<SubtitleBlock>, format: SubtitleFormat) -> (Vec<SubtitleEntry>, usize) {
    blocks.sort_by_key(|b| b.start_ms);

    let mut entries = Vec::with_capacity(blocks.len());
    let mut discarded = 0usize;
    let n = blocks.len();

    for i in 0..n {
        let start_ms = blocks[i].start_ms;
        let end_ms = if blocks[i].duration_ms > 0 {
            start_ms + blocks[i].duration_ms
        } else if i + 1 < n {
            blocks[i + 1].start_ms.max(start_ms)
        } else {
            start_ms + FALLBACK_DURATION_MS
        };

        let raw_text = String::from_utf8_lossy(&blocks[i].payload).into_owned();
        let (text, style) = match format {
            SubtitleFormat::Ass | SubtitleFormat::Ssa => ass::plain_text_from_mkv_block(&raw_text),
            _ => (raw_text.trim().to_string(), None),
        };

        if text.trim().is_empty() {
            discarded += 1;
            continue;
        }

        entries.push(SubtitleEntry {
            index: entries.len() + 1,
            start_ms,
            end_ms,
            text,
            style,
        });
    }

    (entries, discarded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subtitle::SubtitleEntry as E;

    fn block(start: i64, dur: i64, text: &str) -> SubtitleBlock {
        SubtitleBlock {
            track_number: 3,
            start_ms: start,
            duration_ms: dur,
            payload: text.as_bytes().to_vec(),
        }
    }

    #[test]
    fn fallback_duration_applies_to_last_block_only() {
        let blocks = vec![block(0, 0, "Hello"), block(2500, 0, "World")];
        let (entries, discarded): (Vec<E>, usize) = reassemble(blocks, SubtitleFormat::Srt);
        assert_eq!(discarded, 0);
        assert_eq!(entries[0].start_ms, 0);
        assert_eq!(entries[0].end_ms, 2500);
        assert_eq!(entries[1].start_ms, 2500);
        assert_eq!(entries[1].end_ms, 2500 + FALLBACK_DURATION_MS);
    }

    #[test]
    fn empty_payload_is_discarded_and_counted() {
        let blocks = vec![block(0, 1000, "   "), block(1000, 1000, "Hi")];
        let (entries, discarded) = reassemble(blocks, SubtitleFormat::Srt);
        assert_eq!(discarded, 1);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].text, "Hi");
    }

    #[test]
    fn ass_block_extracts_ninth_field_and_strips_overrides() {
        let blocks = vec![block(0, 1500, "0,0,Default,,0,0,0,,{\\b1}Hi\\Nthere")];
        let (entries, _) = reassemble(blocks, SubtitleFormat::Ass);
        assert_eq!(entries[0].text, "Hi\nthere");
        assert_eq!(entries[0].style.as_deref(), Some("Default"));
    }

    #[test]
    fn decode_vint_slice_matches_track_number_shapes() {
        assert_eq!(decode_vint_slice(&[0x83]), Some((3, 1)));
        assert_eq!(decode_vint_slice(&[0x40, 0x03]), Some((3, 2)));
        assert_eq!(decode_vint_slice(&[0x00]), None);
    }
}
