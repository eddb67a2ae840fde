//! Minimal hand-rolled Matroska byte builder shared by the end-to-end
//! tests. Only the element IDs litesub itself reads are supported; this
//! is not a general-purpose muxer.

/// Encode an EBML element ID. The constants in `litesub::ebml::ids` are
/// defined with their marker bit already in place, so the number of
/// significant bytes falls straight out of the constant's magnitude.
pub fn id_bytes(id: u32) -> Vec<u8> {
    if id <= 0xFF {
        vec![id as u8]
    } else if id <= 0xFFFF {
        id.to_be_bytes()[2..].to_vec()
    } else if id <= 0xFF_FFFF {
        id.to_be_bytes()[1..].to_vec()
    } else {
        id.to_be_bytes().to_vec()
    }
}

/// Encode a known element size as a VINT, using the smallest width that
/// fits `value`.
pub fn size_vint(value: u64) -> Vec<u8> {
    let widths: [(u64, u8); 8] = [
        (0x7F, 0x80),
        (0x3FFF, 0x40),
        (0x1F_FFFF, 0x20),
        (0x0FFF_FFFF, 0x10),
        (0x07_FFFF_FFFF, 0x08),
        (0x03FF_FFFF_FFFF, 0x04),
        (0x01_FFFF_FFFF_FFFF, 0x02),
        (0xFFFF_FFFF_FFFF_FF, 0x01),
    ];
    for (i, (max, marker)) in widths.iter().enumerate() {
        if value <= *max {
            let width = i + 1;
            let mut bytes = vec![0u8; width];
            let mut v = value;
            for b in bytes.iter_mut().rev() {
                *b = (v & 0xFF) as u8;
                v >>= 8;
            }
            bytes[0] |= marker;
            return bytes;
        }
    }
    panic!("value too large for an 8-byte VINT: {value}");
}

/// Build `id + size(payload.len()) + payload`.
pub fn el(id: u32, payload: &[u8]) -> Vec<u8> {
    let mut out = id_bytes(id);
    out.extend(size_vint(payload.len() as u64));
    out.extend_from_slice(payload);
    out
}

/// Build an element from a list of already-encoded children.
pub fn nest(id: u32, children: &[Vec<u8>]) -> Vec<u8> {
    let payload: Vec<u8> = children.iter().flatten().copied().collect();
    el(id, &payload)
}

/// Big-endian encode `value` in exactly `width` bytes (for fixed-width
/// uint payloads like TrackNumber, TrackType, TimecodeScale).
pub fn uint_be(value: u64, width: usize) -> Vec<u8> {
    let full = value.to_be_bytes();
    full[8 - width..].to_vec()
}

/// A SimpleBlock payload: VINT track number (1-byte form, track < 0x80),
/// a big-endian i16 relative timestamp, a flags byte, then the raw text.
pub fn simple_block(track: u8, relative_ts: i16, text: &str) -> Vec<u8> {
    let mut out = vec![0x80 | track];
    out.extend_from_slice(&relative_ts.to_be_bytes());
    out.push(0x00);
    out.extend_from_slice(text.as_bytes());
    out
}

use litesub::ebml::ids;

/// A minimal EBML header, accepted by litesub without inspecting its
/// contents beyond the element ID.
pub fn ebml_header() -> Vec<u8> {
    el(ids::EBML_HEADER, b"")
}

pub struct TrackSpec {
    pub number: u64,
    pub codec_id: &'static str,
    pub language: &'static str,
}

pub fn track_entry(spec: &TrackSpec) -> Vec<u8> {
    nest(
        ids::TRACK_ENTRY,
        &[
            el(ids::TRACK_NUMBER, &uint_be(spec.number, 1)),
            el(ids::TRACK_TYPE, &uint_be(ids::TRACK_TYPE_SUBTITLE, 1)),
            el(ids::CODEC_ID, spec.codec_id.as_bytes()),
            el(ids::LANGUAGE, spec.language.as_bytes()),
        ],
    )
}

/// Build a complete single-track Segment: Info (TimecodeScale), Tracks,
/// optionally Cues, then one Cluster per `(cluster_timestamp, blocks)`
/// entry, each block a `(relative_ts, text)` pair on `track.number`.
pub fn build_mkv(
    track: &TrackSpec,
    clusters: &[(u64, &[(i16, &str)])],
    with_cues: bool,
) -> Vec<u8> {
    let info = nest(ids::INFO, &[el(ids::TIMECODE_SCALE, &uint_be(1_000_000, 4))]);
    let tracks = nest(ids::TRACKS, &[track_entry(track)]);

    let mut cluster_blobs: Vec<Vec<u8>> = Vec::new();
    for &(ts, blocks) in clusters {
        let mut children = vec![el(ids::TIMESTAMP, &uint_be(ts, 4))];
        for &(rel, text) in blocks {
            children.push(el(ids::SIMPLE_BLOCK, &simple_block(track.number as u8, rel, text)));
        }
        cluster_blobs.push(nest(ids::CLUSTER, &children));
    }

    let mut segment_children = vec![info, tracks];

    if with_cues {
        // Cues sits right after Info+Tracks, before any cluster; cluster
        // offsets are Segment-data-relative.
        let prefix_len = info_tracks_len(&segment_children);
        let cues = build_cues(track.number, clusters, prefix_len);
        segment_children.push(cues);
    }

    segment_children.extend(cluster_blobs);

    let segment = nest(ids::SEGMENT, &segment_children);
    let mut out = ebml_header();
    out.extend(segment);
    out
}

fn info_tracks_len(children: &[Vec<u8>]) -> u64 {
    children.iter().map(|c| c.len() as u64).sum()
}

/// Build a Cues element whose CueClusterPosition values point at each
/// cluster's offset (Segment-data-relative), assuming Cues itself is
/// inserted right after `prefix_len` bytes of Info+Tracks and before any
/// cluster.
fn build_cues(track: u64, clusters: &[(u64, &[(i16, &str)])], prefix_len: u64) -> Vec<u8> {
    // First pass: build cluster blobs to know their lengths.
    let blobs: Vec<Vec<u8>> = clusters
        .iter()
        .map(|&(ts, blocks)| {
            let mut children = vec![el(ids::TIMESTAMP, &uint_be(ts, 4))];
            for &(rel, text) in blocks {
                children.push(el(ids::SIMPLE_BLOCK, &simple_block(track as u8, rel, text)));
            }
            nest(ids::CLUSTER, &children)
        })
        .collect();

    // Build a Cues element with placeholder positions first to find its
    // own length, then rebuild with final positions (cluster offsets are
    // pushed back by the Cues element's own size).
    let placeholder_positions: Vec<u64> = {
        let mut offset = prefix_len;
        blobs
            .iter()
            .map(|b| {
                let this = offset;
                offset += b.len() as u64;
                this
            })
            .collect()
    };
    let cues_v0 = assemble_cues(track, &clusters.iter().map(|c| c.0).collect::<Vec<_>>(), &placeholder_positions);
    let shift = cues_v0.len() as u64;
    let final_positions: Vec<u64> = placeholder_positions.iter().map(|p| p + shift).collect();
    assemble_cues(track, &clusters.iter().map(|c| c.0).collect::<Vec<_>>(), &final_positions)
}

fn assemble_cues(track: u64, timestamps: &[u64], positions: &[u64]) -> Vec<u8> {
    let points: Vec<Vec<u8>> = timestamps
        .iter()
        .zip(positions.iter())
        .map(|(&ts, &pos)| {
            let ctp = nest(
                ids::CUE_TRACK_POSITIONS,
                &[el(ids::CUE_TRACK, &uint_be(track, 1)), el(ids::CUE_CLUSTER_POSITION, &uint_be(pos, 4))],
            );
            nest(ids::CUE_POINT, &[el(ids::CUE_TIME, &uint_be(ts, 4)), ctp])
        })
        .collect();
    nest(ids::CUES, &points)
}
