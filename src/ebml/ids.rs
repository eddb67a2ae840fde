//! Matroska/EBML element IDs this crate cares about (spec §6).
//!
//! Only the elements needed to locate the Segment, enumerate subtitle
//! tracks, walk the Cues index, and iterate Cluster/Block(Group) children
//! are listed -- the extractor skips everything else by size, never by ID.

pub const EBML_HEADER: u32 = 0x1A45_DFA3;
pub const SEGMENT: u32 = 0x1853_8067;

// Top-level Segment children
pub const SEEK_HEAD: u32 = 0x114D_9B74;
pub const INFO: u32 = 0x1549_A966;
pub const TRACKS: u32 = 0x1654_AE6B;
pub const CUES: u32 = 0x1C53_BB6B;
pub const CLUSTER: u32 = 0x1F43_B675;
pub const TAGS: u32 = 0x1254_C367;

/// Segment children that are valid sentinels for an unknown-size Cluster
/// (spec §4.3: "stopping at the next element whose ID matches a top-level
/// Segment child").
pub const TOP_LEVEL_SEGMENT_CHILDREN: &[u32] = &[SEEK_HEAD, INFO, TRACKS, CUES, CLUSTER, TAGS];

// SeekHead
pub const SEEK: u32 = 0x4DBB;
pub const SEEK_ID: u32 = 0x53AB;
pub const SEEK_POSITION: u32 = 0x53AC;

// Info
pub const TIMECODE_SCALE: u32 = 0x2AD7_B1;

// Tracks
pub const TRACK_ENTRY: u32 = 0xAE;
pub const TRACK_NUMBER: u32 = 0xD7;
pub const TRACK_TYPE: u32 = 0x83;
pub const CODEC_ID: u32 = 0x86;
pub const CODEC_PRIVATE: u32 = 0x63A2;
pub const LANGUAGE: u32 = 0x22B5_9C;
pub const LANGUAGE_BCP47: u32 = 0x22B5_9D;
pub const NAME: u32 = 0x536E;
pub const FLAG_DEFAULT: u32 = 0x88;
pub const FLAG_FORCED: u32 = 0x55AA;
pub const DEFAULT_DURATION: u32 = 0x23E3_83;

/// Matroska TrackType value for subtitle tracks (spec §6).
pub const TRACK_TYPE_SUBTITLE: u64 = 17;

// Cues
pub const CUE_POINT: u32 = 0xBB;
pub const CUE_TIME: u32 = 0xB3;
pub const CUE_TRACK_POSITIONS: u32 = 0xB7;
pub const CUE_TRACK: u32 = 0xF7;
pub const CUE_CLUSTER_POSITION: u32 = 0xF1;

// Cluster
pub const TIMESTAMP: u32 = 0xE7;
pub const SIMPLE_BLOCK: u32 = 0xA3;
pub const BLOCK_GROUP: u32 = 0xA0;
pub const BLOCK: u32 = 0xA1;
pub const BLOCK_DURATION: u32 = 0x9B;

/// Recognized text subtitle codec IDs (spec §3).
pub const CODEC_ID_SRT: &str = "S_TEXT/UTF8";
pub const CODEC_ID_ASS: &str = "S_TEXT/ASS";
pub const CODEC_ID_SSA: &str = "S_TEXT/SSA";
pub const CODEC_ID_WEBVTT: &str = "S_TEXT/WEBVTT";
