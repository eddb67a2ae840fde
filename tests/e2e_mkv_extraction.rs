//! End-to-end container scenarios: a hand-built MKV byte stream driven
//! through extraction and SRT generation, with and without a Cues index.

mod common;

use litesub::extractor::MatroskaExtractor;
use litesub::subtitle::{self, SubtitleFormat};

use common::{build_mkv, TrackSpec};

fn text_track() -> TrackSpec {
    TrackSpec { number: 3, codec_id: "S_TEXT/UTF8", language: "eng" }
}

fn write_fixture(bytes: &[u8]) -> tempfile::NamedTempFile {
    use std::io::Write;
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(bytes).unwrap();
    file
}

#[test]
fn mkv_with_cues_extracts_in_cue_order() {
    let track = text_track();
    let clusters: &[(u64, &[(i16, &str)])] = &[(0, &[(0, "Hello")]), (2500, &[(0, "World")])];
    let bytes = build_mkv(&track, clusters, true);
    let file = write_fixture(&bytes);

    let mut extractor = MatroskaExtractor::open(file.path()).unwrap();
    assert_eq!(extractor.text_tracks().len(), 1);
    let extracted = extractor.extract(0).unwrap();
    assert_eq!(extracted.format, SubtitleFormat::Srt);
    assert_eq!(extracted.discarded_empty, 0);
    assert_eq!(extracted.entries.len(), 2);

    let srt = subtitle::generate(&extracted.entries, SubtitleFormat::Srt, None).unwrap();
    assert_eq!(
        srt,
        "1\n00:00:00,000 --> 00:00:02,500\nHello\n\n2\n00:00:02,500 --> 00:00:05,500\nWorld\n"
    );
}

#[test]
fn mkv_without_cues_linear_scan_is_byte_identical() {
    let track = text_track();
    let clusters: &[(u64, &[(i16, &str)])] = &[(0, &[(0, "Hello")]), (2500, &[(0, "World")])];

    let with_cues = build_mkv(&track, clusters, true);
    let without_cues = build_mkv(&track, clusters, false);

    let srt_of = |bytes: &[u8]| {
        let file = write_fixture(bytes);
        let mut extractor = MatroskaExtractor::open(file.path()).unwrap();
        let extracted = extractor.extract(0).unwrap();
        subtitle::generate(&extracted.entries, SubtitleFormat::Srt, None).unwrap()
    };

    assert_eq!(srt_of(&with_cues), srt_of(&without_cues));
}

#[test]
fn track_index_out_of_range_is_a_typed_error() {
    let track = text_track();
    let clusters: &[(u64, &[(i16, &str)])] = &[(0, &[(0, "Hello")])];
    let bytes = build_mkv(&track, clusters, false);
    let file = write_fixture(&bytes);

    let mut extractor = MatroskaExtractor::open(file.path()).unwrap();
    let err = extractor.extract(1).unwrap_err();
    assert!(matches!(err, litesub::LitesubError::TrackIndexOutOfRange { requested: 1, available: 1 }));
}
