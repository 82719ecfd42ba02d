use byteorder::{BigEndian, WriteBytesExt};
use nrg2iso::nrg::{CueIndex, DaoInfo, MediaType, SessionInfo};
use nrg2iso::{Chunk, ContainerFormat, ExtractionPlan, NrgError, NrgExtractor, convert};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const PAYLOAD_START: usize = 2048;
const PAYLOAD_LEN: usize = 2048;

fn filler() -> Vec<u8> {
    (0..PAYLOAD_LEN).map(|i| (i * 7 % 251) as u8).collect()
}

fn payload_dao() -> DaoInfo {
    DaoInfo {
        size: 0x54,
        toc_type: 0x20,
        first_track: 1,
        last_track: 1,
        sector_size: 2048,
        index0: PAYLOAD_START as i64,
        index1: PAYLOAD_START as i64,
        end_of_track: (PAYLOAD_START + PAYLOAD_LEN) as i64,
        ..Default::default()
    }
}

/// Build a container with the filler at `[2048, 4096)` and `chunks` after it.
fn build_image(format: ContainerFormat, chunks: &[(Chunk, u32)]) -> Vec<u8> {
    let mut image = vec![0xEEu8; PAYLOAD_START];
    image.extend(filler());

    let first_chunk = image.len() as u64;
    for (chunk, slack) in chunks {
        chunk.write_to(&mut image, *slack).unwrap();
    }

    image.extend_from_slice(format.marker());
    match format {
        ContainerFormat::V1 => image.write_u32::<BigEndian>(first_chunk as u32).unwrap(),
        ContainerFormat::V2 => image.write_u64::<BigEndian>(first_chunk).unwrap(),
    }
    image
}

fn write_image(dir: &TempDir, image: &[u8]) -> PathBuf {
    let path = dir.path().join("disc.nrg");
    fs::write(&path, image).unwrap();
    path
}

fn error_kind(err: &anyhow::Error) -> &NrgError {
    err.downcast_ref::<NrgError>()
        .unwrap_or_else(|| panic!("not an NrgError: {err:#}"))
}

fn assert_extracted(target: &Path, plan: ExtractionPlan) {
    assert_eq!(
        plan,
        ExtractionPlan {
            start: PAYLOAD_START as u64,
            end: (PAYLOAD_START + PAYLOAD_LEN) as u64,
        }
    );
    let out = fs::read(target).unwrap();
    assert_eq!(out.len(), PAYLOAD_LEN);
    assert_eq!(out, filler());
}

#[test]
fn extracts_v1_image() {
    let tmp = TempDir::new().unwrap();
    let image = build_image(
        ContainerFormat::V1,
        &[(Chunk::Daox(payload_dao()), 0), (Chunk::End, 0)],
    );
    let source = write_image(&tmp, &image);
    let target = tmp.path().join("disc.iso");

    let plan = convert(&source, &target).unwrap();
    assert_extracted(&target, plan);
}

#[test]
fn extracts_v2_image() {
    let tmp = TempDir::new().unwrap();
    let image = build_image(
        ContainerFormat::V2,
        &[(Chunk::Daox(payload_dao()), 0), (Chunk::End, 0)],
    );
    let source = write_image(&tmp, &image);
    let target = tmp.path().join("disc.iso");

    let plan = convert(&source, &target).unwrap();
    assert_extracted(&target, plan);
}

#[test]
fn extracts_past_metadata_chunks_with_slack() {
    let tmp = TempDir::new().unwrap();
    let cue = |track, index, lba| {
        Chunk::Cuex(CueIndex {
            mode: 0x41,
            track,
            index,
            padding: 0,
            lba,
        })
    };
    let image = build_image(
        ContainerFormat::V2,
        &[
            (cue(1, 0, -150), 0),
            (cue(1, 1, 0), 0),
            (cue(0xAA, 1, 1), 0),
            (Chunk::Daox(payload_dao()), 24),
            (Chunk::Sinf(SessionInfo { tracks: 1 }), 0),
            (Chunk::Mtyp(MediaType { value: 1 }), 0),
            (Chunk::End, 0),
        ],
    );
    let source = write_image(&tmp, &image);
    let target = tmp.path().join("disc.iso");

    let plan = convert(&source, &target).unwrap();
    assert_extracted(&target, plan);
}

#[test]
fn terminator_only_is_payload_not_found() {
    let tmp = TempDir::new().unwrap();
    let image = build_image(ContainerFormat::V1, &[(Chunk::End, 0)]);
    let source = write_image(&tmp, &image);
    let target = tmp.path().join("disc.iso");

    let err = convert(&source, &target).unwrap_err();
    assert!(matches!(error_kind(&err), NrgError::PayloadNotFound));
    assert!(format!("{err:#}").starts_with("failed parsing source file"));
}

#[test]
fn foreign_file_is_unknown_format() {
    let tmp = TempDir::new().unwrap();
    let source = write_image(&tmp, &[0u8; 4096]);
    let target = tmp.path().join("disc.iso");

    let err = convert(&source, &target).unwrap_err();
    assert!(matches!(error_kind(&err), NrgError::UnknownFormat));
}

#[test]
fn missing_source_is_open_failure() {
    let tmp = TempDir::new().unwrap();
    let source = tmp.path().join("missing.nrg");
    let target = tmp.path().join("disc.iso");

    let err = convert(&source, &target).unwrap_err();
    assert!(matches!(error_kind(&err), NrgError::Open { path, .. } if *path == source));
    assert!(!target.exists());
}

#[test]
fn unaddressable_chunk_offset_reports_real_value() {
    let tmp = TempDir::new().unwrap();
    let mut image = vec![0u8; 64];
    image.extend_from_slice(b"NER5");
    image.write_u64::<BigEndian>(u64::MAX).unwrap();
    let source = write_image(&tmp, &image);

    let err = convert(&source, &tmp.path().join("disc.iso")).unwrap_err();
    assert!(matches!(
        error_kind(&err),
        NrgError::SeekOutOfRange { offset, .. } if *offset == i128::from(u64::MAX)
    ));
    assert!(format!("{err:#}").contains("seek to 18446744073709551615 from start"));
}

#[test]
fn unknown_chunk_stops_extraction() {
    let tmp = TempDir::new().unwrap();
    let mut image = build_image(ContainerFormat::V1, &[]);
    let trailer = image.split_off(image.len() - 8);
    image.extend_from_slice(b"ETN2\x00\x00\x00\x00");
    image.extend_from_slice(&trailer);
    let source = write_image(&tmp, &image);

    let err = convert(&source, &tmp.path().join("disc.iso")).unwrap_err();
    assert!(matches!(error_kind(&err), NrgError::UnknownChunkTag(tag) if tag.to_string() == "ETN2"));
}

#[test]
fn payload_past_eof_is_truncated() {
    let tmp = TempDir::new().unwrap();
    let dao = DaoInfo {
        end_of_track: 1 << 20,
        ..payload_dao()
    };
    let image = build_image(ContainerFormat::V1, &[(Chunk::Daox(dao), 0), (Chunk::End, 0)]);
    let source = write_image(&tmp, &image);
    let target = tmp.path().join("disc.iso");

    let err = convert(&source, &target).unwrap_err();
    assert!(matches!(error_kind(&err), NrgError::TruncatedInput { .. }));
    assert!(format!("{err:#}").starts_with("failed copying payload"));
    // Partial output is left behind
    assert!(target.exists());
}

#[test]
fn lists_chunks_from_file() {
    let tmp = TempDir::new().unwrap();
    let chunks = [
        (Chunk::Sinf(SessionInfo { tracks: 1 }), 0),
        (Chunk::Daox(payload_dao()), 4),
        (Chunk::Mtyp(MediaType { value: 1 }), 0),
        (Chunk::End, 0),
    ];
    let image = build_image(ContainerFormat::V2, &chunks);
    let source = write_image(&tmp, &image);

    let listing = NrgExtractor::open(&source).unwrap().list_chunks().unwrap();
    assert_eq!(listing.format, ContainerFormat::V2);
    assert_eq!(listing.first_chunk_offset, (PAYLOAD_START + PAYLOAD_LEN) as u64);
    assert_eq!(listing.chunks, chunks.map(|(c, _)| c).to_vec());
}
