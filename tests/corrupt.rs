use midiseq::prelude::*;
use pretty_assertions::assert_eq;
use std::io::{self, Read};

fn header(format: u16, tracks: u16, division: u16) -> Vec<u8> {
    let mut bytes = b"MThd\0\0\0\x06".to_vec();
    bytes.extend_from_slice(&format.to_be_bytes());
    bytes.extend_from_slice(&tracks.to_be_bytes());
    bytes.extend_from_slice(&division.to_be_bytes());
    bytes
}

fn track(body: &[u8]) -> Vec<u8> {
    let mut bytes = b"MTrk".to_vec();
    bytes.extend_from_slice(&(body.len() as u32).to_be_bytes());
    bytes.extend_from_slice(body);
    bytes
}

const END: [u8; 4] = [0x00, 0xFF, 0x2F, 0x00];

fn file(tracks: &[&[u8]]) -> Vec<u8> {
    let mut bytes = header(1, tracks.len() as u16, 96);
    for body in tracks {
        bytes.extend(track(body));
    }
    bytes
}

fn single(body: &[u8]) -> Vec<u8> {
    file(&[body])
}

#[track_caller]
fn assert_corrupt(bytes: &[u8], kind: CorruptKind, position: u64) {
    let err = Sequence::open(bytes).unwrap_err();
    assert!(err.is_corrupt_data(), "{err}");
    assert_eq!(err.corrupt_kind(), Some(&kind));
    assert_eq!(err.position(), Some(position));
}

#[test]
fn not_a_midi_file() {
    assert_corrupt(
        b"RIFF\0\0\0\x06\0\0\0\x01\0\x60",
        CorruptKind::ChunkTag {
            expected: *b"MThd",
            found: *b"RIFF",
        },
        0,
    );
    assert_corrupt(b"", CorruptKind::UnexpectedEof, 0);
}

#[test]
fn bad_header_fields() {
    let mut long_header = b"MThd\0\0\0\x08".to_vec();
    long_header.extend_from_slice(&[0, 0, 0, 1, 0, 96, 0, 0]);
    assert_corrupt(&long_header, CorruptKind::HeaderLength(8), 4);

    assert_corrupt(&header(1, 1, 96)[..10], CorruptKind::UnexpectedEof, 10);
    assert_corrupt(
        &header(3, 1, 96),
        CorruptKind::InvalidField(ValueError::Format(3)),
        8,
    );
    assert_corrupt(
        &header(1, 0, 96),
        CorruptKind::InvalidField(ValueError::TrackCount(0)),
        10,
    );
    assert_corrupt(
        &header(1, 1, 0),
        CorruptKind::InvalidField(ValueError::Division(0)),
        12,
    );
}

#[test]
fn uninterpreted_divisions_survive_a_round_trip() {
    // -23 and -26 are not SMPTE frame rates, 0xE200 has zero ticks per frame
    for division in [0xE928, 0xE650, 0xE200] {
        let mut bytes = header(0, 1, division);
        bytes.extend(track(&END));
        let sequence = Sequence::open(&bytes[..]).unwrap();
        assert_eq!(sequence.division().raw(), division);
        assert_eq!(sequence.division_type(), DivisionType::Smpte);
        assert_eq!(sequence.to_bytes().unwrap(), bytes);
    }
}

#[test]
fn fewer_tracks_than_declared() {
    let mut bytes = header(1, 2, 96);
    bytes.extend(track(&END));
    assert_corrupt(
        &bytes,
        CorruptKind::MissingTracks {
            declared: 2,
            found: 1,
        },
        26,
    );
}

#[test]
fn unexpected_chunk_in_place_of_a_track() {
    let mut bytes = header(0, 1, 96);
    bytes.extend_from_slice(b"XFIH\0\0\0\0");
    assert_corrupt(
        &bytes,
        CorruptKind::ChunkTag {
            expected: *b"MTrk",
            found: *b"XFIH",
        },
        14,
    );
}

#[test]
fn corrupt_events() {
    // delta time that never terminates
    assert_corrupt(
        &single(&[0x81, 0x80, 0x80, 0x80, 0x00]),
        CorruptKind::VarLenTooLong,
        25,
    );
    // note on cut short by the end of the chunk
    assert_corrupt(&single(&[0x00, 0x90, 0x3C]), CorruptKind::UnexpectedEof, 25);
    // tempo with two bytes instead of three
    let mut body = vec![0x00, 0xFF, 0x51, 0x02, 0x07, 0xA1];
    body.extend_from_slice(&END);
    assert_corrupt(
        &single(&body),
        CorruptKind::MetaLength {
            meta_type: 0x51,
            expected: 3,
            found: 2,
        },
        25,
    );
    // data byte on the first event of a track
    assert_corrupt(
        &single(&[0x00, 0x3C, 0x40]),
        CorruptKind::MissingRunningStatus(0x3C),
        23,
    );
    // song position pointer
    assert_corrupt(
        &single(&[0x00, 0xF2, 0x00, 0x00]),
        CorruptKind::UnsupportedStatus(0xF2),
        23,
    );
    // meta event payload longer than the chunk
    assert_corrupt(
        &single(&[0x00, 0xFF, 0x01, 0x10, b'a']),
        CorruptKind::UnexpectedEof,
        27,
    );
}

#[test]
fn running_status_does_not_cross_tracks() {
    let first = [0x00, 0x90, 0x3C, 0x40, 0x10, 0x3E, 0x40, 0x00, 0xFF, 0x2F, 0x00];
    let second = [0x00, 0x3C, 0x40, 0x00, 0xFF, 0x2F, 0x00];
    let bytes = file(&[&first[..], &second[..]]);
    let second_start = (14 + 8 + first.len() + 8) as u64;
    assert_corrupt(
        &bytes,
        CorruptKind::MissingRunningStatus(0x3C),
        second_start + 1,
    );
}

#[test]
fn trailing_bytes_are_ignored() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let clean = single(&END);
    let mut padded = clean.clone();
    padded.extend_from_slice(&[0x00; 16]);

    assert_eq!(
        Sequence::open(&padded[..]).unwrap(),
        Sequence::open(&clean[..]).unwrap()
    );

    // bytes after the end of track event, still inside the chunk
    let mut body = END.to_vec();
    body.extend_from_slice(&[0x00, 0x90, 0x3C, 0x40]);
    let sequence = Sequence::open(&single(&body)[..]).unwrap();
    assert_eq!(sequence.tracks()[0].len(), 1);
    assert!(sequence.tracks()[0].events()[0].is_end_of_track());
}

#[test]
fn unknown_chunks_between_tracks_are_rejected() {
    let mut bytes = header(1, 2, 96);
    bytes.extend(track(&END));
    bytes.extend_from_slice(b"XFIH\0\0\0\x01\0");
    bytes.extend(track(&END));
    let err = Sequence::open(&bytes[..]).unwrap_err();
    assert!(matches!(
        err.corrupt_kind(),
        Some(CorruptKind::ChunkTag { .. })
    ));
}

struct BrokenPipe;

impl Read for BrokenPipe {
    fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"))
    }
}

#[test]
fn io_failures_are_not_corruption() {
    let err = Sequence::open(BrokenPipe).unwrap_err();
    assert!(matches!(err, Error::Io(ref e) if e.kind() == io::ErrorKind::BrokenPipe));
    assert!(!err.is_corrupt_data());
    assert_eq!(err.position(), None);

    // a source that runs dry is corruption, not an I/O failure
    let truncated = &single(&END)[..20];
    assert!(Sequence::open(truncated).unwrap_err().is_corrupt_data());
}

#[test]
fn lenient_reading_of_a_short_chunk() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    // declares 20 bytes, holds only the end of track
    let mut bytes = header(0, 1, 96);
    bytes.extend_from_slice(b"MTrk\0\0\0\x14");
    bytes.extend_from_slice(&END);

    let result = Sequence::open(&bytes[..]);
    if cfg!(feature = "strict") {
        let err = result.unwrap_err();
        assert_eq!(err.corrupt_kind(), Some(&CorruptKind::UnexpectedEof));
    } else {
        let sequence = result.unwrap();
        assert_eq!(sequence.tracks()[0].len(), 1);
    }
}

#[test]
fn short_chunk_without_end_of_track_is_corrupt() {
    // declares 100 bytes, the stream ends after one note on
    let mut bytes = header(0, 1, 96);
    bytes.extend_from_slice(b"MTrk\0\0\0\x64");
    bytes.extend_from_slice(&[0x00, 0x90, 0x3C, 0x40]);
    assert_corrupt(&bytes, CorruptKind::UnexpectedEof, 26);

    // the same events in a complete chunk are only missing their end of track
    let complete = single(&[0x00, 0x90, 0x3C, 0x40]);
    let result = Sequence::open(&complete[..]);
    if cfg!(feature = "strict") {
        let err = result.unwrap_err();
        assert_eq!(err.corrupt_kind(), Some(&CorruptKind::MissingEndOfTrack));
    } else {
        assert_eq!(result.unwrap().tracks()[0].len(), 1);
    }
}
