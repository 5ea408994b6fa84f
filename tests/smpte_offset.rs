use midiseq::prelude::*;
use pretty_assertions::assert_eq;

/// Helper function to create a minimal MIDI file with SMPTE offset
/// Returns the complete MIDI file as a byte vector
fn create_midi_with_smpte_offset(
    fps: SmpteFps,
    hour: u8,
    minute: u8,
    second: u8,
    frame: u8,
    subframe: u8,
) -> Vec<u8> {
    let mut bytes = Vec::new();

    // MIDI Header
    bytes.extend_from_slice(b"MThd"); // Header chunk type
    bytes.extend_from_slice(&[0x00, 0x00, 0x00, 0x06]); // Header length (6 bytes)
    bytes.extend_from_slice(&[0x00, 0x00]); // Format 0 (single track)
    bytes.extend_from_slice(&[0x00, 0x01]); // Number of tracks (1)

    // Use SMPTE timing instead of ticks per quarter note
    // High bit set indicates SMPTE timing
    let fps_byte = match fps {
        SmpteFps::TwentyFour => 0xE8, // -24 in two's complement
        SmpteFps::TwentyFive => 0xE7, // -25 in two's complement
        SmpteFps::TwentyNine => 0xE3, // -29 in two's complement
        SmpteFps::Thirty => 0xE2,     // -30 in two's complement
    };
    bytes.push(fps_byte);
    bytes.push(40); // 40 ticks per frame

    // Track Header
    bytes.extend_from_slice(b"MTrk"); // Track chunk type

    // Calculate track length (we'll update this later)
    let track_length_pos = bytes.len();
    bytes.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]); // Placeholder for length

    let track_start = bytes.len();

    // SMPTE Offset Meta Event
    bytes.push(0x00); // Delta time
    bytes.push(0xFF); // Meta event
    bytes.push(0x54); // SMPTE Offset type
    bytes.push(0x05); // Length (5 bytes)

    // SMPTE data
    let frame_type_bits = match fps {
        SmpteFps::TwentyFour => 0b00,
        SmpteFps::TwentyFive => 0b01,
        SmpteFps::TwentyNine => 0b10,
        SmpteFps::Thirty => 0b11,
    };
    bytes.push((frame_type_bits << 5) | (hour & 0x1F)); // Frame type + hours
    bytes.push(minute);
    bytes.push(second);
    bytes.push(frame);
    bytes.push(subframe);

    // Add a simple note to make it a valid track
    bytes.push(0x00); // Delta time
    bytes.push(0x90); // Note On, channel 0
    bytes.push(0x3C); // Middle C (60)
    bytes.push(0x64); // Velocity 100

    bytes.push(0x60); // Delta time (96 ticks)
    bytes.push(0x80); // Note Off, channel 0
    bytes.push(0x3C); // Middle C
    bytes.push(0x40); // Release velocity 64

    // End of Track
    bytes.push(0x00); // Delta time
    bytes.push(0xFF); // Meta event
    bytes.push(0x2F); // End of track
    bytes.push(0x00); // Length 0

    // Update track length
    let track_length = bytes.len() - track_start;
    bytes[track_length_pos..track_length_pos + 4]
        .copy_from_slice(&(track_length as u32).to_be_bytes());

    bytes
}

fn first_offset(sequence: &Sequence) -> SmpteOffset {
    match sequence.tracks()[0].events()[0].event() {
        Event::Meta(MetaEvent::SmpteOffset(offset)) => *offset,
        other => panic!("Expected SMPTE offset meta event, found {other:?}"),
    }
}

#[test]
fn test_smpte_offset_24fps() {
    let midi_data = create_midi_with_smpte_offset(
        SmpteFps::TwentyFour,
        12, // hour (noon)
        30, // minute
        15, // second
        18, // frame
        50, // subframe
    );

    let sequence = Sequence::open(&midi_data[..]).unwrap();

    // Verify SMPTE timing
    assert_eq!(sequence.format(), Format::SingleMultiChannel);
    assert_eq!(sequence.division_type(), DivisionType::Smpte);
    match sequence.division() {
        Division::Smpte(smpte) => {
            assert_eq!(smpte.fps(), SmpteFps::TwentyFour);
            assert_eq!(smpte.ticks_per_frame(), 40);
        }
        _ => panic!("Expected SMPTE timing"),
    }

    let track = &sequence.tracks()[0];
    assert_eq!(track.len(), 4);

    let offset = first_offset(&sequence);
    assert_eq!(offset.fps(), SmpteFps::TwentyFour);
    assert_eq!(offset.hour(), 12);
    assert_eq!(offset.minute(), 30);
    assert_eq!(offset.second(), 15);
    assert_eq!(offset.frame(), 18);
    assert_eq!(offset.subframe(), 50);
    assert_eq!(
        track.events()[0].to_string(),
        "SmpteOffset\t0\t24\t12\t30\t15\t18\t50"
    );
}

#[test]
fn test_smpte_offset_every_rate() {
    for (fps, division_byte) in [
        (SmpteFps::TwentyFour, 0xE8),
        (SmpteFps::TwentyFive, 0xE7),
        (SmpteFps::TwentyNine, 0xE3),
        (SmpteFps::Thirty, 0xE2),
    ] {
        let midi_data = create_midi_with_smpte_offset(fps, 1, 2, 3, 4, 5);
        let sequence = Sequence::open(&midi_data[..]).unwrap();

        assert_eq!(sequence.division().raw(), u16::from_be_bytes([division_byte, 40]));
        assert_eq!(first_offset(&sequence).fps(), fps);
    }
}

#[test]
fn test_smpte_file_is_rewritten_byte_for_byte() {
    let midi_data = create_midi_with_smpte_offset(SmpteFps::TwentyNine, 23, 59, 59, 29, 99);
    let sequence = Sequence::open(&midi_data[..]).unwrap();

    let mut written = Vec::new();
    sequence.save(&mut written).unwrap();
    assert_eq!(written, midi_data);
}

#[test]
fn test_smpte_offset_event_round_trip() {
    let offset = SmpteOffset::new(SmpteFps::TwentyFive, 0, 0, 1, 12, 75).unwrap();

    let mut track = Track::new();
    track.push(TrackEvent::new(0, MetaEvent::SmpteOffset(offset)).unwrap());
    track.push(TrackEvent::end_of_track(DeltaTime::ZERO));

    let mut sequence = Sequence::new(
        Format::SingleMultiChannel,
        Division::smpte(SmpteFps::TwentyFive, 40).unwrap(),
    );
    sequence.add_track(track);

    let read = Sequence::open(&sequence.to_bytes().unwrap()[..]).unwrap();
    assert_eq!(first_offset(&read), offset);
    assert_eq!(read, sequence);
}

#[test]
fn test_invalid_smpte_offset_in_file_is_corrupt() {
    // 25 hours
    let midi_data = create_midi_with_smpte_offset(SmpteFps::Thirty, 25, 0, 0, 0, 0);
    let err = Sequence::open(&midi_data[..]).unwrap_err();

    assert_eq!(
        err.corrupt_kind(),
        Some(&CorruptKind::InvalidField(ValueError::Smpte(
            SmpteError::HourOffset(25)
        )))
    );
    // The length byte of the meta event
    assert_eq!(err.position(), Some(25));
}
