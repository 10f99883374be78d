//! Tests for header layout, payload slicing, and the length prefix.

use bytes::{BufMut, Bytes, BytesMut};
use rstest::rstest;

use super::{
    describe,
    encode_frame,
    initial_request_n,
    prepend_length,
    slice_data,
    slice_metadata,
    strip_length,
    CodecError,
    FrameFlags,
    FrameHeader,
    FrameType,
    StreamId,
    FRAME_HEADER_SIZE,
};

fn raw_frame(stream_id: u32, code: u8, flags: u16, rest: &[u8]) -> Bytes {
    let mut buf = BytesMut::with_capacity(FRAME_HEADER_SIZE + rest.len());
    buf.put_u32(stream_id);
    buf.put_u16((u16::from(code) << 10) | (flags & FrameFlags::MASK));
    buf.put_slice(rest);
    buf.freeze()
}

const WIRE_TYPES: [FrameType; 15] = [
    FrameType::Setup,
    FrameType::Lease,
    FrameType::Keepalive,
    FrameType::RequestResponse,
    FrameType::RequestFnf,
    FrameType::RequestStream,
    FrameType::RequestChannel,
    FrameType::RequestN,
    FrameType::Cancel,
    FrameType::Payload,
    FrameType::Error,
    FrameType::MetadataPush,
    FrameType::Resume,
    FrameType::ResumeOk,
    FrameType::Ext,
];

#[test]
fn header_round_trips_for_every_wire_type() {
    for frame_type in WIRE_TYPES {
        let header = FrameHeader::new(
            StreamId::new(0x0123_4567),
            frame_type,
            FrameFlags::METADATA.with(FrameFlags::FOLLOWS),
        );
        let mut buf = BytesMut::new();
        header.encode_into(&mut buf);
        assert_eq!(buf.len(), FRAME_HEADER_SIZE);

        let parsed = FrameHeader::parse(&buf).expect("header should parse");
        assert_eq!(parsed, header, "round trip failed for {frame_type}");
    }
}

#[test]
fn parse_masks_the_reserved_stream_id_bit() {
    let frame = raw_frame(0x8000_0001, FrameType::Payload.code(), 0, &[]);
    let header = FrameHeader::parse(&frame).expect("header should parse");
    assert_eq!(header.stream_id(), StreamId::new(1));
}

#[test]
fn parse_rejects_unknown_type_codes() {
    let frame = raw_frame(1, 0x10, 0, &[]);
    assert_eq!(
        FrameHeader::parse(&frame),
        Err(CodecError::UnknownFrameType { code: 0x10 }),
    );
}

#[test]
fn parse_rejects_short_input() {
    assert_eq!(
        FrameHeader::parse(&[0_u8, 1, 2]),
        Err(CodecError::IncompleteHeader { actual: 3 }),
    );
}

#[test]
fn slices_prefixed_metadata_and_data() {
    let frame = encode_frame(
        StreamId::new(7),
        FrameType::RequestStream,
        FrameFlags::NONE,
        Some(42),
        Some(b"meta"),
        b"body",
    );

    assert_eq!(initial_request_n(&frame).expect("request n"), 42);
    assert_eq!(
        slice_metadata(&frame)
            .expect("metadata slices")
            .expect("metadata present"),
        b"meta".as_slice(),
    );
    assert_eq!(slice_data(&frame).expect("data slices"), b"body".as_slice());
}

#[test]
fn absent_metadata_yields_none_and_full_data() {
    let frame = encode_frame(
        StreamId::new(1),
        FrameType::RequestResponse,
        FrameFlags::NONE,
        None,
        None,
        b"payload",
    );

    assert_eq!(slice_metadata(&frame).expect("no metadata"), None);
    assert_eq!(slice_data(&frame).expect("data slices"), b"payload".as_slice());
}

#[test]
fn empty_metadata_is_distinct_from_absent() {
    let empty = encode_frame(
        StreamId::new(1),
        FrameType::Payload,
        FrameFlags::NONE,
        None,
        Some(&[]),
        b"x",
    );
    let absent = encode_frame(
        StreamId::new(1),
        FrameType::Payload,
        FrameFlags::NONE,
        None,
        None,
        b"x",
    );

    assert_eq!(empty.len(), absent.len() + 3);
    assert!(FrameHeader::parse(&empty).expect("parse").has_metadata());
    assert!(!FrameHeader::parse(&absent).expect("parse").has_metadata());
    assert_eq!(
        slice_metadata(&empty)
            .expect("metadata slices")
            .expect("marker present")
            .len(),
        0,
    );
    assert_eq!(slice_metadata(&absent).expect("no metadata"), None);
}

#[test]
fn metadata_overrun_is_rejected() {
    // Declared metadata length of 10 with only 2 payload bytes behind it.
    let frame = raw_frame(
        1,
        FrameType::Payload.code(),
        FrameFlags::METADATA.bits(),
        &[0, 0, 10, 0xAB, 0xCD],
    );
    assert_eq!(
        slice_metadata(&frame),
        Err(CodecError::MetadataOverrun {
            declared: 10,
            available: 2,
        }),
    );
}

#[test]
fn metadata_push_metadata_is_the_rest_of_the_frame() {
    let frame = raw_frame(
        0,
        FrameType::MetadataPush.code(),
        FrameFlags::METADATA.bits(),
        b"routing",
    );
    assert_eq!(
        slice_metadata(&frame)
            .expect("metadata slices")
            .expect("metadata present"),
        b"routing".as_slice(),
    );
    assert!(slice_data(&frame).expect("no data region").is_empty());
}

#[test]
fn keepalive_data_follows_the_position_field() {
    let mut rest = Vec::from([0_u8, 0, 0, 0, 0, 0, 0, 42]);
    rest.extend_from_slice(b"ka-data");
    let frame = raw_frame(0, FrameType::Keepalive.code(), 0, &rest);

    assert_eq!(slice_metadata(&frame).expect("no metadata"), None);
    assert_eq!(slice_data(&frame).expect("data slices"), b"ka-data".as_slice());
}

#[test]
fn setup_payload_is_opaque_to_this_layer() {
    let frame = raw_frame(0, FrameType::Setup.code(), 0, &[0_u8; 20]);
    assert_eq!(
        slice_metadata(&frame),
        Err(CodecError::OpaquePayload {
            frame_type: FrameType::Setup,
        }),
    );
}

#[test]
fn truncated_type_prefix_is_rejected() {
    let frame = raw_frame(1, FrameType::RequestStream.code(), 0, &[0, 0]);
    assert_eq!(
        slice_data(&frame),
        Err(CodecError::TruncatedFrame {
            expected: 10,
            actual: 8,
        }),
    );
}

#[test]
fn length_prefix_round_trips() {
    let frame = raw_frame(1, FrameType::Cancel.code(), 0, &[]);
    let prefixed = prepend_length(&frame).expect("frame fits prefix");
    assert_eq!(prefixed.len(), frame.len() + 3);
    assert_eq!(strip_length(prefixed).expect("prefix valid"), frame);
}

#[test]
fn length_prefix_mismatch_is_rejected() {
    let mut bytes = prepend_length(b"abcd").expect("prefix fits").to_vec();
    bytes.truncate(bytes.len() - 2);
    assert_eq!(
        strip_length(Bytes::from(bytes)),
        Err(CodecError::LengthPrefixMismatch {
            declared: 4,
            actual: 2,
        }),
    );
}

#[rstest]
#[case(FrameFlags::NONE, FrameType::Payload)]
#[case(FrameFlags::NEXT, FrameType::Next)]
#[case(FrameFlags::COMPLETE, FrameType::Complete)]
#[case(FrameFlags::NEXT.with(FrameFlags::COMPLETE), FrameType::NextComplete)]
fn payload_flags_map_to_synthetic_aliases(
    #[case] flags: FrameFlags,
    #[case] expected: FrameType,
) {
    assert_eq!(FrameType::from_payload_flags(flags), expected);
    assert_eq!(expected.code(), FrameType::Payload.code());
}

#[test]
fn synthetic_aliases_encode_their_implied_flags() {
    let frame = encode_frame(
        StreamId::new(9),
        FrameType::NextComplete,
        FrameFlags::NONE,
        None,
        None,
        b"last",
    );
    let header = FrameHeader::parse(&frame).expect("parse");
    assert_eq!(header.frame_type(), FrameType::Payload);
    assert_eq!(FrameType::from_payload_flags(header.flags()), FrameType::NextComplete);
}

#[test]
fn describe_summarises_well_formed_frames() {
    let frame = encode_frame(
        StreamId::new(31),
        FrameType::RequestResponse,
        FrameFlags::NONE,
        None,
        None,
        b"ping",
    );
    let summary = describe(&frame);
    assert!(summary.contains("stream 31"));
    assert!(summary.contains("REQUEST_RESPONSE"));

    assert!(describe(&[0_u8, 1]).contains("malformed"));
}
