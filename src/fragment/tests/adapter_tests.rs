//! Tests for the fragmenting duplex decorator over an in-memory
//! connection.

use async_trait::async_trait;
use bytes::Bytes;
use futures::{stream, stream::BoxStream, StreamExt};

use crate::{
    connection::{ConnectionError, DuplexConnection},
    fragment::{FragmentationConfig, FragmentingDuplexConnection, FrameFragmenter},
    frame::{
        self,
        encode_frame,
        FrameFlags,
        FrameType,
        StreamId,
    },
};

use super::{header_of, raw_frame};

/// In-memory duplex capturing writes and replaying queued inbound frames.
#[derive(Default)]
struct TestDuplex {
    sent: Vec<Bytes>,
    inbound: Vec<Result<Bytes, ConnectionError>>,
    disposals: usize,
}

impl TestDuplex {
    fn with_inbound(inbound: Vec<Result<Bytes, ConnectionError>>) -> Self {
        Self {
            inbound,
            ..Self::default()
        }
    }
}

#[async_trait]
impl DuplexConnection for TestDuplex {
    async fn send_one(&mut self, frame: Bytes) -> Result<(), ConnectionError> {
        self.sent.push(frame);
        Ok(())
    }

    fn receive(&mut self) -> BoxStream<'_, Result<Bytes, ConnectionError>> {
        Box::pin(stream::iter(std::mem::take(&mut self.inbound)))
    }

    async fn on_close(&mut self) {}

    fn dispose(&mut self) { self.disposals += 1; }

    fn is_disposed(&self) -> bool { self.disposals > 0 }

    fn availability(&self) -> f64 {
        if self.is_disposed() { 0.0 } else { 1.0 }
    }
}

fn adapter(
    inner: TestDuplex,
    mtu: usize,
    encode_length: bool,
) -> FragmentingDuplexConnection<TestDuplex> {
    let config = FragmentationConfig::new(mtu, encode_length, None).expect("valid config");
    FragmentingDuplexConnection::new(inner, config).expect("valid adapter")
}

fn request_frame(stream_id: u32, payload: &[u8]) -> Bytes {
    encode_frame(
        StreamId::new(stream_id),
        FrameType::RequestFnf,
        FrameFlags::NONE,
        None,
        None,
        payload,
    )
}

#[tokio::test]
async fn forwards_small_frames_whole() {
    let mut connection = adapter(TestDuplex::default(), 64, false);
    let frame = request_frame(1, b"hello");

    connection
        .send_one(frame.clone())
        .await
        .expect("send succeeds");

    assert_eq!(connection.get_ref().sent, vec![frame]);
}

#[tokio::test]
async fn applies_length_prefix_to_unfragmented_frames() {
    let mut connection = adapter(TestDuplex::default(), 64, true);
    let frame = request_frame(1, b"hello");

    connection
        .send_one(frame.clone())
        .await
        .expect("send succeeds");

    let written = &connection.get_ref().sent[0];
    assert_eq!(
        frame::strip_length(written.clone()).expect("valid prefix"),
        frame,
    );
}

#[tokio::test]
async fn fragments_oversized_frames_in_order() {
    let payload: Vec<u8> = (0..32).collect();
    let mut connection = adapter(TestDuplex::default(), 14, false);

    connection
        .send_one(request_frame(3, &payload))
        .await
        .expect("send succeeds");

    let sent = &connection.get_ref().sent;
    assert_eq!(sent.len(), 4);
    let mut collected = Vec::new();
    for (index, fragment) in sent.iter().enumerate() {
        assert!(fragment.len() <= 14, "fragment {index} over mtu");
        let expected = if index == 0 { FrameType::RequestFnf } else { FrameType::Payload };
        assert_eq!(header_of(fragment).frame_type(), expected);
        collected.extend_from_slice(&frame::slice_data(fragment).expect("fragment data"));
    }
    assert_eq!(collected, payload);
}

#[tokio::test]
async fn oversized_non_fragmentable_frames_pass_whole() {
    let mut body = vec![0_u8; 4];
    body.extend_from_slice(&[7_u8; 100]);
    let error_frame = raw_frame(5, FrameType::Error.code(), 0, &body);

    let mut connection = adapter(TestDuplex::default(), 14, false);
    connection
        .send_one(error_frame.clone())
        .await
        .expect("send succeeds");

    assert_eq!(connection.get_ref().sent, vec![error_frame]);
}

#[tokio::test]
async fn disabled_mtu_never_fragments() {
    let config = FragmentationConfig::disabled(false);
    let mut connection =
        FragmentingDuplexConnection::new(TestDuplex::default(), config).expect("valid adapter");
    let frame = request_frame(1, &vec![1_u8; 1024]);

    connection
        .send_one(frame.clone())
        .await
        .expect("send succeeds");

    assert_eq!(connection.get_ref().sent, vec![frame]);
}

#[tokio::test]
async fn receive_reassembles_fragment_chains() {
    let payload: Vec<u8> = (0..40).collect();
    let original = request_frame(9, &payload);
    let fragments: Vec<Result<Bytes, ConnectionError>> = FrameFragmenter::new(14, false)
        .expect("mtu within range")
        .fragment(original.clone())
        .expect("fragmentable frame")
        .map(Ok)
        .collect();

    let mut connection = adapter(TestDuplex::with_inbound(fragments), 14, false);
    let received: Vec<_> = connection.receive().collect().await;

    assert_eq!(received.len(), 1);
    let whole = received[0].as_ref().expect("reassembly succeeds");
    assert_eq!(whole, &original);
}

#[tokio::test]
async fn receive_strips_length_prefixes() {
    let original = request_frame(2, b"short");
    let prefixed = frame::prepend_length(&original).expect("frame fits prefix");

    let mut connection = adapter(TestDuplex::with_inbound(vec![Ok(prefixed)]), 14, true);
    let received: Vec<_> = connection.receive().collect().await;

    assert_eq!(received.len(), 1);
    assert_eq!(received[0].as_ref().expect("frame forwarded"), &original);
}

#[tokio::test]
async fn receive_rejects_length_prefix_mismatch() {
    let mut bad = frame::prepend_length(b"xyz").expect("prefix fits").to_vec();
    bad.pop();

    let mut connection =
        adapter(TestDuplex::with_inbound(vec![Ok(Bytes::from(bad))]), 14, true);
    let received: Vec<_> = connection.receive().collect().await;

    assert_eq!(received.len(), 1);
    assert!(matches!(
        received[0],
        Err(ConnectionError::Malformed(_)),
    ));
}

#[tokio::test]
async fn receive_drops_unknown_frame_types() {
    let unknown = raw_frame(1, 0x10, 0, b"??");

    let mut connection = adapter(TestDuplex::with_inbound(vec![Ok(unknown)]), 14, false);
    let received: Vec<_> = connection.receive().collect().await;

    assert!(received.is_empty());
}

#[tokio::test]
async fn receive_surfaces_reassembly_violations() {
    let first = encode_frame(
        StreamId::new(2),
        FrameType::RequestResponse,
        FrameFlags::FOLLOWS,
        None,
        None,
        b"one",
    );
    let intruder = encode_frame(
        StreamId::new(2),
        FrameType::RequestFnf,
        FrameFlags::FOLLOWS,
        None,
        None,
        b"two",
    );

    let mut connection =
        adapter(TestDuplex::with_inbound(vec![Ok(first), Ok(intruder)]), 14, false);
    let received: Vec<_> = connection.receive().collect().await;

    assert_eq!(received.len(), 1);
    assert!(matches!(
        received[0],
        Err(ConnectionError::Reassembly(_)),
    ));
}

#[tokio::test]
async fn dispose_is_idempotent() {
    let mut connection = adapter(TestDuplex::default(), 14, false);

    connection.dispose();
    connection.dispose();

    assert!(connection.is_disposed());
    assert_eq!(connection.get_ref().disposals, 1);
}

#[tokio::test]
async fn bulk_send_keeps_frame_order() {
    let first = request_frame(1, &[1_u8; 30]);
    let second = request_frame(2, &[2_u8; 30]);
    let mut connection = adapter(TestDuplex::default(), 14, false);

    connection
        .send(vec![first, second])
        .await
        .expect("bulk send succeeds");

    let streams: Vec<u32> = connection
        .get_ref()
        .sent
        .iter()
        .map(|fragment| header_of(fragment).stream_id().get())
        .collect();
    let split = streams.iter().position(|&id| id == 2).expect("stream 2 follows");
    assert!(streams[..split].iter().all(|&id| id == 1));
    assert!(streams[split..].iter().all(|&id| id == 2));
    assert!(split >= 2, "stream 1 must have fragmented");
}
