//! Duplex decorator applying fragmentation on send and reassembly on
//! receive.

use async_trait::async_trait;
use bytes::Bytes;
use futures::{future, stream::BoxStream, StreamExt};
use log::warn;

use crate::{
    connection::{ConnectionError, DuplexConnection},
    frame::{self, describe, CodecError, FrameHeader},
};

use super::{
    config::FragmentationConfig,
    error::{FragmentationError, ReassemblyError},
    fragmenter::FrameFragmenter,
    reassembler::FrameReassembler,
};

/// Wraps a [`DuplexConnection`], splitting oversized outbound frames and
/// reassembling inbound fragment chains.
///
/// The decorator is transparent to both sides: the protocol engine sees
/// whole logical frames, the transport sees MTU-bounded wire frames. With
/// fragmentation disabled (`mtu == 0`) only the length-prefix toggle
/// applies.
#[derive(Debug)]
pub struct FragmentingDuplexConnection<C> {
    inner: C,
    fragmenter: Option<FrameFragmenter>,
    reassembler: FrameReassembler,
    mtu: usize,
    encode_length: bool,
    disposed: bool,
}

impl<C: DuplexConnection> FragmentingDuplexConnection<C> {
    /// Decorate `inner` with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`FragmentationError`] when the configured MTU is out of
    /// range.
    pub fn new(inner: C, config: FragmentationConfig) -> Result<Self, FragmentationError> {
        let fragmenter = if config.is_enabled() {
            Some(FrameFragmenter::new(config.mtu, config.encode_length)?)
        } else {
            None
        };
        Ok(Self {
            inner,
            fragmenter,
            reassembler: FrameReassembler::new(config.max_reassembly_size),
            mtu: config.mtu,
            encode_length: config.encode_length,
            disposed: false,
        })
    }

    /// Borrow the wrapped connection.
    #[must_use]
    pub fn get_ref(&self) -> &C { &self.inner }

    /// Mutably borrow the wrapped connection.
    pub fn get_mut(&mut self) -> &mut C { &mut self.inner }

    /// Unwrap the decorator, discarding any partial reassembly state.
    #[must_use]
    pub fn into_inner(self) -> C { self.inner }

    fn should_fragment(&self, header: &FrameHeader, wire_len: usize) -> bool {
        self.fragmenter.is_some() && header.frame_type().is_fragmentable() && wire_len > self.mtu
    }
}

#[async_trait]
impl<C: DuplexConnection> DuplexConnection for FragmentingDuplexConnection<C> {
    async fn send_one(&mut self, frame: Bytes) -> Result<(), ConnectionError> {
        let header = FrameHeader::parse(&frame)?;
        if self.should_fragment(&header, frame.len()) {
            let fragmenter = self
                .fragmenter
                .as_ref()
                .expect("fragmenter present when fragmentation is enabled");
            for fragment in fragmenter.fragment(frame)? {
                self.inner.send_one(fragment).await?;
            }
            Ok(())
        } else if self.encode_length {
            self.inner.send_one(frame::prepend_length(&frame)?).await
        } else {
            self.inner.send_one(frame).await
        }
    }

    fn receive(&mut self) -> BoxStream<'_, Result<Bytes, ConnectionError>> {
        let encode_length = self.encode_length;
        let Self {
            inner, reassembler, ..
        } = self;
        let frames = inner.receive().filter_map(move |incoming| {
            let forwarded = match incoming {
                Ok(raw) => reassemble_one(reassembler, raw, encode_length),
                Err(err) => Some(Err(err)),
            };
            future::ready(forwarded)
        });
        Box::pin(frames)
    }

    async fn on_close(&mut self) {
        self.inner.on_close().await;
        self.reassembler.dispose();
    }

    fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.reassembler.dispose();
        self.inner.dispose();
    }

    fn is_disposed(&self) -> bool { self.disposed || self.inner.is_disposed() }

    fn availability(&self) -> f64 { self.inner.availability() }
}

/// Run one inbound wire frame through the reassembler.
///
/// `None` means nothing to forward: either the chain is still collecting,
/// or the frame carried an unknown type code and was dropped (a per-frame
/// error; the connection carries on).
fn reassemble_one(
    reassembler: &mut FrameReassembler,
    raw: Bytes,
    encode_length: bool,
) -> Option<Result<Bytes, ConnectionError>> {
    let fragment = if encode_length {
        match frame::strip_length(raw) {
            Ok(fragment) => fragment,
            Err(err) => return Some(Err(ConnectionError::Malformed(err))),
        }
    } else {
        raw
    };

    match reassembler.reassemble(fragment.clone()) {
        Ok(Some(whole)) => Some(Ok(whole)),
        Ok(None) => None,
        Err(ReassemblyError::Malformed(CodecError::UnknownFrameType { .. })) => {
            warn!("dropping {}", describe(&fragment));
            None
        }
        Err(err) => Some(Err(ConnectionError::Reassembly(err))),
    }
}
