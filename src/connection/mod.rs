//! Contract for the byte-frame duplex channel beneath the fragmentation
//! layer.
//!
//! The protocol engine above and the transport below both speak
//! [`DuplexConnection`]; the fragmentation layer is a decorator between
//! two instances of it. Buffers exchanged are whole wire frames; the
//! transport handles byte-level framing (and, when configured, each frame
//! carries a 24-bit length prefix).

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;
use thiserror::Error;

use crate::{
    fragment::{FragmentationError, ReassemblyError},
    frame::CodecError,
};

/// Failures crossing a duplex connection.
#[derive(Debug, Error)]
pub enum ConnectionError {
    /// The underlying transport failed; propagated unchanged.
    #[error("transport failure: {0}")]
    Transport(#[from] std::io::Error),
    /// A frame's structure could not be parsed; fatal for the connection.
    #[error("malformed frame: {0}")]
    Malformed(#[from] CodecError),
    /// Outbound fragmentation failed.
    #[error("fragmentation failed: {0}")]
    Fragmentation(#[from] FragmentationError),
    /// Inbound reassembly failed.
    #[error("reassembly failed: {0}")]
    Reassembly(#[from] ReassemblyError),
}

/// A reliable, ordered, bidirectional frame channel.
///
/// One connection is driven by one task at a time; methods take `&mut
/// self` and implementations need no internal locking.
#[async_trait]
pub trait DuplexConnection: Send {
    /// Send a single frame, completing when the wire write has completed.
    async fn send_one(&mut self, frame: Bytes) -> Result<(), ConnectionError>;

    /// Send a batch of frames strictly in order, with no interleaving.
    async fn send(&mut self, frames: Vec<Bytes>) -> Result<(), ConnectionError> {
        for frame in frames {
            self.send_one(frame).await?;
        }
        Ok(())
    }

    /// Inbound frames, in arrival order. The stream ends when the peer
    /// closes the connection.
    fn receive(&mut self) -> BoxStream<'_, Result<Bytes, ConnectionError>>;

    /// Resolve once the connection has closed, for any reason.
    async fn on_close(&mut self);

    /// Release the connection's resources. Idempotent.
    fn dispose(&mut self);

    /// Whether [`dispose`](Self::dispose) has taken effect.
    fn is_disposed(&self) -> bool;

    /// Fraction of capacity available for new frames, `0.0` when closed.
    fn availability(&self) -> f64;
}
