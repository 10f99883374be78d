//! Fragmentation and reassembly of logical frames.
//!
//! Outbound, [`FrameFragmenter`] turns one oversized frame into a lazy
//! sequence of MTU-bounded wire fragments. Inbound, [`FrameReassembler`]
//! accumulates fragment chains per stream id and emits each reassembled
//! whole. [`FragmentingDuplexConnection`] wires both onto a
//! [`DuplexConnection`](crate::connection::DuplexConnection) so the layers
//! above and below never see a fragment.

pub mod adapter;
pub mod config;
pub mod error;
pub mod fragmenter;
pub mod reassembler;

pub use adapter::FragmentingDuplexConnection;
pub use config::{FragmentationConfig, MIN_MTU};
pub use error::{FragmentationError, ReassemblyError};
pub use fragmenter::{FrameFragmenter, Fragments};
pub use reassembler::FrameReassembler;
