//! Channel manager errors.

use facewatch_proto::ProtocolError;
use thiserror::Error;

/// Errors from [`crate::ChannelManager`] operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChannelError {
    /// A channel was already opened for this process.
    #[error("channel already open")]
    AlreadyOpen,

    /// Operation requires an open channel.
    #[error("channel not open")]
    NotOpen,

    /// Inbound event could not be decoded.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}
