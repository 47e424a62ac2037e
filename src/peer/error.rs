use std::fmt;

use thiserror::Error;

use super::message::MessageType;

/// The handshake field that differed from what was sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeField {
    ProtocolName,
    InfoHash,
}

impl fmt::Display for HandshakeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandshakeField::ProtocolName => f.write_str("protocol name"),
            HandshakeField::InfoHash => f.write_str("info hash"),
        }
    }
}

/// Errors that can occur during peer communication.
///
/// Use [`is_protocol`](Self::is_protocol) and [`is_io`](Self::is_io) to tell
/// a misbehaving peer apart from a failing transport. Both are terminal for
/// the connection; neither is retried here.
#[derive(Debug, Error)]
pub enum PeerError {
    /// Network I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The stream was closed, locally or by the peer, at a message boundary.
    #[error("connection closed")]
    ConnectionClosed,

    /// The stream ended in the middle of a frame.
    #[error("truncated frame: expected {expected} bytes, received {received}")]
    TruncatedFrame { expected: usize, received: usize },

    /// The length prefix announced more than the configured maximum.
    #[error("frame of {length} bytes exceeds limit of {max}")]
    FrameTooLarge { length: u32, max: u32 },

    /// A message payload does not fit in a frame's 32-bit length prefix.
    #[error("payload of {0} bytes is too large for a frame")]
    PayloadTooLarge(usize),

    /// The stream ended in the middle of a handshake.
    #[error("truncated handshake: expected {expected} bytes, received {received}")]
    TruncatedHandshake { expected: usize, received: usize },

    /// Protocol names are limited to 255 bytes by the 1-byte length prefix.
    #[error("protocol name of {0} bytes exceeds 255")]
    ProtocolNameTooLong(usize),

    /// The remote handshake disagreed with ours.
    #[error("handshake mismatch: {0}")]
    HandshakeMismatch(HandshakeField),

    /// A payload is shorter than the fields being read from it.
    #[error("malformed {message} payload: need {needed} bytes, have {actual}")]
    MalformedPayload {
        message: MessageType,
        needed: usize,
        actual: usize,
    },

    /// A bitfield index past the end of the payload.
    #[error("bit index {index} out of range for {len} bits")]
    IndexOutOfRange { index: usize, len: usize },

    /// A typed view was requested for a different message type.
    #[error("expected {expected} message, got {actual}")]
    WrongMessageType {
        expected: MessageType,
        actual: MessageType,
    },
}

impl PeerError {
    /// The peer sent something that violates the wire protocol.
    pub fn is_protocol(&self) -> bool {
        matches!(
            self,
            PeerError::TruncatedFrame { .. }
                | PeerError::FrameTooLarge { .. }
                | PeerError::TruncatedHandshake { .. }
                | PeerError::HandshakeMismatch(_)
                | PeerError::MalformedPayload { .. }
                | PeerError::IndexOutOfRange { .. }
                | PeerError::WrongMessageType { .. }
        )
    }

    /// The transport failed or was closed.
    pub fn is_io(&self) -> bool {
        matches!(self, PeerError::Io(_) | PeerError::ConnectionClosed)
    }
}
