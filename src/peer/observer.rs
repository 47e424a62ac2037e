use super::error::PeerError;
use super::handshake::Handshake;
use super::message::PeerMessage;
use std::fmt;
use tracing::{debug, trace};

/// Receives connection events.
///
/// Connections call the observer they were given instead of logging to a
/// process-wide sink. Every method defaults to doing nothing.
pub trait WireObserver: Send + Sync {
    fn handshake_sent(&self, _handshake: &Handshake) {}

    fn handshake_received(&self, _handshake: &Handshake) {}

    /// A batch of `count` messages totalling `bytes` was written and flushed.
    fn messages_sent(&self, _count: usize, _bytes: usize) {}

    fn message_received(&self, _message: &PeerMessage) {}

    /// The connection ended; `error` is `None` for a local close.
    fn closed(&self, _error: Option<&PeerError>) {}
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl WireObserver for NoopObserver {}

/// Forwards events to `tracing`, tagged with the peer they belong to.
#[derive(Debug, Clone)]
pub struct TracingObserver {
    peer: String,
}

impl TracingObserver {
    pub fn new(peer: impl fmt::Display) -> Self {
        Self {
            peer: peer.to_string(),
        }
    }
}

impl Default for TracingObserver {
    fn default() -> Self {
        Self::new("unknown")
    }
}

impl WireObserver for TracingObserver {
    fn handshake_sent(&self, handshake: &Handshake) {
        debug!(
            peer = %self.peer,
            protocol = %String::from_utf8_lossy(handshake.protocol_name()),
            "handshake sent"
        );
    }

    fn handshake_received(&self, handshake: &Handshake) {
        debug!(
            peer = %self.peer,
            remote_id = %handshake.peer_id(),
            "handshake received"
        );
    }

    fn messages_sent(&self, count: usize, bytes: usize) {
        trace!(peer = %self.peer, count, bytes, "messages sent");
    }

    fn message_received(&self, message: &PeerMessage) {
        trace!(
            peer = %self.peer,
            kind = %message.kind(),
            length = message.length(),
            "message received"
        );
    }

    fn closed(&self, error: Option<&PeerError>) {
        match error {
            Some(e) => debug!(peer = %self.peer, error = %e, "connection closed"),
            None => debug!(peer = %self.peer, "connection closed"),
        }
    }
}
