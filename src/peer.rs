//! Peer wire protocol ([BEP-3]).
//!
//! A connection starts with a [`Handshake`] in each direction, followed by a
//! stream of length-prefixed frames:
//!
//! ```text
//! <length: u32 BE><id: u8><payload: length - 1 bytes>
//! ```
//!
//! A zero length is a keep-alive. [`PeerMessage`] keeps the whole frame and
//! hands out checked views of its payload, so a short or hostile payload
//! becomes [`PeerError::MalformedPayload`] instead of a panic.
//!
//! Three layers are provided:
//!
//! - buffer codecs ([`decode_frame`], [`decode_handshake`], [`encode_frames`])
//! - blocking functions over any `Read`/`Write` ([`handshake`],
//!   [`send_messages`], [`read_message`]) and [`PeerConnection`] over TCP
//! - [`PeerTransport`] for tokio streams
//!
//! ```
//! use std::io::Cursor;
//! use torrent_wire::peer::{read_message, send_messages, MessageType, PeerMessage};
//!
//! let mut wire = Vec::new();
//! send_messages(&mut wire, &[PeerMessage::have(7), PeerMessage::keep_alive()]).unwrap();
//!
//! let mut reader = Cursor::new(wire);
//! assert_eq!(read_message(&mut reader).unwrap().as_have().unwrap().index().unwrap(), 7);
//! assert_eq!(read_message(&mut reader).unwrap().kind(), MessageType::KeepAlive);
//! ```
//!
//! [BEP-3]: http://bittorrent.org/beps/bep_0003.html

mod codec;
mod connection;
mod error;
mod handshake;
mod message;
mod observer;
mod peer_id;
mod transport;
mod wire;

pub use codec::{decode_frame, decode_handshake, encode_frames, DEFAULT_MAX_FRAME_LEN};
pub use connection::{CloseHandle, ConnectionConfig, MessageReader, MessageWriter, PeerConnection};
pub use error::{HandshakeField, PeerError};
pub use handshake::{Handshake, DEFAULT_PROTOCOL, HANDSHAKE_FIXED_LEN};
pub use message::{
    BitfieldView, HaveView, MessageType, PeerMessage, PieceView, RequestView, LENGTH_PREFIX_LEN,
};
pub use observer::{NoopObserver, TracingObserver, WireObserver};
pub use peer_id::PeerId;
pub use transport::PeerTransport;
pub use wire::{
    handshake, read_handshake, read_message, read_message_with_limit, send_messages,
    write_handshake,
};
