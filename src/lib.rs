//! torrent-wire - BitTorrent encoding and peer-wire codecs
//!
//! The byte-level core of a BitTorrent client: everything between a
//! `.torrent` file or a TCP socket and typed values, with no scheduling,
//! storage or tracker transport on top.
//!
//! # Modules
//!
//! - [`bencode`] - BEP-3 bencode decoding/encoding with byte spans
//! - [`metainfo`] - BEP-3/12 torrent files and the info hash
//! - [`peer`] - BEP-3 handshake, message framing and connections
//! - [`tracker`] - peer addresses and BEP-23 compact peer lists
//!
//! # Example
//!
//! ```
//! use torrent_wire::{Handshake, PeerId, Torrent};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let torrent = Torrent::from_bytes(b"d4:infod4:name3:abc6:lengthi3eee")?;
//! let handshake = Handshake::new(torrent.info.hash(), PeerId::generate().0);
//! assert_eq!(handshake.info_hash(), torrent.info.hash());
//! # Ok(())
//! # }
//! ```

pub mod bencode;
pub mod metainfo;
pub mod peer;
pub mod tracker;

pub use bencode::{decode, encode, BencodeError, Value};
pub use metainfo::{InfoDict, InfoHash, MetainfoError, ParseOptions, Torrent};
pub use peer::{
    Handshake, MessageType, PeerConnection, PeerError, PeerId, PeerMessage, PeerTransport,
};
pub use tracker::{PeerAddress, TrackerError};
