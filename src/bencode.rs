//! Bencode encoding and decoding ([BEP-3]).
//!
//! Bencode is the serialization format of `.torrent` files and tracker
//! responses. It has four types:
//!
//! | Type | Format | Example |
//! |------|--------|---------|
//! | Integer | `i<number>e` | `i42e` → 42 |
//! | Byte String | `<length>:<data>` | `4:spam` → "spam" |
//! | List | `l<items>e` | `l4:spami42ee` → ["spam", 42] |
//! | Dictionary | `d<key><value>...e` | `d3:cow3:mooe` → {"cow": "moo"} |
//!
//! # Grammar
//!
//! The decoder is strict about integers (no empty digit runs, no leading
//! zeros, no `-0`, no `+`) and about structure (dictionary keys must be byte
//! strings and must not repeat). It tolerates leading zeros in a string
//! length prefix, so `02:ab` decodes to `"ab"`.
//!
//! # Spans
//!
//! [`decode_node`] returns a [`Node`] tree in which every value knows the
//! exact byte range it was decoded from. Use it when the original encoding
//! matters, for instance when hashing a torrent's info dictionary:
//!
//! ```
//! use torrent_wire::bencode::decode_node;
//!
//! let data = b"d4:infod4:name1:xee";
//! let root = decode_node(data).unwrap();
//! let info = root.get(b"info").unwrap();
//! assert_eq!(info.raw(data), Some(&b"d4:name1:xe"[..]));
//! ```
//!
//! # Errors
//!
//! Failures carry an [`ErrorKind`], the offset of the offending byte and a
//! short escaped snippet of the input there. Partial values are never
//! returned.
//!
//! [BEP-3]: http://bittorrent.org/beps/bep_0003.html

mod decode;
mod encode;
mod error;
mod node;
mod value;

pub use decode::{decode, decode_exact, decode_node};
pub use encode::{encode, encode_to};
pub use error::{BencodeError, ErrorKind};
pub use node::{Node, NodeKind};
pub use value::Value;

#[cfg(test)]
mod tests;
