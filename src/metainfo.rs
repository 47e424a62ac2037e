//! Torrent metainfo ([BEP-3]).
//!
//! A `.torrent` file is a bencoded dictionary:
//!
//! - **announce** - primary tracker URL (optional)
//! - **announce-list** - tracker tiers, [BEP-12] (optional)
//! - **info** - required
//!   - `name` - suggested file or directory name
//!   - `piece length` - bytes per piece
//!   - `pieces` - concatenated 20-byte SHA-1 piece hashes
//!   - `length` (single file) or `files` (list of `{length, path}`)
//!
//! # Info hash
//!
//! The info hash is the SHA-1 of the info dictionary *as it appears in the
//! file*. [`InfoDict`] keeps those original bytes and hashes them, so a torrent
//! produced with unsorted keys or padded numbers still yields the hash the
//! rest of the swarm uses.
//!
//! ```
//! use torrent_wire::metainfo::Torrent;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let torrent = Torrent::from_bytes(b"d4:infod4:name3:abc6:lengthi1eee")?;
//! assert_eq!(torrent.info.raw_bytes().as_ref(), b"d4:name3:abc6:lengthi1ee");
//! println!("{}", torrent.info.info_hash());
//! # Ok(())
//! # }
//! ```
//!
//! [BEP-3]: http://bittorrent.org/beps/bep_0003.html
//! [BEP-12]: http://bittorrent.org/beps/bep_0012.html

mod error;
mod info_hash;
mod torrent;

pub use error::MetainfoError;
pub use info_hash::InfoHash;
pub use torrent::{FileEntry, InfoDict, ParseOptions, Payload, Torrent, TrailingData};

#[cfg(test)]
mod tests;
