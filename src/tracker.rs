//! Tracker collaborator types ([BEP-3], [BEP-23]).
//!
//! Announce requests themselves are made elsewhere; this module only models
//! what they yield: peer addresses, either as `host:port` pairs or as the
//! compact binary peer lists trackers return.
//!
//! [BEP-3]: http://bittorrent.org/beps/bep_0003.html
//! [BEP-23]: http://bittorrent.org/beps/bep_0023.html

mod error;
mod response;

pub use error::TrackerError;
pub use response::{parse_compact_peers, parse_compact_peers_v6, PeerAddress};

#[cfg(test)]
mod tests;
