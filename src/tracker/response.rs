use super::error::TrackerError;
use std::fmt;
use std::io;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, ToSocketAddrs};
use std::vec;

const COMPACT_V4_LEN: usize = 6;
const COMPACT_V6_LEN: usize = 18;

/// A peer as announced by a tracker.
///
/// `host` is a hostname or an IP literal; it is resolved only when connecting.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PeerAddress {
    pub host: String,
    pub port: u16,
}

impl PeerAddress {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Parses a peer from compact IPv4 format: 4 bytes IP + 2 bytes port (big-endian).
    pub fn from_compact_v4(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < COMPACT_V4_LEN {
            return None;
        }
        let ip = Ipv4Addr::new(bytes[0], bytes[1], bytes[2], bytes[3]);
        let port = u16::from_be_bytes([bytes[4], bytes[5]]);
        Some(SocketAddr::new(IpAddr::V4(ip), port).into())
    }

    /// Parses a peer from compact IPv6 format: 16 bytes IP + 2 bytes port (big-endian).
    pub fn from_compact_v6(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < COMPACT_V6_LEN {
            return None;
        }
        let mut ip_bytes = [0u8; 16];
        ip_bytes.copy_from_slice(&bytes[..16]);
        let ip = Ipv6Addr::from(ip_bytes);
        let port = u16::from_be_bytes([bytes[16], bytes[17]]);
        Some(SocketAddr::new(IpAddr::V6(ip), port).into())
    }
}

impl From<SocketAddr> for PeerAddress {
    fn from(addr: SocketAddr) -> Self {
        Self {
            host: addr.ip().to_string(),
            port: addr.port(),
        }
    }
}

impl fmt::Display for PeerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

impl ToSocketAddrs for PeerAddress {
    type Iter = vec::IntoIter<SocketAddr>;

    fn to_socket_addrs(&self) -> io::Result<Self::Iter> {
        (self.host.as_str(), self.port).to_socket_addrs()
    }
}

/// Parses a BEP-23 compact IPv4 peer list.
pub fn parse_compact_peers(data: &[u8]) -> Result<Vec<PeerAddress>, TrackerError> {
    parse_compact(data, COMPACT_V4_LEN, PeerAddress::from_compact_v4)
}

/// Parses a BEP-7 compact IPv6 peer list (`peers6`).
pub fn parse_compact_peers_v6(data: &[u8]) -> Result<Vec<PeerAddress>, TrackerError> {
    parse_compact(data, COMPACT_V6_LEN, PeerAddress::from_compact_v6)
}

fn parse_compact(
    data: &[u8],
    entry_len: usize,
    parse: fn(&[u8]) -> Option<PeerAddress>,
) -> Result<Vec<PeerAddress>, TrackerError> {
    if data.len() % entry_len != 0 {
        return Err(TrackerError::InvalidCompactLength {
            len: data.len(),
            entry_len,
        });
    }
    Ok(data.chunks_exact(entry_len).filter_map(parse).collect())
}
