use std::fmt;

use rand::Rng as _;

const PEER_ID_PREFIX: &[u8; 8] = b"-TW0001-";

/// A 20-byte peer identifier.
///
/// Generated ids use the Azureus-style layout `-TW0001-<12 random bytes>`.
/// Ids received from remote peers are opaque and may follow any layout.
///
/// ```
/// use torrent_wire::peer::PeerId;
///
/// let id = PeerId::generate();
/// assert_eq!(id.client_id(), Some("TW0001"));
/// assert_eq!(PeerId::from_bytes(id.as_bytes()), Some(id));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PeerId(pub [u8; 20]);

impl PeerId {
    pub fn generate() -> Self {
        let mut id = [0u8; 20];
        id[..8].copy_from_slice(PEER_ID_PREFIX);
        rand::rng().fill(&mut id[8..]);
        Self(id)
    }

    /// Returns `None` unless `bytes` is exactly 20 bytes long.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let id: [u8; 20] = bytes.try_into().ok()?;
        Some(Self(id))
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// The `XXYYYY` part of an Azureus-style `-XXYYYY-` id.
    pub fn client_id(&self) -> Option<&str> {
        if self.0[0] == b'-' && self.0[7] == b'-' {
            std::str::from_utf8(&self.0[1..7]).ok()
        } else {
            None
        }
    }
}

impl From<[u8; 20]> for PeerId {
    fn from(id: [u8; 20]) -> Self {
        Self(id)
    }
}

impl fmt::Debug for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.client_id() {
            Some(client) => write!(f, "PeerId({})", client),
            None => write!(f, "PeerId({:02x?})", &self.0[..8]),
        }
    }
}

/// Printable bytes as-is, everything else percent-escaped.
impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            if byte.is_ascii_alphanumeric() || *byte == b'-' {
                write!(f, "{}", *byte as char)?;
            } else {
                write!(f, "%{:02x}", byte)?;
            }
        }
        Ok(())
    }
}
