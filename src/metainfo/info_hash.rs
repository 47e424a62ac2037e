use super::error::MetainfoError;
use sha1::{Digest, Sha1};
use std::fmt;

/// The SHA-1 digest of a torrent's original info dictionary bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct InfoHash([u8; 20]);

impl InfoHash {
    /// Hashes the bencoded info dictionary exactly as given.
    pub fn of(raw_info: &[u8]) -> Self {
        let mut hasher = Sha1::new();
        hasher.update(raw_info);
        Self(hasher.finalize().into())
    }

    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    pub fn from_hex(s: &str) -> Result<Self, MetainfoError> {
        let bytes = hex_decode(s).ok_or(MetainfoError::InvalidInfoHash)?;
        let arr: [u8; 20] = bytes
            .try_into()
            .map_err(|_| MetainfoError::InvalidInfoHash)?;
        Ok(Self(arr))
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex_encode(&self.0)
    }

    /// Percent-encodes every byte, the form trackers expect in the
    /// `info_hash` query parameter.
    pub fn url_encoded(&self) -> String {
        self.0.iter().fold(String::with_capacity(60), |mut s, b| {
            use std::fmt::Write;
            let _ = write!(s, "%{:02X}", b);
            s
        })
    }
}

impl From<InfoHash> for [u8; 20] {
    fn from(hash: InfoHash) -> Self {
        hash.0
    }
}

impl fmt::Debug for InfoHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InfoHash({})", self.to_hex())
    }
}

impl fmt::Display for InfoHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().fold(String::with_capacity(bytes.len() * 2), |mut s, b| {
        use std::fmt::Write;
        let _ = write!(s, "{:02x}", b);
        s
    })
}

fn hex_decode(s: &str) -> Option<Vec<u8>> {
    if s.len() % 2 != 0 || !s.is_ascii() {
        return None;
    }
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&s[i..i + 2], 16).ok())
        .collect()
}
