use super::error::{HandshakeField, PeerError};
use super::peer_id::PeerId;
use bytes::{BufMut, Bytes, BytesMut};

/// Protocol name used when none is configured.
pub const DEFAULT_PROTOCOL: &str = "BitTorrent protocol";

/// `pstrlen` byte, reserved bytes, info hash and peer id.
pub const HANDSHAKE_FIXED_LEN: usize = 1 + 8 + 20 + 20;

/// The opening message of a peer connection.
///
/// Layout: `pstrlen | protocol name | reserved (8) | info hash (20) | peer id (20)`,
/// `49 + pstrlen` bytes in total. The name length is variable, so handshakes
/// from clients speaking a private protocol name still parse.
///
/// ```
/// use torrent_wire::peer::{Handshake, DEFAULT_PROTOCOL};
///
/// let hs = Handshake::new([1; 20], [2; 20]);
/// assert_eq!(hs.protocol_name(), DEFAULT_PROTOCOL.as_bytes());
/// assert_eq!(hs.len(), 68);
///
/// let parsed = Handshake::parse(hs.as_bytes().clone()).unwrap();
/// assert_eq!(parsed.info_hash(), [1; 20]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handshake {
    raw: Bytes,
}

impl Handshake {
    /// Builds a handshake with the standard protocol name.
    pub fn new(info_hash: [u8; 20], peer_id: [u8; 20]) -> Self {
        Self::encode(DEFAULT_PROTOCOL.as_bytes(), info_hash, peer_id)
    }

    /// Builds a handshake with a custom protocol name.
    ///
    /// An empty name selects [`DEFAULT_PROTOCOL`]. Names longer than 255 bytes
    /// cannot be expressed in the length byte.
    pub fn with_protocol(
        protocol_name: &[u8],
        info_hash: [u8; 20],
        peer_id: [u8; 20],
    ) -> Result<Self, PeerError> {
        if protocol_name.is_empty() {
            return Ok(Self::new(info_hash, peer_id));
        }
        if protocol_name.len() > u8::MAX as usize {
            return Err(PeerError::ProtocolNameTooLong(protocol_name.len()));
        }
        Ok(Self::encode(protocol_name, info_hash, peer_id))
    }

    fn encode(protocol_name: &[u8], info_hash: [u8; 20], peer_id: [u8; 20]) -> Self {
        let mut buf = BytesMut::with_capacity(HANDSHAKE_FIXED_LEN + protocol_name.len());
        buf.put_u8(protocol_name.len() as u8);
        buf.put_slice(protocol_name);
        buf.put_bytes(0, 8);
        buf.put_slice(&info_hash);
        buf.put_slice(&peer_id);
        Self { raw: buf.freeze() }
    }

    /// Parses a received handshake.
    ///
    /// `raw` must hold at least `49 + pstrlen` bytes; anything after that is
    /// not part of the handshake and is dropped.
    pub fn parse(raw: Bytes) -> Result<Self, PeerError> {
        let Some(&pstrlen) = raw.first() else {
            return Err(PeerError::TruncatedHandshake {
                expected: HANDSHAKE_FIXED_LEN,
                received: 0,
            });
        };

        let expected = HANDSHAKE_FIXED_LEN + pstrlen as usize;
        if raw.len() < expected {
            return Err(PeerError::TruncatedHandshake {
                expected,
                received: raw.len(),
            });
        }

        Ok(Self {
            raw: raw.slice(..expected),
        })
    }

    fn pstrlen(&self) -> usize {
        self.raw[0] as usize
    }

    pub fn protocol_name(&self) -> &[u8] {
        &self.raw[1..1 + self.pstrlen()]
    }

    pub fn reserved(&self) -> [u8; 8] {
        let start = 1 + self.pstrlen();
        array(&self.raw[start..start + 8])
    }

    pub fn info_hash(&self) -> [u8; 20] {
        let start = 9 + self.pstrlen();
        array(&self.raw[start..start + 20])
    }

    pub fn peer_id(&self) -> PeerId {
        let start = 29 + self.pstrlen();
        PeerId(array(&self.raw[start..start + 20]))
    }

    /// The encoded handshake as sent on the wire.
    pub fn as_bytes(&self) -> &Bytes {
        &self.raw
    }

    pub fn len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Checks a remote handshake against this (locally sent) one.
    ///
    /// Only the protocol name and the info hash must match. The remote peer
    /// id is returned to the caller as-is; reserved bits are not compared.
    pub fn verify(&self, remote: &Handshake) -> Result<(), PeerError> {
        if remote.protocol_name() != self.protocol_name() {
            return Err(PeerError::HandshakeMismatch(HandshakeField::ProtocolName));
        }
        if remote.info_hash() != self.info_hash() {
            return Err(PeerError::HandshakeMismatch(HandshakeField::InfoHash));
        }
        Ok(())
    }
}

fn array<const N: usize>(bytes: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(bytes);
    out
}
