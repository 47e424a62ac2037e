use super::error::PeerError;
use bytes::{BufMut, Bytes, BytesMut};
use std::fmt;

/// Size of the big-endian length prefix that starts every frame.
pub const LENGTH_PREFIX_LEN: usize = 4;

/// Peer wire message types.
///
/// `KeepAlive` has no wire id: it is the zero-length frame. Ids outside the
/// base protocol (extensions) are kept as `Unknown` so the frame can still
/// be passed on or ignored without losing stream sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageType {
    Choke,
    Unchoke,
    Interested,
    NotInterested,
    Have,
    Bitfield,
    Request,
    Piece,
    Cancel,
    Port,
    KeepAlive,
    Unknown(u8),
}

impl MessageType {
    pub fn id(self) -> Option<u8> {
        match self {
            MessageType::Choke => Some(0),
            MessageType::Unchoke => Some(1),
            MessageType::Interested => Some(2),
            MessageType::NotInterested => Some(3),
            MessageType::Have => Some(4),
            MessageType::Bitfield => Some(5),
            MessageType::Request => Some(6),
            MessageType::Piece => Some(7),
            MessageType::Cancel => Some(8),
            MessageType::Port => Some(9),
            MessageType::KeepAlive => None,
            MessageType::Unknown(id) => Some(id),
        }
    }
}

impl From<u8> for MessageType {
    fn from(id: u8) -> Self {
        match id {
            0 => MessageType::Choke,
            1 => MessageType::Unchoke,
            2 => MessageType::Interested,
            3 => MessageType::NotInterested,
            4 => MessageType::Have,
            5 => MessageType::Bitfield,
            6 => MessageType::Request,
            7 => MessageType::Piece,
            8 => MessageType::Cancel,
            9 => MessageType::Port,
            other => MessageType::Unknown(other),
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageType::Unknown(id) => write!(f, "Unknown({})", id),
            other => fmt::Debug::fmt(other, f),
        }
    }
}

/// One peer wire message, backed by its complete length-prefixed frame.
///
/// Frame layout: `length (u32 BE) | id (1 byte) | payload (length - 1 bytes)`.
/// A zero length is a keep-alive with neither id nor payload.
///
/// Payload fields are read through typed views ([`as_have`](Self::as_have),
/// [`as_request`](Self::as_request), ...) which slice the frame without copying and
/// check its length before every read.
///
/// ```
/// use torrent_wire::peer::{MessageType, PeerMessage};
///
/// let msg = PeerMessage::request(0, 0, 16384);
/// assert_eq!(msg.kind(), MessageType::Request);
/// assert_eq!(msg.length(), 13);
///
/// let view = msg.as_request().unwrap();
/// assert_eq!(view.index().unwrap(), 0);
/// assert_eq!(view.length().unwrap(), 16384);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerMessage {
    kind: MessageType,
    frame: Bytes,
}

impl PeerMessage {
    /// Wraps a complete frame, length prefix included.
    ///
    /// Bytes past the announced length are not part of this message and are
    /// dropped from the view.
    pub fn from_frame(frame: Bytes) -> Result<Self, PeerError> {
        if frame.len() < LENGTH_PREFIX_LEN {
            return Err(PeerError::TruncatedFrame {
                expected: LENGTH_PREFIX_LEN,
                received: frame.len(),
            });
        }

        let length = u32::from_be_bytes([frame[0], frame[1], frame[2], frame[3]]) as usize;
        let total = LENGTH_PREFIX_LEN + length;
        if frame.len() < total {
            return Err(PeerError::TruncatedFrame {
                expected: total,
                received: frame.len(),
            });
        }

        let kind = if length == 0 {
            MessageType::KeepAlive
        } else {
            MessageType::from(frame[LENGTH_PREFIX_LEN])
        };

        Ok(Self {
            kind,
            frame: frame.slice(..total),
        })
    }

    fn assemble(kind: MessageType, length: u32, fields: &[u32], tail: &[u8]) -> Self {
        let mut buf = BytesMut::with_capacity(LENGTH_PREFIX_LEN + length as usize);
        buf.put_u32(length);
        // Builders only produce wire types, which always carry an id.
        buf.put_u8(kind.id().unwrap_or_default());
        for field in fields {
            buf.put_u32(*field);
        }
        buf.put_slice(tail);
        Self {
            kind,
            frame: buf.freeze(),
        }
    }

    fn fixed(kind: MessageType, fields: &[u32]) -> Self {
        Self::assemble(kind, 1 + 4 * fields.len() as u32, fields, &[])
    }

    fn with_tail(kind: MessageType, fields: &[u32], tail: &[u8]) -> Result<Self, PeerError> {
        let payload_len = 4 * fields.len() + tail.len();
        let length =
            u32::try_from(1 + payload_len).map_err(|_| PeerError::PayloadTooLarge(payload_len))?;
        Ok(Self::assemble(kind, length, fields, tail))
    }

    pub fn keep_alive() -> Self {
        Self {
            kind: MessageType::KeepAlive,
            frame: Bytes::from_static(&[0, 0, 0, 0]),
        }
    }

    pub fn choke() -> Self {
        Self::fixed(MessageType::Choke, &[])
    }

    pub fn unchoke() -> Self {
        Self::fixed(MessageType::Unchoke, &[])
    }

    pub fn interested() -> Self {
        Self::fixed(MessageType::Interested, &[])
    }

    pub fn not_interested() -> Self {
        Self::fixed(MessageType::NotInterested, &[])
    }

    pub fn have(index: u32) -> Self {
        Self::fixed(MessageType::Have, &[index])
    }

    pub fn request(index: u32, begin: u32, length: u32) -> Self {
        Self::fixed(MessageType::Request, &[index, begin, length])
    }

    /// Same layout as a request.
    pub fn cancel(index: u32, begin: u32, length: u32) -> Self {
        Self::fixed(MessageType::Cancel, &[index, begin, length])
    }

    pub fn bitfield(bits: &[u8]) -> Result<Self, PeerError> {
        Self::with_tail(MessageType::Bitfield, &[], bits)
    }

    pub fn piece(index: u32, begin: u32, block: &[u8]) -> Result<Self, PeerError> {
        Self::with_tail(MessageType::Piece, &[index, begin], block)
    }

    /// DHT listen port ([BEP-5](http://bittorrent.org/beps/bep_0005.html)).
    pub fn port(port: u16) -> Self {
        Self::assemble(MessageType::Port, 3, &[], &port.to_be_bytes())
    }

    pub fn kind(&self) -> MessageType {
        self.kind
    }

    /// Wire id, `None` for keep-alives.
    pub fn id(&self) -> Option<u8> {
        self.kind.id()
    }

    /// The length prefix: id plus payload bytes.
    pub fn length(&self) -> u32 {
        (self.frame.len() - LENGTH_PREFIX_LEN) as u32
    }

    /// The full frame, length prefix included.
    pub fn frame(&self) -> &Bytes {
        &self.frame
    }

    pub fn into_frame(self) -> Bytes {
        self.frame
    }

    /// Bytes after the id; empty for keep-alives and id-only messages.
    pub fn payload(&self) -> Bytes {
        if self.frame.len() <= LENGTH_PREFIX_LEN + 1 {
            return Bytes::new();
        }
        self.frame.slice(LENGTH_PREFIX_LEN + 1..)
    }

    fn view(&self, expected: &[MessageType]) -> Result<Payload, PeerError> {
        if !expected.contains(&self.kind) {
            return Err(PeerError::WrongMessageType {
                expected: expected[0],
                actual: self.kind,
            });
        }
        Ok(Payload {
            kind: self.kind,
            bytes: self.payload(),
        })
    }

    pub fn as_have(&self) -> Result<HaveView, PeerError> {
        self.view(&[MessageType::Have]).map(HaveView)
    }

    /// View of a `Request` or `Cancel` payload.
    pub fn as_request(&self) -> Result<RequestView, PeerError> {
        self.view(&[MessageType::Request, MessageType::Cancel])
            .map(RequestView)
    }

    pub fn as_piece(&self) -> Result<PieceView, PeerError> {
        self.view(&[MessageType::Piece]).map(PieceView)
    }

    pub fn as_bitfield(&self) -> Result<BitfieldView, PeerError> {
        self.view(&[MessageType::Bitfield]).map(BitfieldView)
    }

    /// The DHT port carried by a `Port` message.
    pub fn listen_port(&self) -> Result<u16, PeerError> {
        let payload = self.view(&[MessageType::Port])?;
        let bytes = payload.field(0, 2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }
}

#[derive(Debug, Clone)]
struct Payload {
    kind: MessageType,
    bytes: Bytes,
}

impl Payload {
    fn field(&self, offset: usize, len: usize) -> Result<&[u8], PeerError> {
        let needed = offset + len;
        self.bytes
            .get(offset..needed)
            .ok_or(PeerError::MalformedPayload {
                message: self.kind,
                needed,
                actual: self.bytes.len(),
            })
    }

    fn u32_at(&self, offset: usize) -> Result<u32, PeerError> {
        let b = self.field(offset, 4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }
}

/// Typed view of a `Have` payload.
#[derive(Debug, Clone)]
pub struct HaveView(Payload);

impl HaveView {
    pub fn index(&self) -> Result<u32, PeerError> {
        self.0.u32_at(0)
    }
}

/// Typed view of a `Request` or `Cancel` payload.
#[derive(Debug, Clone)]
pub struct RequestView(Payload);

impl RequestView {
    pub fn index(&self) -> Result<u32, PeerError> {
        self.0.u32_at(0)
    }

    pub fn begin(&self) -> Result<u32, PeerError> {
        self.0.u32_at(4)
    }

    pub fn length(&self) -> Result<u32, PeerError> {
        self.0.u32_at(8)
    }
}

/// Typed view of a `Piece` payload.
#[derive(Debug, Clone)]
pub struct PieceView(Payload);

impl PieceView {
    pub fn index(&self) -> Result<u32, PeerError> {
        self.0.u32_at(0)
    }

    pub fn begin(&self) -> Result<u32, PeerError> {
        self.0.u32_at(4)
    }

    /// The block data, sharing the frame's buffer.
    pub fn block(&self) -> Result<Bytes, PeerError> {
        self.0.field(0, 8)?;
        Ok(self.0.bytes.slice(8..))
    }
}

/// Typed view of a `Bitfield` payload.
///
/// Bit 0 is the most significant bit of the first byte.
#[derive(Debug, Clone)]
pub struct BitfieldView(Payload);

impl BitfieldView {
    pub fn is_set(&self, index: usize) -> Result<bool, PeerError> {
        let bits = &self.0.bytes;
        let byte = *bits.get(index / 8).ok_or(PeerError::IndexOutOfRange {
            index,
            len: bits.len() * 8,
        })?;
        Ok((byte >> (7 - index % 8)) & 1 != 0)
    }

    /// Number of addressable bits, including spare bits in the last byte.
    pub fn len(&self) -> usize {
        self.0.bytes.len() * 8
    }

    pub fn is_empty(&self) -> bool {
        self.0.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &Bytes {
        &self.0.bytes
    }
}
