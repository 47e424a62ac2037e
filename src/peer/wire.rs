//! Blocking peer-wire I/O over any `Read`/`Write` stream.
//!
//! These functions hold no state between calls. Deadlines belong to the
//! stream (`TcpStream::set_read_timeout` and friends); a timed out read
//! surfaces as [`PeerError::Io`].

use super::codec::{self, DEFAULT_MAX_FRAME_LEN};
use super::error::PeerError;
use super::handshake::{Handshake, HANDSHAKE_FIXED_LEN};
use super::message::{PeerMessage, LENGTH_PREFIX_LEN};
use super::peer_id::PeerId;
use bytes::BytesMut;
use std::io::{self, Read, Write};

/// Reads one message, accepting frames up to [`DEFAULT_MAX_FRAME_LEN`].
pub fn read_message<R: Read>(reader: &mut R) -> Result<PeerMessage, PeerError> {
    read_message_with_limit(reader, DEFAULT_MAX_FRAME_LEN)
}

/// Reads one message.
///
/// End of stream before the first byte is [`PeerError::ConnectionClosed`];
/// end of stream anywhere inside the frame is [`PeerError::TruncatedFrame`].
pub fn read_message_with_limit<R: Read>(
    reader: &mut R,
    max_frame_len: u32,
) -> Result<PeerMessage, PeerError> {
    let mut prefix = [0u8; LENGTH_PREFIX_LEN];
    match read_full(reader, &mut prefix)? {
        0 => return Err(PeerError::ConnectionClosed),
        LENGTH_PREFIX_LEN => {}
        received => {
            return Err(PeerError::TruncatedFrame {
                expected: LENGTH_PREFIX_LEN,
                received,
            })
        }
    }

    let length = codec::frame_length(prefix, max_frame_len)?;
    let mut frame = BytesMut::zeroed(LENGTH_PREFIX_LEN + length);
    frame[..LENGTH_PREFIX_LEN].copy_from_slice(&prefix);

    let received = read_full(reader, &mut frame[LENGTH_PREFIX_LEN..])?;
    if received < length {
        return Err(PeerError::TruncatedFrame {
            expected: LENGTH_PREFIX_LEN + length,
            received: LENGTH_PREFIX_LEN + received,
        });
    }

    PeerMessage::from_frame(frame.freeze())
}

/// Writes all frames with one `write_all` and flushes once.
pub fn send_messages<W: Write>(writer: &mut W, messages: &[PeerMessage]) -> Result<(), PeerError> {
    writer.write_all(&codec::encode_frames(messages))?;
    writer.flush()?;
    Ok(())
}

pub fn write_handshake<W: Write>(writer: &mut W, handshake: &Handshake) -> Result<(), PeerError> {
    writer.write_all(handshake.as_bytes())?;
    writer.flush()?;
    Ok(())
}

/// Reads a handshake of any protocol name length.
pub fn read_handshake<R: Read>(reader: &mut R) -> Result<Handshake, PeerError> {
    let mut pstrlen = [0u8; 1];
    if read_full(reader, &mut pstrlen)? == 0 {
        return Err(PeerError::ConnectionClosed);
    }

    let expected = HANDSHAKE_FIXED_LEN + pstrlen[0] as usize;
    let mut raw = BytesMut::zeroed(expected);
    raw[0] = pstrlen[0];

    let received = 1 + read_full(reader, &mut raw[1..])?;
    if received < expected {
        return Err(PeerError::TruncatedHandshake { expected, received });
    }

    Handshake::parse(raw.freeze())
}

/// Performs the initiating side of the handshake.
///
/// Sends ours, flushes, reads theirs, then checks the protocol name and the
/// info hash. The remote handshake is returned so the caller can inspect the
/// peer id and reserved bits.
pub fn handshake<S: Read + Write>(
    stream: &mut S,
    peer_id: PeerId,
    protocol_name: &[u8],
    info_hash: [u8; 20],
) -> Result<Handshake, PeerError> {
    let local = Handshake::with_protocol(protocol_name, info_hash, peer_id.0)?;
    write_handshake(stream, &local)?;

    let remote = read_handshake(stream)?;
    local.verify(&remote)?;
    Ok(remote)
}

/// Fills `buf` unless the stream ends first; returns the bytes read.
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
