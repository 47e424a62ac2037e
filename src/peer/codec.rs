//! Buffer-level framing shared by the blocking and async transports.

use super::error::PeerError;
use super::handshake::{Handshake, HANDSHAKE_FIXED_LEN};
use super::message::{PeerMessage, LENGTH_PREFIX_LEN};
use bytes::{Bytes, BytesMut};

/// Largest frame accepted by default (16 MiB).
pub const DEFAULT_MAX_FRAME_LEN: u32 = 16 * 1024 * 1024;

/// Validates a length prefix against `max_frame_len`, before anything is
/// allocated for the frame body.
pub(crate) fn frame_length(prefix: [u8; 4], max_frame_len: u32) -> Result<usize, PeerError> {
    let length = u32::from_be_bytes(prefix);
    if length > max_frame_len {
        return Err(PeerError::FrameTooLarge {
            length,
            max: max_frame_len,
        });
    }
    Ok(length as usize)
}

/// Splits one complete frame off the front of `buf`.
///
/// Returns `Ok(None)` when more bytes are needed; in that case `buf` is left
/// untouched apart from reserving room for the rest of the frame.
pub fn decode_frame(
    buf: &mut BytesMut,
    max_frame_len: u32,
) -> Result<Option<PeerMessage>, PeerError> {
    if buf.len() < LENGTH_PREFIX_LEN {
        return Ok(None);
    }

    let length = frame_length([buf[0], buf[1], buf[2], buf[3]], max_frame_len)?;
    let total = LENGTH_PREFIX_LEN + length;
    if buf.len() < total {
        buf.reserve(total - buf.len());
        return Ok(None);
    }

    PeerMessage::from_frame(buf.split_to(total).freeze()).map(Some)
}

/// Splits one complete handshake off the front of `buf`.
pub fn decode_handshake(buf: &mut BytesMut) -> Result<Option<Handshake>, PeerError> {
    let Some(&pstrlen) = buf.first() else {
        return Ok(None);
    };

    let total = HANDSHAKE_FIXED_LEN + pstrlen as usize;
    if buf.len() < total {
        return Ok(None);
    }

    Handshake::parse(buf.split_to(total).freeze()).map(Some)
}

/// Concatenates the frames of `messages` into one buffer, so a batch goes out
/// in a single write.
pub fn encode_frames(messages: &[PeerMessage]) -> Bytes {
    match messages {
        [single] => single.frame().clone(),
        _ => {
            let total = messages.iter().map(|m| m.frame().len()).sum();
            let mut buf = BytesMut::with_capacity(total);
            for message in messages {
                buf.extend_from_slice(message.frame());
            }
            buf.freeze()
        }
    }
}

/// Size of the frame whose bytes are buffered in `buf`, as far as it is known.
pub(crate) fn pending_frame_len(buf: &[u8]) -> usize {
    match buf {
        [a, b, c, d, ..] => LENGTH_PREFIX_LEN + u32::from_be_bytes([*a, *b, *c, *d]) as usize,
        _ => LENGTH_PREFIX_LEN,
    }
}

/// Size of the handshake whose bytes are buffered in `buf`, as far as it is known.
pub(crate) fn pending_handshake_len(buf: &[u8]) -> usize {
    HANDSHAKE_FIXED_LEN + buf.first().map_or(0, |&pstrlen| pstrlen as usize)
}
