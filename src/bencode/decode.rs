use super::error::{BencodeError, ErrorKind};
use super::node::{Node, NodeKind};
use super::value::Value;
use bytes::Bytes;
use std::collections::BTreeMap;

const MAX_DEPTH: usize = 64;

/// Decodes one value from the front of `data`.
///
/// Returns the value and the number of bytes it occupied; anything after
/// that is left for the caller. On error nothing is consumed.
///
/// ```
/// use torrent_wire::bencode::{decode, Value};
///
/// let (value, consumed) = decode(b"4:spami1e").unwrap();
/// assert_eq!(value, Value::string("spam"));
/// assert_eq!(consumed, 6);
/// ```
pub fn decode(data: &[u8]) -> Result<(Value, usize), BencodeError> {
    let node = decode_node(data)?;
    let consumed = node.span.end;
    Ok((node.into(), consumed))
}

/// Decodes exactly one value spanning all of `data`.
pub fn decode_exact(data: &[u8]) -> Result<Value, BencodeError> {
    let (value, consumed) = decode(data)?;
    if consumed != data.len() {
        return Err(BencodeError::new(ErrorKind::TrailingData, data, consumed));
    }
    Ok(value)
}

/// Decodes one value from the front of `data`, keeping the byte span of
/// every node in the tree.
pub fn decode_node(data: &[u8]) -> Result<Node, BencodeError> {
    if data.is_empty() {
        return Err(BencodeError::new(ErrorKind::EmptyInput, data, 0));
    }
    let mut pos = 0;
    decode_value(data, &mut pos, 0)
}

fn decode_value(data: &[u8], pos: &mut usize, depth: usize) -> Result<Node, BencodeError> {
    if depth > MAX_DEPTH {
        return Err(BencodeError::new(ErrorKind::NestingTooDeep, data, *pos));
    }

    match data.get(*pos) {
        Some(b'i') => decode_integer(data, pos),
        Some(b'l') => decode_list(data, pos, depth),
        Some(b'd') => decode_dict(data, pos, depth),
        Some(b'0'..=b'9') => decode_bytes(data, pos),
        Some(_) => Err(BencodeError::new(ErrorKind::UnexpectedChar, data, *pos)),
        None => Err(BencodeError::new(ErrorKind::EmptyInput, data, *pos)),
    }
}

fn decode_integer(data: &[u8], pos: &mut usize) -> Result<Node, BencodeError> {
    let start = *pos;
    let mut end = start + 1;

    let negative = data.get(end) == Some(&b'-');
    if negative {
        end += 1;
    }

    let digits_start = end;
    while end < data.len() && data[end].is_ascii_digit() {
        end += 1;
    }
    let digits = &data[digits_start..end];

    // Anything but the terminator here, '+' and '.' included, is malformed.
    if data.get(end) != Some(&b'e') {
        return Err(BencodeError::new(ErrorKind::InvalidInteger, data, end));
    }
    if digits.is_empty() {
        return Err(BencodeError::new(ErrorKind::InvalidInteger, data, start));
    }
    if digits[0] == b'0' && (negative || digits.len() > 1) {
        return Err(BencodeError::new(ErrorKind::InvalidInteger, data, digits_start));
    }

    let text = std::str::from_utf8(&data[start + 1..end])
        .map_err(|_| BencodeError::new(ErrorKind::InvalidInteger, data, start))?;
    // The text is a validated digit run, so the only failure left is range.
    let value: i64 = text
        .parse()
        .map_err(|_| BencodeError::new(ErrorKind::IntegerOverflow, data, start))?;

    *pos = end + 1;
    Ok(Node {
        kind: NodeKind::Integer(value),
        span: start..*pos,
    })
}

fn decode_bytes(data: &[u8], pos: &mut usize) -> Result<Node, BencodeError> {
    let start = *pos;
    let mut colon = start;
    while colon < data.len() && data[colon].is_ascii_digit() {
        colon += 1;
    }

    if colon == start || data.get(colon) != Some(&b':') {
        return Err(BencodeError::new(ErrorKind::InvalidStringLength, data, colon));
    }

    // Leading zeros in the length are accepted: "02:ab" is a 2-byte string.
    let len: usize = std::str::from_utf8(&data[start..colon])
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| BencodeError::new(ErrorKind::InvalidStringLength, data, start))?;

    let body = colon + 1;
    if data.len() - body < len {
        return Err(BencodeError::new(
            ErrorKind::StringLengthExceedsInput,
            data,
            body,
        ));
    }

    *pos = body + len;
    Ok(Node {
        kind: NodeKind::Bytes(Bytes::copy_from_slice(&data[body..*pos])),
        span: start..*pos,
    })
}

fn decode_list(data: &[u8], pos: &mut usize, depth: usize) -> Result<Node, BencodeError> {
    let start = *pos;
    let mut cursor = start + 1;
    let mut list = Vec::new();

    loop {
        match data.get(cursor) {
            None => return Err(BencodeError::new(ErrorKind::UnterminatedList, data, start)),
            Some(b'e') => break,
            Some(_) => list.push(decode_value(data, &mut cursor, depth + 1)?),
        }
    }

    *pos = cursor + 1;
    Ok(Node {
        kind: NodeKind::List(list),
        span: start..*pos,
    })
}

fn decode_dict(data: &[u8], pos: &mut usize, depth: usize) -> Result<Node, BencodeError> {
    let start = *pos;
    let mut cursor = start + 1;
    let mut dict = BTreeMap::new();

    loop {
        match data.get(cursor) {
            None => return Err(BencodeError::new(ErrorKind::UnterminatedDict, data, start)),
            Some(b'e') => break,
            Some(b'0'..=b'9') => {}
            Some(_) => return Err(BencodeError::new(ErrorKind::NonStringKey, data, cursor)),
        }

        let key_offset = cursor;
        let key = match decode_bytes(data, &mut cursor)?.kind {
            NodeKind::Bytes(key) => key,
            _ => return Err(BencodeError::new(ErrorKind::NonStringKey, data, key_offset)),
        };

        if cursor >= data.len() {
            return Err(BencodeError::new(ErrorKind::UnterminatedDict, data, start));
        }
        let value = decode_value(data, &mut cursor, depth + 1)?;

        if dict.insert(key, value).is_some() {
            return Err(BencodeError::new(ErrorKind::DuplicateKey, data, key_offset));
        }
    }

    *pos = cursor + 1;
    Ok(Node {
        kind: NodeKind::Dict(dict),
        span: start..*pos,
    })
}
