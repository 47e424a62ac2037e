use super::value::Value;
use std::io::{self, Write};

/// Encodes a value in canonical form.
///
/// Integers use their shortest decimal form, strings carry an exact length
/// prefix and dictionary keys are written in sorted order. Bytes that were
/// decoded from somewhere else should be reused as-is instead of being
/// re-encoded: a third-party producer may not have been canonical.
///
/// ```
/// use torrent_wire::bencode::{encode, Value};
///
/// let list = Value::List(vec![Value::string("spam"), Value::Integer(-3)]);
/// assert_eq!(encode(&list), b"l4:spami-3ee");
/// ```
pub fn encode(value: &Value) -> Vec<u8> {
    let mut buf = Vec::new();
    encode_value(value, &mut buf);
    buf
}

/// Writes the canonical encoding of `value` into `writer`.
pub fn encode_to<W: Write>(value: &Value, writer: &mut W) -> io::Result<()> {
    writer.write_all(&encode(value))
}

fn encode_value(value: &Value, buf: &mut Vec<u8>) {
    match value {
        Value::Integer(i) => {
            buf.push(b'i');
            buf.extend_from_slice(i.to_string().as_bytes());
            buf.push(b'e');
        }
        Value::Bytes(b) => encode_bytes(b, buf),
        Value::List(l) => {
            buf.push(b'l');
            for item in l {
                encode_value(item, buf);
            }
            buf.push(b'e');
        }
        Value::Dict(d) => {
            buf.push(b'd');
            for (key, val) in d {
                encode_bytes(key, buf);
                encode_value(val, buf);
            }
            buf.push(b'e');
        }
    }
}

fn encode_bytes(bytes: &[u8], buf: &mut Vec<u8>) {
    buf.extend_from_slice(bytes.len().to_string().as_bytes());
    buf.push(b':');
    buf.extend_from_slice(bytes);
}
