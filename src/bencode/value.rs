use bytes::Bytes;
use std::collections::BTreeMap;

/// A decoded bencode value.
///
/// Byte strings are raw bytes: torrent files routinely carry binary data
/// (piece hashes, compact peer lists) in the same type as UTF-8 names.
///
/// # Examples
///
/// ```
/// use torrent_wire::bencode::Value;
///
/// let name: Value = "ubuntu.iso".into();
/// assert_eq!(name.as_str(), Some("ubuntu.iso"));
///
/// let length = Value::Integer(4096);
/// assert_eq!(length.as_integer(), Some(4096));
/// assert_eq!(length.as_str(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Integer(i64),
    Bytes(Bytes),
    List(Vec<Value>),
    /// Keys are unique; encoding emits them in sorted order.
    Dict(BTreeMap<Bytes, Value>),
}

impl Value {
    /// Creates a byte string value from UTF-8 text.
    pub fn string(s: &str) -> Self {
        Value::Bytes(Bytes::copy_from_slice(s.as_bytes()))
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Returns the byte string as text, or `None` if it is not valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Bytes(b) => std::str::from_utf8(b).ok(),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&BTreeMap<Bytes, Value>> {
        match self {
            Value::Dict(d) => Some(d),
            _ => None,
        }
    }

    pub fn into_dict(self) -> Option<BTreeMap<Bytes, Value>> {
        match self {
            Value::Dict(d) => Some(d),
            _ => None,
        }
    }

    /// Looks up `key` if this value is a dictionary.
    ///
    /// ```
    /// use torrent_wire::bencode::decode;
    ///
    /// let (value, _) = decode(b"d4:porti6881ee").unwrap();
    /// assert_eq!(value.get(b"port").and_then(|v| v.as_integer()), Some(6881));
    /// assert!(value.get(b"ip").is_none());
    /// ```
    pub fn get(&self, key: &[u8]) -> Option<&Value> {
        self.as_dict()?.get(key)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<&[u8]> for Value {
    fn from(b: &[u8]) -> Self {
        Value::Bytes(Bytes::copy_from_slice(b))
    }
}

impl From<Bytes> for Value {
    fn from(b: Bytes) -> Self {
        Value::Bytes(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(l: Vec<Value>) -> Self {
        Value::List(l)
    }
}

impl From<BTreeMap<Bytes, Value>> for Value {
    fn from(d: BTreeMap<Bytes, Value>) -> Self {
        Value::Dict(d)
    }
}
