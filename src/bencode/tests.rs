use std::collections::BTreeMap;

use bytes::Bytes;

use super::*;

fn kind_of(data: &[u8]) -> ErrorKind {
    decode(data).unwrap_err().kind()
}

#[test]
fn test_decode_integer() {
    assert_eq!(decode(b"i42e").unwrap(), (Value::Integer(42), 4));
    assert_eq!(decode(b"i-42e").unwrap(), (Value::Integer(-42), 5));
    assert_eq!(decode(b"i0e").unwrap(), (Value::Integer(0), 3));
}

#[test]
fn test_decode_integer_invalid() {
    for data in [&b"i-0e"[..], b"i00e", b"i01e", b"i+0e", b"i0.e", b"ie", b"i-e", b"i12"] {
        assert_eq!(kind_of(data), ErrorKind::InvalidInteger, "{:?}", data);
    }
}

#[test]
fn test_decode_integer_limits() {
    for n in [i64::MIN, -1, 0, 1, i64::MAX] {
        let (value, _) = decode(&encode(&Value::Integer(n))).unwrap();
        assert_eq!(value, Value::Integer(n));
    }

    assert_eq!(kind_of(b"i9223372036854775808e"), ErrorKind::IntegerOverflow);
    assert_eq!(kind_of(b"i-9223372036854775809e"), ErrorKind::IntegerOverflow);
}

#[test]
fn test_decode_bytes() {
    assert_eq!(decode(b"4:spam").unwrap(), (Value::string("spam"), 6));
    assert_eq!(decode(b"0:").unwrap(), (Value::string(""), 2));
    assert_eq!(decode(b"2::a").unwrap(), (Value::string(":a"), 4));
}

#[test]
fn test_decode_bytes_leading_zero_length() {
    assert_eq!(decode(b"02:ab").unwrap(), (Value::string("ab"), 5));
    assert_eq!(decode(b"02::a").unwrap(), (Value::string(":a"), 5));
}

#[test]
fn test_decode_bytes_binary() {
    let (value, _) = decode(b"3:\x00\xff\x13").unwrap();
    assert_eq!(value.as_bytes().unwrap().as_ref(), &[0x00, 0xff, 0x13]);
    assert_eq!(value.as_str(), None);
}

#[test]
fn test_decode_bytes_invalid() {
    assert_eq!(kind_of(b"2!:abc"), ErrorKind::InvalidStringLength);
    assert_eq!(kind_of(b"10$:a"), ErrorKind::InvalidStringLength);
    assert_eq!(kind_of(b"5"), ErrorKind::InvalidStringLength);
    assert_eq!(kind_of(b"5:abc"), ErrorKind::StringLengthExceedsInput);
    assert_eq!(kind_of(b"-1:a"), ErrorKind::UnexpectedChar);
    assert_eq!(
        kind_of(b"99999999999999999999999:a"),
        ErrorKind::InvalidStringLength
    );
}

#[test]
fn test_decode_list() {
    let (value, consumed) = decode(b"l4:spam4:eggse").unwrap();
    assert_eq!(consumed, 14);
    assert_eq!(
        value,
        Value::List(vec![Value::string("spam"), Value::string("eggs")])
    );

    assert_eq!(decode(b"le").unwrap(), (Value::List(vec![]), 2));
}

#[test]
fn test_decode_list_unterminated() {
    assert_eq!(kind_of(b"l4:spam"), ErrorKind::UnterminatedList);
    assert_eq!(kind_of(b"l"), ErrorKind::UnterminatedList);
    assert_eq!(kind_of(b"lli1ee"), ErrorKind::UnterminatedList);
}

#[test]
fn test_decode_dict() {
    let (value, consumed) = decode(b"d3:cow3:moo4:spam4:eggse").unwrap();
    assert_eq!(consumed, 24);

    let dict = value.as_dict().unwrap();
    assert_eq!(dict.len(), 2);
    assert_eq!(value.get(b"cow"), Some(&Value::string("moo")));
    assert_eq!(value.get(b"spam"), Some(&Value::string("eggs")));
}

#[test]
fn test_decode_dict_errors() {
    assert_eq!(kind_of(b"di3ei4ee"), ErrorKind::NonStringKey);
    assert_eq!(kind_of(b"dl1:ae1:be"), ErrorKind::NonStringKey);
    assert_eq!(kind_of(b"d3:cow3:moo"), ErrorKind::UnterminatedDict);
    assert_eq!(kind_of(b"d3:cow"), ErrorKind::UnterminatedDict);
    assert_eq!(kind_of(b"d"), ErrorKind::UnterminatedDict);
    assert_eq!(kind_of(b"d1:ai1e1:ai2ee"), ErrorKind::DuplicateKey);
}

#[test]
fn test_decode_dispatch_errors() {
    assert_eq!(kind_of(b""), ErrorKind::EmptyInput);
    assert_eq!(kind_of(b"x2:abc"), ErrorKind::UnexpectedChar);
    assert_eq!(kind_of(b"e"), ErrorKind::UnexpectedChar);
}

#[test]
fn test_decode_nested_error_reports_inner_offset() {
    let data = b"d4:listli1ei01eee";
    let err = decode(data).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInteger);
    assert_eq!(err.offset(), 12);
    assert!(err.context().starts_with("01e"));
}

#[test]
fn test_decode_nesting_limit() {
    let mut deep = vec![b'l'; 100];
    deep.extend(vec![b'e'; 100]);
    assert_eq!(kind_of(&deep), ErrorKind::NestingTooDeep);

    let mut shallow = vec![b'l'; 32];
    shallow.extend(vec![b'e'; 32]);
    assert!(decode(&shallow).is_ok());
}

#[test]
fn test_decode_leaves_trailing_data() {
    let (value, consumed) = decode(b"i42eextra").unwrap();
    assert_eq!(value, Value::Integer(42));
    assert_eq!(consumed, 4);
}

#[test]
fn test_decode_exact_rejects_trailing_data() {
    let err = decode_exact(b"i42eextra").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TrailingData);
    assert_eq!(err.offset(), 4);

    assert_eq!(decode_exact(b"i42e").unwrap(), Value::Integer(42));
}

#[test]
fn test_node_spans() {
    let data = b"d1:ali1e2:abe1:bd1:ci-7eee";
    let root = decode_node(data).unwrap();
    assert_eq!(root.span, 0..data.len());

    let list = root.get(b"a").unwrap();
    assert_eq!(list.raw(data), Some(&b"li1e2:abe"[..]));
    assert_eq!(list.as_list().unwrap()[1].raw(data), Some(&b"2:ab"[..]));

    let inner = root.get(b"b").unwrap();
    assert_eq!(inner.raw(data), Some(&b"d1:ci-7ee"[..]));
    assert_eq!(inner.get(b"c").and_then(Node::as_integer), Some(-7));

    // A buffer shorter than the span yields nothing rather than panicking.
    assert_eq!(inner.raw(b"d1:b"), None);
}

#[test]
fn test_node_keeps_non_canonical_bytes() {
    // Unsorted keys and a zero-padded length survive in the raw span even
    // though a re-encode would normalise both.
    let data = b"d1:xd1:bi1e1:ai2e1:c02:hiee";
    let root = decode_node(data).unwrap();
    let inner = root.get(b"x").unwrap();

    assert_eq!(inner.raw(data), Some(&b"d1:bi1e1:ai2e1:c02:hie"[..]));
    assert_ne!(Some(encode(&inner.to_value()).as_slice()), inner.raw(data));
}

#[test]
fn test_node_into_value() {
    let data = b"l4:spamd1:ki1eee";
    let node = decode_node(data).unwrap();
    let (value, _) = decode(data).unwrap();
    assert_eq!(node.to_value(), value);
    assert_eq!(Value::from(node), value);
}

#[test]
fn test_encode_integer() {
    assert_eq!(encode(&Value::Integer(42)), b"i42e");
    assert_eq!(encode(&Value::Integer(-42)), b"i-42e");
    assert_eq!(encode(&Value::Integer(0)), b"i0e");
}

#[test]
fn test_encode_bytes() {
    assert_eq!(encode(&Value::Bytes(Bytes::from_static(b"spam"))), b"4:spam");
    assert_eq!(encode(&Value::string("")), b"0:");
}

#[test]
fn test_encode_dict_sorts_keys() {
    let mut dict = BTreeMap::new();
    dict.insert(Bytes::from_static(b"spam"), Value::string("eggs"));
    dict.insert(Bytes::from_static(b"cow"), Value::string("moo"));
    assert_eq!(
        encode(&Value::Dict(dict)),
        b"d3:cow3:moo4:spam4:eggse".as_slice()
    );
}

#[test]
fn test_encode_to_writer() {
    let mut out = Vec::new();
    encode_to(&Value::List(vec![Value::Integer(1)]), &mut out).unwrap();
    assert_eq!(out, b"li1ee");
}

#[test]
fn test_roundtrip() {
    let original = b"d8:announce15:http://test.com4:infod4:name4:test12:piece lengthi16384eee";
    let (decoded, _) = decode(original).unwrap();
    assert_eq!(encode(&decoded), original);
}

#[test]
fn test_value_accessors() {
    let value = Value::Integer(42);
    assert_eq!(value.as_integer(), Some(42));
    assert!(value.as_bytes().is_none());

    let value = Value::from("test");
    assert_eq!(value.as_str(), Some("test"));
    assert!(value.as_integer().is_none());

    let value = Value::List(vec![]);
    assert!(value.as_list().is_some());
    assert!(value.as_dict().is_none());
    assert!(value.into_dict().is_none());
}
