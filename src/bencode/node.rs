use super::value::Value;
use bytes::Bytes;
use std::collections::BTreeMap;
use std::ops::Range;

/// A decoded value together with the exact bytes it was decoded from.
///
/// Every node, not only dictionaries, records its `[start, end)` span in the
/// input buffer, delimiters included. Slicing the input with the span yields
/// the producer's original encoding, which is what must be hashed when the
/// encoding identifies something (the info dictionary of a torrent).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Range<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Integer(i64),
    Bytes(Bytes),
    List(Vec<Node>),
    Dict(BTreeMap<Bytes, Node>),
}

impl Node {
    /// Returns the original encoding of this node.
    ///
    /// `input` should be the buffer this node was decoded from; `None` if the
    /// span does not fit in it.
    pub fn raw<'a>(&self, input: &'a [u8]) -> Option<&'a [u8]> {
        input.get(self.span.clone())
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self.kind {
            NodeKind::Integer(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&Bytes> {
        match &self.kind {
            NodeKind::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Node]> {
        match &self.kind {
            NodeKind::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&BTreeMap<Bytes, Node>> {
        match &self.kind {
            NodeKind::Dict(d) => Some(d),
            _ => None,
        }
    }

    pub fn get(&self, key: &[u8]) -> Option<&Node> {
        self.as_dict()?.get(key)
    }

    /// Drops the spans, producing a plain [`Value`] tree.
    pub fn to_value(&self) -> Value {
        match &self.kind {
            NodeKind::Integer(i) => Value::Integer(*i),
            NodeKind::Bytes(b) => Value::Bytes(b.clone()),
            NodeKind::List(l) => Value::List(l.iter().map(Node::to_value).collect()),
            NodeKind::Dict(d) => Value::Dict(
                d.iter()
                    .map(|(k, v)| (k.clone(), v.to_value()))
                    .collect(),
            ),
        }
    }
}

impl From<Node> for Value {
    fn from(node: Node) -> Self {
        match node.kind {
            NodeKind::Integer(i) => Value::Integer(i),
            NodeKind::Bytes(b) => Value::Bytes(b),
            NodeKind::List(l) => Value::List(l.into_iter().map(Value::from).collect()),
            NodeKind::Dict(d) => {
                Value::Dict(d.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}
