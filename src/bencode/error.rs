use thiserror::Error;

/// The category of a bencode syntax error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ErrorKind {
    #[error("empty input")]
    EmptyInput,

    #[error("unexpected character")]
    UnexpectedChar,

    #[error("invalid integer")]
    InvalidInteger,

    #[error("integer overflow")]
    IntegerOverflow,

    #[error("invalid string length")]
    InvalidStringLength,

    #[error("string length exceeds input")]
    StringLengthExceedsInput,

    #[error("unterminated list")]
    UnterminatedList,

    #[error("unterminated dictionary")]
    UnterminatedDict,

    #[error("dictionary key is not a byte string")]
    NonStringKey,

    #[error("duplicate dictionary key")]
    DuplicateKey,

    #[error("nesting too deep")]
    NestingTooDeep,

    #[error("trailing data after value")]
    TrailingData,
}

/// A bencode syntax error.
///
/// Decoding never consumes input on failure: the caller still holds the
/// original buffer, and `offset` points at the byte where decoding gave up.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at offset {offset} near '{context}'")]
pub struct BencodeError {
    kind: ErrorKind,
    offset: usize,
    context: String,
}

const CONTEXT_LEN: usize = 16;

impl BencodeError {
    pub(crate) fn new(kind: ErrorKind, input: &[u8], offset: usize) -> Self {
        let start = offset.min(input.len());
        let end = (start + CONTEXT_LEN).min(input.len());
        let context = input[start..end].escape_ascii().to_string();
        Self {
            kind,
            offset,
            context,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Byte offset into the original input where the error was detected.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Escaped snippet of the input starting at [`offset`](Self::offset).
    pub fn context(&self) -> &str {
        &self.context
    }
}
