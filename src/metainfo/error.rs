use thiserror::Error;

use crate::bencode::BencodeError;

/// Errors that can occur when loading a torrent file.
#[derive(Debug, Error)]
pub enum MetainfoError {
    /// The torrent file contains invalid bencode.
    #[error("bencode error: {0}")]
    Bencode(#[from] BencodeError),

    /// The top-level value is not a dictionary.
    #[error("torrent data is not a dictionary")]
    NotADictionary,

    /// The `info` key is absent or not a dictionary.
    #[error("missing info dictionary")]
    MissingInfoDict,

    /// Bytes follow the top-level value and the parse options reject them.
    #[error("trailing data after torrent: consumed {consumed} of {total} bytes")]
    TrailingData { consumed: usize, total: usize },

    /// A hex info hash is not 40 hex digits.
    #[error("invalid info hash")]
    InvalidInfoHash,

    /// An I/O error occurred while reading the torrent file.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
