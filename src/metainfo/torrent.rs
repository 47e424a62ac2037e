use super::error::MetainfoError;
use super::info_hash::InfoHash;
use crate::bencode::{decode_node, Node};
use bytes::Bytes;
use std::fmt;
use std::io::Read;
use std::path::Path;
use tracing::{trace, warn};

const PIECE_HASH_LEN: usize = 20;

/// What to do with bytes that follow a torrent's top-level dictionary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TrailingData {
    /// Accept silently.
    #[default]
    Ignore,
    /// Accept and log a warning.
    Warn,
    /// Fail with [`MetainfoError::TrailingData`].
    Reject,
}

/// Options for [`Torrent::from_bytes_with`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    pub trailing_data: TrailingData,
}

impl ParseOptions {
    /// Options that reject any trailing bytes.
    pub fn strict() -> Self {
        Self {
            trailing_data: TrailingData::Reject,
        }
    }
}

/// A parsed `.torrent` file.
///
/// # Examples
///
/// ```
/// use torrent_wire::metainfo::Torrent;
///
/// let data = b"d8:announce18:http://tracker.com4:infod6:lengthi3e4:name5:a.txt\
///              12:piece lengthi16384e6:pieces20:aaaaaaaaaaaaaaaaaaaaee";
/// let torrent = Torrent::from_bytes(data).unwrap();
///
/// assert_eq!(torrent.announce.as_deref(), Some("http://tracker.com"));
/// assert_eq!(torrent.info.name, "a.txt");
/// assert_eq!(torrent.info.total_length(), 3);
/// assert_eq!(torrent.info.piece_count(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Torrent {
    /// Primary tracker URL.
    pub announce: Option<String>,
    /// Tracker tiers ([BEP-12](http://bittorrent.org/beps/bep_0012.html)).
    pub announce_list: Vec<Vec<String>>,
    pub info: InfoDict,
}

/// The `info` dictionary of a torrent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoDict {
    /// Suggested file or directory name.
    pub name: String,
    /// Bytes per piece.
    pub piece_length: i64,
    /// Concatenated 20-byte SHA-1 piece hashes.
    pub pieces: Bytes,
    pub payload: Payload,
    raw: Bytes,
}

/// Layout of the torrent's content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    SingleFile { length: i64 },
    MultiFile { files: Vec<FileEntry> },
}

/// A file in a multi-file torrent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub length: i64,
    /// Path components relative to the torrent's root directory.
    pub path: Vec<String>,
}

impl Torrent {
    /// Parses a torrent with default [`ParseOptions`].
    pub fn from_bytes(data: &[u8]) -> Result<Self, MetainfoError> {
        Self::from_bytes_with(data, ParseOptions::default())
    }

    /// Parses a torrent.
    ///
    /// Only the `info` dictionary is required. Every other field that is
    /// absent or of the wrong type falls back to its empty value.
    pub fn from_bytes_with(data: &[u8], options: ParseOptions) -> Result<Self, MetainfoError> {
        let root = decode_node(data)?;

        let consumed = root.span.end;
        if consumed != data.len() {
            match options.trailing_data {
                TrailingData::Ignore => {}
                TrailingData::Warn => warn!(
                    consumed,
                    total = data.len(),
                    "unexpected trailing data after torrent"
                ),
                TrailingData::Reject => {
                    return Err(MetainfoError::TrailingData {
                        consumed,
                        total: data.len(),
                    })
                }
            }
        }

        if root.as_dict().is_none() {
            return Err(MetainfoError::NotADictionary);
        }

        let info_node = root
            .get(b"info")
            .filter(|n| n.as_dict().is_some())
            .ok_or(MetainfoError::MissingInfoDict)?;
        let info = InfoDict::from_node(info_node, data);

        let announce = root.get(b"announce").and_then(node_string);

        let announce_list: Vec<Vec<String>> = root
            .get(b"announce-list")
            .and_then(Node::as_list)
            .map(|tiers| {
                tiers
                    .iter()
                    .filter_map(Node::as_list)
                    .map(|urls| urls.iter().filter_map(node_string).collect())
                    .collect()
            })
            .unwrap_or_default();

        trace!(name = %info.name, info_hash = %info.info_hash(), "parsed torrent");

        Ok(Self {
            announce,
            announce_list,
            info,
        })
    }

    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, MetainfoError> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(&data)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, MetainfoError> {
        let data = std::fs::read(path)?;
        Self::from_bytes(&data)
    }

    /// Returns every tracker URL, `announce` first, without duplicates.
    pub fn trackers(&self) -> Vec<String> {
        let mut trackers = Vec::new();

        if let Some(ref announce) = self.announce {
            trackers.push(announce.clone());
        }

        for tier in &self.announce_list {
            for tracker in tier {
                if !trackers.contains(tracker) {
                    trackers.push(tracker.clone());
                }
            }
        }

        trackers
    }
}

impl InfoDict {
    /// Builds an info dictionary from its decoded node.
    ///
    /// `input` is the buffer `node` was decoded from; the node's span in it
    /// becomes the hashed raw bytes. Missing or mistyped fields default to
    /// zero values.
    pub(crate) fn from_node(node: &Node, input: &[u8]) -> Self {
        let name = node.get(b"name").and_then(node_string).unwrap_or_default();

        let piece_length = node
            .get(b"piece length")
            .and_then(Node::as_integer)
            .unwrap_or_default();

        let pieces = match node.get(b"pieces").and_then(Node::as_bytes) {
            Some(p) if p.len() % PIECE_HASH_LEN == 0 => p.clone(),
            Some(p) => {
                warn!(len = p.len(), "pieces length is not a multiple of 20, ignoring");
                Bytes::new()
            }
            None => Bytes::new(),
        };

        let payload = match node.get(b"files").and_then(Node::as_list) {
            Some(files) => Payload::MultiFile {
                files: files.iter().filter_map(file_entry).collect(),
            },
            None => Payload::SingleFile {
                length: node
                    .get(b"length")
                    .and_then(Node::as_integer)
                    .unwrap_or_default(),
            },
        };

        Self {
            name,
            piece_length,
            pieces,
            payload,
            raw: node
                .raw(input)
                .map(Bytes::copy_from_slice)
                .unwrap_or_default(),
        }
    }

    /// The info dictionary exactly as it appeared in the torrent file.
    pub fn raw_bytes(&self) -> &Bytes {
        &self.raw
    }

    /// SHA-1 of [`raw_bytes`](Self::raw_bytes).
    pub fn hash(&self) -> [u8; 20] {
        self.info_hash().into()
    }

    pub fn info_hash(&self) -> InfoHash {
        InfoHash::of(&self.raw)
    }

    pub fn piece_count(&self) -> usize {
        self.pieces.len() / PIECE_HASH_LEN
    }

    pub fn piece_hash(&self, index: usize) -> Option<[u8; 20]> {
        let start = index.checked_mul(PIECE_HASH_LEN)?;
        let end = start.checked_add(PIECE_HASH_LEN)?;
        let chunk = self.pieces.get(start..end)?;
        chunk.try_into().ok()
    }

    pub fn is_multi_file(&self) -> bool {
        matches!(self.payload, Payload::MultiFile { .. })
    }

    /// Sum of all file lengths.
    pub fn total_length(&self) -> i64 {
        match &self.payload {
            Payload::SingleFile { length } => *length,
            Payload::MultiFile { files } => files.iter().map(|f| f.length).sum(),
        }
    }
}

impl fmt::Display for Torrent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Announce: {}", self.announce.as_deref().unwrap_or(""))?;

        if !self.announce_list.is_empty() {
            writeln!(f, "Announce List:")?;
            for tier in &self.announce_list {
                writeln!(f, "  - {}", tier.join(", "))?;
            }
        }

        let info = &self.info;
        writeln!(f, "Name: {}", info.name)?;
        writeln!(f, "Info Hash: {}", info.info_hash())?;
        writeln!(f, "Piece Length: {}", info.piece_length)?;
        writeln!(
            f,
            "Pieces: {} pieces ({} bytes total)",
            info.piece_count(),
            info.pieces.len()
        )?;

        match &info.payload {
            Payload::SingleFile { length } => writeln!(f, "Single File Length: {} bytes", length),
            Payload::MultiFile { files } => {
                writeln!(f, "Files:")?;
                for file in files {
                    writeln!(f, "  - {} ({} bytes)", file.path.join("/"), file.length)?;
                }
                Ok(())
            }
        }
    }
}

fn file_entry(node: &Node) -> Option<FileEntry> {
    node.as_dict()?;

    let length = node
        .get(b"length")
        .and_then(Node::as_integer)
        .unwrap_or_default();
    let path = node
        .get(b"path")
        .and_then(Node::as_list)
        .map(|parts| parts.iter().filter_map(node_string).collect())
        .unwrap_or_default();

    Some(FileEntry { length, path })
}

fn node_string(node: &Node) -> Option<String> {
    node.as_bytes()
        .map(|b| String::from_utf8_lossy(b).into_owned())
}
