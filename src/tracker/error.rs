use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackerError {
    /// A compact peer list whose length is not a whole number of entries.
    #[error("compact peer list of {len} bytes is not a multiple of {entry_len}")]
    InvalidCompactLength { len: usize, entry_len: usize },
}
