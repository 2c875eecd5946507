use thiserror::Error;

use crate::config::HashKind;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid symbol {byte:#04x} at offset {position}")]
    InvalidSymbol { byte: u8, position: usize },

    #[error("window length must be at least 1")]
    EmptyWindow,

    #[error("window of {len} symbols does not fit in a {max_bits}-bit key")]
    WindowTooWide { len: usize, max_bits: u32 },

    #[error("table of 2^{bits} buckets exceeds the 2^{max} limit")]
    TableTooLarge { bits: u32, max: u32 },

    #[error("configured {configured:?} buckets but the table uses {table:?}")]
    HashMismatch { configured: HashKind, table: HashKind },

    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("fastx: {0}")]
    Fastx(#[from] needletail::errors::ParseError),
}

pub type Result<T> = std::result::Result<T, Error>;
