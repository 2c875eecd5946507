use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::debug;
use needletail::{parse_fastx_file, parse_fastx_reader};

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputFormat {
    /// Bare symbols, any number per line.
    #[default]
    Raw,
    /// FASTA or FASTQ; record sequences are concatenated.
    Fastx,
}

/// Concatenates every line of `reader`, line terminators dropped.
pub fn read_raw<R: BufRead>(mut reader: R) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut line = Vec::new();
    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            break;
        }
        let end = line
            .iter()
            .rposition(|b| !matches!(b, b'\n' | b'\r'))
            .map_or(0, |i| i + 1);
        buf.extend_from_slice(&line[..end]);
    }
    Ok(buf)
}

/// Concatenates the sequence of every FASTA/FASTQ record in `path`.
pub fn read_fastx(path: &Path) -> Result<Vec<u8>> {
    let mut reader = parse_fastx_file(path)?;
    let mut buf = Vec::new();
    let mut records = 0usize;
    while let Some(record) = reader.next() {
        let record = record?;
        buf.extend_from_slice(&record.seq());
        records += 1;
    }
    debug!("{} records, {} symbols from {}", records, buf.len(), path.display());
    Ok(buf)
}

fn read_fastx_stdin() -> Result<Vec<u8>> {
    let mut reader = parse_fastx_reader(std::io::stdin())?;
    let mut buf = Vec::new();
    while let Some(record) = reader.next() {
        buf.extend_from_slice(&record?.seq());
    }
    Ok(buf)
}

/// Reads the whole input, from `path` or stdin when there is none.
pub fn load(path: Option<&Path>, format: InputFormat) -> Result<Vec<u8>> {
    match (path, format) {
        (Some(path), InputFormat::Raw) => {
            read_raw(BufReader::with_capacity(8 * 1024 * 1024, File::open(path)?))
        }
        (Some(path), InputFormat::Fastx) => read_fastx(path),
        (None, InputFormat::Raw) => read_raw(std::io::stdin().lock()),
        (None, InputFormat::Fastx) => read_fastx_stdin(),
    }
}
