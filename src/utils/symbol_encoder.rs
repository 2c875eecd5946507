use pulp::Arch;

use crate::error::{Error, Result};

/// Marks a byte outside the alphabet.
pub const INVALID: u8 = 4;
/// Marks a line terminator, skipped during encoding.
pub const FRAMING: u8 = 5;

/// Byte -> 2-bit code. Both cases of A, C, G, T are accepted.
pub static CODES: [u8; 256] = {
    let mut table = [INVALID; 256];
    table[b'A' as usize] = 0; table[b'a' as usize] = 0;
    table[b'C' as usize] = 1; table[b'c' as usize] = 1;
    table[b'G' as usize] = 2; table[b'g' as usize] = 2;
    table[b'T' as usize] = 3; table[b't' as usize] = 3;
    table[b'\n' as usize] = FRAMING;
    table[b'\r' as usize] = FRAMING;
    table
};

const SYMBOLS: [u8; 4] = [b'A', b'C', b'G', b'T'];

#[inline(always)]
pub fn encode_symbol(symbol: u8) -> Option<u8> {
    match CODES[symbol as usize] {
        code @ 0..=3 => Some(code),
        _ => None,
    }
}

#[inline(always)]
pub fn decode_code(code: u8) -> u8 {
    SYMBOLS[(code & 0b11) as usize]
}

/// A fully encoded sequence: one code in `0..=3` per input symbol.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EncodedSeq {
    codes: Vec<u8>,
}

impl EncodedSeq {
    pub fn codes(&self) -> &[u8] {
        &self.codes
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Symbols back as upper-case ASCII.
    pub fn to_symbols(&self) -> Vec<u8> {
        self.codes.iter().map(|&c| decode_code(c)).collect()
    }
}

/// Encodes `raw`, dropping `\n` and `\r`.
///
/// Any other byte outside the alphabet rejects the whole input; the offset
/// reported is the one in `raw`, framing included.
pub fn encode(raw: &[u8]) -> Result<EncodedSeq> {
    let framing = bytecount::count(raw, b'\n') + bytecount::count(raw, b'\r');
    let mut codes = Vec::with_capacity(raw.len() - framing);

    let arch = Arch::new();
    arch.dispatch(|| {
        for (position, &byte) in raw.iter().enumerate() {
            match CODES[byte as usize] {
                FRAMING => continue,
                INVALID => return Err(Error::InvalidSymbol { byte, position }),
                code => codes.push(code),
            }
        }
        Ok(())
    })?;

    Ok(EncodedSeq { codes })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alphabet_is_a_bijection() {
        let codes: Vec<u8> = SYMBOLS.iter().map(|&s| encode_symbol(s).unwrap()).collect();
        assert_eq!(codes, vec![0, 1, 2, 3]);
        for code in 0..4 {
            assert_eq!(encode_symbol(decode_code(code)), Some(code));
        }
    }

    #[test]
    fn lower_case_matches_upper_case() {
        for (&upper, lower) in SYMBOLS.iter().zip(*b"acgt") {
            assert_eq!(encode_symbol(upper), encode_symbol(lower));
        }
    }

    #[test]
    fn everything_else_is_rejected() {
        let accepted = (0..=255u8).filter(|&b| encode_symbol(b).is_some()).count();
        assert_eq!(accepted, 8);
        assert_eq!(encode_symbol(b'N'), None);
        assert_eq!(encode_symbol(b'\n'), None);
    }

    #[test]
    fn line_breaks_are_dropped() {
        let seq = encode(b"AC\nGT\r\nTT\n").unwrap();
        assert_eq!(seq.codes(), &[0, 1, 2, 3, 3, 3]);
        assert_eq!(seq.to_symbols(), b"ACGTTT");
    }

    #[test]
    fn invalid_byte_reports_raw_offset() {
        match encode(b"ACG\nTNA") {
            Err(Error::InvalidSymbol { byte, position }) => {
                assert_eq!(byte, b'N');
                assert_eq!(position, 5);
            }
            other => panic!("expected InvalidSymbol, got {other:?}"),
        }
    }

    #[test]
    fn empty_input_is_empty_sequence() {
        let seq = encode(b"").unwrap();
        assert!(seq.is_empty());
        assert_eq!(seq.len(), 0);
    }
}
