use crate::error::{Error, Result};
use crate::utils::symbol_encoder::decode_code;

const BITS_PER_BASE: usize = 2;
const KEY_BITS: u32 = u64::BITS;

/// Window length in symbols. A key must fit in a u64, so at most 32.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Window(usize);

impl Window {
    pub const MAX: usize = KEY_BITS as usize / BITS_PER_BASE;

    pub fn new(len: usize) -> Result<Self> {
        if len == 0 {
            return Err(Error::EmptyWindow);
        }
        if len > Self::MAX {
            return Err(Error::WindowTooWide { len, max_bits: KEY_BITS });
        }
        Ok(Self(len))
    }

    #[inline(always)]
    pub fn len(self) -> usize {
        self.0
    }

    /// Number of windows in a sequence of `n` symbols.
    pub fn count_in(self, n: usize) -> usize {
        (n + 1).saturating_sub(self.0)
    }
}

/// A rolling window key using 2 bits per symbol, first symbol most significant.
#[derive(Debug, Clone, Copy)]
pub struct RollingKey {
    code: u64,
    mask: u64, // lower 2*(k-1) bits, cleared of the outgoing symbol before the shift
}

impl RollingKey {
    /// Folds the first `window` codes of `codes`.
    /// Returns None if there are fewer codes than the window needs.
    #[inline(always)]
    pub fn new(codes: &[u8], window: Window) -> Option<Self> {
        let k = window.len();
        if codes.len() < k {
            return None;
        }
        let mask = (1u64 << (BITS_PER_BASE * (k - 1))) - 1;
        Some(Self { code: pack(&codes[..k]), mask })
    }

    /// Drops the leftmost symbol and appends `code` on the right.
    #[inline(always)]
    pub fn roll(&mut self, code: u8) {
        self.code = ((self.code & self.mask) << BITS_PER_BASE) | code as u64;
    }

    #[inline(always)]
    pub fn key(&self) -> u64 {
        self.code
    }
}

/// Packs every code from scratch. O(len); the scanner only uses it for the first window.
#[inline(always)]
pub fn pack(codes: &[u8]) -> u64 {
    codes
        .iter()
        .fold(0u64, |key, &c| (key << BITS_PER_BASE) | c as u64)
}

pub fn unpack(key: u64, window: Window) -> Vec<u8> {
    (0..window.len())
        .rev()
        .map(|i| decode_code((key >> (BITS_PER_BASE * i)) as u8))
        .collect()
}

/// Keys of every window of `codes`, left to right.
pub struct WindowKeys<'a> {
    rest: std::slice::Iter<'a, u8>,
    current: Option<RollingKey>,
    started: bool,
}

impl<'a> WindowKeys<'a> {
    pub fn new(codes: &'a [u8], window: Window) -> Self {
        let current = RollingKey::new(codes, window);
        let rest = match current {
            Some(_) => codes[window.len()..].iter(),
            None => codes[..0].iter(),
        };
        Self { rest, current, started: false }
    }
}

impl Iterator for WindowKeys<'_> {
    type Item = u64;

    #[inline(always)]
    fn next(&mut self) -> Option<u64> {
        let rolling = self.current.as_mut()?;
        if !self.started {
            self.started = true;
            return Some(rolling.key());
        }
        let &code = self.rest.next()?;
        rolling.roll(code);
        Some(rolling.key())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = match self.current {
            None => 0,
            Some(_) => self.rest.len() + usize::from(!self.started),
        };
        (n, Some(n))
    }
}

impl ExactSizeIterator for WindowKeys<'_> {}
