use crate::error::{Error, Result};
use crate::functions::hash_counter::{DEFAULT_TABLE_BITS, MAX_TABLE_BITS};
use crate::utils::rolling_encoder::Window;

/// Window length of the original benchmark query, `GGTATTTTAATTTATAGT`.
pub const DEFAULT_WINDOW: usize = 18;

/// Bucket selection for the counter table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HashKind {
    #[default]
    LowBits,
    Xxh3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub window: usize,
    pub table_bits: u32,
    pub hash: HashKind,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
            table_bits: DEFAULT_TABLE_BITS,
            hash: HashKind::default(),
        }
    }
}

impl Config {
    pub fn with_window(window: usize) -> Self {
        Self { window, ..Self::default() }
    }

    /// Checks the key width and table size before any scanning happens.
    pub fn validate(&self) -> Result<Window> {
        if self.table_bits > MAX_TABLE_BITS {
            return Err(Error::TableTooLarge {
                bits: self.table_bits,
                max: MAX_TABLE_BITS,
            });
        }
        Window::new(self.window)
    }
}
