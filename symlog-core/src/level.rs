//! Severity classification from the record flags byte.

use std::fmt;

/// Severity of a log record.
///
/// The wire protocol packs a 3-bit level code into bits 1..=3 of the flags
/// byte. Codes 1 through 4 map to the named levels; every other code
/// (including 0) is carried through as [`Level::Code`] and rendered as a
/// generic `LEVEL<n>` label rather than rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
    Code(u8),
}

impl Level {
    /// Classify the level encoded in a record's flags byte.
    pub fn from_flags(flags: u8) -> Level {
        match (flags >> 1) & 0x07 {
            1 => Level::Debug,
            2 => Level::Info,
            3 => Level::Warn,
            4 => Level::Error,
            code => Level::Code(code),
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Debug => write!(f, "DEBUG"),
            Level::Info => write!(f, "INFO"),
            Level::Warn => write!(f, "WARN"),
            Level::Error => write!(f, "ERROR"),
            Level::Code(code) => write!(f, "LEVEL{code}"),
        }
    }
}
