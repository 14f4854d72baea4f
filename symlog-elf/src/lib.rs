//! Debug-binary access for the symlog console.
//!
//! The firmware build places every log format string in a dedicated
//! `.log_fmt` section of the output ELF, keyed on the wire by the string's
//! link-time address. This crate opens that binary and recovers the
//! address-to-string table the decoding pipeline needs.

mod loader;

pub use loader::{LOG_FMT_SECTION, SymbolFileError, load_format_table};
