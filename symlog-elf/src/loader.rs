//! Format-table extraction from the firmware debug binary.

use std::fmt;
use std::path::{Path, PathBuf};

use object::{Object, ObjectSection};
use symlog_core::FormatTable;

/// Linker section holding the firmware's log format strings.
///
/// The name is shared with the firmware-side linker script; both sides must
/// agree for address lookups to resolve.
pub const LOG_FMT_SECTION: &str = ".log_fmt";

/// Error type for debug-binary loading
#[derive(Debug)]
pub enum SymbolFileError {
    /// The file could not be read
    Io(PathBuf, std::io::Error),
    /// The file is not a parseable object file
    Parse(PathBuf, object::read::Error),
}

impl fmt::Display for SymbolFileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolFileError::Io(path, err) => {
                write!(f, "failed to read {}: {err}", path.display())
            }
            SymbolFileError::Parse(path, err) => {
                write!(f, "failed to parse {} as an object file: {err}", path.display())
            }
        }
    }
}

impl std::error::Error for SymbolFileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SymbolFileError::Io(_, err) => Some(err),
            SymbolFileError::Parse(_, err) => Some(err),
        }
    }
}

/// Load the format table from a firmware debug binary.
///
/// A missing `.log_fmt` section is a degraded outcome, not an error: a
/// warning is logged and an empty table is returned, so the session runs
/// with numeric fallback rendering. An unreadable or unparseable file is
/// an error; without the binary there is no table to build at all.
///
/// Section addresses are truncated to 32 bits to match the wire protocol's
/// event-id width; the firmware targets are 32-bit parts.
pub fn load_format_table(path: &Path) -> Result<FormatTable, SymbolFileError> {
    let data = std::fs::read(path).map_err(|e| SymbolFileError::Io(path.to_path_buf(), e))?;
    let file =
        object::File::parse(&*data).map_err(|e| SymbolFileError::Parse(path.to_path_buf(), e))?;

    let Some(section) = file.section_by_name(LOG_FMT_SECTION) else {
        log::warn!(
            "{LOG_FMT_SECTION} section not found in {}; messages will show as raw event ids",
            path.display()
        );
        return Ok(FormatTable::new());
    };

    let base_addr = section.address() as u32;
    let content = section
        .data()
        .map_err(|e| SymbolFileError::Parse(path.to_path_buf(), e))?;

    let table = FormatTable::from_section(base_addr, content);
    log::debug!(
        "loaded {} format strings from {} (base address {base_addr:#010x})",
        table.len(),
        path.display()
    );
    Ok(table)
}
