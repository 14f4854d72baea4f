//! Decoding pipeline for the firmware binary log protocol.
//!
//! The firmware emits log events as fixed 25-byte records over a serial
//! transport. Instead of carrying message text, each record carries the
//! memory address of a printf-style format string that lives in a dedicated
//! section of the firmware's debug binary. This crate implements the
//! host-side pipeline that turns that stream back into readable lines:
//!
//! - [`StreamReassembler`] cuts arbitrarily chunked reads into whole frames
//! - [`LogRecord`] decodes one frame under a configured [`ByteOrder`]
//! - [`Level`] classifies severity from the record flags
//! - [`FormatTable`] maps format-string addresses to their recovered text
//! - [`render_message`] resolves and substitutes arguments into the text
//!
//! Everything here is pure computation; transport and object-file I/O live
//! in the `symlog-cli` and `symlog-elf` crates.

mod format;
mod level;
mod reassembly;
mod record;
mod table;

pub use format::{LineLabel, RenderedMessage, render_message, substitute_args};
pub use level::Level;
pub use reassembly::StreamReassembler;
pub use record::{
    ByteOrder, LogRecord, OVERFLOW_EVENT_ID, RECORD_ARG_SLOTS, RECORD_SIZE, RecordError,
};
pub use table::FormatTable;
