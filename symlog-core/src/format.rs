//! Message rendering: placeholder substitution and fallback synthesis.

use std::fmt;

use crate::level::Level;
use crate::record::LogRecord;
use crate::table::FormatTable;

/// How one placeholder token converts its argument.
#[derive(Debug, Clone, Copy)]
enum Conversion {
    /// Unsigned decimal
    Decimal,
    /// Hexadecimal; `width` is the zero-pad width, 0 for unpadded
    Hex { width: usize, upper: bool },
    /// `0x` followed by 8 lowercase hex digits
    Pointer,
}

/// Recognized placeholder tokens, in catalog order.
///
/// Selection is by leftmost occurrence in the string, not catalog order;
/// the order only breaks position ties (first listed wins).
const PLACEHOLDERS: &[(&str, Conversion)] = &[
    ("%lu", Conversion::Decimal),
    ("%ld", Conversion::Decimal),
    ("%lx", Conversion::Hex { width: 0, upper: false }),
    ("%lX", Conversion::Hex { width: 0, upper: true }),
    ("%u", Conversion::Decimal),
    ("%d", Conversion::Decimal),
    ("%x", Conversion::Hex { width: 0, upper: false }),
    ("%X", Conversion::Hex { width: 0, upper: true }),
    ("%08x", Conversion::Hex { width: 8, upper: false }),
    ("%08X", Conversion::Hex { width: 8, upper: true }),
    ("%04x", Conversion::Hex { width: 4, upper: false }),
    ("%04X", Conversion::Hex { width: 4, upper: true }),
    ("%02x", Conversion::Hex { width: 2, upper: false }),
    ("%02X", Conversion::Hex { width: 2, upper: true }),
    ("%i", Conversion::Decimal),
    ("%p", Conversion::Pointer),
];

/// Substitute up to `arg_count` argument values into a recovered format
/// string.
///
/// One argument is consumed per step: the current string is scanned for
/// every catalog token, the token occurring leftmost is replaced by the
/// formatted argument, and the scan restarts on the new string. The walk
/// stops once `min(arg_count, args.len())` arguments are consumed or no
/// token occurs anywhere; any remaining placeholder text stays verbatim.
///
/// Every step rebuilds the string from the previous one rather than
/// editing in place, so the leftmost-match rule always applies to a
/// well-defined input.
pub fn substitute_args(fmt: &str, args: &[u32], arg_count: usize) -> String {
    let take = arg_count.min(args.len());
    if take == 0 || fmt.is_empty() {
        return fmt.to_string();
    }

    let mut text = fmt.to_string();
    for &value in &args[..take] {
        let Some((pos, token, conversion)) = leftmost_placeholder(&text) else {
            break;
        };
        let mut next = String::with_capacity(text.len() + 8);
        next.push_str(&text[..pos]);
        next.push_str(&format_value(value, conversion));
        next.push_str(&text[pos + token.len()..]);
        text = next;
    }
    text
}

/// Find the catalog token with the smallest occurrence position.
fn leftmost_placeholder(text: &str) -> Option<(usize, &'static str, Conversion)> {
    let mut best: Option<(usize, &'static str, Conversion)> = None;
    for &(token, conversion) in PLACEHOLDERS {
        if let Some(pos) = text.find(token) {
            if best.is_none_or(|(best_pos, _, _)| pos < best_pos) {
                best = Some((pos, token, conversion));
            }
        }
    }
    best
}

fn format_value(value: u32, conversion: Conversion) -> String {
    match conversion {
        Conversion::Decimal => value.to_string(),
        Conversion::Hex { width, upper: false } => format!("{value:0width$x}"),
        Conversion::Hex { width, upper: true } => format!("{value:0width$X}"),
        Conversion::Pointer => format!("0x{value:08x}"),
    }
}

/// Label shown in the level column of a rendered line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineLabel {
    /// Device-side buffer overflow notice
    Overflow,
    /// Ordinary record with a classified severity
    Level(Level),
}

impl fmt::Display for LineLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineLabel::Overflow => write!(f, "OVERFLOW"),
            LineLabel::Level(level) => write!(f, "{level}"),
        }
    }
}

/// A record rendered to text, ready for the output sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMessage {
    pub label: LineLabel,
    pub text: String,
}

/// Render one record against the format table.
///
/// Overflow notices take precedence over all other logic. Format-string
/// events resolve through the table; numeric events, empty tables, and
/// missed lookups produce diagnostic renders that keep the raw identifier
/// and arguments visible instead of failing.
pub fn render_message(record: &LogRecord, table: &FormatTable, substitute: bool) -> RenderedMessage {
    if record.is_overflow() {
        let count = if record.arg_count > 0 { record.args[0] } else { 0 };
        return RenderedMessage {
            label: LineLabel::Overflow,
            text: format!("Buffer overflow detected! Count: {count}"),
        };
    }

    let args = record.valid_args();
    let text = if !record.is_numeric() && !table.is_empty() {
        match table.get(record.event_id) {
            Some(fmt) if substitute && !args.is_empty() => {
                substitute_args(fmt, args, args.len())
            }
            Some(fmt) => fmt.to_string(),
            None => format!("<Unknown Event 0x{:08X}> Args={args:?}", record.event_id),
        }
    } else {
        format!(
            "Event=0x{:08X} Core={} Ver={} Args={args:?}",
            record.event_id, record.core_id, record.version
        )
    };

    RenderedMessage {
        label: LineLabel::Level(Level::from_flags(record.flags)),
        text,
    }
}
