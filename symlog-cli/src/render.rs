//! Console line rendering with optional ANSI color.

use symlog_core::{Level, LineLabel, RenderedMessage};

/// ANSI escape sequences used by the console output.
pub mod colors {
    pub const CYAN: &str = "\x1b[36m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const RED: &str = "\x1b[31m";
    pub const MAGENTA: &str = "\x1b[35m";
    pub const RESET: &str = "\x1b[0m";
}

/// How session output should be rendered.
#[derive(Debug, Clone, Copy)]
pub struct RenderStyle {
    /// Colorize the level field with ANSI escapes
    pub color: bool,
    /// Also dump each raw frame as hex beneath its decoded line
    pub raw: bool,
}

impl RenderStyle {
    /// Resolve the style from the command line and the `NO_COLOR`
    /// convention.
    pub fn detect(no_color_flag: bool, raw: bool) -> Self {
        let color = !no_color_flag && std::env::var_os("NO_COLOR").is_none();
        RenderStyle { color, raw }
    }
}

/// Color assigned to each line label. `Code` levels stay uncolored so
/// unexpected level bits stand out as plain text.
fn label_color(label: &LineLabel) -> &'static str {
    match label {
        LineLabel::Overflow => colors::MAGENTA,
        LineLabel::Level(Level::Debug) => colors::CYAN,
        LineLabel::Level(Level::Info) => colors::GREEN,
        LineLabel::Level(Level::Warn) => colors::YELLOW,
        LineLabel::Level(Level::Error) => colors::RED,
        LineLabel::Level(Level::Code(_)) => "",
    }
}

/// Local wall-clock timestamp for a console line, `HH:MM:SS.mmm`.
pub fn wall_clock_stamp() -> String {
    chrono::Local::now().format("%H:%M:%S%.3f").to_string()
}

/// Format one decoded record as a console line.
///
/// Layout is `{clock} [{label:>8}] {ticks:>10}: {message}`. The label
/// is padded before any color codes are applied so columns stay
/// aligned whether or not color is on.
pub fn format_line(
    clock: &str,
    ticks: u32,
    message: &RenderedMessage,
    style: &RenderStyle,
) -> String {
    let label = format!("{:>8}", message.label.to_string());
    let label = if style.color {
        let color = label_color(&message.label);
        if color.is_empty() {
            label
        } else {
            format!("{color}{label}{}", colors::RESET)
        }
    } else {
        label
    };
    format!("{clock} [{label}] {ticks:>10}: {}", message.text)
}

/// Format a raw frame dump line, indented to sit under its decoded
/// line's message column.
pub fn format_raw_line(frame: &[u8]) -> String {
    let hex: Vec<String> = frame.iter().map(|b| format!("{b:02X}")).collect();
    format!("           RAW: {}", hex.join(" "))
}
