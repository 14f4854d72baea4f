//! The live console session: poll the transport, reassemble frames,
//! decode them, and print rendered lines.

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::sleep;
use std::time::Duration;

use symlog_core::{ByteOrder, FormatTable, LogRecord, StreamReassembler, render_message};

use crate::render::{self, RenderStyle};
use crate::transport::LogTransport;

/// Transport read buffer size.
const READ_CHUNK: usize = 4096;

/// Backoff when a poll returns no bytes.
const IDLE_SLEEP: Duration = Duration::from_millis(1);

/// Session configuration resolved from the command line.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    pub port_name: String,
    pub baud: u32,
    pub binary_path: PathBuf,
    pub byte_order: ByteOrder,
    pub substitute_args: bool,
    pub style: RenderStyle,
}

/// Counters accumulated over a session and reported at the end.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SessionStats {
    pub records: u64,
    pub decode_errors: u64,
}

/// Print the startup banner.
pub fn print_banner() {
    println!();
    println!("╔══════════════════════════════════════════════════════════════════════════════╗");
    println!("║                         UART LOG CONSOLE                                     ║");
    println!("║                    Real-time Log Message Decoder                             ║");
    println!("╚══════════════════════════════════════════════════════════════════════════════╝");
}

/// Print the configuration block, stop instructions, and stream header.
pub fn print_config(config: &ConsoleConfig, format_count: usize) {
    let binary_name = config
        .binary_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| config.binary_path.display().to_string());
    let substitution = if config.substitute_args {
        "enabled"
    } else {
        "disabled"
    };

    println!();
    println!("┌─ Configuration ─────────────────────────────────────────────────────────────┐");
    println!("│  Serial Port  : {:<60} │", config.port_name);
    println!("│  Baud Rate    : {:<60} │", config.baud);
    println!("│  OUT File     : {binary_name:<60} │");
    println!("│  Byte Order   : {:<60} │", config.byte_order.to_string());
    println!("│  Arg Format   : {substitution:<60} │");
    println!("│  Format Strs  : {format_count:<60} │");
    println!("└──────────────────────────────────────────────────────────────────────────────┘");
    println!();
    println!("Press Ctrl+C to stop the console.\n");
    println!("{}", "─".repeat(80));
    println!("{:<12} {:<8} {:<12} MESSAGE", "TIME", "LEVEL", "TIMESTAMP");
    println!("{}", "─".repeat(80));
}

/// Print the end-of-session separator and counters.
pub fn print_summary(stats: &SessionStats) {
    println!("\n{}", "─".repeat(80));
    println!(
        "Console stopped. Records processed: {}, Errors: {}",
        stats.records, stats.decode_errors
    );
}

/// Drive the polling loop until the transport fails or `running` is
/// cleared.
///
/// Rendered lines go to `out`; only sink failures propagate as errors.
/// A transport read failure ends the session with an inline notice, and
/// accumulated counters are returned either way.
pub fn run_session(
    config: &ConsoleConfig,
    transport: &mut dyn LogTransport,
    table: &FormatTable,
    running: &AtomicBool,
    out: &mut dyn Write,
) -> io::Result<SessionStats> {
    let mut reassembler = StreamReassembler::new();
    let mut stats = SessionStats::default();
    let mut chunk = [0u8; READ_CHUNK];

    while running.load(Ordering::SeqCst) {
        let read = match transport.read_chunk(&mut chunk) {
            Ok(read) => read,
            Err(err) => {
                writeln!(out, "\n[ERROR] {err}")?;
                break;
            }
        };

        if read == 0 {
            sleep(IDLE_SLEEP);
            continue;
        }

        reassembler.feed(&chunk[..read]);
        while let Some(frame) = reassembler.next_frame() {
            handle_frame(config, table, &frame, &mut reassembler, &mut stats, out)?;
        }
    }

    Ok(stats)
}

/// Decode one frame and emit its rendered line.
///
/// A structural decode failure counts toward the error tally and drops
/// one leading byte from the accumulator, shifting frame alignment by
/// one. The stream has no sync marker, so this resync is a heuristic.
fn handle_frame(
    config: &ConsoleConfig,
    table: &FormatTable,
    frame: &[u8],
    reassembler: &mut StreamReassembler,
    stats: &mut SessionStats,
    out: &mut dyn Write,
) -> io::Result<()> {
    let record = match LogRecord::decode(frame, config.byte_order) {
        Ok(record) => record,
        Err(err) => {
            log::debug!("record decode failed, shifting alignment: {err}");
            stats.decode_errors += 1;
            reassembler.skip_byte();
            return Ok(());
        }
    };

    stats.records += 1;
    let message = render_message(&record, table, config.substitute_args);
    let line = render::format_line(
        &render::wall_clock_stamp(),
        record.timestamp,
        &message,
        &config.style,
    );
    writeln!(out, "{line}")?;
    if config.style.raw {
        writeln!(out, "{}", render::format_raw_line(frame))?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> ConsoleConfig {
        ConsoleConfig {
            port_name: "test-port".to_string(),
            baud: 115_200,
            binary_path: PathBuf::from("firmware.out"),
            byte_order: ByteOrder::Little,
            substitute_args: true,
            style: RenderStyle {
                color: false,
                raw: false,
            },
        }
    }

    #[test]
    fn test_good_frame_renders_line_and_counts() {
        let config = test_config();
        let table = FormatTable::from_section(0x1000, b"boot done\0");
        let mut reassembler = StreamReassembler::new();
        let mut stats = SessionStats::default();
        let mut out = Vec::new();

        let record = LogRecord {
            timestamp: 1234,
            event_id: 0x1000,
            args: [0; 3],
            arg_count: 0,
            core_id: 0,
            flags: 0x04,
            version: 1,
        };
        let frame = record.encode(ByteOrder::Little);
        handle_frame(&config, &table, &frame, &mut reassembler, &mut stats, &mut out).unwrap();

        assert_eq!(stats.records, 1);
        assert_eq!(stats.decode_errors, 0);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("[    INFO]       1234: boot done"));
    }

    #[test_log::test]
    fn test_short_frame_counts_error_and_shifts_alignment() {
        let config = test_config();
        let table = FormatTable::new();
        let mut reassembler = StreamReassembler::new();
        reassembler.feed(&[0xEE; 10]);
        let mut stats = SessionStats::default();
        let mut out = Vec::new();

        handle_frame(&config, &table, &[0u8; 5], &mut reassembler, &mut stats, &mut out).unwrap();

        assert_eq!(stats.decode_errors, 1);
        assert_eq!(stats.records, 0);
        assert_eq!(reassembler.buffered_len(), 9);
        assert!(out.is_empty());
    }

    #[test]
    fn test_raw_style_appends_hex_dump() {
        let mut config = test_config();
        config.style.raw = true;
        let table = FormatTable::new();
        let mut reassembler = StreamReassembler::new();
        let mut stats = SessionStats::default();
        let mut out = Vec::new();

        let record = LogRecord {
            timestamp: 1,
            event_id: 0x7B,
            args: [0; 3],
            arg_count: 0,
            core_id: 0,
            flags: 0x05,
            version: 1,
        };
        let frame = record.encode(ByteOrder::Little);
        handle_frame(&config, &table, &frame, &mut reassembler, &mut stats, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("           RAW: 01 00 00 00 7B 00 00 00"));
    }
}
