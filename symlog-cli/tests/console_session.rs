//! Session-loop tests driven by a scripted in-memory transport.

use std::collections::VecDeque;
use std::io;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;

use symlog_cli::console::{ConsoleConfig, run_session};
use symlog_cli::render::RenderStyle;
use symlog_cli::transport::{LogTransport, TransportError};
use symlog_core::{ByteOrder, FormatTable, LogRecord, RECORD_SIZE};

/// Replays a fixed list of chunks, then fails the way a detached serial
/// device would. The trailing failure is what ends the session.
struct ScriptedTransport {
    chunks: VecDeque<Vec<u8>>,
}

impl ScriptedTransport {
    fn new(chunks: Vec<Vec<u8>>) -> Self {
        ScriptedTransport {
            chunks: chunks.into(),
        }
    }

    fn remaining(&self) -> usize {
        self.chunks.len()
    }
}

impl LogTransport for ScriptedTransport {
    fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize, TransportError> {
        match self.chunks.pop_front() {
            Some(chunk) => {
                buf[..chunk.len()].copy_from_slice(&chunk);
                Ok(chunk.len())
            }
            None => Err(TransportError::Read(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "script exhausted",
            ))),
        }
    }
}

fn session_config() -> ConsoleConfig {
    ConsoleConfig {
        port_name: "scripted".to_string(),
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

fn info_record(timestamp: u32, event_id: u32, args: [u32; 3], arg_count: u16) -> LogRecord {
    LogRecord {
        timestamp,
        event_id,
        args,
        arg_count,
        core_id: 0,
        flags: 0x04,
        version: 1,
    }
}

#[test]
fn test_session_renders_records_across_chunk_boundaries() {
    let mut table = FormatTable::new();
    table.insert(0x1000, "value=%u ptr=%p".to_string());

    let value_frame = info_record(100, 0x1000, [7, 0x2000, 0], 2).encode(ByteOrder::Little);
    let overflow_frame = LogRecord {
        timestamp: 200,
        event_id: 0xFFFF_FFFF,
        args: [42, 0, 0],
        arg_count: 1,
        core_id: 0,
        flags: 0x08,
        version: 1,
    }
    .encode(ByteOrder::Little);

    // Second frame arrives split mid-record across two reads.
    let mut first_chunk = value_frame.to_vec();
    first_chunk.extend_from_slice(&overflow_frame[..10]);
    let second_chunk = overflow_frame[10..].to_vec();

    let mut transport = ScriptedTransport::new(vec![first_chunk, second_chunk]);
    let config = session_config();
    let running = AtomicBool::new(true);
    let mut out = Vec::new();

    let stats = run_session(&config, &mut transport, &table, &running, &mut out).unwrap();

    assert_eq!(stats.records, 2);
    assert_eq!(stats.decode_errors, 0);

    let text = String::from_utf8(out).unwrap();
    let mut lines = text.lines();
    let value_line = lines.next().unwrap();
    let overflow_line = lines.next().unwrap();
    assert!(value_line.ends_with("[    INFO]        100: value=7 ptr=0x00002000"));
    assert!(overflow_line.ends_with("[OVERFLOW]        200: Buffer overflow detected! Count: 42"));
    assert!(text.contains("[ERROR] serial read failed: script exhausted"));
}

#[test]
fn test_session_survives_misaligned_stream() {
    let table = FormatTable::new();
    let frame = info_record(1, 0x1000, [0; 3], 0).encode(ByteOrder::Little);

    // Lose the first byte of the stream: every cut lands mid-record and
    // decodes as garbage, never as an error or a crash.
    let mut stream = frame[1..].to_vec();
    stream.extend_from_slice(&frame);
    stream.extend_from_slice(&frame);
    let stream_len = stream.len();

    let mut transport = ScriptedTransport::new(vec![stream]);
    let config = session_config();
    let running = AtomicBool::new(true);
    let mut out = Vec::new();

    let stats = run_session(&config, &mut transport, &table, &running, &mut out).unwrap();

    assert_eq!(stats.records as usize, stream_len / RECORD_SIZE);
    assert_eq!(stats.decode_errors, 0);
}

#[test]
fn test_cleared_flag_stops_before_any_read() {
    let table = FormatTable::new();
    let frame = info_record(1, 0x1000, [0; 3], 0).encode(ByteOrder::Little);
    let mut transport = ScriptedTransport::new(vec![frame.to_vec()]);
    let config = session_config();
    let running = AtomicBool::new(false);
    let mut out = Vec::new();

    let stats = run_session(&config, &mut transport, &table, &running, &mut out).unwrap();

    assert_eq!(stats.records, 0);
    assert_eq!(stats.decode_errors, 0);
    assert_eq!(transport.remaining(), 1);
    assert!(out.is_empty());
}

#[test]
fn test_raw_mode_dumps_frame_bytes() {
    let mut config = session_config();
    config.style.raw = true;
    let table = FormatTable::new();

    let frame = info_record(0x7B, 0x10, [0; 3], 0).encode(ByteOrder::Little);
    let mut transport = ScriptedTransport::new(vec![frame.to_vec()]);
    let running = AtomicBool::new(true);
    let mut out = Vec::new();

    run_session(&config, &mut transport, &table, &running, &mut out).unwrap();

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("           RAW: 7B 00 00 00 10 00 00 00"));
}
