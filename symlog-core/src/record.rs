//! Wire layout of the 25-byte telemetry record.

use std::fmt;

/// Number of argument slots carried by every record.
pub const RECORD_ARG_SLOTS: usize = 3;

/// Size of one wire record in bytes.
pub const RECORD_SIZE: usize = 25;

/// Reserved `event_id` marking a device-side buffer overflow notification.
pub const OVERFLOW_EVENT_ID: u32 = 0xFFFF_FFFF;

// Field offsets in wire order.
const TIMESTAMP_OFFSET: usize = 0;
const EVENT_ID_OFFSET: usize = TIMESTAMP_OFFSET + 4;
const ARGS_OFFSET: usize = EVENT_ID_OFFSET + 4;
const ARG_COUNT_OFFSET: usize = ARGS_OFFSET + 4 * RECORD_ARG_SLOTS;
const CORE_ID_OFFSET: usize = ARG_COUNT_OFFSET + 2;
const FLAGS_OFFSET: usize = CORE_ID_OFFSET + 1;
const VERSION_OFFSET: usize = FLAGS_OFFSET + 1;

// The field widths must tile the frame exactly.
const _: () = assert!(VERSION_OFFSET + 1 == RECORD_SIZE);

/// Byte order used to decode record fields, fixed for the whole session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ByteOrder {
    #[default]
    Little,
    Big,
}

impl ByteOrder {
    fn read_u32(self, bytes: [u8; 4]) -> u32 {
        match self {
            ByteOrder::Little => u32::from_le_bytes(bytes),
            ByteOrder::Big => u32::from_be_bytes(bytes),
        }
    }

    fn read_u16(self, bytes: [u8; 2]) -> u16 {
        match self {
            ByteOrder::Little => u16::from_le_bytes(bytes),
            ByteOrder::Big => u16::from_be_bytes(bytes),
        }
    }

    fn write_u32(self, value: u32) -> [u8; 4] {
        match self {
            ByteOrder::Little => value.to_le_bytes(),
            ByteOrder::Big => value.to_be_bytes(),
        }
    }

    fn write_u16(self, value: u16) -> [u8; 2] {
        match self {
            ByteOrder::Little => value.to_le_bytes(),
            ByteOrder::Big => value.to_be_bytes(),
        }
    }
}

impl fmt::Display for ByteOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ByteOrder::Little => write!(f, "little-endian"),
            ByteOrder::Big => write!(f, "big-endian"),
        }
    }
}

/// One decoded telemetry record.
///
/// Constructed from a single wire frame, consumed immediately by
/// classification and rendering, and dropped. Nothing in the pipeline holds
/// records across iterations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogRecord {
    /// Device tick count at emission time
    pub timestamp: u32,
    /// Format-string address, opaque id, or [`OVERFLOW_EVENT_ID`]
    pub event_id: u32,
    /// Raw argument slots; content beyond `arg_count` is undefined
    pub args: [u32; RECORD_ARG_SLOTS],
    /// Number of meaningful entries in `args` (clamped to the slot count)
    pub arg_count: u16,
    /// Originating processor core
    pub core_id: u8,
    /// Bit 0: numeric event (1) vs format-string event (0); bits 1..=3: level
    pub flags: u8,
    /// Protocol schema version, informational
    pub version: u8,
}

impl LogRecord {
    /// Decode a single wire frame.
    ///
    /// Fails only when `frame` is not exactly [`RECORD_SIZE`] bytes; all
    /// field values are valid by construction, so a misaligned stream
    /// decodes without error (as garbage) rather than failing here.
    pub fn decode(frame: &[u8], order: ByteOrder) -> Result<LogRecord, RecordError> {
        if frame.len() != RECORD_SIZE {
            return Err(RecordError::WrongLength {
                expected: RECORD_SIZE,
                actual: frame.len(),
            });
        }

        let mut args = [0u32; RECORD_ARG_SLOTS];
        for (slot, arg) in args.iter_mut().enumerate() {
            *arg = u32_field(frame, ARGS_OFFSET + slot * 4, order);
        }

        Ok(LogRecord {
            timestamp: u32_field(frame, TIMESTAMP_OFFSET, order),
            event_id: u32_field(frame, EVENT_ID_OFFSET, order),
            args,
            arg_count: u16_field(frame, ARG_COUNT_OFFSET, order),
            core_id: frame[CORE_ID_OFFSET],
            flags: frame[FLAGS_OFFSET],
            version: frame[VERSION_OFFSET],
        })
    }

    /// Encode this record into its wire form.
    ///
    /// Inverse of [`LogRecord::decode`]; used by tests and traffic
    /// simulators.
    pub fn encode(&self, order: ByteOrder) -> [u8; RECORD_SIZE] {
        let mut frame = [0u8; RECORD_SIZE];
        frame[TIMESTAMP_OFFSET..TIMESTAMP_OFFSET + 4]
            .copy_from_slice(&order.write_u32(self.timestamp));
        frame[EVENT_ID_OFFSET..EVENT_ID_OFFSET + 4].copy_from_slice(&order.write_u32(self.event_id));
        for (slot, arg) in self.args.iter().enumerate() {
            let offset = ARGS_OFFSET + slot * 4;
            frame[offset..offset + 4].copy_from_slice(&order.write_u32(*arg));
        }
        frame[ARG_COUNT_OFFSET..ARG_COUNT_OFFSET + 2]
            .copy_from_slice(&order.write_u16(self.arg_count));
        frame[CORE_ID_OFFSET] = self.core_id;
        frame[FLAGS_OFFSET] = self.flags;
        frame[VERSION_OFFSET] = self.version;
        frame
    }

    /// True when this record is the device's overflow notification.
    pub fn is_overflow(&self) -> bool {
        self.event_id == OVERFLOW_EVENT_ID
    }

    /// True when `event_id` is an opaque number rather than a
    /// format-string address.
    pub fn is_numeric(&self) -> bool {
        self.flags & 0x01 != 0
    }

    /// The meaningful arguments: `args` truncated to `arg_count`, with
    /// counts above the slot limit clamped.
    pub fn valid_args(&self) -> &[u32] {
        let count = (self.arg_count as usize).min(RECORD_ARG_SLOTS);
        &self.args[..count]
    }
}

fn u32_field(frame: &[u8], offset: usize, order: ByteOrder) -> u32 {
    order.read_u32([
        frame[offset],
        frame[offset + 1],
        frame[offset + 2],
        frame[offset + 3],
    ])
}

fn u16_field(frame: &[u8], offset: usize, order: ByteOrder) -> u16 {
    order.read_u16([frame[offset], frame[offset + 1]])
}

/// Error type for wire frame decoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordError {
    /// Frame length does not match the fixed record size
    WrongLength { expected: usize, actual: usize },
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordError::WrongLength { expected, actual } => {
                write!(f, "malformed record: expected {expected} bytes, got {actual}")
            }
        }
    }
}

impl std::error::Error for RecordError {
    // Default implementation is sufficient
}
