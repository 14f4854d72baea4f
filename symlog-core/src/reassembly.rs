//! Frame reassembly from an arbitrarily chunked byte stream.

use crate::record::RECORD_SIZE;

/// Accumulates transport reads and cuts them into whole wire frames.
///
/// The transport delivers bytes in whatever chunk sizes the driver happens
/// to produce, so a frame routinely spans reads. `feed` appends a chunk and
/// [`StreamReassembler::next_frame`] pops leading frames until fewer than
/// [`RECORD_SIZE`] bytes remain. Frames come out strictly in arrival order.
///
/// The accumulator is unbounded: if the device outpaces the consumer the
/// buffer grows without limit. The protocol has no sync marker, so there is
/// no safe point at which buffered bytes could be discarded.
#[derive(Debug, Default)]
pub struct StreamReassembler {
    buffer: Vec<u8>,
}

impl StreamReassembler {
    pub fn new() -> Self {
        StreamReassembler { buffer: Vec::new() }
    }

    /// Append a chunk of raw transport bytes.
    pub fn feed(&mut self, chunk: &[u8]) {
        self.buffer.extend_from_slice(chunk);
    }

    /// Pop the leading frame, if a whole one is buffered.
    pub fn next_frame(&mut self) -> Option<[u8; RECORD_SIZE]> {
        if self.buffer.len() < RECORD_SIZE {
            return None;
        }
        let mut frame = [0u8; RECORD_SIZE];
        frame.copy_from_slice(&self.buffer[..RECORD_SIZE]);
        self.buffer.drain(..RECORD_SIZE);
        Some(frame)
    }

    /// Drop a single leading byte, shifting the frame alignment by one.
    ///
    /// This is the resync heuristic applied after a structural decode
    /// failure. The protocol carries no sync marker, so realignment is
    /// best-effort: the stream recovers only if a later read happens to
    /// land on a frame boundary again. No-op on an empty buffer.
    pub fn skip_byte(&mut self) {
        if !self.buffer.is_empty() {
            self.buffer.remove(0);
        }
    }

    /// Number of bytes currently buffered.
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_split_across_two_chunks() {
        let mut reassembler = StreamReassembler::new();
        let frame: Vec<u8> = (0..RECORD_SIZE as u8).collect();

        reassembler.feed(&frame[..10]);
        assert_eq!(reassembler.next_frame(), None);

        reassembler.feed(&frame[10..]);
        let out = reassembler.next_frame().unwrap();
        assert_eq!(&out[..], &frame[..]);

        // Exactly one frame, nothing left over.
        assert_eq!(reassembler.next_frame(), None);
        assert!(reassembler.is_empty());
    }

    #[test]
    fn test_multiple_frames_in_one_chunk_preserve_order() {
        let mut reassembler = StreamReassembler::new();
        let mut stream = Vec::new();
        for marker in [0x11u8, 0x22, 0x33] {
            stream.extend_from_slice(&[marker; RECORD_SIZE]);
        }
        reassembler.feed(&stream);

        assert_eq!(reassembler.next_frame().unwrap()[0], 0x11);
        assert_eq!(reassembler.next_frame().unwrap()[0], 0x22);
        assert_eq!(reassembler.next_frame().unwrap()[0], 0x33);
        assert_eq!(reassembler.next_frame(), None);
    }

    #[test]
    fn test_partial_frame_is_retained() {
        let mut reassembler = StreamReassembler::new();
        reassembler.feed(&[0xAA; RECORD_SIZE + 4]);

        assert!(reassembler.next_frame().is_some());
        assert_eq!(reassembler.next_frame(), None);
        assert_eq!(reassembler.buffered_len(), 4);
    }

    #[test]
    fn test_skip_byte_shifts_alignment() {
        let mut reassembler = StreamReassembler::new();
        let bytes: Vec<u8> = (0..(RECORD_SIZE as u8) * 2).collect();
        reassembler.feed(&bytes);

        reassembler.skip_byte();
        assert_eq!(reassembler.buffered_len(), RECORD_SIZE * 2 - 1);
        let frame = reassembler.next_frame().unwrap();
        assert_eq!(frame[0], 1);
    }

    #[test]
    fn test_skip_byte_on_empty_buffer_is_noop() {
        let mut reassembler = StreamReassembler::new();
        reassembler.skip_byte();
        assert!(reassembler.is_empty());
    }

    #[test]
    fn test_frames_resume_after_skip() {
        let mut reassembler = StreamReassembler::new();
        reassembler.feed(&[0x01]);
        reassembler.feed(&[0x5A; RECORD_SIZE]);

        reassembler.skip_byte();
        let frame = reassembler.next_frame().unwrap();
        assert_eq!(frame, [0x5A; RECORD_SIZE]);
        assert!(reassembler.is_empty());
    }
}
