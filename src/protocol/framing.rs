//! Frame assembler for the length-prefixed LPF2 protocol
//!
//! Notifications arrive in chunks that need not line up with frame
//! boundaries. Bytes are buffered until the length declared by the frame at
//! the head of the buffer is available.

use crate::config::protocol::{MAX_FRAME_LEN, MIN_FRAME_LEN};
use alloc::vec::Vec;
use heapless::Vec as FrameBytes;

/// One complete protocol frame.
///
/// Layout: `[length][hub id][message type][payload...]`, where the length
/// byte counts the whole frame including itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    bytes: FrameBytes<u8, MAX_FRAME_LEN>,
}

impl Frame {
    /// Wrap raw bytes as a frame.
    ///
    /// Returns `None` unless the length byte matches the slice length and
    /// the header is complete.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < MIN_FRAME_LEN || bytes[0] as usize != bytes.len() {
            return None;
        }
        let bytes = FrameBytes::from_slice(bytes).ok()?;
        Some(Self { bytes })
    }

    pub fn hub_id(&self) -> u8 {
        self.bytes[1]
    }

    pub fn message_type(&self) -> u8 {
        self.bytes[2]
    }

    /// Bytes following the three-byte header
    pub fn payload(&self) -> &[u8] {
        &self.bytes[3..]
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Reassembles a byte stream into [`Frame`]s.
///
/// A declared length outside `MIN_FRAME_LEN..=MAX_FRAME_LEN` means the
/// stream is out of step; the whole buffer is discarded and assembly starts
/// over with the next chunk.
pub struct FrameAssembler {
    buffer: Vec<u8>,
}

impl FrameAssembler {
    /// Create a new empty assembler.
    pub fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    /// Append a chunk and iterate over the frames that are now complete.
    ///
    /// Frames the iterator does not yield stay buffered and are returned by
    /// the next call.
    pub fn feed(&mut self, bytes: &[u8]) -> Frames<'_> {
        self.buffer.extend_from_slice(bytes);
        self.frames()
    }

    /// Iterate over complete frames already buffered.
    pub fn frames(&mut self) -> Frames<'_> {
        Frames {
            buffer: &mut self.buffer,
            consumed: 0,
        }
    }

    /// Discard any partial frame.
    pub fn reset(&mut self) {
        self.buffer.clear();
    }

    /// Returns true if no bytes are waiting for the rest of their frame.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Number of buffered bytes.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }
}

impl Default for FrameAssembler {
    fn default() -> Self {
        Self::new()
    }
}

/// Lazy iterator over the complete frames in a [`FrameAssembler`].
///
/// Consumed bytes are removed from the assembler when the iterator drops.
pub struct Frames<'a> {
    buffer: &'a mut Vec<u8>,
    consumed: usize,
}

impl Iterator for Frames<'_> {
    type Item = Frame;

    fn next(&mut self) -> Option<Frame> {
        let pending = &self.buffer[self.consumed..];
        let declared = *pending.first()? as usize;

        if !(MIN_FRAME_LEN..=MAX_FRAME_LEN).contains(&declared) {
            log::warn!(
                "Frame length {} out of range, dropping {} buffered bytes",
                declared,
                self.buffer.len()
            );
            self.buffer.clear();
            self.consumed = 0;
            return None;
        }

        if declared > pending.len() {
            return None;
        }

        let frame = Frame::from_bytes(&pending[..declared]);
        self.consumed += declared;
        frame
    }
}

impl Drop for Frames<'_> {
    fn drop(&mut self) {
        self.buffer.drain(..self.consumed);
    }
}
