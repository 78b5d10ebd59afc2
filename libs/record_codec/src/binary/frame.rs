//! Per-object framing state.

use crate::error::{Error, Result};

/// Amount of usable bitmask slots per object.
pub const MAX_FIELDS: u8 = 31;

/// Bitmask bit that must never be set in a completed header.
pub const RESERVED_BIT: u32 = 1 << MAX_FIELDS;

/// Header written before an object's fields are known.
pub const PLACEHOLDER: u32 = u32::MAX;

/// Framing state of one open object.
#[derive(Debug, Clone, Copy)]
pub struct Frame {
    pub bitmask: u32,
    slot: u8,
    /// Stream offset of the header. Only meaningful while writing.
    pub header_offset: u64,
}

/// The frames of all currently open objects, innermost last.
#[derive(Debug, Default)]
pub struct FrameStack {
    frames: Vec<Frame>,
}

impl FrameStack {
    pub fn push(&mut self, bitmask: u32, header_offset: u64) {
        self.frames.push(Frame {
            bitmask,
            slot: 0,
            header_offset,
        });
    }

    pub fn pop(&mut self) -> Result<Frame> {
        self.frames.pop().ok_or(Error::NoOpenObject)
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Claims the next slot of the innermost frame for a writer.
    ///
    /// Sets the slot's bit if the field deviates from its default and returns
    /// whether the field's data needs to be written.
    pub fn flag(&mut self, name: &str, changed: bool) -> Result<bool> {
        let (frame, slot) = self.next_slot(name)?;
        if changed {
            frame.bitmask |= 1 << slot;
        }

        Ok(changed)
    }

    /// Claims the next slot of the innermost frame for a reader.
    ///
    /// Returns whether the stored bitmask holds data for the field.
    pub fn test(&mut self, name: &str) -> Result<bool> {
        let (frame, slot) = self.next_slot(name)?;
        Ok(frame.bitmask & (1 << slot) != 0)
    }

    fn next_slot(&mut self, name: &str) -> Result<(&mut Frame, u8)> {
        let frame = self.frames.last_mut().ok_or(Error::NoOpenObject)?;
        let slot = frame.slot;
        if slot >= MAX_FIELDS {
            return Err(Error::TooManyFields {
                name: name.to_owned(),
            });
        }

        frame.slot += 1;
        Ok((frame, slot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_sets_only_changed_slots() {
        let mut frames = FrameStack::default();
        frames.push(0, 0);
        assert!(frames.flag("a", true).expect("slot 0"), "changed is written");
        assert!(!frames.flag("b", false).expect("slot 1"), "default is skipped");
        assert!(frames.flag("c", true).expect("slot 2"), "changed is written");
        assert_eq!(frames.pop().expect("one frame").bitmask, 0b101, "slots 0 and 2");
    }

    #[test]
    fn test_reads_stored_bits() {
        let mut frames = FrameStack::default();
        frames.push(0b10, 0);
        assert!(!frames.test("a").expect("slot 0"), "bit 0 is clear");
        assert!(frames.test("b").expect("slot 1"), "bit 1 is set");
        assert!(!frames.test("c").expect("slot 2"), "bit 2 is clear");
    }

    #[test]
    fn slot_limit() {
        let mut frames = FrameStack::default();
        frames.push(0, 0);
        for _ in 0..MAX_FIELDS {
            frames.flag("f", true).expect("within limit");
        }

        let err = frames.flag("overflow", true).expect_err("32nd field");
        assert!(matches!(err, Error::TooManyFields { .. }), "wrong error: {err:?}");
        assert_eq!(
            frames.pop().expect("one frame").bitmask & RESERVED_BIT,
            0,
            "reserved bit stays clear"
        );
    }

    #[test]
    fn nested_frames_are_lifo() {
        let mut frames = FrameStack::default();
        frames.push(0, 4);
        frames.push(0, 9);
        frames.flag("inner", true).expect("inner slot");
        assert_eq!(frames.depth(), 2, "two open frames");

        let inner = frames.pop().expect("inner frame");
        assert_eq!((inner.header_offset, inner.bitmask), (9, 1), "inner first");
        let outer = frames.pop().expect("outer frame");
        assert_eq!((outer.header_offset, outer.bitmask), (4, 0), "outer untouched");
        frames.pop().expect_err("stack is empty");
    }
}
