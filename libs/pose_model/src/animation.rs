use num_enum::{IntoPrimitive, TryFromPrimitive};
use record_codec::{Record, Result, Session, Versions};

use crate::enum_field;
use crate::keyframe::PoseKeyframe;

/// How the keyframes of an animation are played back.
#[repr(i32)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
pub enum AnimationMode {
    #[default]
    Normal = 0,
    /// Left and right sides are swapped.
    Flip = 1,
}

/// A full pose animation. This is the root record of a pose file.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PoseAnimation {
    pub mode: AnimationMode,
    pub keyframes: Vec<PoseKeyframe>,
}

impl PoseAnimation {
    /// Whether there is nothing to play.
    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    /// Total number of updates across all keyframes.
    pub fn update_count(&self) -> usize {
        self.keyframes.iter().map(|k| k.updates.len()).sum()
    }
}

impl Record for PoseAnimation {
    fn serialize<S: Session>(&mut self, session: &mut S) -> Result<()> {
        enum_field(session, "mode", &mut self.mode, Versions::since(2))?;
        session.object_array("keyframes", &mut self.keyframes, Versions::ALL)
    }
}
