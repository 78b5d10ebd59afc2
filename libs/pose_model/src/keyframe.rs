use record_codec::{Record, Result, Session, Versions, plain_member};

use crate::target::BipedTarget;
use crate::update::{PoseUpdate, PoseUpdateKind};

/// The updates that make up one step of an animation.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PoseKeyframe {
    pub updates: Vec<PoseUpdate>,
}

impl PoseKeyframe {
    pub fn push(&mut self, update: impl Into<PoseUpdate>) {
        self.updates.push(update.into());
    }

    /// Finds the first update of a kind for a target.
    pub fn get(&self, kind: PoseUpdateKind, target: BipedTarget) -> Option<&PoseUpdate> {
        self.updates
            .iter()
            .find(|u| u.kind() == kind && u.target() == target)
    }

    /// Like [`Self::get`], but mutable.
    pub fn get_mut(
        &mut self,
        kind: PoseUpdateKind,
        target: BipedTarget,
    ) -> Option<&mut PoseUpdate> {
        self.updates
            .iter_mut()
            .find(|u| u.kind() == kind && u.target() == target)
    }
}

impl Record for PoseKeyframe {
    fn serialize<S: Session>(&mut self, session: &mut S) -> Result<()> {
        session.object_array("updates", &mut self.updates, Versions::ALL)
    }
}

plain_member!(PoseKeyframe);
