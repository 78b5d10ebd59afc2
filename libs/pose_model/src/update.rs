use num_enum::{IntoPrimitive, TryFromPrimitive};
use record_codec::{Member, Record, Result, Session, Vec3, Versions};

use crate::curve::AxisCurves;
use crate::enum_field;
use crate::target::BipedTarget;

/// The kind of a [`PoseUpdate`]. Its discriminant is the serialized type tag.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
pub enum PoseUpdateKind {
    Position = 0,
    Rotation = 1,
    TargetOffset = 2,
}

/// Moves a target to a position relative to the biped's root.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PositionUpdate {
    pub target: BipedTarget,
    pub curve: Option<AxisCurves>,
    pub position_offset: Vec3,
}

/// Rotates a target to a fixed orientation, given as euler angles in degrees.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RotationUpdate {
    pub target: BipedTarget,
    pub curve: Option<AxisCurves>,
    pub rotation: Vec3,
}

/// Moves a target towards a point with an additional offset.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TargetOffsetUpdate {
    pub target: BipedTarget,
    pub curve: Option<AxisCurves>,
    pub offset_target: Vec3,
    pub offset: Vec3,
}

/// A change applied to one target of the biped over a keyframe.
#[derive(Debug, Clone, PartialEq)]
pub enum PoseUpdate {
    Position(PositionUpdate),
    Rotation(RotationUpdate),
    TargetOffset(TargetOffsetUpdate),
}

impl PoseUpdate {
    /// Creates an update of the given kind with all fields at their defaults.
    pub fn new(kind: PoseUpdateKind) -> Self {
        match kind {
            PoseUpdateKind::Position => Self::Position(PositionUpdate::default()),
            PoseUpdateKind::Rotation => Self::Rotation(RotationUpdate::default()),
            PoseUpdateKind::TargetOffset => Self::TargetOffset(TargetOffsetUpdate::default()),
        }
    }

    pub fn kind(&self) -> PoseUpdateKind {
        match self {
            Self::Position(_) => PoseUpdateKind::Position,
            Self::Rotation(_) => PoseUpdateKind::Rotation,
            Self::TargetOffset(_) => PoseUpdateKind::TargetOffset,
        }
    }

    pub fn target(&self) -> BipedTarget {
        match self {
            Self::Position(u) => u.target,
            Self::Rotation(u) => u.target,
            Self::TargetOffset(u) => u.target,
        }
    }

    pub fn curve(&self) -> Option<&AxisCurves> {
        match self {
            Self::Position(u) => u.curve.as_ref(),
            Self::Rotation(u) => u.curve.as_ref(),
            Self::TargetOffset(u) => u.curve.as_ref(),
        }
    }

    pub fn curve_mut(&mut self) -> &mut Option<AxisCurves> {
        match self {
            Self::Position(u) => &mut u.curve,
            Self::Rotation(u) => &mut u.curve,
            Self::TargetOffset(u) => &mut u.curve,
        }
    }
}

impl From<PositionUpdate> for PoseUpdate {
    fn from(value: PositionUpdate) -> Self {
        Self::Position(value)
    }
}

impl From<RotationUpdate> for PoseUpdate {
    fn from(value: RotationUpdate) -> Self {
        Self::Rotation(value)
    }
}

impl From<TargetOffsetUpdate> for PoseUpdate {
    fn from(value: TargetOffsetUpdate) -> Self {
        Self::TargetOffset(value)
    }
}

/// Fields shared by every update kind, always written first.
fn serialize_common<S: Session>(
    session: &mut S,
    target: &mut BipedTarget,
    curve: &mut Option<AxisCurves>,
) -> Result<()> {
    enum_field(session, "target", target, Versions::ALL)?;
    session.object("curve", curve, Versions::since(2))
}

impl Record for PositionUpdate {
    fn serialize<S: Session>(&mut self, session: &mut S) -> Result<()> {
        serialize_common(session, &mut self.target, &mut self.curve)?;
        session.scalar("positionOffset", &mut self.position_offset, Vec3::ZERO, Versions::ALL)
    }
}

impl Record for RotationUpdate {
    fn serialize<S: Session>(&mut self, session: &mut S) -> Result<()> {
        serialize_common(session, &mut self.target, &mut self.curve)?;
        session.scalar("rotation", &mut self.rotation, Vec3::ZERO, Versions::ALL)
    }
}

impl Record for TargetOffsetUpdate {
    fn serialize<S: Session>(&mut self, session: &mut S) -> Result<()> {
        serialize_common(session, &mut self.target, &mut self.curve)?;
        session.scalar("offsetTarget", &mut self.offset_target, Vec3::ZERO, Versions::ALL)?;
        session.scalar("offset", &mut self.offset, Vec3::ZERO, Versions::ALL)
    }
}

impl Record for PoseUpdate {
    fn serialize<S: Session>(&mut self, session: &mut S) -> Result<()> {
        match self {
            Self::Position(u) => u.serialize(session),
            Self::Rotation(u) => u.serialize(session),
            Self::TargetOffset(u) => u.serialize(session),
        }
    }
}

impl Member for PoseUpdate {
    const FAMILY: &'static str = "PoseUpdate";
    const TAGGED: bool = true;

    fn create(tag: u8) -> Option<Self> {
        PoseUpdateKind::try_from_primitive(tag).ok().map(Self::new)
    }

    fn tag(&self) -> u8 {
        self.kind().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_match_kinds() {
        for (tag, kind) in [
            (0, PoseUpdateKind::Position),
            (1, PoseUpdateKind::Rotation),
            (2, PoseUpdateKind::TargetOffset),
        ] {
            let update = PoseUpdate::create(tag).expect("known tag");
            assert_eq!(update.kind(), kind, "kind of tag {tag}");
            assert_eq!(update.tag(), tag, "tag of {kind:?}");
        }

        assert!(PoseUpdate::create(3).is_none(), "tag 3 is unknown");
    }

    #[test]
    fn accessors() {
        let mut update = PoseUpdate::from(RotationUpdate {
            target: BipedTarget::Spine,
            curve: None,
            rotation: Vec3::new(0.0, 90.0, 0.0),
        });

        assert_eq!(update.target(), BipedTarget::Spine, "target");
        assert!(update.curve().is_none(), "no curve yet");

        *update.curve_mut() = Some(AxisCurves::default());
        assert!(update.curve().is_some(), "curve set");
    }
}
