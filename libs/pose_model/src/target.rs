use num_enum::{IntoPrimitive, TryFromPrimitive};

/// An IK target of the biped.
#[repr(i32)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
pub enum BipedTarget {
    #[default]
    LeftFoot = 0,
    RightFoot,
    LeftHand,
    RightHand,
    Pelvis,
    Spine,
    LookAt,
}

impl BipedTarget {
    /// All targets, in discriminant order.
    pub const ALL: [Self; 7] = [
        Self::LeftFoot,
        Self::RightFoot,
        Self::LeftHand,
        Self::RightHand,
        Self::Pelvis,
        Self::Spine,
        Self::LookAt,
    ];
}
