//! Records of a biped pose animation.
//!
//! An animation is a list of keyframes, each holding a list of pose updates
//! that move or rotate one IK target of the biped. Every record implements
//! [`Record`], so a whole animation can be written with either backend of
//! [`record_codec`].
//!
//! Version 1 is the initial layout. Version 2 added the animation mode,
//! per-update axis curves and the offsets of curve points.

use std::fmt;

use num_enum::TryFromPrimitive;
use record_codec::{Error, Result, Session, Versions};

mod animation;
mod curve;
mod keyframe;
mod target;
mod update;

pub use animation::{AnimationMode, PoseAnimation};
pub use curve::{AxisCurve, AxisCurveValue, AxisCurves};
pub use keyframe::PoseKeyframe;
pub use target::BipedTarget;
pub use update::{PoseUpdate, PoseUpdateKind, PositionUpdate, RotationUpdate, TargetOffsetUpdate};

/// The version every pose animation is written at.
pub const LATEST_VERSION: u32 = 2;

/// Serializes an integer enum as an `i32` field.
///
/// Reading a discriminant the enum doesn't have fails the load.
fn enum_field<S, E>(session: &mut S, name: &str, value: &mut E, versions: Versions) -> Result<()>
where
    S: Session,
    E: Copy + Default + Into<i32> + TryFromPrimitive<Primitive = i32>,
    E::Error: fmt::Display,
{
    let mut raw: i32 = (*value).into();
    session.scalar(name, &mut raw, E::default().into(), versions)?;
    if session.is_reading() {
        *value = E::try_from_primitive(raw)
            .map_err(|e| Error::custom(format_args!("invalid `{name}`: {e}")))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests;
