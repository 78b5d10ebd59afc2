use record_codec::{Record, Result, Session, Versions, plain_member};

/// A point of an [`AxisCurve`].
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct AxisCurveValue {
    /// Normalized keyframe time of this point.
    pub time: f32,
    /// Progress along the axis at `time`.
    pub offset: f32,
}

/// Easing of a single axis across a keyframe.
///
/// The values are kept sorted by time.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct AxisCurve {
    pub values: Vec<AxisCurveValue>,
}

/// Optional easing curves of the three axes of an update.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct AxisCurves {
    pub x: Option<AxisCurve>,
    pub y: Option<AxisCurve>,
    pub z: Option<AxisCurve>,
}

impl AxisCurveValue {
    pub const fn new(time: f32, offset: f32) -> Self {
        Self { time, offset }
    }
}

impl AxisCurve {
    /// Inserts a point, keeping the values sorted by time.
    ///
    /// A point with the same time as existing ones is placed after them.
    pub fn add_value(&mut self, time: f32, offset: f32) {
        let index = self.values.partition_point(|v| v.time <= time);
        self.values.insert(index, AxisCurveValue::new(time, offset));
    }
}

impl AxisCurves {
    /// Gets the curve of an axis by index, `0` being X.
    pub fn axis_mut(&mut self, axis: usize) -> Option<&mut Option<AxisCurve>> {
        match axis {
            0 => Some(&mut self.x),
            1 => Some(&mut self.y),
            2 => Some(&mut self.z),
            _ => None,
        }
    }

    /// Whether no axis has a curve.
    pub fn is_empty(&self) -> bool {
        self.x.is_none() && self.y.is_none() && self.z.is_none()
    }
}

impl Record for AxisCurveValue {
    fn serialize<S: Session>(&mut self, session: &mut S) -> Result<()> {
        session.scalar("time", &mut self.time, 0.0, Versions::ALL)?;
        session.scalar("offset", &mut self.offset, 0.0, Versions::since(2))
    }
}

impl Record for AxisCurve {
    fn serialize<S: Session>(&mut self, session: &mut S) -> Result<()> {
        session.object_array("values", &mut self.values, Versions::ALL)
    }
}

impl Record for AxisCurves {
    fn serialize<S: Session>(&mut self, session: &mut S) -> Result<()> {
        session.object("x", &mut self.x, Versions::ALL)?;
        session.object("y", &mut self.y, Versions::ALL)?;
        session.object("z", &mut self.z, Versions::ALL)
    }
}

plain_member!(AxisCurveValue, AxisCurve, AxisCurves);

#[cfg(test)]
mod tests {
    use super::*;

    fn times(curve: &AxisCurve) -> Vec<f32> {
        curve.values.iter().map(|v| v.time).collect()
    }

    #[test]
    fn add_value_sorts() {
        let mut curve = AxisCurve::default();
        curve.add_value(0.5, 0.1);
        curve.add_value(0.25, 0.2);
        curve.add_value(1.0, 0.3);
        curve.add_value(0.0, 0.4);
        assert_eq!(times(&curve), [0.0, 0.25, 0.5, 1.0], "sorted by time");
    }

    #[test]
    fn add_value_keeps_insertion_order_for_ties() {
        let mut curve = AxisCurve::default();
        curve.add_value(0.5, 1.0);
        curve.add_value(0.5, 2.0);
        let offsets: Vec<f32> = curve.values.iter().map(|v| v.offset).collect();
        assert_eq!(offsets, [1.0, 2.0], "later insert goes last");
    }

    #[test]
    fn axis_access() {
        let mut curves = AxisCurves::default();
        assert!(curves.is_empty(), "fresh curves are empty");

        *curves.axis_mut(1).expect("y axis") = Some(AxisCurve::default());
        assert!(curves.y.is_some(), "y set through index");
        assert!(!curves.is_empty(), "one axis set");
        assert!(curves.axis_mut(3).is_none(), "only three axes");
    }
}
