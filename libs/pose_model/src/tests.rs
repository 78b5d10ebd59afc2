use proptest::prelude::*;
use record_codec::text::TextStyle;
use record_codec::{Error, ErrorKind, Vec3, binary, text};
use serde_json::json;

use super::*;

fn arb_f32() -> impl Strategy<Value = f32> {
    -1.0e4f32..1.0e4f32
}

fn arb_vec3() -> impl Strategy<Value = Vec3> {
    (arb_f32(), arb_f32(), arb_f32()).prop_map(|(x, y, z)| Vec3::new(x, y, z))
}

fn arb_target() -> impl Strategy<Value = BipedTarget> {
    prop::sample::select(BipedTarget::ALL.to_vec())
}

fn arb_curve() -> impl Strategy<Value = AxisCurve> {
    prop::collection::vec((0.0f32..=1.0, arb_f32()), 0..4).prop_map(|points| {
        let mut curve = AxisCurve::default();
        for (time, offset) in points {
            curve.add_value(time, offset);
        }

        curve
    })
}

fn arb_curves() -> impl Strategy<Value = Option<AxisCurves>> {
    let axis = || prop::option::of(arb_curve());
    prop::option::of((axis(), axis(), axis()).prop_map(|(x, y, z)| AxisCurves { x, y, z }))
}

fn arb_update() -> impl Strategy<Value = PoseUpdate> {
    prop_oneof![
        (arb_target(), arb_curves(), arb_vec3()).prop_map(|(target, curve, position_offset)| {
            PositionUpdate {
                target,
                curve,
                position_offset,
            }
            .into()
        }),
        (arb_target(), arb_curves(), arb_vec3()).prop_map(|(target, curve, rotation)| {
            RotationUpdate {
                target,
                curve,
                rotation,
            }
            .into()
        }),
        (arb_target(), arb_curves(), arb_vec3(), arb_vec3()).prop_map(
            |(target, curve, offset_target, offset)| {
                TargetOffsetUpdate {
                    target,
                    curve,
                    offset_target,
                    offset,
                }
                .into()
            }
        ),
    ]
}

fn arb_animation() -> impl Strategy<Value = PoseAnimation> {
    let keyframe =
        prop::collection::vec(arb_update(), 0..6).prop_map(|updates| PoseKeyframe { updates });
    let mode = prop_oneof![Just(AnimationMode::Normal), Just(AnimationMode::Flip)];
    (mode, prop::collection::vec(keyframe, 0..5))
        .prop_map(|(mode, keyframes)| PoseAnimation { mode, keyframes })
}

/// What reading an animation written at `version` must produce.
fn at_version(mut animation: PoseAnimation, version: u32) -> PoseAnimation {
    if version < 2 {
        animation.mode = AnimationMode::Normal;
        for update in animation.keyframes.iter_mut().flat_map(|k| &mut k.updates) {
            *update.curve_mut() = None;
        }
    }

    animation
}

proptest! {
    #[test]
    fn binary_round_trip(animation in arb_animation(), version in 1..=LATEST_VERSION) {
        let mut source = animation.clone();
        let buf = binary::to_vec_versioned(&mut source, LATEST_VERSION, version)
            .expect("writing must work");
        prop_assert_eq!(&source, &animation, "writing leaves the record unchanged");

        let read: PoseAnimation = binary::from_slice(&buf, LATEST_VERSION)
            .expect("reading must work");
        prop_assert_eq!(read, at_version(animation, version));
    }

    #[test]
    fn text_round_trip(animation in arb_animation(), version in 1..=LATEST_VERSION) {
        let text = text::to_string_versioned(
            &mut animation.clone(),
            LATEST_VERSION,
            version,
            TextStyle::Pretty,
        )
        .expect("writing must work");

        let read: PoseAnimation = text::from_str(&text, LATEST_VERSION)
            .expect("reading must work");
        prop_assert_eq!(read, at_version(animation, version));
    }

    #[test]
    fn backends_agree(animation in arb_animation()) {
        let buf = binary::to_vec(&mut animation.clone(), LATEST_VERSION).expect("binary");
        let text = text::to_string(&mut animation.clone(), LATEST_VERSION, TextStyle::Compact)
            .expect("text");

        let from_binary: PoseAnimation = binary::from_slice(&buf, LATEST_VERSION).expect("binary");
        let from_text: PoseAnimation = text::from_str(&text, LATEST_VERSION).expect("text");
        prop_assert_eq!(from_binary, from_text);
    }
}

fn sample() -> PoseAnimation {
    let mut curve = AxisCurve::default();
    curve.add_value(0.5, 0.75);

    let mut keyframe = PoseKeyframe::default();
    keyframe.push(PositionUpdate {
        target: BipedTarget::Pelvis,
        curve: Some(AxisCurves {
            y: Some(curve),
            ..AxisCurves::default()
        }),
        position_offset: Vec3::new(0.0, 1.0, 0.0),
    });
    keyframe.push(TargetOffsetUpdate {
        target: BipedTarget::RightHand,
        curve: None,
        offset_target: Vec3::new(1.0, 1.5, 0.0),
        offset: Vec3::new(0.0, 0.0, 0.25),
    });

    PoseAnimation {
        mode: AnimationMode::Flip,
        keyframes: vec![keyframe],
    }
}

#[test]
fn text_document() {
    let value = text::to_value(&mut sample(), LATEST_VERSION).expect("write");
    let expected = json!({
        "version": 2,
        "mode": 1,
        "keyframes": [{
            "updates": [
                {
                    "type": 0,
                    "target": 4,
                    "curve": {
                        "x": null,
                        "y": { "values": [{ "time": 0.5, "offset": 0.75 }] },
                        "z": null,
                    },
                    "positionOffset": [0.0, 1.0, 0.0],
                },
                {
                    "type": 2,
                    "target": 3,
                    "curve": null,
                    "offsetTarget": [1.0, 1.5, 0.0],
                    "offset": [0.0, 0.0, 0.25],
                },
            ],
        }],
    });

    assert_eq!(value, expected, "pose document layout");
}

#[test]
fn version_one_document() {
    let text = text::to_string_versioned(&mut sample(), LATEST_VERSION, 1, TextStyle::Compact)
        .expect("write");
    assert!(!text.contains("mode"), "mode is newer than version 1");
    assert!(!text.contains("curve"), "curves are newer than version 1");

    let read: PoseAnimation = text::from_str(&text, LATEST_VERSION).expect("read");
    assert_eq!(read, at_version(sample(), 1), "version 1 projection");
}

#[test]
fn invalid_target_fails_load() {
    let value = json!({
        "version": 2,
        "mode": 0,
        "keyframes": [{
            "updates": [{ "type": 1, "target": 7, "curve": null, "rotation": [0.0, 0.0, 0.0] }],
        }],
    });

    let err = text::from_value::<PoseAnimation>(value, LATEST_VERSION).expect_err("target 7");
    assert!(matches!(err, Error::Custom(_)), "wrong error: {err:?}");
    assert_eq!(err.kind(), ErrorKind::Format, "bad data");
}

#[test]
fn unknown_update_type_fails_load() {
    let value = json!({
        "version": 2,
        "mode": 0,
        "keyframes": [{ "updates": [{ "type": 3, "target": 0 }] }],
    });

    let err = text::from_value::<PoseAnimation>(value, LATEST_VERSION).expect_err("type 3");
    assert!(
        matches!(err, Error::UnknownTag { family: "PoseUpdate", tag: 3 }),
        "wrong error: {err:?}"
    );
}

#[test]
fn empty_animation_is_small() {
    let buf = binary::to_vec(&mut PoseAnimation::default(), LATEST_VERSION).expect("write");
    assert_eq!(buf, [2, 0, 0, 0, 0, 0, 0, 0, 0], "version, empty bitmask, end");
}
