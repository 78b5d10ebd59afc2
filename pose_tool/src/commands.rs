use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use anyhow::{Context as _, Result};
use pose_model::{
    AnimationMode, AxisCurve, AxisCurves, BipedTarget, PoseAnimation, PoseKeyframe, PoseUpdate,
    PositionUpdate, RotationUpdate, TargetOffsetUpdate,
};
use record_codec::Vec3;
use record_codec::text::TextStyle;

use crate::store::{Store, StoreFormat, read_file};

/// A short wave of the right hand, with the body leaning into it.
pub fn sample_animation() -> PoseAnimation {
    let mut ease = AxisCurve::default();
    ease.add_value(0.75, 0.95);
    ease.add_value(0.25, 0.6);

    let mut raise = PoseKeyframe::default();
    raise.push(TargetOffsetUpdate {
        target: BipedTarget::RightHand,
        curve: Some(AxisCurves {
            y: Some(ease),
            ..AxisCurves::default()
        }),
        offset_target: Vec3::new(0.3, 1.6, 0.1),
        offset: Vec3::new(0.0, 0.1, 0.0),
    });
    raise.push(RotationUpdate {
        target: BipedTarget::Spine,
        curve: None,
        rotation: Vec3::new(0.0, 0.0, -8.0),
    });

    let mut wave = PoseKeyframe::default();
    wave.push(TargetOffsetUpdate {
        target: BipedTarget::RightHand,
        curve: None,
        offset_target: Vec3::new(0.45, 1.6, 0.1),
        offset: Vec3::new(0.0, 0.1, 0.0),
    });
    wave.push(PositionUpdate {
        target: BipedTarget::Pelvis,
        curve: None,
        position_offset: Vec3::new(0.05, 0.95, 0.0),
    });

    PoseAnimation {
        mode: AnimationMode::Normal,
        keyframes: vec![raise, wave],
    }
}

pub fn sample(store: &Store, name: &str) -> Result<()> {
    if store.save(name, &mut sample_animation())? {
        println!("{}", store.path(name).display());
    }

    Ok(())
}

pub fn convert(input: &Path, output: &Path, style: TextStyle) -> Result<()> {
    let (from, bytes) = read_file(input)?;
    let mut animation = from
        .decode(&bytes)
        .with_context(|| format!("cannot decode {input:?}"))?;

    let to = StoreFormat::from_path(output)
        .with_context(|| format!("unknown pose file extension: {output:?}"))?;
    let bytes = to
        .encode(&mut animation, style)
        .with_context(|| format!("cannot encode {output:?}"))?;

    fs::write(output, bytes).with_context(|| format!("cannot write {output:?}"))?;
    log::info!("converted {input:?} ({from:?}) to {output:?} ({to:?})");
    Ok(())
}

pub fn inspect(input: &Path) -> Result<()> {
    let (format, bytes) = read_file(input)?;
    let version = format
        .stream_version(&bytes)
        .with_context(|| format!("cannot read the header of {input:?}"))?;
    let animation = format
        .decode(&bytes)
        .with_context(|| format!("cannot decode {input:?}"))?;

    print!("{}", summary(format, version, &animation));
    Ok(())
}

pub fn list(store: &Store) -> Result<()> {
    for name in store.list()? {
        println!("{name}");
    }

    Ok(())
}

pub fn delete(store: &Store, name: &str) -> Result<()> {
    if !store.delete(name)? {
        log::warn!("no animation named `{name}`");
    }

    Ok(())
}

fn summary(format: StoreFormat, version: u32, animation: &PoseAnimation) -> String {
    let mut out = String::new();
    _ = writeln!(out, "format: {format:?}, version {version}");
    _ = writeln!(
        out,
        "mode: {:?}, {} keyframes, {} updates",
        animation.mode,
        animation.keyframes.len(),
        animation.update_count()
    );

    for (index, keyframe) in animation.keyframes.iter().enumerate() {
        _ = writeln!(out, "keyframe {index}:");
        for update in &keyframe.updates {
            _ = write!(out, "  {:?} {:?}", update.kind(), update.target());
            match update {
                PoseUpdate::Position(u) => _ = write!(out, " offset {:?}", u.position_offset),
                PoseUpdate::Rotation(u) => _ = write!(out, " euler {:?}", u.rotation),
                PoseUpdate::TargetOffset(u) => {
                    _ = write!(out, " target {:?} offset {:?}", u.offset_target, u.offset);
                },
            }

            if let Some(curves) = update.curve()
                && !curves.is_empty()
            {
                out.push_str(" (curved)");
            }

            out.push('\n');
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use pose_model::LATEST_VERSION;

    use super::*;
    use crate::config::StoreConfig;

    #[test]
    fn sample_is_saved() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = Store::new(&StoreConfig {
            dir: dir.path().to_path_buf(),
            format: StoreFormat::Json,
            pretty: false,
        });

        sample(&store, "wave").expect("sample");
        assert_eq!(store.load("wave"), Some(sample_animation()), "sample round trip");
    }

    #[test]
    fn convert_between_formats() {
        let dir = tempfile::tempdir().expect("temp dir");
        let dat = dir.path().join("wave.dat");
        let json = dir.path().join("wave.json");
        let back = dir.path().join("back.dat");

        let bytes = StoreFormat::Binary
            .encode(&mut sample_animation(), TextStyle::Pretty)
            .expect("encode");
        fs::write(&dat, &bytes).expect("write");

        convert(&dat, &json, TextStyle::Pretty).expect("to json");
        convert(&json, &back, TextStyle::Pretty).expect("back to binary");

        assert_eq!(fs::read(&back).expect("read"), bytes, "binary is reproduced exactly");
    }

    #[test]
    fn convert_rejects_unknown_extension() {
        let dir = tempfile::tempdir().expect("temp dir");
        let dat = dir.path().join("wave.dat");
        let bytes = StoreFormat::Binary
            .encode(&mut sample_animation(), TextStyle::Pretty)
            .expect("encode");
        fs::write(&dat, bytes).expect("write");

        convert(&dat, &dir.path().join("wave.txt"), TextStyle::Pretty)
            .expect_err("unknown output format");
    }

    #[test]
    fn summary_lists_updates() {
        let text = summary(StoreFormat::Binary, LATEST_VERSION, &sample_animation());
        assert!(text.starts_with("format: Binary, version 2\n"), "header line: {text}");
        assert!(text.contains("2 keyframes, 4 updates"), "counts: {text}");
        assert!(text.contains("TargetOffset RightHand"), "update line: {text}");
        assert!(text.contains("(curved)"), "curve marker: {text}");
    }
}
