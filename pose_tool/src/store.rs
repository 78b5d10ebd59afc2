//! Pose files on disk.
//!
//! Every animation is stored as `<name>.dat` (binary) or `<name>.json`
//! (text) in the store directory. An animation is always encoded in memory
//! first and written with a single call, so a failed save never leaves a
//! partial file behind.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::{fs, io};

use anyhow::{Context as _, Result};
use pose_model::{LATEST_VERSION, PoseAnimation};
use record_codec::text::{TextReader, TextStyle};
use record_codec::{ErrorKind, Session as _, binary, text};

use crate::config::StoreConfig;

/// The file format of a pose file.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, serde::Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StoreFormat {
    #[default]
    Binary,
    Json,
}

impl StoreFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Binary => "dat",
            Self::Json => "json",
        }
    }

    /// Determines the format from a path's extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(OsStr::to_str)? {
            "dat" => Some(Self::Binary),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    /// Encodes an animation at the latest version.
    pub fn encode(
        self,
        animation: &mut PoseAnimation,
        style: TextStyle,
    ) -> record_codec::Result<Vec<u8>> {
        match self {
            Self::Binary => binary::to_vec(animation, LATEST_VERSION),
            Self::Json => text::to_string(animation, LATEST_VERSION, style).map(String::into_bytes),
        }
    }

    pub fn decode(self, bytes: &[u8]) -> record_codec::Result<PoseAnimation> {
        match self {
            Self::Binary => binary::from_slice(bytes, LATEST_VERSION),
            Self::Json => text::from_str(&utf8(bytes)?, LATEST_VERSION),
        }
    }

    /// Reads only the version a file was written at.
    pub fn stream_version(self, bytes: &[u8]) -> record_codec::Result<u32> {
        match self {
            Self::Binary => binary::BinaryReader::new(bytes, LATEST_VERSION).map(|r| r.version()),
            Self::Json => TextReader::from_str(&utf8(bytes)?, LATEST_VERSION).map(|r| r.version()),
        }
    }
}

fn utf8(bytes: &[u8]) -> record_codec::Result<String> {
    String::from_utf8(bytes.to_vec()).map_err(record_codec::Error::custom)
}

/// A directory of pose files in one format.
#[derive(Debug, Clone)]
pub struct Store {
    dir: PathBuf,
    format: StoreFormat,
    style: TextStyle,
}

impl Store {
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            dir: config.dir.clone(),
            format: config.format,
            style: if config.pretty {
                TextStyle::Pretty
            } else {
                TextStyle::Compact
            },
        }
    }

    #[must_use]
    pub fn with_format(mut self, format: StoreFormat) -> Self {
        self.format = format;
        self
    }

    #[must_use]
    pub fn with_style(mut self, style: TextStyle) -> Self {
        self.style = style;
        self
    }

    pub fn style(&self) -> TextStyle {
        self.style
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.{}", self.format.extension()))
    }

    /// Saves an animation under `name`.
    ///
    /// Animations without keyframes are not saved and `Ok(false)` is
    /// returned.
    pub fn save(&self, name: &str, animation: &mut PoseAnimation) -> Result<bool> {
        if animation.is_empty() {
            log::info!("not saving `{name}`: animation has no keyframes");
            return Ok(false);
        }

        let bytes = self
            .format
            .encode(animation, self.style)
            .with_context(|| format!("cannot encode `{name}`"))?;

        fs::create_dir_all(&self.dir)
            .with_context(|| format!("cannot create store directory {:?}", self.dir))?;

        let path = self.path(name);
        fs::write(&path, bytes).with_context(|| format!("cannot write {path:?}"))?;

        log::info!("saved `{name}` to {path:?}");
        Ok(true)
    }

    /// Loads the animation saved under `name`.
    ///
    /// Returns [`None`] if the file is missing or cannot be read. A file that
    /// can be read but doesn't decode yields an empty animation.
    pub fn load(&self, name: &str) -> Option<PoseAnimation> {
        let path = self.path(name);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(why) if why.kind() == io::ErrorKind::NotFound => {
                log::debug!("no pose file at {path:?}");
                return None;
            },
            Err(why) => {
                log::warn!("cannot read {path:?}: {why}");
                return None;
            },
        };

        match self.format.decode(&bytes) {
            Ok(animation) => Some(animation),
            Err(why) => {
                match why.kind() {
                    ErrorKind::Format => log::warn!("{path:?} is corrupt: {why}"),
                    _ => log::error!("failed to load {path:?}: {why}"),
                }

                Some(PoseAnimation::default())
            },
        }
    }

    /// Deletes the file saved under `name`.
    ///
    /// Returns whether a file was deleted.
    pub fn delete(&self, name: &str) -> Result<bool> {
        let path = self.path(name);
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(why) if why.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(why) => Err(why).with_context(|| format!("cannot delete {path:?}")),
        }
    }

    /// Lists the names of all saved animations in this store's format,
    /// sorted.
    pub fn list(&self) -> Result<Vec<String>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(why) if why.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(why) => return Err(why).with_context(|| format!("cannot list {:?}", self.dir)),
        };

        let mut names = Vec::new();
        for entry in entries {
            let path = entry.context("cannot read store entry")?.path();
            if StoreFormat::from_path(&path) != Some(self.format) {
                continue;
            }

            if let Some(stem) = path.file_stem().and_then(OsStr::to_str) {
                names.push(stem.to_owned());
            }
        }

        names.sort_unstable();
        Ok(names)
    }
}

/// Reads a pose file, picking the format by its extension.
pub fn read_file(path: &Path) -> Result<(StoreFormat, Vec<u8>)> {
    let format = StoreFormat::from_path(path)
        .with_context(|| format!("unknown pose file extension: {path:?}"))?;
    let bytes = fs::read(path).with_context(|| format!("cannot read {path:?}"))?;
    Ok((format, bytes))
}
