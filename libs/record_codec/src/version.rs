//! Version ranges and the field gating shared by all backends.

use crate::error::{Error, Result};

/// The inclusive range of stream versions a field is present in.
///
/// The upper bound may be open, in which case the field stays present in every
/// version from `first` on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Versions {
    first: u32,
    last: Option<u32>,
}

impl Versions {
    /// Present in every version.
    pub const ALL: Self = Self {
        first: 0,
        last: None,
    };

    /// Present from `first` on.
    pub const fn since(first: u32) -> Self {
        Self { first, last: None }
    }

    /// Present up to and including `last`.
    pub const fn until(last: u32) -> Self {
        Self {
            first: 0,
            last: Some(last),
        }
    }

    /// Present from `first` up to and including `last`.
    ///
    /// If `last` is less than `first`, the field is present in `first` only.
    pub const fn between(first: u32, last: u32) -> Self {
        Self {
            first,
            last: Some(if last < first { first } else { last }),
        }
    }

    /// The first version the field is present in.
    pub const fn first(self) -> u32 {
        self.first
    }

    /// The last version the field is present in, if it was retired.
    pub const fn last(self) -> Option<u32> {
        match self.last {
            Some(last) if last < self.first => Some(self.first),
            last => last,
        }
    }

    /// Whether a stream of `version` holds the field.
    pub const fn contains(self, version: u32) -> bool {
        if version < self.first {
            return false;
        }

        match self.last() {
            Some(last) => version <= last,
            None => true,
        }
    }
}

impl Default for Versions {
    fn default() -> Self {
        Self::ALL
    }
}

/// Decides whether a field is physically present in a stream of `version`.
///
/// This is the same for reading and writing sessions: when it returns
/// `false`, a writer must emit nothing for the field and a reader must not
/// look for it but assign the field's default instead.
///
/// # Errors
///
/// Returns [`Error::VersionNotBumped`] if the whole range lies past `latest`.
pub fn gate(name: &str, versions: Versions, version: u32, latest: u32) -> Result<bool> {
    let first = versions.first();
    let last = versions.last().unwrap_or(first);
    if first > latest && last > latest {
        return Err(Error::VersionNotBumped {
            name: name.to_owned(),
            first,
            latest,
        });
    }

    Ok(versions.contains(version))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_range() {
        let v = Versions::since(2);
        assert!(!v.contains(1), "before first");
        assert!(v.contains(2), "at first");
        assert!(v.contains(u32::MAX), "open end");
    }

    #[test]
    fn closed_range() {
        let v = Versions::between(2, 4);
        assert!(!v.contains(1), "before first");
        assert!(v.contains(3), "inside");
        assert!(v.contains(4), "at last");
        assert!(!v.contains(5), "after last");
    }

    #[test]
    fn inverted_range_collapses() {
        let v = Versions::between(3, 1);
        assert_eq!(v.last(), Some(3), "last is raised to first");
        assert!(v.contains(3), "first is present");
        assert!(!v.contains(2), "below first");
    }

    #[test]
    fn gate_rejects_unbumped_version() {
        let err = gate("late", Versions::since(4), 3, 3).expect_err("first > latest");
        assert!(
            matches!(err, Error::VersionNotBumped { first: 4, latest: 3, .. }),
            "wrong error: {err:?}"
        );

        assert!(
            !gate("old", Versions::until(1), 3, 3).expect("retired field is fine"),
            "retired field is absent"
        );
    }
}
