//! crates/doc_tracker_core/src/versioning.rs
//!
//! Suggestions for the next `major.minor.patch` version string.
//!
//! These are only suggestions offered to the user; the document store accepts
//! any version string, including ones that go backwards.

use std::fmt;
use std::str::FromStr;

/// Which component of the version to increment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionBump {
    Patch,
    Minor,
    Major,
}

impl VersionBump {
    pub const ALL: [VersionBump; 3] = [VersionBump::Patch, VersionBump::Minor, VersionBump::Major];
}

impl fmt::Display for VersionBump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            VersionBump::Patch => "patch",
            VersionBump::Minor => "minor",
            VersionBump::Major => "major",
        })
    }
}

/// A parsed three-part version number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SemVer {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl SemVer {
    /// The next version for `bump`, or `None` if the component would overflow.
    pub fn bump(self, bump: VersionBump) -> Option<Self> {
        let next = match bump {
            VersionBump::Patch => Self {
                patch: self.patch.checked_add(1)?,
                ..self
            },
            VersionBump::Minor => Self {
                minor: self.minor.checked_add(1)?,
                patch: 0,
                ..self
            },
            VersionBump::Major => Self {
                major: self.major.checked_add(1)?,
                minor: 0,
                patch: 0,
            },
        };
        Some(next)
    }
}

impl fmt::Display for SemVer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a major.minor.patch version")]
pub struct MalformedVersion(pub String);

impl FromStr for SemVer {
    type Err = MalformedVersion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let numbers = s
            .trim()
            .split('.')
            .map(|p| p.trim().parse::<u64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| MalformedVersion(s.to_string()))?;
        match numbers.as_slice() {
            [major, minor, patch] => Ok(SemVer {
                major: *major,
                minor: *minor,
                patch: *patch,
            }),
            _ => Err(MalformedVersion(s.to_string())),
        }
    }
}

/// Suggests the next version string, or `None` when `current` does not parse
/// or the bumped component would not fit.
pub fn suggest_next(current: &str, bump: VersionBump) -> Option<String> {
    current
        .parse::<SemVer>()
        .ok()?
        .bump(bump)
        .map(|v| v.to_string())
}

pub fn next_patch(current: &str) -> Option<String> {
    suggest_next(current, VersionBump::Patch)
}

pub fn next_minor(current: &str) -> Option<String> {
    suggest_next(current, VersionBump::Minor)
}

pub fn next_major(current: &str) -> Option<String> {
    suggest_next(current, VersionBump::Major)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bumps_each_component() {
        assert_eq!(next_patch("1.1.0").as_deref(), Some("1.1.1"));
        assert_eq!(next_minor("1.1.3").as_deref(), Some("1.2.0"));
        assert_eq!(next_major("2.4.9").as_deref(), Some("3.0.0"));
    }

    #[test]
    fn malformed_versions_have_no_suggestion() {
        assert_eq!(next_patch("1.2"), None);
        assert_eq!(next_minor("v1.2.3"), None);
        assert_eq!(next_major("1.2.3.4"), None);
        assert_eq!(next_patch(""), None);
    }

    #[test]
    fn maxed_out_components_have_no_suggestion() {
        let max = u64::MAX;
        assert_eq!(next_patch(&format!("1.0.{max}")), None);
        assert_eq!(next_minor(&format!("1.{max}.7")), None);
        assert_eq!(next_major(&format!("{max}.0.0")), None);
        // Only the bumped component matters.
        assert_eq!(next_major(&format!("1.{max}.{max}")).as_deref(), Some("2.0.0"));
    }

    #[test]
    fn parsed_versions_order_numerically() {
        let a: SemVer = "1.10.0".parse().unwrap();
        let b: SemVer = "1.9.0".parse().unwrap();
        assert!(a > b);
    }
}
