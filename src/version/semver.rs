//! Semantic version parsing and increments.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Serialize, Serializer};

use super::VersionError;

#[allow(clippy::unwrap_used)] // Compile-time constant regex pattern
static SEMVER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(0|[1-9]\d*)\.(0|[1-9]\d*)\.(0|[1-9]\d*)(?:-((?:0|[1-9]\d*|\d*[a-zA-Z-][0-9a-zA-Z-]*)(?:\.(?:0|[1-9]\d*|\d*[a-zA-Z-][0-9a-zA-Z-]*))*))?(?:\+([0-9a-zA-Z-]+(?:\.[0-9a-zA-Z-]+)*))?$",
    )
    .unwrap()
});

/// Which component a bump increments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum VersionPart {
    /// Breaking change: resets minor and patch.
    Major,
    /// New feature: resets patch.
    Minor,
    /// Fix.
    Patch,
}

impl fmt::Display for VersionPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Major => "major",
            Self::Minor => "minor",
            Self::Patch => "patch",
        })
    }
}

/// A `MAJOR.MINOR.PATCH[-PRE][+BUILD]` version.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SemanticVersion {
    /// Major component.
    pub major: u64,
    /// Minor component.
    pub minor: u64,
    /// Patch component.
    pub patch: u64,
    /// Pre-release suffix without the leading `-`.
    pub pre_release: Option<String>,
    /// Build metadata without the leading `+`.
    pub build: Option<String>,
}

impl SemanticVersion {
    /// Creates a release version.
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
            pre_release: None,
            build: None,
        }
    }

    /// Next version for `part`. Pre-release and build metadata are dropped.
    pub fn bump(&self, part: VersionPart) -> Result<Self, VersionError> {
        let next = |n: u64| {
            n.checked_add(1).ok_or_else(|| VersionError::Overflow {
                version: self.to_string(),
                part,
            })
        };
        Ok(match part {
            VersionPart::Major => Self::new(next(self.major)?, 0, 0),
            VersionPart::Minor => Self::new(self.major, next(self.minor)?, 0),
            VersionPart::Patch => Self::new(self.major, self.minor, next(self.patch)?),
        })
    }

    /// Whether the version carries a pre-release suffix.
    pub fn is_pre_release(&self) -> bool {
        self.pre_release.is_some()
    }
}

impl FromStr for SemanticVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || VersionError::InvalidVersion {
            version: s.to_string(),
        };
        let caps = SEMVER_PATTERN.captures(s.trim()).ok_or_else(invalid)?;
        let number = |index: usize| -> Result<u64, VersionError> {
            caps.get(index)
                .and_then(|m| m.as_str().parse().ok())
                .ok_or_else(invalid)
        };

        Ok(Self {
            major: number(1)?,
            minor: number(2)?,
            patch: number(3)?,
            pre_release: caps.get(4).map(|m| m.as_str().to_string()),
            build: caps.get(5).map(|m| m.as_str().to_string()),
        })
    }
}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(pre) = &self.pre_release {
            write!(f, "-{pre}")?;
        }
        if let Some(build) = &self.build {
            write!(f, "+{build}")?;
        }
        Ok(())
    }
}

impl Serialize for SemanticVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> SemanticVersion {
        s.parse().unwrap()
    }

    fn bump(s: &str, part: VersionPart) -> String {
        v(s).bump(part).unwrap().to_string()
    }

    #[test]
    fn bump_rules() {
        assert_eq!(bump("1.2.3", VersionPart::Patch), "1.2.4");
        assert_eq!(bump("1.2.3", VersionPart::Minor), "1.3.0");
        assert_eq!(bump("1.2.3", VersionPart::Major), "2.0.0");
    }

    #[test]
    fn bump_past_u64_max_is_an_error() {
        let err = v("18446744073709551615.0.0").bump(VersionPart::Major).unwrap_err();
        assert!(matches!(
            err,
            VersionError::Overflow {
                part: VersionPart::Major,
                ..
            }
        ));
        insta::assert_snapshot!(err.to_string(), @"cannot bump major component of 18446744073709551615.0.0: it would overflow");

        let err = v("1.2.18446744073709551615").bump(VersionPart::Patch).unwrap_err();
        assert!(matches!(err, VersionError::Overflow { .. }));
        assert_eq!(bump("1.2.18446744073709551615", VersionPart::Minor), "1.3.0");
    }

    #[test]
    fn bump_drops_pre_release_and_build() {
        for part in [VersionPart::Major, VersionPart::Minor, VersionPart::Patch] {
            let next = v("1.2.3-beta+exp.sha.5114f85").bump(part).unwrap();
            assert!(!next.is_pre_release());
            assert_eq!(next.build, None);
        }
        assert_eq!(bump("1.2.3-beta", VersionPart::Patch), "1.2.4");
    }

    #[test]
    fn parses_pre_release_and_build() {
        let version = v("1.0.0-alpha.1+build.7");
        assert_eq!(version.pre_release.as_deref(), Some("alpha.1"));
        assert_eq!(version.build.as_deref(), Some("build.7"));
        assert_eq!(version.to_string(), "1.0.0-alpha.1+build.7");
    }

    #[test]
    fn rejects_malformed_versions() {
        for bad in ["1.2", "1.2.3.4", "01.2.3", "1.2.3-", "1.2.3-01", "v1.2.3", ""] {
            assert!(bad.parse::<SemanticVersion>().is_err(), "{bad} should be rejected");
        }
    }

    mod prop {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn bump_increases_and_resets(
                major in 0_u64..1000,
                minor in 0_u64..1000,
                patch in 0_u64..1000,
            ) {
                let base = SemanticVersion::new(major, minor, patch);
                prop_assert_eq!(base.bump(VersionPart::Major).unwrap(), SemanticVersion::new(major + 1, 0, 0));
                prop_assert_eq!(base.bump(VersionPart::Minor).unwrap(), SemanticVersion::new(major, minor + 1, 0));
                prop_assert_eq!(base.bump(VersionPart::Patch).unwrap(), SemanticVersion::new(major, minor, patch + 1));
            }

            #[test]
            fn display_parses_back(
                major in 0_u64..10_000,
                minor in 0_u64..10_000,
                patch in 0_u64..10_000,
                pre in proptest::option::of("[a-z][a-z0-9]{0,6}"),
            ) {
                let version = SemanticVersion { pre_release: pre, ..SemanticVersion::new(major, minor, patch) };
                prop_assert_eq!(version.to_string().parse::<SemanticVersion>().unwrap(), version);
            }
        }
    }
}
