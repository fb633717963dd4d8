//! Version canonicalization
//!
//! Turns raw version strings taken from manifests into totally ordered
//! semantic versions:
//! - An optional leading `v` is accepted (`v1.2.3`, `1.2.3`)
//! - Shorthand `1` and `1.2` are padded to `1.0.0` and `1.2.0`
//! - Build metadata (`+incompatible`, `+build.5`) is dropped
//!
//! Ranges, git refs, tags like `latest` and PEP 440 forms such as `1.0rc1`
//! are rejected.

use semver::{BuildMetadata, Version};
use std::cmp::Ordering;
use std::fmt;

/// A version in canonical semantic-version form
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalVersion(Version);

impl CanonicalVersion {
    /// Returns the underlying semver version
    pub fn as_semver(&self) -> &Version {
        &self.0
    }

    /// Returns true if the version carries a pre-release tag
    pub fn is_prerelease(&self) -> bool {
        !self.0.pre.is_empty()
    }
}

impl fmt::Display for CanonicalVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Canonicalizes a raw version string, returning `None` when it is not a
/// semantic version
pub fn canonicalize(raw: &str) -> Option<CanonicalVersion> {
    let trimmed = raw.trim();
    let body = trimmed.strip_prefix('v').unwrap_or(trimmed);

    // Build metadata never takes part in precedence
    let body = match body.split_once('+') {
        Some((version, build)) if !build.is_empty() => version,
        Some(_) => return None,
        None => body,
    };
    if body.is_empty() {
        return None;
    }

    // Shorthand forms are only valid without a pre-release tag
    let normalized = if body.contains('-') {
        body.to_string()
    } else {
        match body.split('.').count() {
            1 => format!("{}.0.0", body),
            2 => format!("{}.0", body),
            _ => body.to_string(),
        }
    };

    let mut version = Version::parse(&normalized).ok()?;
    version.build = BuildMetadata::EMPTY;
    Some(CanonicalVersion(version))
}

/// Compares two canonical versions by semantic-version precedence
pub fn compare(a: &CanonicalVersion, b: &CanonicalVersion) -> Ordering {
    a.cmp(b)
}

/// Returns true if `new` is a strict upgrade over `old`
///
/// Both sides must canonicalize; anything else is not an upgrade.
pub fn is_upgrade(old: &str, new: &str) -> bool {
    match (canonicalize(old), canonicalize(new)) {
        (Some(old), Some(new)) => compare(&old, &new) == Ordering::Less,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canon(raw: &str) -> String {
        canonicalize(raw)
            .unwrap_or_else(|| panic!("{raw} should canonicalize"))
            .to_string()
    }

    #[test]
    fn test_accepts_with_and_without_v() {
        assert_eq!(canon("1.2.3"), "v1.2.3");
        assert_eq!(canon("v1.2.3"), "v1.2.3");
        assert_eq!(canonicalize("1.2.3"), canonicalize("v1.2.3"));
    }

    #[test]
    fn test_trims_whitespace() {
        assert_eq!(canon("  4.17.21 "), "v4.17.21");
    }

    #[test]
    fn test_pads_shorthand() {
        assert_eq!(canon("1"), "v1.0.0");
        assert_eq!(canon("v1.2"), "v1.2.0");
        assert_eq!(canon("2.28"), "v2.28.0");
    }

    #[test]
    fn test_keeps_prerelease() {
        assert_eq!(canon("v1.2.3-beta.1"), "v1.2.3-beta.1");
        assert!(canonicalize("1.2.3-rc.1").unwrap().is_prerelease());
    }

    #[test]
    fn test_go_pseudo_version() {
        assert_eq!(
            canon("v0.0.0-20210101120000-abcdef123456"),
            "v0.0.0-20210101120000-abcdef123456"
        );
    }

    #[test]
    fn test_drops_build_metadata() {
        assert_eq!(canon("v2.0.0+incompatible"), "v2.0.0");
        assert_eq!(canonicalize("1.0.0+build.1"), canonicalize("1.0.0+build.2"));
    }

    #[test]
    fn test_rejects_non_semver() {
        for raw in [
            "",
            "   ",
            "v",
            "latest",
            "*",
            "1.x",
            ">=1.0.0 <2.0.0",
            "1.0.0 || 2.0.0",
            "github:user/repo#main",
            "git+https://github.com/a/b.git",
            "1.0rc1",
            "1.2.3.4",
            "01.2.3",
            "1.2-beta",
            "+build",
            "1.2.3+",
        ] {
            assert!(canonicalize(raw).is_none(), "{raw:?} should be rejected");
        }
    }

    #[test]
    fn test_precedence() {
        let ordered = [
            "0.9.9",
            "1.0.0-alpha",
            "1.0.0-alpha.1",
            "1.0.0-beta",
            "1.0.0-rc.1",
            "1.0.0",
            "1.0.1",
            "1.1.0",
            "1.10.0",
            "2.0.0",
        ];
        for pair in ordered.windows(2) {
            let a = canonicalize(pair[0]).unwrap();
            let b = canonicalize(pair[1]).unwrap();
            assert_eq!(compare(&a, &b), Ordering::Less, "{} < {}", pair[0], pair[1]);
            assert_eq!(compare(&b, &a), Ordering::Greater);
        }
    }

    #[test]
    fn test_is_upgrade() {
        assert!(is_upgrade("1.0.0", "1.1.0"));
        assert!(is_upgrade("v1.9.0", "v1.10.0"));
        assert!(is_upgrade("1.0.0-rc.1", "1.0.0"));
        assert!(!is_upgrade("1.1.0", "1.0.5"));
        assert!(!is_upgrade("1.0.0", "1.0.0"));
        assert!(!is_upgrade("1.0", "v1.0.0"));
        assert!(!is_upgrade("1.0.0", "latest"));
        assert!(!is_upgrade(">=1.0", "2.0.0"));
    }

    #[test]
    fn test_upgrade_is_antisymmetric() {
        let versions = ["0.1.0", "1.0.0-beta", "1.0.0", "1.0.1", "1.2", "2"];
        for a in versions {
            for b in versions {
                assert!(
                    !(is_upgrade(a, b) && is_upgrade(b, a)),
                    "{a} and {b} cannot both be upgrades of each other"
                );
                let ca = canonicalize(a).unwrap();
                let cb = canonicalize(b).unwrap();
                assert_eq!(is_upgrade(a, b), ca < cb);
            }
        }
    }
}
