//! Three-part numeric firmware versions.
//!
//! Versions are exactly `<major>.<minor>.<patch>` with non-negative integer
//! segments. No pre-release or build-metadata support: an appliance image
//! either carries a release number or it is not installable.

use crate::error::{Result, UpdateError};
use std::fmt;

/// A parsed firmware version, totally ordered by segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FirmwareVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl FirmwareVersion {
    /// Parse a strict `major.minor.patch` string.
    ///
    /// Anything else (wrong segment count, empty or non-numeric segments,
    /// sign characters, a leading `v`) is `InvalidVersionFormat`.
    pub fn parse(raw: &str) -> Result<Self> {
        let mut segments = raw.split('.');
        let (major, minor, patch) = match (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) {
            (Some(a), Some(b), Some(c), None) => (a, b, c),
            _ => return Err(UpdateError::InvalidVersionFormat(raw.to_string())),
        };

        let parse_segment = |segment: &str| -> Result<u64> {
            if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
                return Err(UpdateError::InvalidVersionFormat(raw.to_string()));
            }
            segment
                .parse()
                .map_err(|_| UpdateError::InvalidVersionFormat(raw.to_string()))
        };

        Ok(Self {
            major: parse_segment(major)?,
            minor: parse_segment(minor)?,
            patch: parse_segment(patch)?,
        })
    }
}

impl fmt::Display for FirmwareVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Gating predicate: may `candidate` be (re)installed over `installed`?
///
/// Equal versions answer true: ties are not skipped, they flow into the
/// integrity-check path of the update engine.
pub fn is_newer_or_equal(candidate: &str, installed: &str) -> Result<bool> {
    Ok(FirmwareVersion::parse(candidate)? >= FirmwareVersion::parse(installed)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_versions() {
        let v = FirmwareVersion::parse("1.2.3").unwrap();
        assert_eq!((v.major, v.minor, v.patch), (1, 2, 3));
        assert_eq!(v.to_string(), "1.2.3");
    }

    #[test]
    fn rejects_malformed_versions() {
        for raw in ["1.2", "1.2.3.4", "a.b.c", "1.2.", "", "v1.2.3", "1.-2.3", "1.2. 3"] {
            assert!(
                matches!(
                    FirmwareVersion::parse(raw),
                    Err(UpdateError::InvalidVersionFormat(_))
                ),
                "accepted {raw:?}"
            );
        }
    }

    #[test]
    fn compares_numerically_per_segment() {
        // Must not compare segments lexically: 10 > 9.
        assert!(is_newer_or_equal("0.10.0", "0.9.9").unwrap());
        assert!(!is_newer_or_equal("0.9.9", "0.10.0").unwrap());
        assert!(is_newer_or_equal("2.0.0", "1.99.99").unwrap());
    }

    #[test]
    fn equal_versions_are_acceptable() {
        assert!(is_newer_or_equal("1.2.0", "1.2.0").unwrap());
    }

    #[test]
    fn strictly_older_is_rejected() {
        assert!(!is_newer_or_equal("1.1.9", "1.2.0").unwrap());
    }

    #[test]
    fn gating_surfaces_bad_input() {
        assert!(is_newer_or_equal("1.2", "1.2.0").is_err());
        assert!(is_newer_or_equal("1.2.0", "latest").is_err());
    }
}
