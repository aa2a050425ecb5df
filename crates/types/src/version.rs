//! Module link addresses and the version comparator used for link supersession.
//!
//! Links are addressed as `module/version/path`. Versions are dotted numeric
//! strings; every segment after the first is zero-padded to a fixed width and the
//! result compared as a decimal number, so `1.10` (`1.010`) ranks above `1.2`
//! (`1.002`). The literal version `default` ranks below every explicit version.
//!
//! The fixed-width normalization only holds while segments stay within
//! [`SEGMENT_WIDTH`] digits; wider segments are accepted with a warning.

use nom::bytes::complete::take_till1;
use nom::character::complete::{char, digit1};
use nom::combinator::{all_consuming, rest, verify};
use nom::multi::separated_list1;
use nom::{IResult, Parser};
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The version token that always ranks below an explicit version.
pub const DEFAULT_VERSION: &str = "default";

/// Width every minor segment is padded to before comparison.
pub const SEGMENT_WIDTH: usize = 3;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
    #[error("Malformed link address '{0}': expected 'module/version/path'")]
    MalformedAddress(String),
    #[error("Malformed version '{0}': expected dotted numeric segments")]
    MalformedVersion(String),
}

/// A parsed module version.
#[derive(Debug, Clone, PartialEq)]
pub enum ModuleVersion {
    /// The `default` placeholder version.
    Default,
    /// An explicit version with its normalized comparison key.
    Explicit { raw: String, key: Decimal },
}

impl ModuleVersion {
    /// Parses a version string. Never fails: a malformed version is logged and
    /// compared as `0`.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw == DEFAULT_VERSION {
            return Self::Default;
        }
        let key = normalize(raw).unwrap_or_else(|err| {
            log::warn!("{err}; comparing it as version 0");
            Decimal::ZERO
        });
        Self::Explicit {
            raw: raw.to_string(),
            key,
        }
    }

    pub fn is_default(&self) -> bool {
        matches!(self, Self::Default)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Default => DEFAULT_VERSION,
            Self::Explicit { raw, .. } => raw,
        }
    }

    /// The normalized comparison key, `None` for `default`.
    pub fn normalized(&self) -> Option<Decimal> {
        match self {
            Self::Default => None,
            Self::Explicit { key, .. } => Some(*key),
        }
    }

    /// Whether a link at this version replaces one already registered at `existing`.
    ///
    /// `default` never replaces anything; an explicit version replaces `default`
    /// and any strictly lower explicit version.
    pub fn supersedes(&self, existing: &ModuleVersion) -> bool {
        match (self, existing) {
            (Self::Default, _) => false,
            (Self::Explicit { .. }, Self::Default) => true,
            (Self::Explicit { key: new, .. }, Self::Explicit { key: old, .. }) => new > old,
        }
    }
}

impl fmt::Display for ModuleVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn version_segments(input: &str) -> IResult<&str, Vec<&str>> {
    all_consuming(separated_list1(char('.'), digit1)).parse(input)
}

fn normalize(raw: &str) -> Result<Decimal, VersionError> {
    let malformed = || VersionError::MalformedVersion(raw.to_string());
    let (_, segments) = version_segments(raw).map_err(|_| malformed())?;
    let (major, minor) = segments.split_first().ok_or_else(malformed)?;

    let mut text = major.to_string();
    if !minor.is_empty() {
        text.push('.');
        for segment in minor {
            if segment.len() > SEGMENT_WIDTH {
                log::warn!(
                    "Version segment '{segment}' in '{raw}' exceeds {SEGMENT_WIDTH} digits; ordering may be inaccurate"
                );
            }
            text.push_str(&format!("{:0>width$}", segment, width = SEGMENT_WIDTH));
        }
    }
    Decimal::from_str(&text).map_err(|_| malformed())
}

/// A `module/version/path` link address.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkAddress {
    pub module: String,
    pub version: ModuleVersion,
    pub path: String,
}

fn address_parts(input: &str) -> IResult<&str, (&str, &str, &str)> {
    let (input, (module, _, version, _, path)) = (
        take_till1(|c: char| c == '/'),
        char('/'),
        take_till1(|c: char| c == '/'),
        char('/'),
        verify(rest, |s: &str| !s.is_empty()),
    )
        .parse(input)?;
    Ok((input, (module, version, path)))
}

impl LinkAddress {
    pub fn parse(address: &str) -> Result<Self, VersionError> {
        let (_, (module, version, path)) = address_parts(address.trim())
            .map_err(|_| VersionError::MalformedAddress(address.to_string()))?;
        Ok(Self {
            module: module.to_string(),
            version: ModuleVersion::parse(version),
            path: path.to_string(),
        })
    }

    /// The deduplication key: links differing only in version share it.
    pub fn dedup_key(&self) -> (String, String) {
        (self.module.clone(), self.path.clone())
    }
}

impl fmt::Display for LinkAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.module, self.version, self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(v: &str) -> Decimal {
        ModuleVersion::parse(v).normalized().unwrap()
    }

    #[test]
    fn test_padded_comparison_is_numeric() {
        assert!(key("1.10") > key("1.2"));
        assert!(key("1.2") > key("1.1"));
        assert!(key("2") > key("1.999"));
        assert_eq!(key("1.01"), key("1.1"));
    }

    #[test]
    fn test_default_ordering() {
        let default = ModuleVersion::parse("default");
        let explicit = ModuleVersion::parse("0.1");
        assert!(default.is_default());
        assert!(explicit.supersedes(&default));
        assert!(!default.supersedes(&explicit));
        assert!(!default.supersedes(&ModuleVersion::Default));
    }

    #[test]
    fn test_equal_versions_do_not_supersede() {
        let a = ModuleVersion::parse("1.4");
        let b = ModuleVersion::parse("1.4");
        assert!(!a.supersedes(&b));
    }

    #[test]
    fn test_malformed_version_degrades_to_zero() {
        let v = ModuleVersion::parse("1.x");
        assert_eq!(v.normalized(), Some(Decimal::ZERO));
        assert_eq!(v.as_str(), "1.x");
        assert!(ModuleVersion::parse("0.0.1").supersedes(&v));
    }

    #[test]
    fn test_three_segments_follow_padding_rule() {
        // 1.2.10 -> 1.002010, 1.2.9 -> 1.002009
        assert!(key("1.2.10") > key("1.2.9"));
        assert!(key("1.3") > key("1.2.10"));
    }

    #[test]
    fn test_parse_link_address() {
        let link = LinkAddress::parse("widgets/1.10/js/tooltip.js").unwrap();
        assert_eq!(link.module, "widgets");
        assert_eq!(link.version.as_str(), "1.10");
        assert_eq!(link.path, "js/tooltip.js");
        assert_eq!(link.to_string(), "widgets/1.10/js/tooltip.js");
        assert_eq!(
            link.dedup_key(),
            ("widgets".to_string(), "js/tooltip.js".to_string())
        );
    }

    #[test]
    fn test_malformed_link_addresses() {
        for bad in ["", "widgets", "widgets/1.0", "widgets/1.0/", "/1.0/a.js", "widgets//a.js"] {
            assert!(
                matches!(LinkAddress::parse(bad), Err(VersionError::MalformedAddress(_))),
                "{bad:?} should be rejected"
            );
        }
    }
}
