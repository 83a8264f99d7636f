//! Checker version identifiers.
//!
//! Versions are `major.minor` releases plus the unreleased `next`, which
//! compares greater than every release.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tsexpect_options::RunOptions;

/// One checker version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TsVersion {
    Release { major: u32, minor: u32 },
    Next,
}

impl TsVersion {
    pub const fn release(major: u32, minor: u32) -> Self {
        TsVersion::Release { major, minor }
    }

    pub fn is_next(&self) -> bool {
        matches!(self, TsVersion::Next)
    }
}

impl fmt::Display for TsVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TsVersion::Release { major, minor } => write!(f, "{}.{}", major, minor),
            TsVersion::Next => write!(f, "next"),
        }
    }
}

impl FromStr for TsVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == "next" {
            return Ok(TsVersion::Next);
        }
        let invalid = || VersionError::Invalid(s.to_string());
        let (major, minor) = s.split_once('.').ok_or_else(invalid)?;
        let parse = |part: &str| -> Result<u32, VersionError> {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            part.parse().map_err(|_| invalid())
        };
        Ok(TsVersion::Release {
            major: parse(major)?,
            minor: parse(minor)?,
        })
    }
}

/// Errors building versions or version lists.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    #[error("invalid version '{0}': expected 'major.minor' or 'next'")]
    Invalid(String),

    #[error("invalid version list: the list is empty")]
    Empty,

    #[error("invalid version list: {previous} is followed by {next}, versions must ascend")]
    NotAscending { previous: TsVersion, next: TsVersion },
}

/// A non-empty, strictly ascending list of versions.
///
/// Index 0 is the lowest supported version, the last entry the highest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionList {
    versions: Vec<TsVersion>,
}

impl VersionList {
    pub fn new(versions: Vec<TsVersion>) -> Result<Self, VersionError> {
        if versions.is_empty() {
            return Err(VersionError::Empty);
        }
        for pair in versions.windows(2) {
            if pair[0] >= pair[1] {
                return Err(VersionError::NotAscending {
                    previous: pair[0].clone(),
                    next: pair[1].clone(),
                });
            }
        }
        Ok(Self { versions })
    }

    /// Parse each entry and validate the resulting list.
    pub fn parse<S: AsRef<str>>(versions: &[S]) -> Result<Self, VersionError> {
        let parsed = versions
            .iter()
            .map(|v| v.as_ref().parse())
            .collect::<Result<Vec<TsVersion>, _>>()?;
        Self::new(parsed)
    }

    /// Versions selected by run options.
    ///
    /// `onlyTestNext` selects `next` alone; `includeNext` appends it to the
    /// declared versions. `maxVersion` drops every version above it, `next`
    /// included.
    pub fn from_options(options: &RunOptions) -> Result<Self, VersionError> {
        if options.only_test_next {
            return Self::new(vec![TsVersion::Next]);
        }
        let max = match options.max_version {
            Some(ref max) => max.parse::<TsVersion>()?,
            None => TsVersion::Next,
        };
        let mut versions = options
            .versions
            .iter()
            .map(|v| v.parse())
            .collect::<Result<Vec<TsVersion>, _>>()?;
        versions.retain(|v| *v <= max);
        if options.include_next && max.is_next() && versions.last() != Some(&TsVersion::Next) {
            versions.push(TsVersion::Next);
        }
        Self::new(versions)
    }

    pub fn lowest(&self) -> &TsVersion {
        &self.versions[0]
    }

    pub fn highest(&self) -> &TsVersion {
        &self.versions[self.versions.len() - 1]
    }

    pub fn get(&self, index: usize) -> Option<&TsVersion> {
        self.versions.get(index)
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    /// Always false; kept for symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn as_slice(&self) -> &[TsVersion] {
        &self.versions
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TsVersion> {
        self.versions.iter()
    }
}

impl<'a> IntoIterator for &'a VersionList {
    type Item = &'a TsVersion;
    type IntoIter = std::slice::Iter<'a, TsVersion>;

    fn into_iter(self) -> Self::IntoIter {
        self.versions.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let v: TsVersion = "4.10".parse().unwrap();
        assert_eq!(v, TsVersion::release(4, 10));
        assert_eq!(v.to_string(), "4.10");
        assert_eq!("next".parse::<TsVersion>().unwrap(), TsVersion::Next);
        assert_eq!(TsVersion::Next.to_string(), "next");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in ["", "4", "4.", ".1", "4.x", "v4.0", "4.0.1", "-1.0"] {
            assert!(bad.parse::<TsVersion>().is_err(), "{:?} should not parse", bad);
        }
    }

    #[test]
    fn test_ordering_is_numeric_and_next_is_greatest() {
        assert!(TsVersion::release(4, 9) < TsVersion::release(4, 10));
        assert!(TsVersion::release(4, 10) < TsVersion::release(5, 0));
        assert!(TsVersion::release(99, 99) < TsVersion::Next);
    }

    #[test]
    fn test_list_validation() {
        assert_eq!(VersionList::new(vec![]), Err(VersionError::Empty));
        let err = VersionList::parse(&["4.5", "4.0"]).unwrap_err();
        assert!(matches!(err, VersionError::NotAscending { .. }));
        assert!(VersionList::parse(&["4.0", "4.0"]).is_err());
        let list = VersionList::parse(&["4.0", "4.5", "next"]).unwrap();
        assert_eq!(list.lowest(), &TsVersion::release(4, 0));
        assert_eq!(list.highest(), &TsVersion::Next);
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn test_from_options() {
        let mut options = RunOptions {
            versions: vec!["4.0".into(), "5.0".into()],
            ..RunOptions::default()
        };
        let list = VersionList::from_options(&options).unwrap();
        assert_eq!(list.as_slice(), &[TsVersion::release(4, 0), TsVersion::release(5, 0)]);

        options.include_next = true;
        let list = VersionList::from_options(&options).unwrap();
        assert_eq!(list.highest(), &TsVersion::Next);
        assert_eq!(list.len(), 3);

        options.only_test_next = true;
        let list = VersionList::from_options(&options).unwrap();
        assert_eq!(list.as_slice(), &[TsVersion::Next]);

        assert_eq!(
            VersionList::from_options(&RunOptions::default()),
            Err(VersionError::Empty)
        );
    }

    #[test]
    fn test_from_options_max_version_caps_list() {
        let mut options = RunOptions {
            versions: vec!["4.0".into(), "4.5".into(), "5.0".into()],
            include_next: true,
            max_version: Some("4.5".into()),
            ..RunOptions::default()
        };
        let list = VersionList::from_options(&options).unwrap();
        assert_eq!(list.as_slice(), &[TsVersion::release(4, 0), TsVersion::release(4, 5)]);
        assert_eq!(list.highest(), &TsVersion::release(4, 5));

        options.max_version = Some("next".into());
        let list = VersionList::from_options(&options).unwrap();
        assert_eq!(list.len(), 4);
        assert_eq!(list.highest(), &TsVersion::Next);

        options.max_version = Some("3.9".into());
        assert_eq!(VersionList::from_options(&options), Err(VersionError::Empty));

        options.max_version = Some("five".into());
        assert!(matches!(
            VersionList::from_options(&options),
            Err(VersionError::Invalid(_))
        ));
    }
}
