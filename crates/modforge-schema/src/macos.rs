//! macOS release versions.
//!
//! Formulas gate dependencies on the host release ("Mavericks and older
//! need a newer curl"), so versions must be totally ordered. Only the
//! `major.minor` pair matters for those comparisons; patch levels are
//! accepted on input and discarded.
//!
//! # Example
//!
//! ```
//! use modforge_schema::MacosVersion;
//!
//! let host: MacosVersion = "10.9.5".parse().unwrap();
//! assert_eq!(host, MacosVersion::MAVERICKS);
//! assert!(host < MacosVersion::SIERRA);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced when parsing a [`MacosVersion`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
    /// The input was empty.
    #[error("Empty macOS version")]
    Empty,

    /// The input is neither a dotted version nor a known release name.
    #[error("Unknown macOS version: {0}")]
    Unknown(String),
}

/// A macOS release, ordered by `(major, minor)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MacosVersion {
    major: u32,
    minor: u32,
}

/// Release names accepted by [`MacosVersion::from_str`](std::str::FromStr).
const CODENAMES: &[(&str, MacosVersion)] = &[
    ("mavericks", MacosVersion::MAVERICKS),
    ("yosemite", MacosVersion::YOSEMITE),
    ("el_capitan", MacosVersion::EL_CAPITAN),
    ("sierra", MacosVersion::SIERRA),
    ("high_sierra", MacosVersion::HIGH_SIERRA),
    ("mojave", MacosVersion::MOJAVE),
    ("catalina", MacosVersion::CATALINA),
    ("big_sur", MacosVersion::BIG_SUR),
    ("monterey", MacosVersion::MONTEREY),
    ("ventura", MacosVersion::VENTURA),
    ("sonoma", MacosVersion::SONOMA),
    ("sequoia", MacosVersion::SEQUOIA),
];

impl MacosVersion {
    /// OS X 10.9
    pub const MAVERICKS: Self = Self::new(10, 9);
    /// OS X 10.10
    pub const YOSEMITE: Self = Self::new(10, 10);
    /// OS X 10.11
    pub const EL_CAPITAN: Self = Self::new(10, 11);
    /// macOS 10.12
    pub const SIERRA: Self = Self::new(10, 12);
    /// macOS 10.13
    pub const HIGH_SIERRA: Self = Self::new(10, 13);
    /// macOS 10.14
    pub const MOJAVE: Self = Self::new(10, 14);
    /// macOS 10.15
    pub const CATALINA: Self = Self::new(10, 15);
    /// macOS 11
    pub const BIG_SUR: Self = Self::new(11, 0);
    /// macOS 12
    pub const MONTEREY: Self = Self::new(12, 0);
    /// macOS 13
    pub const VENTURA: Self = Self::new(13, 0);
    /// macOS 14
    pub const SONOMA: Self = Self::new(14, 0);
    /// macOS 15
    pub const SEQUOIA: Self = Self::new(15, 0);

    /// Create a version from its numeric components.
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Major release number (`10` for 10.9, `14` for Sonoma).
    pub fn major(&self) -> u32 {
        self.major
    }

    /// Minor release number.
    pub fn minor(&self) -> u32 {
        self.minor
    }

    /// Release name in lowercase snake case, if this is a named release.
    pub fn codename(&self) -> Option<&'static str> {
        CODENAMES
            .iter()
            .find(|(_, v)| v == self)
            .map(|(name, _)| *name)
    }
}

impl std::fmt::Display for MacosVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Releases from Big Sur on are referred to by major number alone,
        // which is also how the SDK and toolchain directories are named.
        if self.major >= 11 && self.minor == 0 {
            write!(f, "{}", self.major)
        } else {
            write!(f, "{}.{}", self.major, self.minor)
        }
    }
}

impl std::str::FromStr for MacosVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(VersionError::Empty);
        }

        let lowered = s.to_lowercase().replace(['-', ' '], "_");
        if let Some((_, v)) = CODENAMES.iter().find(|(name, _)| *name == lowered) {
            return Ok(*v);
        }

        let mut parts = s.split('.');
        let major = parts
            .next()
            .and_then(|p| p.parse::<u32>().ok())
            .ok_or_else(|| VersionError::Unknown(s.to_string()))?;
        let minor = match parts.next() {
            Some(p) => p
                .parse::<u32>()
                .map_err(|_| VersionError::Unknown(s.to_string()))?,
            None => 0,
        };
        // A patch level is accepted and dropped; anything beyond it is not.
        if let Some(patch) = parts.next() {
            patch
                .parse::<u32>()
                .map_err(|_| VersionError::Unknown(s.to_string()))?;
        }
        if parts.next().is_some() {
            return Err(VersionError::Unknown(s.to_string()));
        }

        Ok(Self::new(major, minor))
    }
}

impl TryFrom<String> for MacosVersion {
    type Error = VersionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MacosVersion> for String {
    fn from(v: MacosVersion) -> Self {
        v.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dotted() {
        assert_eq!("10.9".parse::<MacosVersion>().unwrap(), MacosVersion::MAVERICKS);
        assert_eq!("10.12.6".parse::<MacosVersion>().unwrap(), MacosVersion::SIERRA);
        assert_eq!("14".parse::<MacosVersion>().unwrap(), MacosVersion::SONOMA);
    }

    #[test]
    fn test_parse_codename() {
        assert_eq!("Mavericks".parse::<MacosVersion>().unwrap(), MacosVersion::MAVERICKS);
        assert_eq!("el capitan".parse::<MacosVersion>().unwrap(), MacosVersion::EL_CAPITAN);
        assert_eq!("high-sierra".parse::<MacosVersion>().unwrap(), MacosVersion::HIGH_SIERRA);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!("".parse::<MacosVersion>(), Err(VersionError::Empty));
        assert!("leopard".parse::<MacosVersion>().is_err());
        assert!("10.x".parse::<MacosVersion>().is_err());
        assert_eq!(
            "10.9.garbage".parse::<MacosVersion>(),
            Err(VersionError::Unknown("10.9.garbage".to_string()))
        );
        assert!("10.12.6.1".parse::<MacosVersion>().is_err());
    }

    #[test]
    fn test_ordering_is_numeric() {
        // 10.10 sorts after 10.9, not lexicographically before it
        assert!(MacosVersion::YOSEMITE > MacosVersion::MAVERICKS);
        assert!(MacosVersion::BIG_SUR > MacosVersion::CATALINA);
        assert!(MacosVersion::new(10, 8) < MacosVersion::MAVERICKS);
    }

    #[test]
    fn test_display() {
        assert_eq!(MacosVersion::SIERRA.to_string(), "10.12");
        assert_eq!(MacosVersion::SONOMA.to_string(), "14");
        assert_eq!(MacosVersion::new(11, 2).to_string(), "11.2");
    }

    #[test]
    fn test_codename_lookup() {
        assert_eq!(MacosVersion::YOSEMITE.codename(), Some("yosemite"));
        assert_eq!(MacosVersion::new(11, 2).codename(), None);
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&MacosVersion::SIERRA).unwrap();
        assert_eq!(json, "\"10.12\"");
        let back: MacosVersion = serde_json::from_str("\"mavericks\"").unwrap();
        assert_eq!(back, MacosVersion::MAVERICKS);
    }
}
