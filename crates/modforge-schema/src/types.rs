//! Package names and dependency declarations.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;

/// A normalized package name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct PackageName(String);

impl PackageName {
    /// Create a new package name, normalizing the input to lowercase.
    pub fn new(name: &str) -> Self {
        Self(name.trim().to_lowercase())
    }

    /// Return the normalized name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PackageName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::ops::Deref for PackageName {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<str> for PackageName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for PackageName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other.to_lowercase()
    }
}

impl PartialEq<&str> for PackageName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == other.to_lowercase()
    }
}

impl Borrow<str> for PackageName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PackageName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for PackageName {
    fn from(s: String) -> Self {
        Self::new(&s)
    }
}

impl From<PackageName> for String {
    fn from(name: PackageName) -> Self {
        name.0
    }
}

/// When a dependency is needed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Needed only while compiling (autoconf, libtool, ...).
    Build,
    /// Needed by the installed module (default).
    #[default]
    Runtime,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Build => write!(f, "build"),
            Self::Runtime => write!(f, "runtime"),
        }
    }
}

/// One external package a build needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencySpec {
    /// Package providing the dependency.
    pub name: PackageName,
    /// Build-time only, or needed at runtime.
    #[serde(default)]
    pub stage: Stage,
    /// Optional semver constraint on the package version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<semver::VersionReq>,
}

impl DependencySpec {
    /// A dependency needed only during the build.
    pub fn build(name: impl Into<PackageName>) -> Self {
        Self {
            name: name.into(),
            stage: Stage::Build,
            version: None,
        }
    }

    /// A dependency needed at runtime.
    pub fn runtime(name: impl Into<PackageName>) -> Self {
        Self {
            name: name.into(),
            stage: Stage::Runtime,
            version: None,
        }
    }

    /// Attach a version constraint.
    pub fn with_version(mut self, req: semver::VersionReq) -> Self {
        self.version = Some(req);
        self
    }
}

impl std::fmt::Display for DependencySpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(req) = &self.version {
            write!(f, " {req}")?;
        }
        if self.stage == Stage::Build {
            write!(f, " (build)")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_name_case_insensitive() {
        let name = PackageName::new("Apr-Util");
        assert_eq!(name.as_str(), "apr-util");
        assert!(name == "APR-UTIL");
    }

    #[test]
    fn test_dependency_display() {
        let dep = DependencySpec::build("autoconf");
        assert_eq!(dep.to_string(), "autoconf (build)");

        let req = semver::VersionReq::parse(">=2.4").unwrap();
        let dep = DependencySpec::runtime("httpd24").with_version(req);
        assert_eq!(dep.to_string(), "httpd24 >=2.4");
    }

    #[test]
    fn test_dependency_stage_defaults_to_runtime() {
        let dep: DependencySpec = serde_json::from_str(r#"{"name":"pcre"}"#).unwrap();
        assert_eq!(dep.stage, Stage::Runtime);
        assert!(dep.version.is_none());
    }
}
