//! Host platform description.

use serde::{Deserialize, Serialize};

use crate::macos::MacosVersion;

/// A host capability that a formula can require.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Capability {
    /// The Xcode Command Line Tools (compiler toolchain, SDK headers).
    BuildTools,
}

impl Capability {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BuildTools => "build-tools",
        }
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What the resolver knows about the host: its macOS release and whether
/// the developer tools are installed.
///
/// Probing the host is left to the caller; the resolver only reads this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlatformDescriptor {
    /// Host macOS release.
    pub version: MacosVersion,
    /// Whether the Command Line Tools are installed.
    pub build_tools: bool,
}

impl PlatformDescriptor {
    /// Describe a host.
    pub fn new(version: MacosVersion, build_tools: bool) -> Self {
        Self {
            version,
            build_tools,
        }
    }

    /// Whether the host provides `capability`.
    pub fn has(&self, capability: Capability) -> bool {
        match capability {
            Capability::BuildTools => self.build_tools,
        }
    }
}
