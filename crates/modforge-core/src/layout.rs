//! Install prefix layout.
//!
//! Placeholders like `{{opt:apr}}` or `{{libexec}}` expand against this
//! tree. The layout mirrors a Homebrew-style prefix:
//!
//! ```text
//! <prefix>/
//! ├── Cellar/<name>/<version>/   # keg: {{prefix}}, {{libexec}}, {{pkgshare}}
//! ├── opt/<name>                 # stable link: {{opt:NAME}}, {{opt_prefix}}
//! ├── etc/                       # {{etc}}
//! └── var/                       # {{var}}
//! ```

use dirs::home_dir;
use std::path::{Path, PathBuf};

/// Environment variable overriding the install prefix.
pub const PREFIX_ENV: &str = "MODFORGE_PREFIX";

/// Environment variable overriding the modforge home directory.
pub const HOME_ENV: &str = "MODFORGE_HOME";

/// Returns the modforge home directory, or None if the user's home cannot be resolved.
pub fn try_modforge_home() -> Option<PathBuf> {
    if let Ok(val) = std::env::var(HOME_ENV) {
        return Some(PathBuf::from(val));
    }
    home_dir().map(|h| h.join(".modforge"))
}

/// User formulas directory: ~/.modforge/formulas
pub fn formula_dir() -> Option<PathBuf> {
    try_modforge_home().map(|h| h.join("formulas"))
}

/// Default install prefix for the host architecture.
pub fn default_prefix() -> PathBuf {
    if cfg!(target_arch = "aarch64") {
        PathBuf::from("/opt/homebrew")
    } else {
        PathBuf::from("/usr/local")
    }
}

/// Where packages live and where builds happen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    prefix: PathBuf,
    build_root: PathBuf,
}

impl Layout {
    /// A layout rooted at `prefix`, building under `build_root`.
    pub fn new(prefix: impl Into<PathBuf>, build_root: impl Into<PathBuf>) -> Self {
        Self {
            prefix: prefix.into(),
            build_root: build_root.into(),
        }
    }

    /// Read the layout from `MODFORGE_PREFIX` and `MODFORGE_HOME`, falling
    /// back to the architecture default prefix and `~/.modforge/build`.
    pub fn from_env() -> Self {
        let prefix = std::env::var(PREFIX_ENV).map_or_else(|_| default_prefix(), PathBuf::from);
        let build_root = try_modforge_home()
            .map_or_else(|| std::env::temp_dir().join("modforge"), |h| h.join("build"));
        Self::new(prefix, build_root)
    }

    /// Return a copy with a different prefix.
    pub fn with_prefix(mut self, prefix: impl Into<PathBuf>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// The install prefix.
    pub fn prefix(&self) -> &Path {
        &self.prefix
    }

    /// Keg of one installed version: `<prefix>/Cellar/<name>/<version>`.
    pub fn keg(&self, name: &str, version: &str) -> PathBuf {
        self.prefix.join("Cellar").join(name).join(version)
    }

    /// Version-independent link to a package: `<prefix>/opt/<name>`.
    pub fn opt(&self, name: &str) -> PathBuf {
        self.prefix.join("opt").join(name)
    }

    /// Shared configuration directory: `<prefix>/etc`.
    pub fn etc(&self) -> PathBuf {
        self.prefix.join("etc")
    }

    /// Shared state directory: `<prefix>/var`.
    pub fn var(&self) -> PathBuf {
        self.prefix.join("var")
    }

    /// Scratch directory for one build: `<build_root>/<name>-<version>`.
    pub fn build_dir(&self, name: &str, version: &str) -> PathBuf {
        self.build_root.join(format!("{name}-{version}"))
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::new(default_prefix(), std::env::temp_dir().join("modforge"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_paths() {
        let layout = Layout::new("/usr/local", "/tmp/mf");
        assert_eq!(
            layout.keg("mod_wsgi", "4.5.14"),
            PathBuf::from("/usr/local/Cellar/mod_wsgi/4.5.14")
        );
        assert_eq!(layout.opt("apr-util"), PathBuf::from("/usr/local/opt/apr-util"));
        assert_eq!(layout.etc(), PathBuf::from("/usr/local/etc"));
        assert_eq!(layout.var(), PathBuf::from("/usr/local/var"));
        assert_eq!(
            layout.build_dir("mod_wsgi", "4.5.14"),
            PathBuf::from("/tmp/mf/mod_wsgi-4.5.14")
        );
    }

    #[test]
    fn test_with_prefix() {
        let layout = Layout::new("/usr/local", "/tmp/mf").with_prefix("/opt/homebrew");
        assert_eq!(layout.prefix(), Path::new("/opt/homebrew"));
        assert_eq!(layout.etc(), PathBuf::from("/opt/homebrew/etc"));
    }
}
