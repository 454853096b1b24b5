//! Placeholder expansion for formula strings.
//!
//! | Placeholder | Expands to |
//! |---|---|
//! | `{{prefix}}` | Keg of the formula being built |
//! | `{{opt_prefix}}` | `opt/` link of the formula being built |
//! | `{{libexec}}` | `{{prefix}}/libexec` |
//! | `{{pkgshare}}` | `{{prefix}}/share/<name>` |
//! | `{{etc}}`, `{{var}}` | Shared prefix directories |
//! | `{{buildpath}}` | Scratch build directory |
//! | `{{macos}}` | Host release, e.g. `10.12` |
//! | `{{opt:NAME}}` | `opt/` link of package NAME |
//! | `{{opt_bin:NAME}}`, `{{opt_libexec:NAME}}` | Its `bin/` and `libexec/` |
//! | `{{value:KEY}}` | Primary candidate of a value set by an earlier rule |

use modforge_schema::{PlatformDescriptor, ResolvedValue};
use regex::{Captures, Regex};
use std::path::Path;
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([a-z_]+)(?::([^{}\s]+))?\s*\}\}").expect("placeholder pattern is valid")
});

/// A recognized placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placeholder {
    /// `{{prefix}}`
    Prefix,
    /// `{{opt_prefix}}`
    OptPrefix,
    /// `{{libexec}}`
    Libexec,
    /// `{{pkgshare}}`
    Pkgshare,
    /// `{{etc}}`
    Etc,
    /// `{{var}}`
    Var,
    /// `{{buildpath}}`
    Buildpath,
    /// `{{macos}}`
    Macos,
    /// `{{opt:NAME}}`
    Opt(String),
    /// `{{opt_bin:NAME}}`
    OptBin(String),
    /// `{{opt_libexec:NAME}}`
    OptLibexec(String),
    /// `{{value:KEY}}`
    Value(String),
}

impl Placeholder {
    /// Interpret a placeholder name and its optional argument.
    ///
    /// # Errors
    ///
    /// Returns a description of the problem if the name is unknown, or if an
    /// argument is missing or unexpected.
    pub fn parse(name: &str, arg: Option<&str>) -> Result<Self, String> {
        let simple = match name {
            "prefix" => Some(Self::Prefix),
            "opt_prefix" => Some(Self::OptPrefix),
            "libexec" => Some(Self::Libexec),
            "pkgshare" => Some(Self::Pkgshare),
            "etc" => Some(Self::Etc),
            "var" => Some(Self::Var),
            "buildpath" => Some(Self::Buildpath),
            "macos" => Some(Self::Macos),
            _ => None,
        };

        match (simple, arg) {
            (Some(p), None) => Ok(p),
            (Some(_), Some(a)) => Err(format!("placeholder '{name}' takes no argument (got '{a}')")),
            (None, Some(a)) => match name {
                "opt" => Ok(Self::Opt(a.to_string())),
                "opt_bin" => Ok(Self::OptBin(a.to_string())),
                "opt_libexec" => Ok(Self::OptLibexec(a.to_string())),
                "value" => Ok(Self::Value(a.to_string())),
                _ => Err(format!("unknown placeholder '{name}'")),
            },
            (None, None) => match name {
                "opt" | "opt_bin" | "opt_libexec" | "value" => {
                    Err(format!("placeholder '{name}' needs an argument"))
                }
                _ => Err(format!("unknown placeholder '{name}'")),
            },
        }
    }
}

/// Every placeholder in `input`, in order of appearance.
///
/// # Errors
///
/// Returns the first malformed placeholder's description.
pub fn scan(input: &str) -> Result<Vec<Placeholder>, String> {
    PLACEHOLDER
        .captures_iter(input)
        .map(|caps| {
            let name = caps.get(1).map_or("", |m| m.as_str());
            Placeholder::parse(name, caps.get(2).map(|m| m.as_str()))
        })
        .collect()
}

fn path_str(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Expands placeholders for one formula on one host.
#[derive(Debug)]
pub struct Template<'a> {
    layout: &'a crate::Layout,
    name: &'a str,
    version: &'a str,
    platform: &'a PlatformDescriptor,
    values: &'a [ResolvedValue],
}

impl<'a> Template<'a> {
    /// Bind the expansion context.
    pub fn new(
        layout: &'a crate::Layout,
        name: &'a str,
        version: &'a str,
        platform: &'a PlatformDescriptor,
        values: &'a [ResolvedValue],
    ) -> Self {
        Self {
            layout,
            name,
            version,
            platform,
            values,
        }
    }

    /// Expand every placeholder in `input`.
    ///
    /// Malformed placeholders are left untouched; formulas are validated at
    /// load time so this only happens for hand-built rules. A `{{value:KEY}}`
    /// whose key has not been set expands to an empty string.
    pub fn render(&self, input: &str) -> String {
        PLACEHOLDER
            .replace_all(input, |caps: &Captures<'_>| {
                let name = caps.get(1).map_or("", |m| m.as_str());
                match Placeholder::parse(name, caps.get(2).map(|m| m.as_str())) {
                    Ok(p) => self.expand(&p),
                    Err(_) => caps[0].to_string(),
                }
            })
            .into_owned()
    }

    fn expand(&self, placeholder: &Placeholder) -> String {
        let keg = self.layout.keg(self.name, self.version);
        match placeholder {
            Placeholder::Prefix => path_str(&keg),
            Placeholder::OptPrefix => path_str(&self.layout.opt(self.name)),
            Placeholder::Libexec => path_str(&keg.join("libexec")),
            Placeholder::Pkgshare => path_str(&keg.join("share").join(self.name)),
            Placeholder::Etc => path_str(&self.layout.etc()),
            Placeholder::Var => path_str(&self.layout.var()),
            Placeholder::Buildpath => path_str(&self.layout.build_dir(self.name, self.version)),
            Placeholder::Macos => self.platform.version.to_string(),
            Placeholder::Opt(pkg) => path_str(&self.layout.opt(pkg)),
            Placeholder::OptBin(pkg) => path_str(&self.layout.opt(pkg).join("bin")),
            Placeholder::OptLibexec(pkg) => path_str(&self.layout.opt(pkg).join("libexec")),
            Placeholder::Value(key) => {
                if let Some(v) = self.values.iter().find(|v| &v.key == key) {
                    v.primary().to_string()
                } else {
                    tracing::warn!(formula = self.name, key = %key, "value referenced before it was set");
                    String::new()
                }
            }
        }
    }
}
