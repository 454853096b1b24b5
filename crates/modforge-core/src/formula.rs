//! TOML formula definitions
//!
//! A formula describes one buildable module: where its source comes from,
//! the options a user may pass, and the ordered rules that turn those
//! options into a build plan.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use modforge_schema::{OptionName, PackageName};
use serde::{Deserialize, Serialize};

use crate::error::FormulaError;
use crate::rule::{Action, Predicate, Rule};
use crate::template::{self, Placeholder};

/// Metadata describing a formula's identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormulaInfo {
    /// Unique name that identifies this formula.
    pub name: PackageName,
    /// Upstream version being built.
    pub version: String,
    /// Short human-readable summary.
    #[serde(default)]
    pub description: String,
    /// URL of the project's homepage.
    #[serde(default)]
    pub homepage: String,
    /// SPDX license identifier.
    #[serde(default)]
    pub license: String,
}

/// Location and integrity information for the source archive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Source {
    /// Download URL for the release archive.
    pub url: String,
    /// Expected SHA-256 digest of the archive.
    pub sha256: String,
    /// Repository URL for building the development head.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head: Option<String>,
}

/// A user-selectable build option.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionDecl {
    /// Option name (e.g. `with-httpd24`).
    pub name: OptionName,
    /// Help text.
    #[serde(default)]
    pub description: String,
}

/// Options of which at most one may be enabled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExclusiveGroup {
    /// Group name, used in messages.
    pub name: String,
    /// Mutually exclusive options.
    pub options: Vec<OptionName>,
    /// Message reported when more than one is enabled.
    #[serde(default)]
    pub message: Option<String>,
}

/// Complete formula definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Formula {
    /// Core metadata.
    pub package: FormulaInfo,
    /// Source archive location and integrity data.
    pub source: Source,
    /// Declared options.
    #[serde(default, rename = "option")]
    pub options: Vec<OptionDecl>,
    /// Old option names mapped to their replacements.
    #[serde(default)]
    pub deprecated: BTreeMap<OptionName, OptionName>,
    /// Groups of mutually exclusive options.
    #[serde(default, rename = "exclusive")]
    pub exclusive: Vec<ExclusiveGroup>,
    /// Ordered resolution rules.
    #[serde(default, rename = "rule")]
    pub rules: Vec<Rule>,
    /// Post-install instructions template, rendered by the package runtime.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caveats: Option<String>,
}

impl Formula {
    /// Parse and validate a formula from a TOML file on disk.
    ///
    /// # Errors
    ///
    /// Returns `FormulaError::Io` if the file cannot be read,
    /// `FormulaError::ParseFile` if it is not a valid formula document, or
    /// the validation error [`Formula::parse`] returns.
    pub fn from_file(path: &Path) -> Result<Self, FormulaError> {
        let content = fs::read_to_string(path).map_err(|source| FormulaError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|e| match e {
            FormulaError::Parse(source) => FormulaError::ParseFile {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })
    }

    /// Parse and validate a formula from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns `FormulaError::Parse` if the TOML is invalid or does not match
    /// the schema, and `FormulaError::Invalid` if [`Formula::validate`] fails.
    pub fn parse(content: &str) -> Result<Self, FormulaError> {
        let formula: Self = toml::from_str(content)?;
        formula.validate()?;
        Ok(formula)
    }

    /// The formula name.
    pub fn name(&self) -> &PackageName {
        &self.package.name
    }

    /// Whether `name` is a declared option.
    pub fn declares(&self, name: &OptionName) -> bool {
        self.options.iter().any(|o| &o.name == name)
    }

    /// Map a deprecated alias to its replacement; other names pass through.
    pub fn canonical<'a>(&'a self, name: &'a OptionName) -> &'a OptionName {
        self.deprecated.get(name).unwrap_or(name)
    }

    /// Check internal consistency.
    ///
    /// # Errors
    ///
    /// Returns `FormulaError::Invalid` when an option is declared twice, an
    /// alias or exclusive group names an undeclared option, a group has fewer
    /// than two members, a rule tests an undeclared option, a `set` rule has
    /// no value, a placeholder is malformed, or `{{value:KEY}}` refers to a
    /// key that no earlier unconditional rule sets. Keys set only under a
    /// predicate would otherwise expand to nothing on some variants.
    pub fn validate(&self) -> Result<(), FormulaError> {
        let name = &self.package.name;
        let invalid = |reason: String| FormulaError::invalid(name, reason);

        if self.package.version.trim().is_empty() {
            return Err(invalid("empty version".to_string()));
        }
        if !self.source.url.starts_with("http") {
            return Err(invalid(format!("source url must be http(s): {}", self.source.url)));
        }
        if self.source.sha256.len() != 64 || !self.source.sha256.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid("source sha256 must be 64 hex characters".to_string()));
        }

        let mut seen = HashSet::new();
        for opt in &self.options {
            if !seen.insert(&opt.name) {
                return Err(invalid(format!("option '{}' declared twice", opt.name)));
            }
        }

        for (alias, target) in &self.deprecated {
            if self.declares(alias) {
                return Err(invalid(format!("deprecated alias '{alias}' is also a declared option")));
            }
            if !self.declares(target) {
                return Err(invalid(format!("alias '{alias}' points at undeclared option '{target}'")));
            }
        }

        for group in &self.exclusive {
            if group.options.len() < 2 {
                return Err(invalid(format!("exclusive group '{}' needs at least two options", group.name)));
            }
            if let Some(unknown) = group.options.iter().find(|o| !self.declares(o)) {
                return Err(invalid(format!(
                    "exclusive group '{}' names undeclared option '{unknown}'",
                    group.name
                )));
            }
        }

        // Keys guaranteed to hold a value at this point of the rule list.
        let mut set_keys: HashSet<&str> = HashSet::new();
        for (index, rule) in self.rules.iter().enumerate() {
            let at = |reason: String| invalid(format!("rule {}: {reason}", index + 1));

            if let Some(pred) = &rule.when {
                if let Some(unknown) = pred.option_names().into_iter().find(|o| !self.declares(o)) {
                    return Err(at(format!("tests undeclared option '{unknown}'")));
                }
            }

            for text in rule.then.templates() {
                for placeholder in template::scan(text).map_err(&at)? {
                    if let Placeholder::Value(key) = placeholder {
                        if !set_keys.contains(key.as_str()) {
                            return Err(at(format!(
                                "value '{key}' is used before an unconditional rule sets it"
                            )));
                        }
                    }
                }
            }

            if let Action::Set(decl) = &rule.then {
                if decl.templates().is_empty() {
                    return Err(at(format!("set '{}' has no value", decl.key)));
                }
                if rule.when.as_ref().is_none_or(|p| *p == Predicate::Always) {
                    set_keys.insert(decl.key.as_str());
                }
            }
        }

        if let Some(caveats) = &self.caveats {
            for placeholder in template::scan(caveats).map_err(|e| invalid(format!("caveats: {e}")))? {
                if let Placeholder::Value(key) = placeholder {
                    if !set_keys.contains(key.as_str()) {
                        return Err(invalid(format!("caveats: value '{key}' is never set unconditionally")));
                    }
                }
            }
        }

        Ok(())
    }
}

impl std::str::FromStr for Formula {
    type Err = FormulaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
