//! Formula rules.
//!
//! A rule pairs an optional predicate with one action:
//!
//! ```toml
//! [[rule]]
//! when = { all = [{ without = "with-httpd22" }, { macos_at_least = "10.12" }] }
//! then.depends = { name = "apr-util" }
//! ```
//!
//! Rules run in declaration order, so a later rule may override what an
//! earlier one set.

use modforge_schema::{
    Capability, DependencySpec, MacosVersion, OptionName, OptionSet, PackageName,
    PlatformDescriptor, Replacement,
};
use serde::{Deserialize, Serialize};

/// A condition over the selected options and the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Predicate {
    /// Always holds. Same as omitting `when`.
    Always,
    /// The option is enabled.
    Option(OptionName),
    /// The option is not enabled.
    Without(OptionName),
    /// Host release is strictly older than the version.
    MacosBelow(MacosVersion),
    /// Host release is the version or newer.
    MacosAtLeast(MacosVersion),
    /// Host release is the version or older.
    MacosAtMost(MacosVersion),
    /// Command Line Tools presence equals the flag.
    BuildTools(bool),
    /// Every nested predicate holds.
    All(Vec<Predicate>),
    /// At least one nested predicate holds.
    Any(Vec<Predicate>),
    /// The nested predicate does not hold.
    Not(Box<Predicate>),
}

impl Predicate {
    /// Evaluate against one resolution's inputs.
    pub fn evaluate(&self, options: &OptionSet, platform: &PlatformDescriptor) -> bool {
        match self {
            Self::Always => true,
            Self::Option(name) => options.contains(name),
            Self::Without(name) => !options.contains(name),
            Self::MacosBelow(v) => platform.version < *v,
            Self::MacosAtLeast(v) => platform.version >= *v,
            Self::MacosAtMost(v) => platform.version <= *v,
            Self::BuildTools(present) => platform.build_tools == *present,
            Self::All(all) => all.iter().all(|p| p.evaluate(options, platform)),
            Self::Any(any) => any.iter().any(|p| p.evaluate(options, platform)),
            Self::Not(inner) => !inner.evaluate(options, platform),
        }
    }

    /// Every option name mentioned anywhere in this predicate.
    pub fn option_names(&self) -> Vec<&OptionName> {
        let mut names = Vec::new();
        self.collect_options(&mut names);
        names
    }

    fn collect_options<'a>(&'a self, out: &mut Vec<&'a OptionName>) {
        match self {
            Self::Option(name) | Self::Without(name) => out.push(name),
            Self::All(nested) | Self::Any(nested) => {
                for p in nested {
                    p.collect_options(out);
                }
            }
            Self::Not(inner) => inner.collect_options(out),
            Self::Always
            | Self::MacosBelow(_)
            | Self::MacosAtLeast(_)
            | Self::MacosAtMost(_)
            | Self::BuildTools(_) => {}
        }
    }
}

/// `set` action: a named value with one or more candidates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueDecl {
    /// Value name, referenced elsewhere as `{{value:KEY}}`.
    pub key: String,
    /// Single value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Candidates in preference order, used instead of `value`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub candidates: Vec<String>,
}

impl ValueDecl {
    /// Unrendered candidates: `value` alone, or the `candidates` list.
    pub fn templates(&self) -> Vec<&str> {
        match &self.value {
            Some(v) => vec![v.as_str()],
            None => self.candidates.iter().map(String::as_str).collect(),
        }
    }
}

/// `arg` action: one configure argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgDecl {
    /// Flag including dashes.
    pub flag: String,
    /// Optional value template.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// `require` action: a host capability the variant cannot build without.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequireDecl {
    /// Capability that must be present.
    pub capability: Capability,
    /// Explanation and remedy shown when it is absent.
    pub message: String,
}

/// `step` action: a build command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepDecl {
    /// Program to run.
    pub program: String,
    /// Argument templates.
    #[serde(default)]
    pub args: Vec<String>,
    /// Append the plan's final configure arguments after `args`.
    #[serde(default)]
    pub build_args: bool,
}

/// `patch` action: in-place replacements in a build file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchDecl {
    /// File path template.
    pub file: String,
    /// Replacement templates, in order.
    pub replace: Vec<Replacement>,
}

/// `install` action: copy a built file into the keg.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallDecl {
    /// Path relative to the build directory.
    pub source: String,
    /// Destination directory template.
    pub dest: String,
}

/// What a rule does when its predicate holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Add (or redeclare) a dependency.
    Depends(DependencySpec),
    /// Remove a previously declared dependency.
    Drop(PackageName),
    /// Set or override a resolved value.
    Set(ValueDecl),
    /// Add or override a configure argument.
    Arg(ArgDecl),
    /// Refuse the option combination.
    Reject(String),
    /// Demand a host capability.
    Require(RequireDecl),
    /// Record a non-fatal notice.
    Warn(String),
    /// Append a build command.
    Step(StepDecl),
    /// Append a file patch.
    Patch(PatchDecl),
    /// Append an install item.
    Install(InstallDecl),
}

impl Action {
    /// Short name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Depends(_) => "depends",
            Self::Drop(_) => "drop",
            Self::Set(_) => "set",
            Self::Arg(_) => "arg",
            Self::Reject(_) => "reject",
            Self::Require(_) => "require",
            Self::Warn(_) => "warn",
            Self::Step(_) => "step",
            Self::Patch(_) => "patch",
            Self::Install(_) => "install",
        }
    }

    /// Every string in this action that may contain placeholders.
    pub fn templates(&self) -> Vec<&str> {
        match self {
            Self::Depends(_) | Self::Drop(_) => Vec::new(),
            Self::Set(decl) => decl.templates(),
            Self::Arg(decl) => decl.value.as_deref().into_iter().collect(),
            Self::Reject(msg) | Self::Warn(msg) => vec![msg.as_str()],
            Self::Require(decl) => vec![decl.message.as_str()],
            Self::Step(decl) => std::iter::once(decl.program.as_str())
                .chain(decl.args.iter().map(String::as_str))
                .collect(),
            Self::Patch(decl) => std::iter::once(decl.file.as_str())
                .chain(
                    decl.replace
                        .iter()
                        .flat_map(|r| [r.from.as_str(), r.to.as_str()]),
                )
                .collect(),
            Self::Install(decl) => vec![decl.source.as_str(), decl.dest.as_str()],
        }
    }
}

/// One entry of a formula's ordered rule list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    /// Guard; a rule without one always applies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub when: Option<Predicate>,
    /// Effect when the guard holds.
    pub then: Action,
}

impl Rule {
    /// A rule that always applies.
    pub fn always(then: Action) -> Self {
        Self { when: None, then }
    }

    /// A guarded rule.
    pub fn when(predicate: Predicate, then: Action) -> Self {
        Self {
            when: Some(predicate),
            then,
        }
    }

    /// Whether the rule's guard holds.
    pub fn applies(&self, options: &OptionSet, platform: &PlatformDescriptor) -> bool {
        self.when
            .as_ref()
            .is_none_or(|p| p.evaluate(options, platform))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host(version: MacosVersion, tools: bool) -> PlatformDescriptor {
        PlatformDescriptor::new(version, tools)
    }

    #[test]
    fn test_macos_thresholds() {
        let opts = OptionSet::new();
        let below = Predicate::MacosBelow(MacosVersion::SIERRA);
        let at_most = Predicate::MacosAtMost(MacosVersion::MAVERICKS);

        assert!(below.evaluate(&opts, &host(MacosVersion::EL_CAPITAN, true)));
        assert!(!below.evaluate(&opts, &host(MacosVersion::SIERRA, true)));
        assert!(at_most.evaluate(&opts, &host(MacosVersion::MAVERICKS, true)));
        assert!(!at_most.evaluate(&opts, &host(MacosVersion::YOSEMITE, true)));
    }

    #[test]
    fn test_combinators() {
        let opts = OptionSet::new().with("with-httpd24");
        let platform = host(MacosVersion::SIERRA, false);

        let neither = Predicate::All(vec![
            Predicate::Without(OptionName::new("with-httpd22")),
            Predicate::Without(OptionName::new("with-httpd24")),
        ]);
        assert!(!neither.evaluate(&opts, &platform));
        assert!(Predicate::Not(Box::new(neither)).evaluate(&opts, &platform));

        let any = Predicate::Any(vec![
            Predicate::Option(OptionName::new("with-httpd22")),
            Predicate::BuildTools(false),
        ]);
        assert!(any.evaluate(&opts, &platform));
    }

    #[test]
    fn test_empty_combinators() {
        let opts = OptionSet::new();
        let platform = host(MacosVersion::SIERRA, true);
        assert!(Predicate::All(Vec::new()).evaluate(&opts, &platform));
        assert!(!Predicate::Any(Vec::new()).evaluate(&opts, &platform));
    }

    #[test]
    fn test_option_names_walks_nested() {
        let pred = Predicate::All(vec![
            Predicate::Option(OptionName::new("with-a")),
            Predicate::Not(Box::new(Predicate::Any(vec![Predicate::Without(
                OptionName::new("with-b"),
            )]))),
        ]);
        let names: Vec<&str> = pred.option_names().into_iter().map(OptionName::as_str).collect();
        assert_eq!(names, vec!["with-a", "with-b"]);
    }

    #[test]
    fn test_rule_toml_shape() {
        #[derive(Deserialize)]
        struct Doc {
            rule: Vec<Rule>,
        }

        let doc: Doc = toml::from_str(
            r#"
[[rule]]
then.depends = { name = "autoconf", stage = "build" }

[[rule]]
when = { all = [{ without = "with-httpd22" }, { macos_at_least = "10.9" }] }
then.require = { capability = "build-tools", message = "install the CLT" }

[[rule]]
when = { not = { option = "with-python" } }
then.set = { key = "apxs", candidates = ["/a/sbin/apxs", "/a/bin/apxs"] }

[[rule]]
when = "always"
then.warn = "unconditional"
"#,
        )
        .unwrap();

        assert_eq!(doc.rule.len(), 4);
        assert_eq!(
            doc.rule[0],
            Rule::always(Action::Depends(DependencySpec::build("autoconf")))
        );
        assert!(matches!(
            &doc.rule[1].then,
            Action::Require(RequireDecl { capability: Capability::BuildTools, .. })
        ));
        assert_eq!(doc.rule[2].then.templates().len(), 2);
        assert!(doc.rule[2].applies(&OptionSet::new(), &host(MacosVersion::SIERRA, true)));
        assert_eq!(doc.rule[3].when, Some(Predicate::Always));
        assert!(doc.rule[3].applies(&OptionSet::new(), &host(MacosVersion::MAVERICKS, false)));
    }
}
