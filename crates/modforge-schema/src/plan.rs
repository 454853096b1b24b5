//! Resolution output.
//!
//! A [`BuildPlan`] is everything a build runtime needs to compile one
//! formula variant: the packages to install first, the arguments for the
//! configure step, resolved paths, and the build steps, patches and
//! installs to perform, in one ordered list. Nothing here is executed; the plan is
//! data handed to whoever runs the build.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::options::OptionSet;
use crate::platform::PlatformDescriptor;
use crate::types::{DependencySpec, PackageName, Stage};

/// One argument for the configure step, rendered as `flag` or `flag=value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildArg {
    /// The flag, including leading dashes (e.g. `--with-apxs`).
    pub flag: String,
    /// The value, if the flag takes one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl BuildArg {
    /// A bare flag.
    pub fn flag(flag: impl Into<String>) -> Self {
        Self {
            flag: flag.into(),
            value: None,
        }
    }

    /// A `flag=value` pair.
    pub fn pair(flag: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            flag: flag.into(),
            value: Some(value.into()),
        }
    }
}

impl std::fmt::Display for BuildArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{}={value}", self.flag),
            None => write!(f, "{}", self.flag),
        }
    }
}

/// A named path or setting computed during resolution.
///
/// Some locations depend on how a dependency was packaged (`apxs` lives in
/// `sbin/` for some httpd builds and `bin/` for others). Such values carry
/// every candidate in preference order; the first one is the primary value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedValue {
    /// Name the value is referenced by (e.g. `apxs`).
    pub key: String,
    /// Candidates in preference order, never empty.
    pub candidates: Vec<String>,
}

impl ResolvedValue {
    /// The preferred candidate.
    pub fn primary(&self) -> &str {
        self.candidates.first().map_or("", String::as_str)
    }
}

/// A command to run in the build directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildStep {
    /// Program to execute.
    pub program: String,
    /// Arguments, in order.
    #[serde(default)]
    pub args: Vec<String>,
    /// Whether the configure arguments were appended to `args`. Marks the
    /// configure step.
    #[serde(default)]
    pub build_args: bool,
}

impl BuildStep {
    /// A step with literal arguments.
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            build_args: false,
        }
    }
}

impl std::fmt::Display for BuildStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// A literal search-and-replace inside a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Replacement {
    /// Text to find.
    pub from: String,
    /// Text to put in its place.
    pub to: String,
}

/// Replacements to apply to one file, in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patch {
    /// File path, relative to the build directory unless absolute.
    pub file: String,
    /// Replacements in application order.
    pub replace: Vec<Replacement>,
}

/// A built file to copy into the installation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallItem {
    /// Path relative to the build directory.
    pub source: String,
    /// Destination directory.
    pub dest: String,
}

/// One unit of build work. Operations run in plan order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Run a command.
    Step(BuildStep),
    /// Rewrite a file in place.
    Patch(Patch),
    /// Copy a built file into the keg.
    Install(InstallItem),
}

/// The resolved build of one formula variant on one host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildPlan {
    /// Formula name.
    pub formula: PackageName,
    /// Formula version.
    pub version: String,
    /// Canonical options the plan was resolved with.
    pub options: OptionSet,
    /// Host the plan was resolved for.
    pub platform: PlatformDescriptor,
    /// Packages that must be present, in declaration order.
    pub dependencies: Vec<DependencySpec>,
    /// Configure arguments, in order.
    pub args: Vec<BuildArg>,
    /// Resolved paths and settings, in the order they were first set.
    pub values: Vec<ResolvedValue>,
    /// Steps, patches and installs in the order they must be performed.
    pub operations: Vec<Operation>,
    /// Post-install instructions for the user, with placeholders expanded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caveats: Option<String>,
    /// Non-fatal notices produced during resolution.
    pub warnings: Vec<String>,
}

impl BuildPlan {
    /// An empty plan for `formula` with the given inputs.
    pub fn new(
        formula: impl Into<PackageName>,
        version: impl Into<String>,
        options: OptionSet,
        platform: PlatformDescriptor,
    ) -> Self {
        Self {
            formula: formula.into(),
            version: version.into(),
            options,
            platform,
            dependencies: Vec::new(),
            args: Vec::new(),
            values: Vec::new(),
            operations: Vec::new(),
            caveats: None,
            warnings: Vec::new(),
        }
    }

    /// Add a dependency. Re-declaring a name replaces the earlier entry in
    /// place, so the later declaration wins without reordering.
    pub fn add_dependency(&mut self, dep: DependencySpec) {
        if let Some(existing) = self.dependencies.iter_mut().find(|d| d.name == dep.name) {
            *existing = dep;
        } else {
            self.dependencies.push(dep);
        }
    }

    /// Remove a dependency by name. Returns whether one was removed.
    pub fn remove_dependency(&mut self, name: &PackageName) -> bool {
        let before = self.dependencies.len();
        self.dependencies.retain(|d| &d.name != name);
        self.dependencies.len() != before
    }

    /// Look up a dependency by name.
    pub fn dependency(&self, name: &str) -> Option<&DependencySpec> {
        let name = PackageName::new(name);
        self.dependencies.iter().find(|d| d.name == name)
    }

    /// Whether `name` is among the dependencies.
    pub fn has_dependency(&self, name: &str) -> bool {
        self.dependency(name).is_some()
    }

    /// Dependencies of one stage, in order.
    pub fn dependencies_for(&self, stage: Stage) -> impl Iterator<Item = &DependencySpec> {
        self.dependencies.iter().filter(move |d| d.stage == stage)
    }

    /// Append a configure argument. An argument with the same flag replaces
    /// the earlier one in place.
    pub fn push_arg(&mut self, arg: BuildArg) {
        if let Some(existing) = self.args.iter_mut().find(|a| a.flag == arg.flag) {
            *existing = arg;
        } else {
            self.args.push(arg);
        }
    }

    /// Look up a configure argument by flag.
    pub fn arg(&self, flag: &str) -> Option<&BuildArg> {
        self.args.iter().find(|a| a.flag == flag)
    }

    /// Configure arguments rendered as command-line words.
    pub fn arg_strings(&self) -> Vec<String> {
        self.args.iter().map(ToString::to_string).collect()
    }

    /// Build commands, in order.
    pub fn steps(&self) -> impl Iterator<Item = &BuildStep> {
        self.operations.iter().filter_map(|op| match op {
            Operation::Step(step) => Some(step),
            _ => None,
        })
    }

    /// File patches, in order.
    pub fn patches(&self) -> impl Iterator<Item = &Patch> {
        self.operations.iter().filter_map(|op| match op {
            Operation::Patch(patch) => Some(patch),
            _ => None,
        })
    }

    /// Install items, in order.
    pub fn installs(&self) -> impl Iterator<Item = &InstallItem> {
        self.operations.iter().filter_map(|op| match op {
            Operation::Install(item) => Some(item),
            _ => None,
        })
    }

    /// The step that receives the configure arguments, if any.
    pub fn configure_step(&self) -> Option<&BuildStep> {
        self.steps().find(|s| s.build_args)
    }

    /// Set or override a resolved value. Empty candidate lists are ignored.
    pub fn set_value(&mut self, key: impl Into<String>, candidates: Vec<String>) {
        if candidates.is_empty() {
            return;
        }
        let key = key.into();
        if let Some(existing) = self.values.iter_mut().find(|v| v.key == key) {
            existing.candidates = candidates;
        } else {
            self.values.push(ResolvedValue { key, candidates });
        }
    }

    /// The primary candidate of a resolved value.
    pub fn value(&self, key: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|v| v.key == key)
            .map(ResolvedValue::primary)
    }

    /// The first candidate of `key` that `exists` accepts.
    ///
    /// Build runtimes call this with a filesystem probe; the resolver itself
    /// never touches the disk.
    pub fn locate(&self, key: &str, exists: impl Fn(&Path) -> bool) -> Option<&str> {
        self.values
            .iter()
            .find(|v| v.key == key)?
            .candidates
            .iter()
            .map(String::as_str)
            .find(|c| exists(Path::new(c)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::macos::MacosVersion;

    fn empty_plan() -> BuildPlan {
        BuildPlan::new(
            "mod_test",
            "1.0",
            OptionSet::new(),
            PlatformDescriptor::new(MacosVersion::SIERRA, true),
        )
    }

    #[test]
    fn test_dependency_redeclaration_replaces_in_place() {
        let mut plan = empty_plan();
        plan.add_dependency(DependencySpec::build("apr"));
        plan.add_dependency(DependencySpec::runtime("pcre"));
        plan.add_dependency(DependencySpec::runtime("apr"));

        let names: Vec<&str> = plan.dependencies.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["apr", "pcre"]);
        assert_eq!(plan.dependency("apr").unwrap().stage, Stage::Runtime);
    }

    #[test]
    fn test_remove_dependency() {
        let mut plan = empty_plan();
        plan.add_dependency(DependencySpec::runtime("curl"));
        assert!(plan.remove_dependency(&PackageName::new("curl")));
        assert!(!plan.remove_dependency(&PackageName::new("curl")));
        assert!(!plan.has_dependency("curl"));
    }

    #[test]
    fn test_arg_override_keeps_position() {
        let mut plan = empty_plan();
        plan.push_arg(BuildArg::pair("--with-apr", "/usr/bin"));
        plan.push_arg(BuildArg::flag("--disable-framework"));
        plan.push_arg(BuildArg::pair("--with-apr", "/opt/apr"));

        assert_eq!(
            plan.arg_strings(),
            vec!["--with-apr=/opt/apr", "--disable-framework"]
        );
    }

    #[test]
    fn test_value_override_and_locate() {
        let mut plan = empty_plan();
        plan.set_value("apxs", vec!["/usr/sbin/apxs".to_string()]);
        plan.set_value(
            "apxs",
            vec!["/opt/httpd/sbin/apxs".to_string(), "/opt/httpd/bin/apxs".to_string()],
        );
        plan.set_value("ignored", Vec::new());

        assert_eq!(plan.values.len(), 1);
        assert_eq!(plan.value("apxs"), Some("/opt/httpd/sbin/apxs"));
        assert_eq!(
            plan.locate("apxs", |p| p.starts_with("/opt/httpd/bin")),
            Some("/opt/httpd/bin/apxs")
        );
        assert_eq!(plan.locate("apxs", |_| false), None);
        assert_eq!(plan.value("ignored"), None);
    }

    #[test]
    fn test_step_display() {
        let step = BuildStep::new("make", vec!["install".to_string()]);
        assert_eq!(step.to_string(), "make install");
    }

    #[test]
    fn test_operations_keep_order() {
        let mut plan = empty_plan();
        plan.operations.push(Operation::Step(BuildStep::new("cp", vec!["a".into(), "b".into()])));
        plan.operations.push(Operation::Patch(Patch {
            file: "b".to_string(),
            replace: vec![Replacement {
                from: "x".to_string(),
                to: "y".to_string(),
            }],
        }));
        let mut configure = BuildStep::new("./configure", vec!["--prefix=/p".into()]);
        configure.build_args = true;
        plan.operations.push(Operation::Step(configure));
        plan.operations.push(Operation::Install(InstallItem {
            source: "mod.so".to_string(),
            dest: "/p/libexec".to_string(),
        }));

        assert_eq!(plan.steps().count(), 2);
        assert_eq!(plan.patches().count(), 1);
        assert_eq!(plan.installs().count(), 1);
        assert_eq!(plan.configure_step().map(|s| s.program.as_str()), Some("./configure"));

        let json = serde_json::to_value(&plan).unwrap();
        assert_eq!(json["operations"][1]["patch"]["file"], "b");
        assert_eq!(json["operations"][2]["step"]["build_args"], true);
        assert!(json.get("caveats").is_none());
    }
}
