//! Variant resolution.
//!
//! Turns a formula, a set of user options and a host description into a
//! [`BuildPlan`]. Resolution is pure: no I/O, no shared state, and the same
//! inputs always give the same plan or the same error.
//!
//! Order of evaluation:
//!
//! 1. Deprecated aliases are mapped to their replacements; options the
//!    formula does not declare are dropped with a warning.
//! 2. Exclusive groups are checked before any rule runs, so contradictory
//!    options fail fast with [`ResolutionError::Conflict`].
//! 3. Rules run in declaration order. Later rules override values,
//!    arguments and dependencies set by earlier ones.
//! 4. Steps flagged with `build_args` receive the final argument list, and
//!    the caveats are rendered against the final values.

use modforge_schema::{
    BuildArg, BuildPlan, BuildStep, InstallItem, Operation, OptionSet, Patch, PlatformDescriptor,
    Replacement,
};
use tracing::{debug, warn};

use crate::error::ResolutionError;
use crate::formula::Formula;
use crate::layout::Layout;
use crate::rule::{Action, StepDecl};
use crate::template::Template;

/// Resolves build variants of one formula.
///
/// Holds only shared references, so a single resolver can serve many
/// threads at once.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    formula: &'a Formula,
    layout: &'a Layout,
}

impl<'a> Resolver<'a> {
    /// Bind a validated formula to an install layout.
    pub fn new(formula: &'a Formula, layout: &'a Layout) -> Self {
        Self { formula, layout }
    }

    /// Resolve the variant selected by `options` on `platform`.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionError::Conflict`] if two options of an exclusive
    /// group are enabled or a `reject` rule fires, and
    /// [`ResolutionError::MissingRequirement`] if a `require` rule fires on a
    /// host without the named capability.
    pub fn resolve(
        &self,
        options: &OptionSet,
        platform: &PlatformDescriptor,
    ) -> Result<BuildPlan, ResolutionError> {
        let info = &self.formula.package;
        let mut warnings = Vec::new();
        let options = self.canonicalize(options, &mut warnings);

        self.check_exclusive(&options)?;

        let mut plan = BuildPlan::new(info.name.clone(), info.version.clone(), options, *platform);
        plan.warnings = warnings;

        for (index, rule) in self.formula.rules.iter().enumerate() {
            if !rule.applies(&plan.options, platform) {
                continue;
            }
            debug!(
                formula = %info.name,
                rule = index + 1,
                action = rule.then.kind(),
                "applying rule"
            );
            self.apply(&rule.then, &mut plan)?;
        }

        // Arguments may be overridden by rules after the configure step.
        let args = plan.arg_strings();
        for op in &mut plan.operations {
            if let Operation::Step(step) = op {
                if step.build_args {
                    step.args.extend(args.iter().cloned());
                }
            }
        }

        let caveats = self.formula.caveats.as_deref().map(|text| self.render(text, &plan));
        plan.caveats = caveats;

        Ok(plan)
    }

    fn canonicalize(&self, options: &OptionSet, warnings: &mut Vec<String>) -> OptionSet {
        let name = self.formula.name();
        options
            .iter()
            .filter_map(|opt| {
                let canonical = self.formula.canonical(opt);
                if canonical != opt {
                    debug!(formula = %name, from = %opt, to = %canonical, "deprecated option");
                    warnings.push(format!("--{opt} is deprecated; using --{canonical}"));
                }
                if self.formula.declares(canonical) {
                    Some(canonical.clone())
                } else {
                    warn!(formula = %name, option = %opt, "ignoring unknown option");
                    warnings.push(format!("Ignoring unknown option --{opt}"));
                    None
                }
            })
            .collect()
    }

    fn check_exclusive(&self, options: &OptionSet) -> Result<(), ResolutionError> {
        for group in &self.formula.exclusive {
            let enabled: Vec<String> = group
                .options
                .iter()
                .filter(|o| options.contains(o))
                .map(|o| format!("--{o}"))
                .collect();
            if enabled.len() > 1 {
                let message = group.message.clone().unwrap_or_else(|| {
                    format!("Options {} cannot be combined ({})", enabled.join(" and "), group.name)
                });
                return Err(self.conflict(message));
            }
        }
        Ok(())
    }

    fn apply(&self, action: &Action, plan: &mut BuildPlan) -> Result<(), ResolutionError> {
        match action {
            Action::Depends(dep) => plan.add_dependency(dep.clone()),
            Action::Drop(name) => {
                if !plan.remove_dependency(name) {
                    debug!(formula = %self.formula.name(), dependency = %name, "drop of undeclared dependency");
                }
            }
            Action::Set(decl) => {
                let candidates = decl
                    .templates()
                    .into_iter()
                    .map(|t| self.render(t, plan))
                    .collect();
                plan.set_value(decl.key.clone(), candidates);
            }
            Action::Arg(decl) => {
                let arg = match &decl.value {
                    Some(value) => BuildArg::pair(decl.flag.clone(), self.render(value, plan)),
                    None => BuildArg::flag(decl.flag.clone()),
                };
                plan.push_arg(arg);
            }
            Action::Reject(message) => return Err(self.conflict(self.render(message, plan))),
            Action::Require(decl) => {
                if !plan.platform.has(decl.capability) {
                    return Err(ResolutionError::MissingRequirement {
                        formula: self.formula.name().to_string(),
                        capability: decl.capability,
                        message: self.render(&decl.message, plan),
                    });
                }
            }
            Action::Warn(message) => {
                let message = self.render(message, plan);
                warn!(formula = %self.formula.name(), "{message}");
                plan.warnings.push(message);
            }
            Action::Step(StepDecl {
                program,
                args,
                build_args,
            }) => {
                let step = BuildStep {
                    program: self.render(program, plan),
                    args: args.iter().map(|a| self.render(a, plan)).collect(),
                    build_args: *build_args,
                };
                plan.operations.push(Operation::Step(step));
            }
            Action::Patch(decl) => {
                let patch = Patch {
                    file: self.render(&decl.file, plan),
                    replace: decl
                        .replace
                        .iter()
                        .map(|r| Replacement {
                            from: self.render(&r.from, plan),
                            to: self.render(&r.to, plan),
                        })
                        .collect(),
                };
                plan.operations.push(Operation::Patch(patch));
            }
            Action::Install(decl) => {
                let item = InstallItem {
                    source: self.render(&decl.source, plan),
                    dest: self.render(&decl.dest, plan),
                };
                plan.operations.push(Operation::Install(item));
            }
        }
        Ok(())
    }

    fn render(&self, input: &str, plan: &BuildPlan) -> String {
        let info = &self.formula.package;
        Template::new(
            self.layout,
            info.name.as_str(),
            &info.version,
            &plan.platform,
            &plan.values,
        )
        .render(input)
    }

    fn conflict(&self, message: String) -> ResolutionError {
        ResolutionError::Conflict {
            formula: self.formula.name().to_string(),
            message,
        }
    }
}
