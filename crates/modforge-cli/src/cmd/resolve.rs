//! Resolve command

use anyhow::{Context, Result};
use crossterm::style::Stylize;
use modforge_core::Resolver;
use modforge_schema::{BuildPlan, MacosVersion, Operation, OptionSet, PlatformDescriptor, Stage};
use std::path::Path;

use crate::ui::{self, field, section};

/// Map a `--with` argument to an option name: `httpd24` and `with-httpd24`
/// both select `with-httpd24`.
pub fn option_name(raw: &str) -> String {
    let name = raw.trim().trim_start_matches('-');
    if name.starts_with("with-") || name.starts_with("without-") {
        name.to_string()
    } else {
        format!("with-{name}")
    }
}

/// Resolve and print the build plan of one formula variant
pub fn resolve(
    name: &str,
    with: &[String],
    macos: MacosVersion,
    build_tools: bool,
    json: bool,
    prefix: Option<&Path>,
) -> Result<()> {
    let registry = super::load_registry()?;
    let formula = registry.get(name)?;
    let layout = super::layout(prefix);

    let options: OptionSet = with.iter().map(|w| option_name(w)).collect();
    let platform = PlatformDescriptor::new(macos, build_tools);
    tracing::debug!(formula = %formula.name(), %macos, build_tools, "resolving");

    let plan = Resolver::new(formula, &layout).resolve(&options, &platform)?;

    if json {
        let out = serde_json::to_string_pretty(&plan).context("Failed to serialize plan")?;
        println!("{out}");
    } else {
        print_plan(&plan);
    }

    for warning in &plan.warnings {
        ui::warning(warning);
    }

    Ok(())
}

fn print_plan(plan: &BuildPlan) {
    let tools = if plan.platform.build_tools { "yes" } else { "no" };

    println!();
    println!(
        "  {} {}",
        plan.formula.as_str().white().bold(),
        plan.version.as_str().dark_grey()
    );
    println!();
    field("macos", plan.platform.version);
    field("clt", tools);
    if !plan.options.is_empty() {
        let opts: Vec<String> = plan.options.iter().map(|o| format!("--{o}")).collect();
        field("options", opts.join(" "));
    }

    if !plan.dependencies.is_empty() {
        section("Dependencies");
        for dep in plan.dependencies_for(Stage::Build) {
            println!("  {}", dep.to_string().cyan());
        }
        for dep in plan.dependencies_for(Stage::Runtime) {
            println!("  {}", dep.to_string().cyan());
        }
    }

    if !plan.values.is_empty() {
        section("Values");
        for value in &plan.values {
            field(&value.key, value.primary());
            for alt in value.candidates.iter().skip(1) {
                println!("  {:<w$}{}", "", alt.as_str().dark_grey(), w = ui::LABEL_WIDTH);
            }
        }
    }

    if !plan.args.is_empty() {
        section("Configure");
        for arg in &plan.args {
            println!("  {arg}");
        }
    }

    if !plan.operations.is_empty() {
        section("Build");
        for op in &plan.operations {
            match op {
                Operation::Step(step) => println!("  {} {step}", "$".dark_grey()),
                Operation::Patch(patch) => {
                    println!("  {} {}", "patch".dark_grey(), patch.file.as_str().cyan());
                    for r in &patch.replace {
                        println!("    {} {}", "-".red(), r.from);
                        println!("    {} {}", "+".green(), r.to);
                    }
                }
                Operation::Install(item) => {
                    println!("  {} {} {}", item.source, "->".dark_grey(), item.dest);
                }
            }
        }
    }

    if let Some(caveats) = &plan.caveats {
        section("Caveats");
        for line in caveats.trim_end().lines() {
            println!("  {line}");
        }
    }
    println!();
}
