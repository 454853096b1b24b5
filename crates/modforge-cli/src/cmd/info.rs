//! Info command

use anyhow::Result;
use crossterm::style::Stylize;

use crate::ui::{field, section};

/// Show metadata, options, aliases and exclusive groups of one formula
pub fn info(name: &str) -> Result<()> {
    let registry = super::load_registry()?;
    let formula = registry.get(name)?;
    let info = &formula.package;

    println!();
    println!(
        "  {} {}",
        info.name.as_str().white().bold(),
        info.version.as_str().dark_grey()
    );
    if !info.description.is_empty() {
        println!("  {}", info.description);
    }
    println!();

    if !info.homepage.is_empty() {
        field("homepage", &info.homepage);
    }
    if !info.license.is_empty() {
        field("license", &info.license);
    }
    field("source", &formula.source.url);
    if let Some(head) = &formula.source.head {
        field("head", head);
    }
    if let Some(origin) = registry.origin(name) {
        field("from", origin);
    }

    if !formula.options.is_empty() {
        section("Options");
        for opt in &formula.options {
            let flag = format!("{:<28}", format!("--{}", opt.name));
            println!("  {}{}", flag.cyan(), opt.description);
        }
    }

    if !formula.deprecated.is_empty() {
        section("Deprecated");
        for (alias, target) in &formula.deprecated {
            let flag = format!("{:<28}", format!("--{alias}"));
            println!("  {}--{target}", flag.dark_grey());
        }
    }

    for group in &formula.exclusive {
        section(&format!("Exclusive ({})", group.name));
        let members: Vec<String> = group.options.iter().map(|o| format!("--{o}")).collect();
        println!("  {}", members.join(", "));
    }

    Ok(())
}
