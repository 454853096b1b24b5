//! Check command

use anyhow::{Context, Result};
use modforge_core::Formula;
use std::path::Path;

use crate::ui::{self, field};

/// Parse and validate a formula file
pub fn check(path: &Path) -> Result<()> {
    let formula = Formula::from_file(path)
        .with_context(|| format!("{} is not a valid formula", path.display()))?;

    ui::success("Formula is valid");
    field("name", formula.name());
    field("version", &formula.package.version);
    field("source", &formula.source.url);
    field("options", formula.options.len());
    field("aliases", formula.deprecated.len());
    field("rules", formula.rules.len());

    if formula.package.description.is_empty() {
        ui::warning("No description defined");
    }

    Ok(())
}
