use anyhow::Result;
use modforge_core::registry::Origin;

use crate::ui::{print_list_footer, print_list_header, print_list_row};

/// List built-in and user formulas
pub fn list() -> Result<()> {
    let registry = super::load_registry()?;

    print_list_header();
    for (formula, origin) in registry.iter() {
        let info = &formula.package;
        let description = match origin {
            Origin::Builtin => info.description.clone(),
            Origin::File(path) => format!("{} ({})", info.description, path.display()),
        };
        print_list_row(info.name.as_str(), &info.version, &description);
    }
    print_list_footer(registry.len());

    Ok(())
}
