//! Command implementations

pub mod check;
pub mod info;
pub mod list;
pub mod resolve;

use anyhow::{Context, Result};
use modforge_core::layout::{self, Layout};
use modforge_core::Registry;
use std::path::Path;

/// Built-in formulas plus everything in `$MODFORGE_HOME/formulas`.
pub(crate) fn load_registry() -> Result<Registry> {
    let mut registry = Registry::builtin().context("Failed to load built-in formulas")?;
    if let Some(dir) = layout::formula_dir() {
        let loaded = registry
            .load_dir(&dir)
            .with_context(|| format!("Failed to load formulas from {}", dir.display()))?;
        tracing::debug!(count = loaded, dir = %dir.display(), "user formulas loaded");
    }
    Ok(registry)
}

/// Layout from the environment, with the `--prefix` flag taking precedence.
pub(crate) fn layout(prefix: Option<&Path>) -> Layout {
    let layout = Layout::from_env();
    match prefix {
        Some(prefix) => layout.with_prefix(prefix),
        None => layout,
    }
}
