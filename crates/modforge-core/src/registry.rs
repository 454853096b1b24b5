//! Formula registry.
//!
//! Built-in formulas are compiled into the binary. User formulas are read
//! from a directory of `*.toml` files and shadow built-ins of the same name.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use modforge_schema::PackageName;
use walkdir::WalkDir;

use crate::error::FormulaError;
use crate::formula::Formula;

const BUILTIN: &[(&str, &str)] = &[
    ("mod_security", include_str!("../formulas/mod_security.toml")),
    ("mod_wsgi", include_str!("../formulas/mod_wsgi.toml")),
];

/// Where a registered formula came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    /// Compiled into modforge.
    Builtin,
    /// Loaded from a file.
    File(PathBuf),
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Builtin => write!(f, "builtin"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Formulas indexed by name.
#[derive(Debug, Default)]
pub struct Registry {
    formulas: BTreeMap<PackageName, (Formula, Origin)>,
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in formulas.
    ///
    /// # Errors
    ///
    /// Returns an error if a built-in formula fails to parse or validate.
    pub fn builtin() -> Result<Self, FormulaError> {
        let mut registry = Self::new();
        for (name, content) in BUILTIN {
            let formula = Formula::parse(content).map_err(|e| {
                tracing::error!(formula = name, "built-in formula is invalid: {e}");
                e
            })?;
            registry.insert(formula, Origin::Builtin);
        }
        Ok(registry)
    }

    /// Register a formula, replacing any formula of the same name.
    pub fn insert(&mut self, formula: Formula, origin: Origin) {
        let name = formula.name().clone();
        if let Some((_, previous)) = self.formulas.insert(name.clone(), (formula, origin)) {
            tracing::debug!(formula = %name, shadowed = %previous, "formula replaced");
        }
    }

    /// Load every `*.toml` file directly inside `dir`.
    ///
    /// A missing directory is not an error. Returns the number of formulas
    /// loaded.
    ///
    /// # Errors
    ///
    /// Returns the first file that cannot be read, parsed or validated.
    pub fn load_dir(&mut self, dir: &Path) -> Result<usize, FormulaError> {
        if !dir.is_dir() {
            tracing::debug!(dir = %dir.display(), "no formula directory");
            return Ok(0);
        }

        let mut paths: Vec<PathBuf> = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(std::result::Result::ok)
            .filter(|e| e.file_type().is_file())
            .map(walkdir::DirEntry::into_path)
            .filter(|p| p.extension().is_some_and(|ext| ext == "toml"))
            .collect();
        paths.sort();

        for path in &paths {
            let formula = Formula::from_file(path)?;
            tracing::debug!(formula = %formula.name(), path = %path.display(), "loaded formula");
            self.insert(formula, Origin::File(path.clone()));
        }
        Ok(paths.len())
    }

    /// Look up a formula. `mod-wsgi` and `mod_wsgi` name the same formula.
    ///
    /// # Errors
    ///
    /// Returns `FormulaError::NotFound` if no formula matches.
    pub fn get(&self, name: &str) -> Result<&Formula, FormulaError> {
        self.entry(name)
            .map(|(formula, _)| formula)
            .ok_or_else(|| FormulaError::NotFound(name.to_string()))
    }

    /// Where the named formula came from, if registered.
    pub fn origin(&self, name: &str) -> Option<&Origin> {
        self.entry(name).map(|(_, origin)| origin)
    }

    fn entry(&self, name: &str) -> Option<&(Formula, Origin)> {
        let exact = PackageName::new(name);
        self.formulas
            .get(&exact)
            .or_else(|| self.formulas.get(&PackageName::new(&name.replace('-', "_"))))
    }

    /// Iterate formulas in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&Formula, &Origin)> {
        self.formulas.values().map(|(f, o)| (f, o))
    }

    /// Number of registered formulas.
    pub fn len(&self) -> usize {
        self.formulas.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.formulas.is_empty()
    }
}
