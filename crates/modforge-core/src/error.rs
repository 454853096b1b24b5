//! Domain-specific errors for formula loading and resolution

use modforge_schema::Capability;
use std::path::PathBuf;
use thiserror::Error;

/// Why a variant could not be resolved.
///
/// Both kinds are terminal: resolution is a pure function of its inputs, so
/// retrying with the same options and host gives the same error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    /// The selected options contradict each other.
    #[error("{formula}: {message}")]
    Conflict {
        /// Formula being resolved.
        formula: String,
        /// Explanation shown to the user.
        message: String,
    },

    /// The host lacks something the selected variant needs.
    #[error("{formula}: missing {capability}: {message}")]
    MissingRequirement {
        /// Formula being resolved.
        formula: String,
        /// The absent capability.
        capability: Capability,
        /// Explanation and remedy shown to the user.
        message: String,
    },
}

impl ResolutionError {
    /// Whether this is a [`ResolutionError::Conflict`].
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    /// Whether this is a [`ResolutionError::MissingRequirement`].
    pub fn is_missing_requirement(&self) -> bool {
        matches!(self, Self::MissingRequirement { .. })
    }
}

/// Errors that can occur when loading or validating a formula.
#[derive(Error, Debug)]
pub enum FormulaError {
    /// An I/O error occurred while reading a formula file.
    #[error("IO error reading {path}: {source}")]
    Io {
        /// File that could not be read.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be deserialized into a formula.
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// A formula file could not be deserialized.
    #[error("Parse error in {path}: {source}")]
    ParseFile {
        /// File that failed to parse.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: toml::de::Error,
    },

    /// The formula parsed but is internally inconsistent.
    #[error("Invalid formula '{formula}': {reason}")]
    Invalid {
        /// Formula name.
        formula: String,
        /// What is wrong.
        reason: String,
    },

    /// No formula with this name is known.
    #[error("Formula '{0}' not found")]
    NotFound(String),
}

impl FormulaError {
    /// Create a validation error for `formula`.
    pub fn invalid(formula: impl std::fmt::Display, reason: impl std::fmt::Display) -> Self {
        Self::Invalid {
            formula: formula.to_string(),
            reason: reason.to_string(),
        }
    }
}
