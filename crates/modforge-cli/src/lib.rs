//! modforge - build variant resolver
#![allow(missing_docs)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]
//!
//! Command-line front end for `modforge-core`. Formulas declare options and
//! ordered rules; `modforge resolve` turns a choice of options and a macOS
//! release into a build plan without touching the host.
//!
//! # Directory Layout
//!
//! ```text
//! ~/.modforge/
//! ├── formulas/   # User formulas (*.toml), shadowing built-ins
//! └── build/      # Scratch directories, one per formula version
//! ```

pub mod cmd;
pub mod ui;

use clap::{Parser, Subcommand};
use modforge_schema::MacosVersion;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "modforge")]
#[command(author, version, about = "modforge - resolve build variants of Apache module formulas")]
pub struct Cli {
    /// Install prefix used to expand formula paths
    #[arg(long, global = true, env = "MODFORGE_PREFIX")]
    pub prefix: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List available formulas
    List,
    /// Show formula metadata, options and aliases
    Info {
        /// Formula name
        formula: String,
    },
    /// Resolve a build plan for one variant
    Resolve {
        /// Formula name
        formula: String,
        /// Enable an option (`--with httpd24` or `--with with-httpd24`)
        #[arg(long = "with", value_name = "OPTION")]
        with: Vec<String>,
        /// macOS release to resolve for (e.g. 10.12, sierra, 14)
        #[arg(long, env = "MODFORGE_MACOS", default_value = "sequoia")]
        macos: MacosVersion,
        /// Resolve as if the Xcode Command Line Tools were not installed
        #[arg(long)]
        no_build_tools: bool,
        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },
    /// Validate a formula file
    Check {
        /// Formula file to check
        path: PathBuf,
    },
}
