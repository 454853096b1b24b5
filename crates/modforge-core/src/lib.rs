//! modforge core: formula definitions and the variant resolver.
//!
//! A formula is a TOML file declaring options and an ordered list of
//! rules. [`Resolver`] evaluates those rules against an
//! [`OptionSet`](modforge_schema::OptionSet) and a
//! [`PlatformDescriptor`](modforge_schema::PlatformDescriptor) and returns a
//! [`BuildPlan`](modforge_schema::BuildPlan).

pub mod error;
pub mod formula;
pub mod layout;
pub mod registry;
pub mod resolver;
pub mod rule;
pub mod template;

pub use error::{FormulaError, ResolutionError};
pub use formula::Formula;
pub use layout::Layout;
pub use registry::Registry;
pub use resolver::Resolver;

/// Re-export of the shared types crate.
pub use modforge_schema as schema;
