//! Shared types for modforge.
//!
//! Everything a resolver consumes (`OptionSet`, `PlatformDescriptor`) and
//! everything it produces (`BuildPlan`) lives here, so that build runtimes
//! can depend on the wire types without pulling in the rule engine.

pub mod macos;
pub mod options;
pub mod plan;
pub mod platform;
pub mod types;

// Re-exports
pub use macos::*;
pub use options::{OptionName, OptionSet};
pub use plan::*;
pub use platform::{Capability, PlatformDescriptor};
pub use types::*;
