//! Runtime configuration and dependency wiring.

mod dependencies;
mod runtime;

pub use dependencies::Dependencies;
pub use runtime::{RuntimeConfig, Source};
