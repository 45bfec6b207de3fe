//! Processor components.

mod projector;

pub use projector::ClaimProjector;
