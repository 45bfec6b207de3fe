//! Entity record sources.

mod dump;

pub use dump::open_dump;
