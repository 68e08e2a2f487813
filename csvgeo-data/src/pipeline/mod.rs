//! Resolve a configured source into a feature collection.
//!
//! [`CsvProvider`] owns the strategies used along the way: the transport for
//! remote reads, the URL generator and the coordinate transform. A request
//! walks enumeration, validation, reading and translation in that order;
//! [`SourceSelection`] records the outcome of validation so the read step
//! dispatches on a single tagged value.

mod provider;
mod selection;

pub use provider::CsvProvider;
pub use selection::SourceSelection;
