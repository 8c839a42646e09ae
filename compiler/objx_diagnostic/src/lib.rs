//! Diagnostics for the objx header exporter.
//!
//! Two severities exist. Structural problems (an invalid graph, a name
//! collision that cannot be disambiguated) abort the run with an
//! [`ExportError`]. Problems scoped to one member drop that member and are
//! recorded as a [`GenerationWarning`] in a [`WarningQueue`]; nothing is
//! omitted silently.

mod error;
mod error_code;
pub mod queue;

pub use error::{ExportError, GenerationWarning, Origin};
pub use error_code::ErrorCode;
pub use queue::WarningQueue;
