//! objxc - Objective-C header exporter
//!
//! Drives the pipeline over a declaration graph:
//!
//! ```text
//! graph.json ─ objx_ir ─ objx_mangle ─ objx_render ─ objx_header ─ Shared.h
//! ```
//!
//! [`export_header`] is the library entry point. The `objxc` binary adds
//! file handling around it: the graph is read from JSON, the configuration
//! from TOML.

mod args;
pub mod commands;
mod error;
mod input;
mod pipeline;
mod tracing_setup;

pub use args::Command;
pub use error::CliError;
pub use input::{load_config, load_graph};
pub use pipeline::{export_header, Export};
pub use tracing_setup::init_tracing;
