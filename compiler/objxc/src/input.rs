//! Reading graphs and configuration from disk.

use std::fs;
use std::path::Path;

use tracing::debug;

use objx_ir::{DeclarationGraph, ExportConfig, GraphDocument};

use crate::CliError;

/// Read and validate the graph at `path`.
pub fn load_graph(path: &Path) -> Result<DeclarationGraph, CliError> {
    let text = read(path)?;
    let doc: GraphDocument = serde_json::from_str(&text).map_err(|source| CliError::Graph {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(
        path = %path.display(),
        modules = doc.modules.len(),
        decls = doc.declarations.len(),
        "graph loaded"
    );
    Ok(doc.into_graph()?)
}

/// Read the configuration at `path`, or the defaults when there is none.
/// Keys missing from the file keep their defaults.
pub fn load_config(path: Option<&Path>) -> Result<ExportConfig, CliError> {
    let Some(path) = path else {
        return Ok(ExportConfig::default());
    };
    let text = read(path)?;
    toml::from_str(&text).map_err(|source| CliError::Config {
        path: path.to_path_buf(),
        source,
    })
}

fn read(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}
