//! Errors surfaced by the command-line driver.

use std::io;
use std::path::PathBuf;

use objx_diagnostic::{ErrorCode, ExportError};
use objx_ir::GraphError;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("cannot read `{}`: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("cannot write `{}`: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("malformed graph `{}`: {source}", path.display())]
    Graph {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("malformed configuration `{}`: {source}", path.display())]
    Config {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid declaration graph: {0}")]
    InvalidGraph(#[from] GraphError),

    #[error("{0}")]
    Export(#[from] ExportError),

    #[error("{0}")]
    Usage(String),
}

impl CliError {
    pub fn usage(message: impl Into<String>) -> Self {
        CliError::Usage(message.into())
    }

    /// The diagnostic code, for errors raised by the export pipeline.
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            CliError::Export(err) => Some(err.code()),
            CliError::InvalidGraph(err) => Some(ExportError::Graph(err.clone()).code()),
            _ => None,
        }
    }
}
