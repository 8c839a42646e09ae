//! Command implementations. Each returns the text to print so the binary
//! stays a thin dispatcher.

use std::fmt::Write;
use std::path::Path;

use tracing::info;

use objx_diagnostic::ExportError;
use objx_header::{render_launcher, Emitter, FileEmitter};
use objx_ir::{DeclarationGraph, ExportConfig};
use objx_mangle::{demangle, is_objx_symbol, mangle_entry, resolve, TypeSymbolKind};

use crate::{export_header, load_config, load_graph, CliError, Export};

/// Export the graph at `graph`, writing the header to `output` when given.
pub fn run_export(
    graph: &Path,
    config: Option<&Path>,
    output: Option<&Path>,
) -> Result<Export, CliError> {
    let config = load_config(config)?;
    let graph = load_graph(graph)?;
    let export = export_header(&graph, &config)?;
    if let Some(path) = output {
        let write_error = |source| CliError::Write {
            path: path.to_path_buf(),
            source,
        };
        let mut out = FileEmitter::create(path).map_err(write_error)?;
        out.emit(&export.header);
        let bytes = out.finish().map_err(write_error)?;
        info!(path = %path.display(), bytes, "header written");
    }
    Ok(export)
}

/// One line per type-level name: kind, ObjC name, Swift name.
pub fn symbol_listing(
    graph: &DeclarationGraph,
    config: &ExportConfig,
) -> Result<String, ExportError> {
    let symbols = resolve(graph, config)?;
    let mut out = String::new();
    for symbol in symbols.types() {
        let kind = match symbol.kind {
            TypeSymbolKind::Class => "class",
            TypeSymbolKind::Protocol => "protocol",
        };
        let _ = writeln!(out, "{kind:<9}{:<40}{}", symbol.objc_name, symbol.swift_name);
    }
    for category in symbols.categories() {
        let target = symbols
            .decl(category.target)
            .map_or("?", |t| t.objc_name.as_str());
        let _ = writeln!(out, "{:<9}{target} ({})", "category", category.name);
    }
    Ok(out)
}

/// Run `objxc symbols`.
pub fn run_symbols(graph: &Path, config: Option<&Path>) -> Result<String, CliError> {
    let config = load_config(config)?;
    let graph = load_graph(graph)?;
    Ok(symbol_listing(&graph, &config)?)
}

/// The entry symbol, or the launcher stub calling it. Missing parts fall
/// back to the configured defaults.
pub fn entry_output(module: Option<&str>, function: Option<&str>, launcher: bool) -> String {
    let defaults = ExportConfig::default();
    let config = ExportConfig {
        entry_module: module.map_or(defaults.entry_module.clone(), str::to_string),
        entry_function: function.map_or(defaults.entry_function.clone(), str::to_string),
        ..defaults
    };
    if launcher {
        render_launcher(&config)
    } else {
        format!("{}\n", mangle_entry(&config.entry_module, &config.entry_function))
    }
}

/// Demangle an entry symbol. Anything else is returned unchanged.
pub fn demangle_output(symbol: &str) -> String {
    if !is_objx_symbol(symbol) {
        return symbol.to_string();
    }
    demangle(symbol).unwrap_or_else(|| symbol.to_string())
}
