//! The export pipeline: resolve names, render declarations, assemble the
//! header.

use rayon::prelude::*;
use tracing::{debug, warn};

use objx_diagnostic::{ExportError, GenerationWarning, WarningQueue};
use objx_header::render_header;
use objx_ir::{DeclarationGraph, ExportConfig};
use objx_mangle::resolve;
use objx_render::{render_items, DeclRenderer, RenderItem, Rendered};

/// A finished header and everything that was left out of it.
#[derive(Clone, Debug)]
pub struct Export {
    pub header: String,
    /// Sorted by origin.
    pub warnings: Vec<GenerationWarning>,
}

/// Export `graph` as one Objective-C header.
///
/// Naming runs as a single ordered pass before any rendering. Rendering
/// then treats every declaration independently and may use a thread pool
/// (`config.parallel`); the header is byte-identical either way.
///
/// Fails only on structural problems. Members that cannot be rendered are
/// omitted and reported in [`Export::warnings`].
#[tracing::instrument(level = "debug", skip_all, fields(decls = graph.len()))]
pub fn export_header(
    graph: &DeclarationGraph,
    config: &ExportConfig,
) -> Result<Export, ExportError> {
    let symbols = resolve(graph, config)?;
    let items = render_items(&symbols);
    let renderer = DeclRenderer::new(graph, &symbols, config);

    let rendered = if config.parallel {
        render_parallel(&renderer, &items)
    } else {
        render_sequential(&renderer, &items)
    };
    debug!(items = items.len(), rendered = rendered.len(), "declarations rendered");

    let mut queue = WarningQueue::new();
    let mut decls = Vec::with_capacity(rendered.len());
    for Rendered { decl, warnings } in rendered {
        queue.extend(warnings);
        decls.push(decl);
    }

    Ok(Export {
        header: render_header(&decls, config),
        warnings: queue.flush(),
    })
}

fn render_sequential(renderer: &DeclRenderer<'_>, items: &[RenderItem]) -> Vec<Rendered> {
    items.iter().filter_map(|item| renderer.render(item)).collect()
}

/// Render on a scoped pool, falling back to the calling thread when no pool
/// can be built.
fn render_parallel(renderer: &DeclRenderer<'_>, items: &[RenderItem]) -> Vec<Rendered> {
    rayon::ThreadPoolBuilder::new()
        .build_scoped(rayon::ThreadBuilder::run, |pool| {
            pool.install(|| {
                items
                    .par_iter()
                    .filter_map(|item| renderer.render(item))
                    .collect::<Vec<_>>()
            })
        })
        .unwrap_or_else(|e| {
            warn!("failed to create thread pool ({e}), rendering sequentially");
            render_sequential(renderer, items)
        })
}

#[cfg(test)]
mod tests;
