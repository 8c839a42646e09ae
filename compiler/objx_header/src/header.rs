//! Assembly of the complete header.

use tracing::debug;

use objx_ir::ExportConfig;
use objx_render::{Forward, RenderedDecl};

use crate::emitter::{Emitter, StringEmitter};
use crate::order::order;
use crate::prelude::prelude;

/// Foundation headers the declarations rely on.
pub const FOUNDATION_IMPORTS: [&str; 7] = [
    "NSArray", "NSDictionary", "NSError", "NSObject", "NSSet", "NSString", "NSValue",
];

/// Diagnostics the generated declarations are known to trigger.
const IGNORED_WARNINGS: [&str; 3] = [
    "-Wunknown-warning-option",
    "-Wincompatible-property-type",
    "-Wnullability",
];

/// Compilers without `_Nullable_result` fall back to `_Nullable`.
const NULLABLE_RESULT_SHIM: [&str; 5] = [
    "#pragma push_macro(\"_Nullable_result\")",
    "#if !__has_feature(nullability_nullable_result)",
    "#undef _Nullable_result",
    "#define _Nullable_result _Nullable",
    "#endif",
];

/// Write the header for `decls` to `out`.
///
/// `decls` may be in any order; the output depends only on its contents.
#[tracing::instrument(level = "debug", skip_all, fields(decls = decls.len()))]
pub fn emit_header<E: Emitter>(out: &mut E, decls: &[RenderedDecl], config: &ExportConfig) {
    for import in FOUNDATION_IMPORTS {
        out.emit_line(&format!("#import <Foundation/{import}.h>"));
    }
    out.blank_line();

    let mut classes: Vec<&str> = Vec::new();
    let mut protocols: Vec<&str> = Vec::new();
    for decl in decls {
        match &decl.forward {
            Forward::Class(name) => classes.push(name),
            Forward::Protocol(name) => protocols.push(name),
            Forward::None => {}
        }
    }
    forward_block(out, "@class", classes);
    forward_block(out, "@protocol", protocols);

    out.emit_line("NS_ASSUME_NONNULL_BEGIN");
    out.emit_line("#pragma clang diagnostic push");
    for warning in IGNORED_WARNINGS {
        out.emit_line(&format!("#pragma clang diagnostic ignored \"{warning}\""));
    }
    out.blank_line();
    for line in NULLABLE_RESULT_SHIM {
        out.emit_line(line);
    }
    out.blank_line();

    for block in prelude(config) {
        out.emit_block(&block);
    }
    let ordering = order(decls);
    for decl in &ordering.decls {
        out.emit_block(&decl.text);
    }
    debug!(
        declarations = ordering.decls.len(),
        forced = ordering.forced.len(),
        "header emitted"
    );

    out.emit_line("#pragma pop_macro(\"_Nullable_result\")");
    out.emit_line("#pragma clang diagnostic pop");
    out.emit_line("NS_ASSUME_NONNULL_END");
}

/// Render the header for `decls` into a string.
pub fn render_header(decls: &[RenderedDecl], config: &ExportConfig) -> String {
    let size = decls.iter().map(|d| d.text.len() + 1).sum::<usize>() + 8 * 1024;
    let mut out = StringEmitter::with_capacity(size);
    emit_header(&mut out, decls, config);
    out.into_string()
}

/// `@class A, B;` sorted by name, followed by a blank line. Nothing when
/// `names` is empty.
fn forward_block<E: Emitter>(out: &mut E, keyword: &str, mut names: Vec<&str>) {
    if names.is_empty() {
        return;
    }
    names.sort_unstable();
    names.dedup();
    out.emit_line(&format!("{keyword} {};", names.join(", ")));
    out.blank_line();
}
