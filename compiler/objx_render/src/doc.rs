//! `/** ... */` documentation blocks.

use objx_ir::{Annotations, DeprecationLevel};

/// Lines of a documentation block, without the ` * ` prefix.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct Doc {
    lines: Vec<String>,
}

impl Doc {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// `@note annotations` followed by one indented line per annotation.
    pub fn annotations(&mut self, annotations: &Annotations) {
        if annotations.documented.is_empty() && annotations.opt_in.is_empty() {
            return;
        }
        self.push("@note annotations");
        for annotation in annotations.documented.iter().chain(&annotations.opt_in) {
            self.push(format!("  {annotation}"));
        }
    }

    /// Mirrors the availability attribute of a deprecated declaration.
    pub fn deprecation(&mut self, annotations: &Annotations) {
        if let Some(deprecation) = &annotations.deprecation {
            self.push(format!("@deprecated {}", deprecation.message));
        }
    }

    /// Append the block, terminated by a newline.
    pub fn render(&self, out: &mut String) {
        if self.lines.is_empty() {
            return;
        }
        out.push_str("/**\n");
        for line in &self.lines {
            out.push_str(" * ");
            out.push_str(line);
            out.push('\n');
        }
        out.push_str("*/\n");
    }
}

/// Escape a string for use inside an attribute argument.
pub fn quoted(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for ch in text.chars() {
        match ch {
            '"' | '\\' => {
                out.push('\\');
                out.push(ch);
            }
            '\n' => out.push_str("\\n"),
            _ => out.push(ch),
        }
    }
    out.push('"');
    out
}

/// `deprecated(...)`/`unavailable(...)` and opt-in markers, in attribute
/// order. Hidden members never get here; a hidden declaration keeps its
/// name and becomes unavailable.
pub fn availability_attributes(annotations: &Annotations) -> Vec<String> {
    let mut attributes = Vec::new();
    if let Some(deprecation) = &annotations.deprecation {
        let kind = match deprecation.level {
            DeprecationLevel::Warning => "deprecated",
            DeprecationLevel::Error | DeprecationLevel::Hidden => "unavailable",
        };
        attributes.push(format!("{kind}({})", quoted(&deprecation.message)));
    }
    for marker in &annotations.opt_in {
        attributes.push(format!("annotate({})", quoted(&format!("objx_opt_in:{marker}"))));
    }
    attributes
}
