//! Linker symbols for managed entry points.
//!
//! The launcher and the runtime bridge agree on one symbol per entry
//! function:
//!
//! ```text
//! _objx_<module>$<function>
//! ```
//!
//! - `_objx_` identifies objx symbols
//! - `<module>` is the module path with `.`, `/`, `\` and `:` replaced by `$`
//! - `<function>` is the function name
//!
//! Bytes outside `[A-Za-z0-9_]` are escaped as `$$` followed by two hex
//! digits, so a single `$` is always a separator.
//!
//! | Module | Function | Symbol |
//! |--------|----------|--------|
//! | (root) | `main` | `_objx_main` |
//! | `app` | `main` | `_objx_app$main` |
//! | `demo.cli` | `run` | `_objx_demo$cli$run` |
//! | `app` | `main-v2` | `_objx_app$main$$2dv2` |

use std::fmt::Write;

/// The prefix of every objx entry symbol.
pub const MANGLE_PREFIX: &str = "_objx_";

/// Separator between path segments and before the function name.
const SEP: char = '$';

/// Mangle the entry function `function` of `module_path`.
pub fn mangle_entry(module_path: &str, function: &str) -> String {
    let mut out = String::with_capacity(MANGLE_PREFIX.len() + module_path.len() + function.len() + 1);
    out.push_str(MANGLE_PREFIX);
    if !module_path.is_empty() {
        encode_module_path(&mut out, module_path);
        out.push(SEP);
    }
    encode_identifier(&mut out, function);
    out
}

/// Whether `name` is an objx entry symbol.
pub fn is_objx_symbol(name: &str) -> bool {
    name.starts_with(MANGLE_PREFIX)
}

/// Recover `module.function` (or just `function` for the root module).
///
/// Returns `None` for symbols without the objx prefix or with malformed
/// escapes.
pub fn demangle(symbol: &str) -> Option<String> {
    let rest = symbol.strip_prefix(MANGLE_PREFIX)?;
    let segments = DemangleParser::new(rest).parse()?;
    Some(segments.join("."))
}

fn encode_module_path(out: &mut String, path: &str) {
    let segments = path.split(['.', '/', '\\', ':']).filter(|s| !s.is_empty());
    for (i, segment) in segments.enumerate() {
        if i > 0 {
            out.push(SEP);
        }
        encode_identifier(out, segment);
    }
}

fn encode_identifier(out: &mut String, name: &str) {
    for byte in name.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'_' {
            out.push(char::from(byte));
        } else {
            let _ = write!(out, "$${byte:02x}");
        }
    }
}

struct DemangleParser<'a> {
    input: &'a [u8],
    pos: usize,
    segments: Vec<String>,
    current: Vec<u8>,
}

impl<'a> DemangleParser<'a> {
    fn new(input: &'a str) -> Self {
        DemangleParser {
            input: input.as_bytes(),
            pos: 0,
            segments: Vec::new(),
            current: Vec::new(),
        }
    }

    fn parse(mut self) -> Option<Vec<String>> {
        while let Some(&byte) = self.input.get(self.pos) {
            if byte != b'$' {
                self.current.push(byte);
                self.pos += 1;
                continue;
            }
            let run = self.input[self.pos..].iter().take_while(|&&b| b == b'$').count();
            self.pos += run;
            match run {
                1 => self.push_segment()?,
                2 => self.decode_escape()?,
                3 => {
                    self.push_segment()?;
                    self.decode_escape()?;
                }
                _ => return None,
            }
        }
        self.push_segment()?;
        Some(self.segments)
    }

    fn decode_escape(&mut self) -> Option<()> {
        let hex = self.input.get(self.pos..self.pos + 2)?;
        let hex = std::str::from_utf8(hex).ok()?;
        self.current.push(u8::from_str_radix(hex, 16).ok()?);
        self.pos += 2;
        Some(())
    }

    fn push_segment(&mut self) -> Option<()> {
        if self.current.is_empty() {
            return None;
        }
        let bytes = std::mem::take(&mut self.current);
        self.segments.push(String::from_utf8(bytes).ok()?);
        Some(())
    }
}
