#![allow(clippy::unwrap_used, reason = "test code uses unwrap for concise assertions")]

use pretty_assertions::assert_eq;

use super::*;

#[test]
fn blocks_are_separated_by_a_blank_line() {
    let mut out = StringEmitter::new();
    out.emit_line("@class A;");
    out.blank_line();
    out.emit_block("@interface A : Base\n@end\n");
    out.emit_block("@protocol B\n@end\n");
    assert_eq!(
        out.as_str(),
        "@class A;\n\n@interface A : Base\n@end\n\n@protocol B\n@end\n\n"
    );
}

#[test]
fn file_emitter_counts_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Shared.h");
    let mut out = FileEmitter::create(&path).unwrap();
    out.emit_line("#import <Foundation/NSObject.h>");
    out.blank_line();
    let written = out.finish().unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(text, "#import <Foundation/NSObject.h>\n\n");
    assert_eq!(written, text.len());
}

#[test]
fn file_emitter_needs_an_existing_directory() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("Shared.h");
    assert!(FileEmitter::create(&path).is_err());
}
