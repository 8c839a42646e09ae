//! Identifier rules of the target header language.
//!
//! Keyword tables, reserved `NSObject` selectors, method-family detection,
//! and case conversion. Everything here is a pure function of its input.

/// C and Objective-C keywords (plus common macros) that cannot be used as
/// variable or property names.
const C_KEYWORDS: &[&str] = &[
    "BOOL", "Class", "FALSE", "IMP", "NO", "NULL", "Nil", "SEL", "TRUE", "YES", "_Bool",
    "_Complex", "_Imaginary", "asm", "atomic", "auto", "break", "bycopy", "byref", "case",
    "char", "const", "continue", "default", "do", "double", "else", "enum", "extern", "float",
    "for", "goto", "id", "if", "in", "inline", "inout", "instancetype", "int", "long", "nil",
    "nonatomic", "oneway", "out", "register", "restrict", "retain", "return", "self", "short",
    "signed", "sizeof", "static", "struct", "super", "switch", "typedef", "typeof", "union",
    "unsigned", "void", "volatile", "while",
];

/// Selectors declared by `NSObject` that exported members must not
/// override by accident.
const RESERVED_SELECTORS: &[&str] = &[
    "alloc",
    "allocWithZone:",
    "autorelease",
    "class",
    "conformsToProtocol:",
    "copy",
    "dealloc",
    "debugDescription",
    "description",
    "finalize",
    "hash",
    "init",
    "initialize",
    "isEqual:",
    "isKindOfClass:",
    "isMemberOfClass:",
    "isProxy",
    "load",
    "methodForSelector:",
    "mutableCopy",
    "new",
    "performSelector:",
    "release",
    "respondsToSelector:",
    "retain",
    "retainCount",
    "self",
    "superclass",
    "zone",
];

/// Method families with ownership semantics under ARC.
const METHOD_FAMILIES: &[&str] = &["alloc", "copy", "mutableCopy", "new", "init"];

/// Nested type names Swift treats specially.
const SWIFT_RESERVED_TYPES: &[&str] = &["Protocol", "Self", "Type"];

pub fn is_keyword(name: &str) -> bool {
    C_KEYWORDS.contains(&name)
}

pub fn reserved_selectors() -> impl Iterator<Item = &'static str> {
    RESERVED_SELECTORS.iter().copied()
}

pub fn is_reserved_selector(selector: &str) -> bool {
    RESERVED_SELECTORS.contains(&selector)
}

pub fn is_swift_reserved_type(name: &str) -> bool {
    SWIFT_RESERVED_TYPES.contains(&name)
}

/// Append `_` to names that collide with a keyword.
pub fn escape_keyword(name: &str) -> String {
    if is_keyword(name) {
        format!("{name}_")
    } else {
        name.to_string()
    }
}

/// Whether `name` falls into an ARC method family: the family word followed
/// by the end of the name or a non-lowercase character.
pub fn in_method_family(name: &str) -> bool {
    METHOD_FAMILIES.iter().any(|family| {
        name.strip_prefix(family)
            .is_some_and(|rest| !rest.starts_with(|c: char| c.is_ascii_lowercase()))
    })
}

/// Prefix method-family names with `do` so they carry no ownership
/// semantics: `copy` becomes `doCopy`.
pub fn escape_method_family(name: &str) -> String {
    if in_method_family(name) {
        format!("do{}", capitalize(name))
    } else {
        name.to_string()
    }
}

/// Uppercase the first character.
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Convert an entry or file name to UpperCamel case.
///
/// `DROP_OLDEST` becomes `DropOldest`, `LAZY` becomes `Lazy`, and names
/// that are already mixed case only get their first letter raised.
pub fn upper_camel(name: &str) -> String {
    let screaming = name.contains('_')
        || (name.chars().any(|c| c.is_ascii_alphabetic())
            && !name.chars().any(|c| c.is_ascii_lowercase()));
    if !screaming {
        return capitalize(name);
    }
    name.split('_')
        .filter(|part| !part.is_empty())
        .map(|part| capitalize(&part.to_ascii_lowercase()))
        .collect()
}

/// Replace characters that cannot appear in an identifier with `_`.
pub fn sanitize_identifier(name: &str) -> String {
    let mut out: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if out.starts_with(|c: char| c.is_ascii_digit()) || out.is_empty() {
        out.insert(0, '_');
    }
    out
}
