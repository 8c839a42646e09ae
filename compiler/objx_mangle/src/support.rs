//! Support types every header declares before any exported declaration.
//!
//! Their names are reserved in the type namespace ahead of user
//! declarations, so an exported class called `Base` or `Int` is the one
//! that moves.

use objx_ir::{ExportConfig, PrimitiveKind};

/// Root class of every exported class.
pub const BASE: &str = "Base";
pub const MUTABLE_SET: &str = "MutableSet";
pub const MUTABLE_DICTIONARY: &str = "MutableDictionary";
/// Abstract superclass of the boxed number classes.
pub const NUMBER: &str = "Number";

/// Stdlib support types, named `<stdlib_prefix><name>`.
pub const UNIT: &str = "Unit";
pub const NOTHING: &str = "Nothing";
pub const ARRAY: &str = "Array";

/// A boxed number class wrapping one primitive kind.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct BoxedNumber {
    pub kind: PrimitiveKind,
    /// Class name without the framework prefix.
    pub name: &'static str,
    /// Piece used in `initWithX:` and `numberWithX:`.
    pub selector_piece: &'static str,
    /// C type of the wrapped value.
    pub c_type: &'static str,
}

const fn boxed(
    kind: PrimitiveKind,
    name: &'static str,
    selector_piece: &'static str,
    c_type: &'static str,
) -> BoxedNumber {
    BoxedNumber {
        kind,
        name,
        selector_piece,
        c_type,
    }
}

/// The eleven boxed number classes, in declaration order.
pub const BOXED_NUMBERS: [BoxedNumber; 11] = [
    boxed(PrimitiveKind::Byte, "Byte", "Char", "char"),
    boxed(PrimitiveKind::UByte, "UByte", "UnsignedChar", "unsigned char"),
    boxed(PrimitiveKind::Short, "Short", "Short", "short"),
    boxed(PrimitiveKind::UShort, "UShort", "UnsignedShort", "unsigned short"),
    boxed(PrimitiveKind::Int, "Int", "Int", "int"),
    boxed(PrimitiveKind::UInt, "UInt", "UnsignedInt", "unsigned int"),
    boxed(PrimitiveKind::Long, "Long", "LongLong", "long long"),
    boxed(PrimitiveKind::ULong, "ULong", "UnsignedLongLong", "unsigned long long"),
    boxed(PrimitiveKind::Float, "Float", "Float", "float"),
    boxed(PrimitiveKind::Double, "Double", "Double", "double"),
    boxed(PrimitiveKind::Boolean, "Boolean", "Bool", "BOOL"),
];

/// The boxed class of a primitive. `Char` has none and boxes to `id`.
pub fn boxed_number(kind: PrimitiveKind) -> Option<&'static BoxedNumber> {
    BOXED_NUMBERS.iter().find(|b| b.kind == kind)
}

/// Every reserved type name, without the framework prefix.
pub fn reserved_type_names(config: &ExportConfig) -> Vec<String> {
    let mut names: Vec<String> = [BASE, MUTABLE_SET, MUTABLE_DICTIONARY, NUMBER]
        .iter()
        .map(|name| (*name).to_string())
        .collect();
    names.extend(BOXED_NUMBERS.iter().map(|b| b.name.to_string()));
    names.extend(
        [UNIT, NOTHING, ARRAY]
            .iter()
            .map(|name| format!("{}{name}", config.stdlib_prefix)),
    );
    names
}
