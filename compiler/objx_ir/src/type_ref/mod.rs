//! Managed-language type references.
//!
//! `TypeRef` is the type vocabulary of the declaration graph. It is a
//! closed tagged variant; the type mapper matches on it exhaustively.
//!
//! # Normalization
//!
//! `Nullable(Nullable(x))` never occurs. [`TypeRef::nullable`] refuses to
//! double-wrap, and [`TypeRef::normalize`] collapses nested wrappers in
//! types that arrive from deserialization. `GraphBuilder` normalizes every
//! type it ingests, so consumers of a finished graph can rely on it.

use std::fmt;

use crate::DeclId;

/// Fixed-width managed primitive kinds.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PrimitiveKind {
    Boolean,
    Byte,
    UByte,
    Short,
    UShort,
    Int,
    UInt,
    Long,
    ULong,
    Float,
    Double,
    /// UTF-16 code unit.
    Char,
}

impl PrimitiveKind {
    pub const ALL: [PrimitiveKind; 12] = [
        PrimitiveKind::Boolean,
        PrimitiveKind::Byte,
        PrimitiveKind::UByte,
        PrimitiveKind::Short,
        PrimitiveKind::UShort,
        PrimitiveKind::Int,
        PrimitiveKind::UInt,
        PrimitiveKind::Long,
        PrimitiveKind::ULong,
        PrimitiveKind::Float,
        PrimitiveKind::Double,
        PrimitiveKind::Char,
    ];

    /// Managed-side spelling, used in signature keys and messages.
    pub const fn name(self) -> &'static str {
        match self {
            PrimitiveKind::Boolean => "Boolean",
            PrimitiveKind::Byte => "Byte",
            PrimitiveKind::UByte => "UByte",
            PrimitiveKind::Short => "Short",
            PrimitiveKind::UShort => "UShort",
            PrimitiveKind::Int => "Int",
            PrimitiveKind::UInt => "UInt",
            PrimitiveKind::Long => "Long",
            PrimitiveKind::ULong => "ULong",
            PrimitiveKind::Float => "Float",
            PrimitiveKind::Double => "Double",
            PrimitiveKind::Char => "Char",
        }
    }
}

/// Built-in reference types with fixed foreign counterparts.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BuiltinKind {
    /// Top type.
    Any,
    String,
    /// Single-value type; `void` in return position.
    Unit,
    /// Uninhabited type.
    Nothing,
}

impl BuiltinKind {
    pub const fn name(self) -> &'static str {
        match self {
            BuiltinKind::Any => "Any",
            BuiltinKind::String => "String",
            BuiltinKind::Unit => "Unit",
            BuiltinKind::Nothing => "Nothing",
        }
    }
}

/// Array-like and collection containers.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ContainerKind {
    List,
    MutableList,
    Set,
    MutableSet,
    Array,
}

impl ContainerKind {
    pub const fn name(self) -> &'static str {
        match self {
            ContainerKind::List => "List",
            ContainerKind::MutableList => "MutableList",
            ContainerKind::Set => "Set",
            ContainerKind::MutableSet => "MutableSet",
            ContainerKind::Array => "Array",
        }
    }
}

/// A managed type as referenced from a declaration.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TypeRef {
    Primitive(PrimitiveKind),
    Builtin(BuiltinKind),
    /// "May be absent". Never directly nested.
    Nullable(Box<TypeRef>),
    /// A class or interface applied to type arguments.
    Generic { base: DeclId, args: Vec<TypeRef> },
    Function {
        params: Vec<TypeRef>,
        suspend: bool,
        returns: Box<TypeRef>,
    },
    ArrayLike {
        kind: ContainerKind,
        element: Box<TypeRef>,
    },
    Map {
        mutable: bool,
        key: Box<TypeRef>,
        value: Box<TypeRef>,
    },
    /// A non-generic use of a declared type.
    Reference(DeclId),
    /// A type parameter of the enclosing declaration or member.
    TypeParameter(String),
}

impl TypeRef {
    pub const BOOLEAN: TypeRef = TypeRef::Primitive(PrimitiveKind::Boolean);
    pub const INT: TypeRef = TypeRef::Primitive(PrimitiveKind::Int);
    pub const LONG: TypeRef = TypeRef::Primitive(PrimitiveKind::Long);
    pub const DOUBLE: TypeRef = TypeRef::Primitive(PrimitiveKind::Double);
    pub const ANY: TypeRef = TypeRef::Builtin(BuiltinKind::Any);
    pub const STRING: TypeRef = TypeRef::Builtin(BuiltinKind::String);
    pub const UNIT: TypeRef = TypeRef::Builtin(BuiltinKind::Unit);
    pub const NOTHING: TypeRef = TypeRef::Builtin(BuiltinKind::Nothing);

    /// Wrap `inner` as nullable. Already-nullable types are returned as is.
    pub fn nullable(inner: TypeRef) -> TypeRef {
        match inner {
            TypeRef::Nullable(_) => inner,
            other => TypeRef::Nullable(Box::new(other)),
        }
    }

    pub fn reference(id: DeclId) -> TypeRef {
        TypeRef::Reference(id)
    }

    pub fn generic(base: DeclId, args: Vec<TypeRef>) -> TypeRef {
        TypeRef::Generic { base, args }
    }

    pub fn param(name: impl Into<String>) -> TypeRef {
        TypeRef::TypeParameter(name.into())
    }

    pub fn list(element: TypeRef) -> TypeRef {
        TypeRef::container(ContainerKind::List, element)
    }

    pub fn container(kind: ContainerKind, element: TypeRef) -> TypeRef {
        TypeRef::ArrayLike {
            kind,
            element: Box::new(element),
        }
    }

    pub fn map(mutable: bool, key: TypeRef, value: TypeRef) -> TypeRef {
        TypeRef::Map {
            mutable,
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    pub fn function(params: Vec<TypeRef>, returns: TypeRef) -> TypeRef {
        TypeRef::Function {
            params,
            suspend: false,
            returns: Box::new(returns),
        }
    }

    pub fn suspend_function(params: Vec<TypeRef>, returns: TypeRef) -> TypeRef {
        TypeRef::Function {
            params,
            suspend: true,
            returns: Box::new(returns),
        }
    }

    #[inline]
    pub fn is_nullable(&self) -> bool {
        matches!(self, TypeRef::Nullable(_))
    }

    /// The type with one level of nullability removed.
    pub fn non_null(&self) -> &TypeRef {
        match self {
            TypeRef::Nullable(inner) => inner,
            other => other,
        }
    }

    /// Collapse nested nullable wrappers everywhere in the type.
    #[must_use]
    pub fn normalize(self) -> TypeRef {
        match self {
            TypeRef::Nullable(inner) => TypeRef::nullable(inner.normalize()),
            TypeRef::Generic { base, args } => TypeRef::Generic {
                base,
                args: args.into_iter().map(TypeRef::normalize).collect(),
            },
            TypeRef::Function {
                params,
                suspend,
                returns,
            } => TypeRef::Function {
                params: params.into_iter().map(TypeRef::normalize).collect(),
                suspend,
                returns: Box::new(returns.normalize()),
            },
            TypeRef::ArrayLike { kind, element } => TypeRef::ArrayLike {
                kind,
                element: Box::new(element.normalize()),
            },
            TypeRef::Map {
                mutable,
                key,
                value,
            } => TypeRef::Map {
                mutable,
                key: Box::new(key.normalize()),
                value: Box::new(value.normalize()),
            },
            leaf @ (TypeRef::Primitive(_)
            | TypeRef::Builtin(_)
            | TypeRef::Reference(_)
            | TypeRef::TypeParameter(_)) => leaf,
        }
    }

    /// Whether no `Nullable(Nullable(_))` occurs anywhere in the type.
    pub fn is_normalized(&self) -> bool {
        match self {
            TypeRef::Nullable(inner) => !inner.is_nullable() && inner.is_normalized(),
            TypeRef::Generic { args, .. } => args.iter().all(TypeRef::is_normalized),
            TypeRef::Function {
                params, returns, ..
            } => params.iter().all(TypeRef::is_normalized) && returns.is_normalized(),
            TypeRef::ArrayLike { element, .. } => element.is_normalized(),
            TypeRef::Map { key, value, .. } => key.is_normalized() && value.is_normalized(),
            TypeRef::Primitive(_)
            | TypeRef::Builtin(_)
            | TypeRef::Reference(_)
            | TypeRef::TypeParameter(_) => true,
        }
    }

    /// Visit every declaration referenced anywhere in the type.
    pub fn for_each_decl(&self, f: &mut impl FnMut(DeclId)) {
        match self {
            TypeRef::Reference(id) => f(*id),
            TypeRef::Generic { base, args } => {
                f(*base);
                for arg in args {
                    arg.for_each_decl(f);
                }
            }
            TypeRef::Nullable(inner) => inner.for_each_decl(f),
            TypeRef::Function {
                params, returns, ..
            } => {
                for param in params {
                    param.for_each_decl(f);
                }
                returns.for_each_decl(f);
            }
            TypeRef::ArrayLike { element, .. } => element.for_each_decl(f),
            TypeRef::Map { key, value, .. } => {
                key.for_each_decl(f);
                value.for_each_decl(f);
            }
            TypeRef::Primitive(_) | TypeRef::Builtin(_) | TypeRef::TypeParameter(_) => {}
        }
    }
}

/// Managed-like rendering used for signature keys and diagnostics.
///
/// Type parameters render as `_` so that an override written against a
/// substituted supertype still produces the same key as the declaration it
/// overrides.
impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Primitive(kind) => f.write_str(kind.name()),
            TypeRef::Builtin(kind) => f.write_str(kind.name()),
            TypeRef::Nullable(inner) => write!(f, "{inner}?"),
            TypeRef::Generic { base, args } => {
                write!(f, "{base}<")?;
                write_list(f, args)?;
                f.write_str(">")
            }
            TypeRef::Function {
                params,
                suspend,
                returns,
            } => {
                if *suspend {
                    f.write_str("suspend ")?;
                }
                f.write_str("(")?;
                write_list(f, params)?;
                write!(f, ") -> {returns}")
            }
            TypeRef::ArrayLike { kind, element } => write!(f, "{}<{element}>", kind.name()),
            TypeRef::Map {
                mutable,
                key,
                value,
            } => {
                let name = if *mutable { "MutableMap" } else { "Map" };
                write!(f, "{name}<{key}, {value}>")
            }
            TypeRef::Reference(id) => write!(f, "{id}"),
            TypeRef::TypeParameter(_) => f.write_str("_"),
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, types: &[TypeRef]) -> fmt::Result {
    for (i, ty) in types.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{ty}")?;
    }
    Ok(())
}
