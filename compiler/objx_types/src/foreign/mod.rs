//! Objective-C type expressions.
//!
//! A `ForeignType` is what a managed type becomes in the header. It renders
//! either as an abstract type (`NSString * _Nullable`, used in casts and
//! method parameter lists) or as a declarator around a name
//! (`NSString *name`, `void (^ _Nullable handler)(void)`).
//!
//! Block types compose the C way: the declarator of a block nests inside
//! the declarator of its return type, so a block returning a block renders
//! as `void (^(^)(int32_t))(int32_t)`.

use std::fmt;

/// Outermost nullability qualifier of a reference type.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum Nullability {
    /// No qualifier: non-null under `NS_ASSUME_NONNULL`.
    #[default]
    Unspecified,
    Nullable,
    /// Nullable result of a completion handler.
    NullableResult,
}

impl Nullability {
    pub const fn qualifier(self) -> Option<&'static str> {
        match self {
            Nullability::Unspecified => None,
            Nullability::Nullable => Some("_Nullable"),
            Nullability::NullableResult => Some("_Nullable_result"),
        }
    }

    pub const fn is_nullable(self) -> bool {
        !matches!(self, Nullability::Unspecified)
    }

    /// Re-derive the outermost nullability of a rendered abstract type.
    ///
    /// For blocks the outermost qualifier is the one on the innermost
    /// caret; qualifiers inside parameter lists and generic arguments
    /// belong to nested types and are skipped.
    pub fn of_rendered(text: &str) -> Nullability {
        let text = text.trim();
        if text.ends_with(')') {
            return block_nullability(text);
        }
        trailing_qualifier(text).0
    }
}

/// Split a trailing qualifier off `text`.
fn trailing_qualifier(text: &str) -> (Nullability, &str) {
    if let Some(rest) = text.strip_suffix("_Nullable_result") {
        (Nullability::NullableResult, rest.trim_end())
    } else if let Some(rest) = text.strip_suffix("_Nullable") {
        (Nullability::Nullable, rest.trim_end())
    } else {
        (Nullability::Unspecified, text)
    }
}

/// Split a leading qualifier off `text`.
fn leading_qualifier(text: &str) -> (Nullability, &str) {
    if let Some(rest) = text.strip_prefix("_Nullable_result") {
        (Nullability::NullableResult, rest.trim_start())
    } else if let Some(rest) = text.strip_prefix("_Nullable") {
        (Nullability::Nullable, rest.trim_start())
    } else {
        (Nullability::Unspecified, text)
    }
}

/// Byte offset of the `(` matching the `)` at `close`.
fn matching_open(text: &str, close: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, byte) in text.as_bytes()[..=close].iter().enumerate().rev() {
        match byte {
            b')' => depth += 1,
            b'(' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// `R (^q D)(P)`: strip the parameter list, then read the caret group.
fn block_nullability(text: &str) -> Nullability {
    let Some(params) = matching_open(text, text.len() - 1) else {
        return Nullability::Unspecified;
    };
    let head = text[..params].trim_end();
    if !head.ends_with(')') {
        return Nullability::Unspecified;
    }
    let Some(open) = matching_open(head, head.len() - 1) else {
        return Nullability::Unspecified;
    };
    let group = &head[open + 1..head.len() - 1];
    let Some(after_caret) = group.strip_prefix('^') else {
        return Nullability::Unspecified;
    };
    let (nullability, rest) = leading_qualifier(after_caret.trim_start());
    if rest.starts_with('(') && rest.ends_with(')') {
        // A block returning a block: the inner declarator is the outer type.
        block_nullability(rest)
    } else {
        nullability
    }
}

/// The shape of a foreign type, without its outermost qualifier.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum ForeignKind {
    Void,
    /// A C scalar: `int32_t`, `BOOL`, `unichar`, `NSUInteger`, ...
    Scalar(&'static str),
    InstanceType,
    /// `id` or `id<P, Q>`.
    Id { protocols: Vec<String> },
    /// `Class<Args> *`.
    Pointer { class: String, args: Vec<ForeignType> },
    /// A lightweight-generic type parameter of the enclosing class.
    TypeParam(String),
    Block {
        returns: Box<ForeignType>,
        params: Vec<ForeignType>,
    },
    /// `NSError * _Nullable * _Nullable`.
    ErrorOut,
}

/// A rendered-to-be Objective-C type.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct ForeignType {
    pub kind: ForeignKind,
    pub nullability: Nullability,
}

impl ForeignType {
    pub const VOID: ForeignType = ForeignType::scalar_kind(ForeignKind::Void);
    pub const BOOL: ForeignType = ForeignType::scalar("BOOL");
    pub const NS_UINTEGER: ForeignType = ForeignType::scalar("NSUInteger");
    pub const INSTANCE_TYPE: ForeignType = ForeignType::scalar_kind(ForeignKind::InstanceType);
    pub const ERROR_OUT: ForeignType = ForeignType::scalar_kind(ForeignKind::ErrorOut);

    const fn scalar_kind(kind: ForeignKind) -> Self {
        ForeignType {
            kind,
            nullability: Nullability::Unspecified,
        }
    }

    pub const fn scalar(name: &'static str) -> Self {
        ForeignType::scalar_kind(ForeignKind::Scalar(name))
    }

    pub fn id() -> Self {
        ForeignType::scalar_kind(ForeignKind::Id {
            protocols: Vec::new(),
        })
    }

    pub fn protocol(name: impl Into<String>) -> Self {
        ForeignType::scalar_kind(ForeignKind::Id {
            protocols: vec![name.into()],
        })
    }

    pub fn class(name: impl Into<String>) -> Self {
        ForeignType::generic_class(name, Vec::new())
    }

    pub fn generic_class(name: impl Into<String>, args: Vec<ForeignType>) -> Self {
        ForeignType::scalar_kind(ForeignKind::Pointer {
            class: name.into(),
            args,
        })
    }

    pub fn type_param(name: impl Into<String>) -> Self {
        ForeignType::scalar_kind(ForeignKind::TypeParam(name.into()))
    }

    pub fn block(returns: ForeignType, params: Vec<ForeignType>) -> Self {
        ForeignType::scalar_kind(ForeignKind::Block {
            returns: Box::new(returns),
            params,
        })
    }

    /// Whether the type can carry a nullability qualifier.
    pub fn is_reference(&self) -> bool {
        matches!(
            self.kind,
            ForeignKind::InstanceType
                | ForeignKind::Id { .. }
                | ForeignKind::Pointer { .. }
                | ForeignKind::TypeParam(_)
                | ForeignKind::Block { .. }
        )
    }

    pub fn is_void(&self) -> bool {
        self.kind == ForeignKind::Void
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self.kind, ForeignKind::Scalar(_))
    }

    pub fn is_nullable(&self) -> bool {
        self.nullability.is_nullable()
    }

    /// The same type with the given outermost qualifier. Scalars and
    /// `void` cannot be qualified and are returned unchanged.
    #[must_use]
    pub fn with_nullability(mut self, nullability: Nullability) -> Self {
        if self.is_reference() {
            self.nullability = nullability;
        }
        self
    }

    #[must_use]
    pub fn nullable(self) -> Self {
        self.with_nullability(Nullability::Nullable)
    }

    /// The abstract type, as written inside a cast or a parameter list.
    pub fn render(&self) -> String {
        self.declare("")
    }

    /// A declaration of `name` with this type. An empty name yields the
    /// abstract type.
    pub fn declare(&self, name: &str) -> String {
        if let ForeignKind::Block { returns, params } = &self.kind {
            let mut caret = String::from("^");
            if let Some(q) = self.nullability.qualifier() {
                caret.push(' ');
                caret.push_str(q);
                if !name.is_empty() {
                    caret.push(' ');
                }
            }
            caret.push_str(name);
            let params = if params.is_empty() {
                "void".to_string()
            } else {
                params.iter().map(ForeignType::render).collect::<Vec<_>>().join(", ")
            };
            return returns.declare(&format!("({caret})({params})"));
        }

        let base = self.base();
        if name.is_empty() {
            base
        } else if base.ends_with('*') {
            format!("{base}{name}")
        } else {
            format!("{base} {name}")
        }
    }

    /// Every non-block form, qualifier included.
    fn base(&self) -> String {
        let mut out = match &self.kind {
            ForeignKind::Void => "void".to_string(),
            ForeignKind::Scalar(name) => (*name).to_string(),
            ForeignKind::InstanceType => "instancetype".to_string(),
            ForeignKind::Id { protocols } if protocols.is_empty() => "id".to_string(),
            ForeignKind::Id { protocols } => format!("id<{}>", protocols.join(", ")),
            ForeignKind::Pointer { class, args } if args.is_empty() => format!("{class} *"),
            ForeignKind::Pointer { class, args } => {
                let args = args.iter().map(ForeignType::render).collect::<Vec<_>>();
                format!("{class}<{}> *", args.join(", "))
            }
            ForeignKind::TypeParam(name) => name.clone(),
            ForeignKind::ErrorOut => return "NSError * _Nullable * _Nullable".to_string(),
            ForeignKind::Block { .. } => return self.declare(""),
        };
        if let Some(q) = self.nullability.qualifier() {
            out.push(' ');
            out.push_str(q);
        }
        out
    }
}

impl fmt::Display for ForeignType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
