//! Members of class-like declarations.

use super::Annotations;
use crate::{DeclId, TypeRef};

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Internal,
    Private,
}

impl Visibility {
    /// Public and protected declarations are part of the exported surface.
    pub const fn is_exported(self) -> bool {
        matches!(self, Visibility::Public | Visibility::Protected)
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Variance {
    #[default]
    Invariant,
    /// Contravariant (`in T`).
    In,
    /// Covariant (`out T`).
    Out,
}

/// A generic parameter of a declaration or member.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TypeParam {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub variance: Variance,
    /// Upper bound. `None` means the nullable top type.
    #[cfg_attr(feature = "serde", serde(default))]
    pub bound: Option<TypeRef>,
}

impl TypeParam {
    pub fn new(name: impl Into<String>) -> Self {
        TypeParam {
            name: name.into(),
            variance: Variance::Invariant,
            bound: None,
        }
    }

    #[must_use]
    pub fn with_variance(mut self, variance: Variance) -> Self {
        self.variance = variance;
        self
    }

    #[must_use]
    pub fn with_bound(mut self, bound: TypeRef) -> Self {
        self.bound = Some(bound);
        self
    }

    /// Whether values of this parameter may be absent.
    pub fn is_nullable(&self) -> bool {
        self.bound.as_ref().map_or(true, TypeRef::is_nullable)
    }
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Parameter {
    pub name: String,
    pub ty: TypeRef,
    /// Suppresses the variance check for a covariant parameter used in
    /// parameter position.
    #[cfg_attr(feature = "serde", serde(default))]
    pub unsafe_variance: bool,
}

impl Parameter {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Parameter {
            name: name.into(),
            ty,
            unsafe_variance: false,
        }
    }
}

/// A failure a member declares it may raise.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FailureKind {
    /// Cooperative cancellation.
    Cancellation,
    /// A declared exception class.
    Class(DeclId),
    /// Every managed failure is recoverable.
    Any,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Constructor {
    pub params: Vec<Parameter>,
    pub primary: bool,
    pub visibility: Visibility,
    pub annotations: Annotations,
    pub throws: Vec<FailureKind>,
}

impl Constructor {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn param(mut self, name: impl Into<String>, ty: TypeRef) -> Self {
        self.params.push(Parameter::new(name, ty));
        self
    }

    #[must_use]
    pub fn primary(mut self) -> Self {
        self.primary = true;
        self
    }

    #[must_use]
    pub fn throwing(mut self, kind: FailureKind) -> Self {
        self.throws.push(kind);
        self
    }
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Function {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub params: Vec<Parameter>,
    pub returns: TypeRef,
    #[cfg_attr(feature = "serde", serde(default))]
    pub generics: Vec<TypeParam>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub suspend: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub throws: Vec<FailureKind>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_abstract: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_override: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub visibility: Visibility,
    #[cfg_attr(feature = "serde", serde(default))]
    pub annotations: Annotations,
}

impl Function {
    pub fn new(name: impl Into<String>, returns: TypeRef) -> Self {
        Function {
            name: name.into(),
            params: Vec::new(),
            returns,
            generics: Vec::new(),
            suspend: false,
            throws: Vec::new(),
            is_abstract: false,
            is_override: false,
            visibility: Visibility::Public,
            annotations: Annotations::default(),
        }
    }

    #[must_use]
    pub fn param(mut self, name: impl Into<String>, ty: TypeRef) -> Self {
        self.params.push(Parameter::new(name, ty));
        self
    }

    #[must_use]
    pub fn with_param(mut self, param: Parameter) -> Self {
        self.params.push(param);
        self
    }

    #[must_use]
    pub fn generic(mut self, param: TypeParam) -> Self {
        self.generics.push(param);
        self
    }

    #[must_use]
    pub fn suspending(mut self) -> Self {
        self.suspend = true;
        self
    }

    #[must_use]
    pub fn throwing(mut self, kind: FailureKind) -> Self {
        self.throws.push(kind);
        self
    }

    #[must_use]
    pub fn abstract_(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    #[must_use]
    pub fn overriding(mut self) -> Self {
        self.is_override = true;
        self
    }

    #[must_use]
    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    #[must_use]
    pub fn with_annotations(mut self, annotations: Annotations) -> Self {
        self.annotations = annotations;
        self
    }
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Property {
    pub name: String,
    pub ty: TypeRef,
    #[cfg_attr(feature = "serde", serde(default))]
    pub mutable: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_abstract: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_override: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub visibility: Visibility,
    #[cfg_attr(feature = "serde", serde(default))]
    pub annotations: Annotations,
}

impl Property {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Property {
            name: name.into(),
            ty,
            mutable: false,
            is_abstract: false,
            is_override: false,
            visibility: Visibility::Public,
            annotations: Annotations::default(),
        }
    }

    #[must_use]
    pub fn mutable(mut self) -> Self {
        self.mutable = true;
        self
    }

    #[must_use]
    pub fn abstract_(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    #[must_use]
    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    #[must_use]
    pub fn with_annotations(mut self, annotations: Annotations) -> Self {
        self.annotations = annotations;
        self
    }
}

/// A member of a class-like declaration.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind"))]
pub enum Member {
    Constructor(Constructor),
    Function(Function),
    Property(Property),
}

impl Member {
    pub fn visibility(&self) -> Visibility {
        match self {
            Member::Constructor(c) => c.visibility,
            Member::Function(f) => f.visibility,
            Member::Property(p) => p.visibility,
        }
    }

    pub fn annotations(&self) -> &Annotations {
        match self {
            Member::Constructor(c) => &c.annotations,
            Member::Function(f) => &f.annotations,
            Member::Property(p) => &p.annotations,
        }
    }

    /// Managed name; constructors are `<init>`.
    pub fn name(&self) -> &str {
        match self {
            Member::Constructor(_) => "<init>",
            Member::Function(f) => &f.name,
            Member::Property(p) => &p.name,
        }
    }

    /// Public or protected, and not hidden by a deprecation. Hidden members
    /// leave no trace in the header, not even an unavailable declaration.
    pub fn is_exported(&self) -> bool {
        self.visibility().is_exported() && !self.annotations().is_hidden()
    }

    /// Abstract members stay in protocols; concrete interface members
    /// are hoisted out.
    pub fn is_abstract(&self) -> bool {
        match self {
            Member::Constructor(_) => false,
            Member::Function(f) => f.is_abstract,
            Member::Property(p) => p.is_abstract,
        }
    }

    /// Apply `f` to every type mentioned by the member.
    pub(crate) fn types_mut(&mut self, f: &mut impl FnMut(&mut TypeRef)) {
        match self {
            Member::Constructor(c) => c.params.iter_mut().for_each(|p| f(&mut p.ty)),
            Member::Function(func) => {
                func.params.iter_mut().for_each(|p| f(&mut p.ty));
                f(&mut func.returns);
                func.generics
                    .iter_mut()
                    .filter_map(|g| g.bound.as_mut())
                    .for_each(|b| f(b));
            }
            Member::Property(p) => f(&mut p.ty),
        }
    }

    /// Declared failure classes, for reference validation.
    pub(crate) fn failure_classes(&self) -> impl Iterator<Item = DeclId> + '_ {
        let throws: &[FailureKind] = match self {
            Member::Constructor(c) => &c.throws,
            Member::Function(f) => &f.throws,
            Member::Property(_) => &[],
        };
        throws.iter().filter_map(|kind| match kind {
            FailureKind::Class(id) => Some(*id),
            FailureKind::Cancellation | FailureKind::Any => None,
        })
    }
}
