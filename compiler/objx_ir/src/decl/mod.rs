//! Declarations of the exported API graph.
//!
//! `Declaration` is a closed tagged variant. Every pipeline stage matches it
//! exhaustively, so adding a kind forces each stage to decide how to handle
//! it.

mod annotations;
mod member;

pub use annotations::{Annotations, Deprecation, DeprecationLevel};
pub use member::{
    Constructor, FailureKind, Function, Member, Parameter, Property, TypeParam, Variance,
    Visibility,
};

use crate::{DeclId, ModuleId, TypeRef};

/// Attributes shared by every declaration kind.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeclInfo {
    pub id: DeclId,
    pub module: ModuleId,
    /// Dotted package, e.g. `kotlinx.coroutines`. May be empty.
    #[cfg_attr(feature = "serde", serde(default))]
    pub package: String,
    /// Simple managed name.
    pub name: String,
    /// Lexically enclosing declaration, for nested types.
    #[cfg_attr(feature = "serde", serde(default))]
    pub outer: Option<DeclId>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub visibility: Visibility,
    #[cfg_attr(feature = "serde", serde(default))]
    pub annotations: Annotations,
}

impl DeclInfo {
    pub fn new(id: DeclId, module: ModuleId, name: impl Into<String>) -> Self {
        DeclInfo {
            id,
            module,
            package: String::new(),
            name: name.into(),
            outer: None,
            visibility: Visibility::Public,
            annotations: Annotations::default(),
        }
    }

    #[must_use]
    pub fn in_package(mut self, package: impl Into<String>) -> Self {
        self.package = package.into();
        self
    }

    #[must_use]
    pub fn nested_in(mut self, outer: DeclId) -> Self {
        self.outer = Some(outer);
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

/// Inheritance modality of a class.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Modality {
    #[default]
    Final,
    Open,
    Abstract,
    Sealed,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClassDecl {
    pub info: DeclInfo,
    #[cfg_attr(feature = "serde", serde(default))]
    pub modality: Modality,
    /// Singleton object declaration.
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_object: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub generics: Vec<TypeParam>,
    /// At most one class supertype plus any number of interfaces.
    #[cfg_attr(feature = "serde", serde(default))]
    pub supertypes: Vec<TypeRef>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub members: Vec<Member>,
}

impl ClassDecl {
    pub fn new(info: DeclInfo) -> Self {
        ClassDecl {
            info,
            modality: Modality::Final,
            is_object: false,
            generics: Vec::new(),
            supertypes: Vec::new(),
            members: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_modality(mut self, modality: Modality) -> Self {
        self.modality = modality;
        self
    }

    #[must_use]
    pub fn object(mut self) -> Self {
        self.is_object = true;
        self
    }

    #[must_use]
    pub fn generic(mut self, param: TypeParam) -> Self {
        self.generics.push(param);
        self
    }

    #[must_use]
    pub fn extends(mut self, supertype: TypeRef) -> Self {
        self.supertypes.push(supertype);
        self
    }

    #[must_use]
    pub fn member(mut self, member: Member) -> Self {
        self.members.push(member);
        self
    }
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InterfaceDecl {
    pub info: DeclInfo,
    #[cfg_attr(feature = "serde", serde(default))]
    pub generics: Vec<TypeParam>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub supertypes: Vec<TypeRef>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub members: Vec<Member>,
}

impl InterfaceDecl {
    pub fn new(info: DeclInfo) -> Self {
        InterfaceDecl {
            info,
            generics: Vec::new(),
            supertypes: Vec::new(),
            members: Vec::new(),
        }
    }

    #[must_use]
    pub fn generic(mut self, param: TypeParam) -> Self {
        self.generics.push(param);
        self
    }

    #[must_use]
    pub fn extends(mut self, supertype: TypeRef) -> Self {
        self.supertypes.push(supertype);
        self
    }

    #[must_use]
    pub fn member(mut self, member: Member) -> Self {
        self.members.push(member);
        self
    }
}

/// Enum class. Its entries are separate `EnumEntry` declarations that name
/// this declaration as their owner.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnumDecl {
    pub info: DeclInfo,
    #[cfg_attr(feature = "serde", serde(default))]
    pub supertypes: Vec<TypeRef>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub members: Vec<Member>,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnumEntryDecl {
    pub info: DeclInfo,
    pub owner: DeclId,
    pub ordinal: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub members: Vec<Member>,
}

/// Per-class singleton holder.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompanionDecl {
    pub info: DeclInfo,
    pub owner: DeclId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub supertypes: Vec<TypeRef>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub members: Vec<Member>,
}

/// Members attached to `receiver` from outside its definition.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExtensionDecl {
    pub info: DeclInfo,
    pub receiver: TypeRef,
    #[cfg_attr(feature = "serde", serde(default))]
    pub generics: Vec<TypeParam>,
    /// Source file stem; names the facade when the receiver is not a class.
    pub file: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub members: Vec<Member>,
}

/// A top-level function or property.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TopLevelDecl {
    pub info: DeclInfo,
    /// Source file stem; top-level members are grouped per file.
    pub file: String,
    pub member: Member,
}

impl EnumDecl {
    pub fn new(info: DeclInfo) -> Self {
        EnumDecl {
            info,
            supertypes: Vec::new(),
            members: Vec::new(),
        }
    }

    #[must_use]
    pub fn member(mut self, member: Member) -> Self {
        self.members.push(member);
        self
    }
}

impl EnumEntryDecl {
    pub fn new(info: DeclInfo, owner: DeclId, ordinal: u32) -> Self {
        EnumEntryDecl {
            info,
            owner,
            ordinal,
            members: Vec::new(),
        }
    }
}

impl CompanionDecl {
    pub fn new(info: DeclInfo, owner: DeclId) -> Self {
        CompanionDecl {
            info,
            owner,
            supertypes: Vec::new(),
            members: Vec::new(),
        }
    }

    #[must_use]
    pub fn member(mut self, member: Member) -> Self {
        self.members.push(member);
        self
    }
}

impl ExtensionDecl {
    pub fn new(info: DeclInfo, receiver: TypeRef, file: impl Into<String>) -> Self {
        ExtensionDecl {
            info,
            receiver,
            generics: Vec::new(),
            file: file.into(),
            members: Vec::new(),
        }
    }

    #[must_use]
    pub fn generic(mut self, param: TypeParam) -> Self {
        self.generics.push(param);
        self
    }

    #[must_use]
    pub fn member(mut self, member: Member) -> Self {
        self.members.push(member);
        self
    }
}

impl TopLevelDecl {
    pub fn function(info: DeclInfo, file: impl Into<String>, function: Function) -> Declaration {
        Declaration::TopLevelFunction(TopLevelDecl {
            info,
            file: file.into(),
            member: Member::Function(function),
        })
    }

    pub fn property(info: DeclInfo, file: impl Into<String>, property: Property) -> Declaration {
        Declaration::Property(TopLevelDecl {
            info,
            file: file.into(),
            member: Member::Property(property),
        })
    }
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind"))]
pub enum Declaration {
    Class(ClassDecl),
    Interface(InterfaceDecl),
    Enum(EnumDecl),
    EnumEntry(EnumEntryDecl),
    Companion(CompanionDecl),
    Extension(ExtensionDecl),
    TopLevelFunction(TopLevelDecl),
    Property(TopLevelDecl),
}

/// Discriminant of [`Declaration`], for messages and dispatch tables.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum DeclKind {
    Class,
    Interface,
    Enum,
    EnumEntry,
    Companion,
    Extension,
    TopLevelFunction,
    Property,
}

impl DeclKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            DeclKind::Class => "class",
            DeclKind::Interface => "interface",
            DeclKind::Enum => "enum",
            DeclKind::EnumEntry => "enum entry",
            DeclKind::Companion => "companion",
            DeclKind::Extension => "extension",
            DeclKind::TopLevelFunction => "function",
            DeclKind::Property => "property",
        }
    }

    /// Kinds that introduce a foreign type name of their own.
    pub const fn is_type(self) -> bool {
        matches!(
            self,
            DeclKind::Class
                | DeclKind::Interface
                | DeclKind::Enum
                | DeclKind::EnumEntry
                | DeclKind::Companion
        )
    }
}

impl Declaration {
    pub fn info(&self) -> &DeclInfo {
        match self {
            Declaration::Class(d) => &d.info,
            Declaration::Interface(d) => &d.info,
            Declaration::Enum(d) => &d.info,
            Declaration::EnumEntry(d) => &d.info,
            Declaration::Companion(d) => &d.info,
            Declaration::Extension(d) => &d.info,
            Declaration::TopLevelFunction(d) | Declaration::Property(d) => &d.info,
        }
    }

    #[inline]
    pub fn id(&self) -> DeclId {
        self.info().id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.info().name
    }

    pub fn kind(&self) -> DeclKind {
        match self {
            Declaration::Class(_) => DeclKind::Class,
            Declaration::Interface(_) => DeclKind::Interface,
            Declaration::Enum(_) => DeclKind::Enum,
            Declaration::EnumEntry(_) => DeclKind::EnumEntry,
            Declaration::Companion(_) => DeclKind::Companion,
            Declaration::Extension(_) => DeclKind::Extension,
            Declaration::TopLevelFunction(_) => DeclKind::TopLevelFunction,
            Declaration::Property(_) => DeclKind::Property,
        }
    }

    /// Generic parameters in scope for the declaration's members.
    pub fn generics(&self) -> &[TypeParam] {
        match self {
            Declaration::Class(d) => &d.generics,
            Declaration::Interface(d) => &d.generics,
            Declaration::Extension(d) => &d.generics,
            Declaration::Enum(_)
            | Declaration::EnumEntry(_)
            | Declaration::Companion(_)
            | Declaration::TopLevelFunction(_)
            | Declaration::Property(_) => &[],
        }
    }

    pub fn supertypes(&self) -> &[TypeRef] {
        match self {
            Declaration::Class(d) => &d.supertypes,
            Declaration::Interface(d) => &d.supertypes,
            Declaration::Enum(d) => &d.supertypes,
            Declaration::Companion(d) => &d.supertypes,
            Declaration::EnumEntry(_)
            | Declaration::Extension(_)
            | Declaration::TopLevelFunction(_)
            | Declaration::Property(_) => &[],
        }
    }

    pub fn members(&self) -> &[Member] {
        match self {
            Declaration::Class(d) => &d.members,
            Declaration::Interface(d) => &d.members,
            Declaration::Enum(d) => &d.members,
            Declaration::EnumEntry(d) => &d.members,
            Declaration::Companion(d) => &d.members,
            Declaration::Extension(d) => &d.members,
            Declaration::TopLevelFunction(d) | Declaration::Property(d) => {
                std::slice::from_ref(&d.member)
            }
        }
    }

    fn members_mut(&mut self) -> &mut [Member] {
        match self {
            Declaration::Class(d) => &mut d.members,
            Declaration::Interface(d) => &mut d.members,
            Declaration::Enum(d) => &mut d.members,
            Declaration::EnumEntry(d) => &mut d.members,
            Declaration::Companion(d) => &mut d.members,
            Declaration::Extension(d) => &mut d.members,
            Declaration::TopLevelFunction(d) | Declaration::Property(d) => {
                std::slice::from_mut(&mut d.member)
            }
        }
    }

    /// The declaration this one is attached to: the enum of an entry, the
    /// class of a companion, or the lexically enclosing type.
    pub fn parent(&self) -> Option<DeclId> {
        match self {
            Declaration::EnumEntry(d) => Some(d.owner),
            Declaration::Companion(d) => Some(d.owner),
            _ => self.info().outer,
        }
    }

    /// Final classes, objects, entries and companions cannot be subclassed.
    pub fn is_final(&self) -> bool {
        match self {
            Declaration::Class(d) => d.is_object || d.modality == Modality::Final,
            Declaration::EnumEntry(_) | Declaration::Companion(_) => true,
            Declaration::Interface(_)
            | Declaration::Enum(_)
            | Declaration::Extension(_)
            | Declaration::TopLevelFunction(_)
            | Declaration::Property(_) => false,
        }
    }

    /// Objects, companions and enum entries expose a single shared instance.
    pub fn is_singleton(&self) -> bool {
        match self {
            Declaration::Class(d) => d.is_object,
            Declaration::EnumEntry(_) | Declaration::Companion(_) => true,
            _ => false,
        }
    }

    /// Collapse nested nullable wrappers in every type the declaration
    /// mentions.
    pub(crate) fn normalize_types(&mut self) {
        let mut normalize = |ty: &mut TypeRef| {
            let owned = std::mem::replace(ty, TypeRef::UNIT);
            *ty = owned.normalize();
        };
        match self {
            Declaration::Class(d) => {
                d.supertypes.iter_mut().for_each(&mut normalize);
                d.generics
                    .iter_mut()
                    .filter_map(|g| g.bound.as_mut())
                    .for_each(&mut normalize);
            }
            Declaration::Interface(d) => {
                d.supertypes.iter_mut().for_each(&mut normalize);
                d.generics
                    .iter_mut()
                    .filter_map(|g| g.bound.as_mut())
                    .for_each(&mut normalize);
            }
            Declaration::Enum(d) => d.supertypes.iter_mut().for_each(&mut normalize),
            Declaration::Companion(d) => d.supertypes.iter_mut().for_each(&mut normalize),
            Declaration::Extension(d) => {
                normalize(&mut d.receiver);
                d.generics
                    .iter_mut()
                    .filter_map(|g| g.bound.as_mut())
                    .for_each(&mut normalize);
            }
            Declaration::EnumEntry(_)
            | Declaration::TopLevelFunction(_)
            | Declaration::Property(_) => {}
        }
        for member in self.members_mut() {
            member.types_mut(&mut normalize);
        }
    }

    /// Every declaration id this declaration refers to.
    pub(crate) fn references(&self) -> Vec<DeclId> {
        let mut out = Vec::new();
        let info = self.info();
        out.extend(info.outer);
        match self {
            Declaration::EnumEntry(d) => out.push(d.owner),
            Declaration::Companion(d) => out.push(d.owner),
            Declaration::Extension(d) => d.receiver.for_each_decl(&mut |id| out.push(id)),
            _ => {}
        }
        for ty in self.supertypes() {
            ty.for_each_decl(&mut |id| out.push(id));
        }
        for param in self.generics() {
            if let Some(bound) = &param.bound {
                bound.for_each_decl(&mut |id| out.push(id));
            }
        }
        for member in self.members() {
            out.extend(member.failure_classes());
            let mut visit = |ty: &TypeRef| ty.for_each_decl(&mut |id| out.push(id));
            match member {
                Member::Constructor(c) => c.params.iter().for_each(|p| visit(&p.ty)),
                Member::Function(f) => {
                    f.params.iter().for_each(|p| visit(&p.ty));
                    visit(&f.returns);
                    f.generics
                        .iter()
                        .filter_map(|g| g.bound.as_ref())
                        .for_each(&mut visit);
                }
                Member::Property(p) => visit(&p.ty),
            }
        }
        out
    }
}

impl From<ClassDecl> for Declaration {
    fn from(decl: ClassDecl) -> Self {
        Declaration::Class(decl)
    }
}

impl From<InterfaceDecl> for Declaration {
    fn from(decl: InterfaceDecl) -> Self {
        Declaration::Interface(decl)
    }
}

impl From<EnumDecl> for Declaration {
    fn from(decl: EnumDecl) -> Self {
        Declaration::Enum(decl)
    }
}

impl From<EnumEntryDecl> for Declaration {
    fn from(decl: EnumEntryDecl) -> Self {
        Declaration::EnumEntry(decl)
    }
}

impl From<CompanionDecl> for Declaration {
    fn from(decl: CompanionDecl) -> Self {
        Declaration::Companion(decl)
    }
}

impl From<ExtensionDecl> for Declaration {
    fn from(decl: ExtensionDecl) -> Self {
        Declaration::Extension(decl)
    }
}
