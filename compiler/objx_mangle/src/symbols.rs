//! The resolved symbol table.
//!
//! Produced once per run by the ordered mangling pass and read by every
//! later stage. Nothing after mangling chooses a name.

use rustc_hash::FxHashMap;

use objx_ir::{DeclId, MemberId, ModuleId};

use crate::selector::{Channel, Selector};

/// A synthesized facade class grouping top-level members of one file.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct FacadeKey {
    pub module: ModuleId,
    pub file: String,
}

/// What a type-level symbol stands for.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum TypeKey {
    Decl(DeclId),
    Facade(FacadeKey),
    /// Holder of an interface's concrete members.
    DefaultImpls(DeclId),
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TypeSymbolKind {
    Class,
    Protocol,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct TypeSymbol {
    pub key: TypeKey,
    pub kind: TypeSymbolKind,
    /// Name as emitted, framework prefix included.
    pub objc_name: String,
    pub swift_name: String,
}

/// A category attaching extension members to a class.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct CategorySymbol {
    pub target: DeclId,
    pub module: ModuleId,
    pub name: String,
    pub members: Vec<MemberId>,
}

/// Where a member lands in the foreign declaration.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Placement {
    Instance,
    /// Class method or class property.
    Static,
    /// Class method taking the managed receiver as its first argument.
    Hoisted,
}

/// Members mapped onto an `NSObject` method instead of getting their own
/// selector.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ObjectBridge {
    /// `toString()`
    Description,
    /// `hashCode()`
    Hash,
    /// `equals(other)`
    IsEqual,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct MemberSymbol {
    pub selector: Selector,
    /// `name(label:...)` for methods, the bare name for properties.
    pub swift_name: String,
    /// Property identifier, keyword-escaped. `None` for methods.
    pub property_name: Option<String>,
    /// Explicit getter, when it differs from the property identifier.
    pub getter: Option<String>,
    /// Explicit setter selector of a mutable property, when it differs
    /// from the `set<Name>:` the property identifier implies.
    pub setter: Option<String>,
    /// Variable names of the managed parameters, keyword-escaped.
    pub param_names: Vec<String>,
    pub channel: Channel,
    pub placement: Placement,
    pub bridge: Option<ObjectBridge>,
}

/// Every name decided for one run.
#[derive(Debug, Default)]
pub struct SymbolTable {
    types: Vec<TypeSymbol>,
    type_index: FxHashMap<TypeKey, usize>,
    members: FxHashMap<MemberId, MemberSymbol>,
    categories: Vec<CategorySymbol>,
    facade_members: FxHashMap<FacadeKey, Vec<MemberId>>,
    default_members: FxHashMap<DeclId, Vec<MemberId>>,
    type_members: FxHashMap<DeclId, Vec<MemberId>>,
}

impl SymbolTable {
    /// Type-level symbols in resolution order.
    pub fn types(&self) -> &[TypeSymbol] {
        &self.types
    }

    pub fn get(&self, key: &TypeKey) -> Option<&TypeSymbol> {
        self.type_index.get(key).map(|&i| &self.types[i])
    }

    /// The type symbol of a declaration.
    pub fn decl(&self, id: DeclId) -> Option<&TypeSymbol> {
        self.get(&TypeKey::Decl(id))
    }

    pub fn member(&self, id: MemberId) -> Option<&MemberSymbol> {
        self.members.get(&id)
    }

    /// Categories in resolution order.
    pub fn categories(&self) -> &[CategorySymbol] {
        &self.categories
    }

    pub fn facade_members(&self, key: &FacadeKey) -> &[MemberId] {
        self.facade_members.get(key).map_or(&[], Vec::as_slice)
    }

    pub fn default_members(&self, interface: DeclId) -> &[MemberId] {
        self.default_members.get(&interface).map_or(&[], Vec::as_slice)
    }

    /// Members rendered in a declaration's own body, in mangling order.
    pub fn members_of(&self, id: DeclId) -> &[MemberId] {
        self.type_members.get(&id).map_or(&[], Vec::as_slice)
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub(crate) fn push_type(&mut self, symbol: TypeSymbol) {
        self.type_index.insert(symbol.key.clone(), self.types.len());
        self.types.push(symbol);
    }

    pub(crate) fn insert_member(&mut self, id: MemberId, symbol: MemberSymbol) {
        self.members.insert(id, symbol);
    }

    pub(crate) fn push_category(&mut self, category: CategorySymbol) -> usize {
        self.categories.push(category);
        self.categories.len() - 1
    }

    pub(crate) fn category_mut(&mut self, index: usize) -> Option<&mut CategorySymbol> {
        self.categories.get_mut(index)
    }

    pub(crate) fn set_facade_members(&mut self, key: FacadeKey, members: Vec<MemberId>) {
        self.facade_members.insert(key, members);
    }

    pub(crate) fn set_default_members(&mut self, interface: DeclId, members: Vec<MemberId>) {
        self.default_members.insert(interface, members);
    }

    pub(crate) fn set_type_members(&mut self, id: DeclId, members: Vec<MemberId>) {
        self.type_members.insert(id, members);
    }
}
