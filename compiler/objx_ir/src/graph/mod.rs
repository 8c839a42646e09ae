//! The immutable declaration graph and its builder.
//!
//! The front end hands declarations over in whatever order it produces
//! them. `GraphBuilder::finish` sorts them by id, validates every
//! cross-reference, and indexes owner relationships (companions, enum
//! entries, extensions by receiver) so later stages never search the list.

use std::fmt;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::{DeclId, DeclKind, Declaration, Member, MemberId, ModuleId, TypeRef};

/// A compilation module contributing declarations.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Module {
    pub name: String,
    /// Prepended to the foreign name of every top-level type.
    #[cfg_attr(feature = "serde", serde(default))]
    pub prefix: String,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        Module {
            name: name.into(),
            prefix: String::new(),
        }
    }

    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }
}

/// Structural problems found while ingesting a graph.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum GraphError {
    DuplicateDeclaration(DeclId),
    UnknownModule { decl: DeclId, module: ModuleId },
    DanglingReference { from: DeclId, to: DeclId },
    /// An enum entry, companion or nested declaration is attached to a
    /// declaration of the wrong kind.
    MisplacedOwner {
        decl: DeclId,
        owner: DeclId,
        expected: &'static str,
    },
    DuplicateCompanion {
        owner: DeclId,
        first: DeclId,
        second: DeclId,
    },
    /// A top-level declaration whose member does not match its kind.
    MemberKindMismatch { decl: DeclId },
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphError::DuplicateDeclaration(id) => {
                write!(f, "declaration {id} is defined more than once")
            }
            GraphError::UnknownModule { decl, module } => {
                write!(f, "declaration {decl} belongs to unknown module {}", module.raw())
            }
            GraphError::DanglingReference { from, to } => {
                write!(f, "declaration {from} references missing declaration {to}")
            }
            GraphError::MisplacedOwner {
                decl,
                owner,
                expected,
            } => write!(f, "declaration {decl} is attached to {owner}, which is not {expected}"),
            GraphError::DuplicateCompanion {
                owner,
                first,
                second,
            } => write!(f, "class {owner} has two companions: {first} and {second}"),
            GraphError::MemberKindMismatch { decl } => {
                write!(f, "top-level declaration {decl} holds a member of the wrong kind")
            }
        }
    }
}

impl std::error::Error for GraphError {}

/// Serialized form of a graph: a module table and a flat declaration list.
#[cfg(feature = "serde")]
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct GraphDocument {
    pub modules: Vec<Module>,
    pub declarations: Vec<Declaration>,
}

#[cfg(feature = "serde")]
impl GraphDocument {
    pub fn into_graph(self) -> Result<DeclarationGraph, GraphError> {
        let mut builder = GraphBuilder::new();
        for module in self.modules {
            builder.add_module(module);
        }
        for decl in self.declarations {
            builder.add(decl);
        }
        builder.finish()
    }
}

/// Collects modules and declarations in any order.
#[derive(Default)]
pub struct GraphBuilder {
    modules: Vec<Module>,
    decls: Vec<Declaration>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_module(&mut self, module: Module) -> ModuleId {
        let id = ModuleId::new(u32::try_from(self.modules.len()).unwrap_or(u32::MAX));
        self.modules.push(module);
        id
    }

    pub fn add(&mut self, decl: impl Into<Declaration>) -> &mut Self {
        self.decls.push(decl.into());
        self
    }

    /// Validate and freeze the graph.
    pub fn finish(self) -> Result<DeclarationGraph, GraphError> {
        let GraphBuilder { modules, mut decls } = self;
        decls.sort_by_key(Declaration::id);
        for pair in decls.windows(2) {
            if pair[0].id() == pair[1].id() {
                return Err(GraphError::DuplicateDeclaration(pair[0].id()));
            }
        }

        let index: FxHashMap<DeclId, usize> = decls
            .iter()
            .enumerate()
            .map(|(i, decl)| (decl.id(), i))
            .collect();

        for decl in &mut decls {
            decl.normalize_types();
        }

        let kind_of = |id: DeclId| index.get(&id).map(|&i| decls[i].kind());
        let mut companions = FxHashMap::default();
        let mut entries: FxHashMap<DeclId, Vec<(u32, DeclId)>> = FxHashMap::default();
        let mut extensions: FxHashMap<DeclId, Vec<DeclId>> = FxHashMap::default();

        for decl in &decls {
            let id = decl.id();
            if decl.info().module.index() >= modules.len() {
                return Err(GraphError::UnknownModule {
                    decl: id,
                    module: decl.info().module,
                });
            }
            for target in decl.references() {
                if !index.contains_key(&target) {
                    return Err(GraphError::DanglingReference { from: id, to: target });
                }
            }
            if let Some(outer) = decl.info().outer {
                if !kind_of(outer).is_some_and(DeclKind::is_type) {
                    return Err(GraphError::MisplacedOwner {
                        decl: id,
                        owner: outer,
                        expected: "a type",
                    });
                }
            }
            match decl {
                Declaration::EnumEntry(entry) => {
                    if kind_of(entry.owner) != Some(DeclKind::Enum) {
                        return Err(GraphError::MisplacedOwner {
                            decl: id,
                            owner: entry.owner,
                            expected: "an enum",
                        });
                    }
                    entries.entry(entry.owner).or_default().push((entry.ordinal, id));
                }
                Declaration::Companion(companion) => {
                    if kind_of(companion.owner) != Some(DeclKind::Class) {
                        return Err(GraphError::MisplacedOwner {
                            decl: id,
                            owner: companion.owner,
                            expected: "a class",
                        });
                    }
                    if let Some(first) = companions.insert(companion.owner, id) {
                        return Err(GraphError::DuplicateCompanion {
                            owner: companion.owner,
                            first,
                            second: id,
                        });
                    }
                }
                Declaration::Extension(ext) => {
                    if let Some(target) = receiver_decl(&ext.receiver) {
                        extensions.entry(target).or_default().push(id);
                    }
                }
                Declaration::TopLevelFunction(top) => {
                    if !matches!(top.member, Member::Function(_)) {
                        return Err(GraphError::MemberKindMismatch { decl: id });
                    }
                }
                Declaration::Property(top) => {
                    if !matches!(top.member, Member::Property(_)) {
                        return Err(GraphError::MemberKindMismatch { decl: id });
                    }
                }
                Declaration::Class(_) | Declaration::Interface(_) | Declaration::Enum(_) => {}
            }
        }

        let entries = entries
            .into_iter()
            .map(|(owner, mut list)| {
                list.sort_unstable();
                (owner, list.into_iter().map(|(_, id)| id).collect())
            })
            .collect();

        Ok(DeclarationGraph {
            modules,
            decls,
            index,
            companions,
            entries,
            extensions,
        })
    }
}

/// The declaration a receiver type names, if it names one directly.
pub fn receiver_decl(receiver: &TypeRef) -> Option<DeclId> {
    match receiver.non_null() {
        TypeRef::Reference(id) | TypeRef::Generic { base: id, .. } => Some(*id),
        _ => None,
    }
}

/// Validated, immutable declaration graph, ordered by `DeclId`.
#[derive(Debug)]
pub struct DeclarationGraph {
    modules: Vec<Module>,
    decls: Vec<Declaration>,
    index: FxHashMap<DeclId, usize>,
    companions: FxHashMap<DeclId, DeclId>,
    entries: FxHashMap<DeclId, Vec<DeclId>>,
    extensions: FxHashMap<DeclId, Vec<DeclId>>,
}

impl DeclarationGraph {
    #[inline]
    pub fn len(&self) -> usize {
        self.decls.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    /// Declarations in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &Declaration> {
        self.decls.iter()
    }

    pub fn get(&self, id: DeclId) -> Option<&Declaration> {
        self.index.get(&id).map(|&i| &self.decls[i])
    }

    pub fn member(&self, id: MemberId) -> Option<&Member> {
        let index = usize::try_from(id.index).ok()?;
        self.get(id.decl)?.members().get(index)
    }

    pub fn module(&self, id: ModuleId) -> Option<&Module> {
        self.modules.get(id.index())
    }

    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    pub fn companion_of(&self, owner: DeclId) -> Option<DeclId> {
        self.companions.get(&owner).copied()
    }

    /// Entries of an enum, ordered by ordinal.
    pub fn entries_of(&self, owner: DeclId) -> &[DeclId] {
        self.entries.get(&owner).map_or(&[], Vec::as_slice)
    }

    /// Extensions whose receiver is the given declaration, in id order.
    pub fn extensions_of(&self, target: DeclId) -> &[DeclId] {
        self.extensions.get(&target).map_or(&[], Vec::as_slice)
    }

    /// Whether the declaration and every declaration it is attached to are
    /// part of the exported surface.
    pub fn is_exported(&self, id: DeclId) -> bool {
        let mut seen = FxHashSet::default();
        let mut current = Some(id);
        while let Some(id) = current {
            if !seen.insert(id) {
                return true;
            }
            let Some(decl) = self.get(id) else {
                return false;
            };
            if !decl.info().visibility.is_exported() {
                return false;
            }
            current = decl.parent();
        }
        true
    }

    /// Dotted managed name including enclosing declarations,
    /// e.g. `kotlinx.coroutines.CoroutineDispatcher.Key`.
    pub fn qualified_name(&self, id: DeclId) -> String {
        let mut segments = Vec::new();
        let mut package = "";
        let mut seen = FxHashSet::default();
        let mut current = Some(id);
        while let Some(id) = current {
            if !seen.insert(id) {
                break;
            }
            let Some(decl) = self.get(id) else { break };
            segments.push(decl.name());
            package = &decl.info().package;
            current = decl.parent();
        }
        segments.reverse();
        let path = segments.join(".");
        if package.is_empty() {
            path
        } else {
            format!("{package}.{path}")
        }
    }
}
