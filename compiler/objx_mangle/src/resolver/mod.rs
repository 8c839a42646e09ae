//! The ordered mangling pass.
//!
//! Naming runs in two passes over the graph in ascending `DeclId`:
//!
//! 1. **Types**: classes, protocols, facades and default-implementation
//!    holders claim names in one shared namespace. Nested declarations
//!    resolve their owner first and build on its disambiguated name.
//! 2. **Members**: each type claims selectors in a namespace seeded from
//!    its supertypes, which are therefore resolved first.
//!
//! Both passes are single-threaded. Rendering may run in parallel
//! afterwards, but it only reads the finished `SymbolTable`.

mod members;

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use objx_diagnostic::{ExportError, Origin};
use objx_ir::{
    receiver_decl, DeclId, DeclKind, Declaration, DeclarationGraph, ExportConfig, Member, ModuleId,
    TypeRef,
};

use crate::names::{capitalize, is_swift_reserved_type, sanitize_identifier, upper_camel};
use crate::namespace::{MemberNamespace, TypeNamespace};
use crate::support::reserved_type_names;
use crate::symbols::{FacadeKey, SymbolTable, TypeKey, TypeSymbol, TypeSymbolKind};

/// Resolve every foreign name of `graph`.
///
/// # Errors
///
/// Returns `SymbolCollisionUnresolved` when a name cannot be made unique
/// within `config.suffix_budget` underscores.
#[tracing::instrument(level = "debug", skip_all, fields(decls = graph.len()))]
pub fn resolve(
    graph: &DeclarationGraph,
    config: &ExportConfig,
) -> Result<SymbolTable, ExportError> {
    let mut resolver = Resolver::new(graph, config);
    resolver.resolve_types()?;
    resolver.resolve_members()?;
    debug!(
        types = resolver.table.types().len(),
        members = resolver.table.member_count(),
        "symbols resolved"
    );
    Ok(resolver.table)
}

/// The class an extension attaches a category to, if any. Extensions on
/// anything else land in their file's facade.
pub fn category_target(graph: &DeclarationGraph, receiver: &TypeRef) -> Option<DeclId> {
    let id = receiver_decl(receiver)?;
    let decl = graph.get(id)?;
    (matches!(decl.kind(), DeclKind::Class | DeclKind::Enum) && graph.is_exported(id)).then_some(id)
}

/// Interfaces with concrete exported members get a holder class.
pub fn has_default_impls(decl: &Declaration) -> bool {
    matches!(decl, Declaration::Interface(_))
        && decl.members().iter().any(|m| {
            m.is_exported() && !m.is_abstract() && !matches!(m, Member::Constructor(_))
        })
}

/// Name of a type before the framework prefix.
#[derive(Clone, Debug)]
struct BareName {
    objc: String,
    swift: String,
}

struct Resolver<'g> {
    graph: &'g DeclarationGraph,
    config: &'g ExportConfig,
    types: TypeNamespace,
    table: SymbolTable,
    bare: FxHashMap<DeclId, BareName>,
    /// Declarations whose type name is being resolved (nesting cycles).
    naming: FxHashSet<DeclId>,
    /// Source declarations of each facade, in id order.
    facades: FxHashMap<FacadeKey, Vec<DeclId>>,
    namespaces: FxHashMap<DeclId, MemberNamespace>,
    /// Declarations whose members are being resolved (supertype cycles).
    expanding: FxHashSet<DeclId>,
    categories: FxHashMap<(DeclId, ModuleId), usize>,
}

impl<'g> Resolver<'g> {
    fn new(graph: &'g DeclarationGraph, config: &'g ExportConfig) -> Self {
        Resolver {
            graph,
            config,
            types: TypeNamespace::default(),
            table: SymbolTable::default(),
            bare: FxHashMap::default(),
            naming: FxHashSet::default(),
            facades: FxHashMap::default(),
            namespaces: FxHashMap::default(),
            expanding: FxHashSet::default(),
            categories: FxHashMap::default(),
        }
    }

    fn resolve_types(&mut self) -> Result<(), ExportError> {
        for name in reserved_type_names(self.config) {
            let origin = Origin::builtin(name.clone());
            self.types.reserve(name, origin);
        }
        let graph = self.graph;
        for decl in graph.iter() {
            if !graph.is_exported(decl.id()) {
                continue;
            }
            match decl {
                Declaration::Class(_)
                | Declaration::Interface(_)
                | Declaration::Enum(_)
                | Declaration::EnumEntry(_)
                | Declaration::Companion(_) => self.resolve_type(decl.id())?,
                Declaration::Extension(ext) => {
                    if category_target(graph, &ext.receiver).is_none() {
                        self.add_to_facade(decl, &ext.file)?;
                    }
                }
                Declaration::TopLevelFunction(top) | Declaration::Property(top) => {
                    if top.member.is_exported() {
                        self.add_to_facade(decl, &top.file)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn resolve_type(&mut self, id: DeclId) -> Result<(), ExportError> {
        if self.bare.contains_key(&id) || !self.naming.insert(id) {
            return Ok(());
        }
        let graph = self.graph;
        let Some(decl) = graph.get(id) else {
            return Ok(());
        };

        let parent = decl
            .parent()
            .filter(|&p| graph.get(p).is_some_and(|d| d.kind().is_type()));
        if let Some(parent) = parent {
            self.resolve_type(parent)?;
        }
        let (objc, swift) = match parent.and_then(|p| self.bare.get(&p)) {
            Some(owner) => {
                let mut segment = upper_camel(&sanitize_identifier(decl.name()));
                if is_swift_reserved_type(&segment) {
                    segment.push('_');
                }
                (
                    format!("{}{segment}", owner.objc),
                    format!("{}.{segment}", owner.swift),
                )
            }
            None => {
                let prefix = graph
                    .module(decl.info().module)
                    .map_or("", |m| m.prefix.as_str());
                let name = format!("{prefix}{}", sanitize_identifier(decl.name()));
                (name.clone(), name)
            }
        };

        let origin = Origin::of(graph, id);
        let bare = self.claim_type(&origin, &objc, &swift)?;
        let kind = if decl.kind() == DeclKind::Interface {
            TypeSymbolKind::Protocol
        } else {
            TypeSymbolKind::Class
        };
        self.table.push_type(TypeSymbol {
            key: TypeKey::Decl(id),
            kind,
            objc_name: self.config.prefixed(&bare.objc),
            swift_name: bare.swift.clone(),
        });

        if has_default_impls(decl) {
            let holder = self.claim_type(
                &origin,
                &format!("{}DefaultImpls", bare.objc),
                &format!("{}DefaultImpls", bare.swift),
            )?;
            self.table.push_type(TypeSymbol {
                key: TypeKey::DefaultImpls(id),
                kind: TypeSymbolKind::Class,
                objc_name: self.config.prefixed(&holder.objc),
                swift_name: holder.swift,
            });
        }

        self.bare.insert(id, bare);
        self.naming.remove(&id);
        Ok(())
    }

    fn add_to_facade(&mut self, decl: &Declaration, file: &str) -> Result<(), ExportError> {
        let key = FacadeKey {
            module: decl.info().module,
            file: file.to_string(),
        };
        if let Some(sources) = self.facades.get_mut(&key) {
            sources.push(decl.id());
            return Ok(());
        }

        let prefix = self
            .graph
            .module(key.module)
            .map_or("", |m| m.prefix.as_str());
        let name = format!("{prefix}{}Kt", capitalize(&sanitize_identifier(file_stem(file))));
        let origin = Origin::of(self.graph, decl.id());
        let bare = self.claim_type(&origin, &name, &name)?;
        self.table.push_type(TypeSymbol {
            key: TypeKey::Facade(key.clone()),
            kind: TypeSymbolKind::Class,
            objc_name: self.config.prefixed(&bare.objc),
            swift_name: bare.swift,
        });
        self.facades.insert(key, vec![decl.id()]);
        Ok(())
    }

    /// Claim `objc`, suffixing both it and the last Swift segment.
    fn claim_type(
        &mut self,
        origin: &Origin,
        objc: &str,
        swift: &str,
    ) -> Result<BareName, ExportError> {
        let k = self
            .types
            .claim(origin, self.config.suffix_budget, |k| format!("{objc}{}", "_".repeat(k)))?;
        if k > 0 {
            debug!(name = objc, suffix = k, %origin, "disambiguated type name");
        }
        let suffix = "_".repeat(k);
        Ok(BareName {
            objc: format!("{objc}{suffix}"),
            swift: format!("{swift}{suffix}"),
        })
    }

    fn resolve_members(&mut self) -> Result<(), ExportError> {
        let keys: Vec<TypeKey> = self.table.types().iter().map(|t| t.key.clone()).collect();
        for key in keys {
            match key {
                TypeKey::Decl(id) => self.ensure_members(id)?,
                TypeKey::Facade(facade) => self.facade_members(facade)?,
                TypeKey::DefaultImpls(id) => self.default_impl_members(id)?,
            }
        }
        Ok(())
    }
}

/// File name without directories or the `.kt` extension.
fn file_stem(file: &str) -> &str {
    let name = file.rsplit(['/', '\\']).next().unwrap_or(file);
    name.strip_suffix(".kt").unwrap_or(name)
}
