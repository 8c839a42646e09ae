//! Whole declarations: `@interface`/`@protocol` blocks with their members.
//!
//! Each type symbol and each category renders independently into a
//! `RenderedDecl`, so rendering can run in any order or in parallel. The
//! header emitter orders the results by their `requires` edges.

mod flags;

pub use flags::DeclFlags;

use tracing::{trace, warn};

use objx_diagnostic::{ErrorCode, GenerationWarning, Origin};
use objx_ir::{
    receiver_decl, Annotations, DeclId, Declaration, DeclarationGraph, ExportConfig, Member,
    MemberId, TypeParam, TypeRef, Variance,
};
use objx_mangle::support::{self, ARRAY};
use objx_mangle::{FacadeKey, SymbolTable, TypeKey, TypeSymbol};
use objx_types::{ForeignType, Scope, Supertype};

use crate::doc::{availability_attributes, quoted, Doc};
use crate::member::{
    MethodKind, PropertyAttrs, RenderedMember, RenderedParam, RenderedProperty, RenderedSignature,
};
use crate::signature::{MemberContext, SignatureRenderer};

/// How the forward-declaration block mentions a declaration.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum Forward {
    /// `@class` entry, generic parameters included.
    Class(String),
    Protocol(String),
    /// Categories are never forward declared.
    None,
}

/// The text of one declaration and the declarations it must follow.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct RenderedDecl {
    /// The ObjC name, or `Target (Category)` for a category. Also the
    /// ordering tie-breaker.
    pub name: String,
    pub forward: Forward,
    /// Names of other rendered declarations that must precede this one.
    pub requires: Vec<String>,
    pub text: String,
}

#[derive(Clone, Debug)]
pub struct Rendered {
    pub decl: RenderedDecl,
    pub warnings: Vec<GenerationWarning>,
}

/// A unit of rendering work.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum RenderItem {
    Type(TypeKey),
    Category(usize),
}

/// Every type symbol in naming order, then every category.
pub fn render_items(symbols: &SymbolTable) -> Vec<RenderItem> {
    let types = symbols.types().iter().map(|t| RenderItem::Type(t.key.clone()));
    let categories = (0..symbols.categories().len()).map(RenderItem::Category);
    types.chain(categories).collect()
}

#[derive(Default)]
struct Block {
    text: String,
    requires: Vec<String>,
    warnings: Vec<GenerationWarning>,
}

impl Block {
    fn line(&mut self, line: &str) {
        self.text.push_str(line);
        self.text.push('\n');
    }

    fn push(&mut self, member: &RenderedMember) {
        member.render(&mut self.text);
    }

    fn require(&mut self, name: &str) {
        if !self.requires.iter().any(|r| r == name) {
            self.requires.push(name.to_string());
        }
    }

    fn finish(mut self, name: String, forward: Forward) -> Rendered {
        self.text.push_str("@end\n");
        Rendered {
            decl: RenderedDecl {
                name,
                forward,
                requires: self.requires,
                text: self.text,
            },
            warnings: self.warnings,
        }
    }
}

/// The supertypes of a class-like declaration.
struct Heritage {
    superclass: String,
    superclass_decl: Option<DeclId>,
    protocols: Vec<String>,
}

pub struct DeclRenderer<'a> {
    graph: &'a DeclarationGraph,
    symbols: &'a SymbolTable,
    config: &'a ExportConfig,
    signatures: SignatureRenderer<'a>,
}

impl<'a> DeclRenderer<'a> {
    pub fn new(
        graph: &'a DeclarationGraph,
        symbols: &'a SymbolTable,
        config: &'a ExportConfig,
    ) -> Self {
        DeclRenderer {
            graph,
            symbols,
            config,
            signatures: SignatureRenderer::new(graph, symbols, config),
        }
    }

    /// Render one item. Returns `None` for items whose declaration is not
    /// in the graph or does not render on its own.
    #[tracing::instrument(level = "trace", skip_all, fields(item = ?item))]
    pub fn render(&self, item: &RenderItem) -> Option<Rendered> {
        match item {
            RenderItem::Type(key) => {
                let symbol = self.symbols.get(key)?;
                match key {
                    TypeKey::Decl(id) => {
                        let decl = self.graph.get(*id)?;
                        match decl {
                            Declaration::Interface(_) => Some(self.protocol(decl, symbol)),
                            Declaration::Class(_)
                            | Declaration::Enum(_)
                            | Declaration::EnumEntry(_)
                            | Declaration::Companion(_) => Some(self.class_like(decl, symbol)),
                            _ => None,
                        }
                    }
                    TypeKey::Facade(facade) => Some(self.facade(facade, symbol)),
                    TypeKey::DefaultImpls(id) => self.default_impls(*id, symbol),
                }
            }
            RenderItem::Category(index) => self.category(*index),
        }
    }

    fn base(&self) -> String {
        self.config.prefixed(support::BASE)
    }

    /// Doc block and attribute lines above `@interface`/`@protocol`.
    fn preamble(
        &self,
        block: &mut Block,
        symbol: &TypeSymbol,
        annotations: Option<&Annotations>,
        restricted: bool,
    ) {
        let mut doc = Doc::new();
        if let Some(annotations) = annotations {
            doc.annotations(annotations);
            doc.deprecation(annotations);
        }
        if !doc.is_empty() {
            block.text.push('\n');
            doc.render(&mut block.text);
        }
        if restricted {
            block.line("__attribute__((objc_subclassing_restricted))");
        }
        if symbol.swift_name != symbol.objc_name {
            block.line(&format!("__attribute__((swift_name({})))", quoted(&symbol.swift_name)));
        }
        for attribute in annotations.map(availability_attributes).unwrap_or_default() {
            block.line(&format!("__attribute__(({attribute}))"));
        }
    }

    fn class_like(&self, decl: &'a Declaration, symbol: &TypeSymbol) -> Rendered {
        let id = decl.id();
        let flags = DeclFlags::of(self.graph, decl, self.config);
        let origin = Origin::of(self.graph, id);
        let mut block = Block::default();

        let heritage = self.heritage(decl, &origin, &mut block);
        self.preamble(
            &mut block,
            symbol,
            Some(&decl.info().annotations),
            flags.contains(DeclFlags::RESTRICTED),
        );
        let generics = if flags.contains(DeclFlags::GENERIC) {
            generic_list(decl.generics())
        } else {
            String::new()
        };
        block.line(&format!(
            "@interface {}{generics} : {}{}",
            symbol.objc_name,
            heritage.superclass,
            protocol_list(&heritage.protocols)
        ));

        let cx = MemberContext::new(origin, Scope::of_class(decl.generics()))
            .checking_variance(decl.generics());
        if flags.contains(DeclFlags::SINGLETON) {
            self.unavailable_allocation(&mut block, true);
            block.push(&RenderedMember::Property(class_property(
                "shared",
                ForeignType::class(&symbol.objc_name),
            )));
        } else if flags.contains(DeclFlags::ENUM) {
            self.unavailable_allocation(&mut block, false);
            self.enum_accessors(&mut block, &symbol.objc_name);
        }

        let members = self.symbols.members_of(id);
        let designated = self.designated(members);
        let mut initializers = Vec::new();
        for &member_id in members {
            if let Some(Member::Constructor(_)) = self.graph.member(member_id) {
                if let Some(signature) = self.member(&mut block, &cx, member_id, designated) {
                    initializers.push(signature);
                }
            }
        }
        if let Some(superclass) = heritage.superclass_decl {
            self.inherited_initializers(&mut block, superclass, &initializers);
        }
        if flags.contains(DeclFlags::HAS_COMPANION) {
            if let Some(companion) = self.graph.companion_of(id).and_then(|c| self.symbols.decl(c)) {
                block.push(&RenderedMember::Property(class_property(
                    "companion",
                    ForeignType::class(&companion.objc_name),
                )));
            }
        }
        for &member_id in members {
            if !matches!(self.graph.member(member_id), Some(Member::Constructor(_))) {
                self.member(&mut block, &cx, member_id, None);
            }
        }
        if flags.contains(DeclFlags::ENUM) {
            block.push(&RenderedMember::Property(readonly_property(
                "name",
                ForeignType::class("NSString"),
            )));
            block.push(&RenderedMember::Property(readonly_property(
                "ordinal",
                ForeignType::scalar("int32_t"),
            )));
        }

        let forward = Forward::Class(format!("{}{generics}", symbol.objc_name));
        block.finish(symbol.objc_name.clone(), forward)
    }

    /// Superclass and adopted protocols. Unmappable supertypes are dropped
    /// with a warning.
    fn heritage(&self, decl: &'a Declaration, origin: &Origin, block: &mut Block) -> Heritage {
        let mut heritage = Heritage {
            superclass: self.base(),
            superclass_decl: None,
            protocols: Vec::new(),
        };
        if let Declaration::EnumEntry(entry) = decl {
            if let Some(owner) = self.symbols.decl(entry.owner) {
                heritage.superclass = owner.objc_name.clone();
                block.require(&owner.objc_name);
            }
            return heritage;
        }

        let scope = Scope::of_class(decl.generics());
        for ty in decl.supertypes() {
            if *ty.non_null() == TypeRef::ANY {
                continue;
            }
            match self.signatures.mapper().supertype(ty, &scope) {
                Ok(Supertype::Protocol(name)) => {
                    block.require(&name);
                    heritage.protocols.push(name);
                }
                Ok(Supertype::Class { name, args })
                    if heritage.superclass_decl.is_none() && !matches!(decl, Declaration::Enum(_)) =>
                {
                    block.require(&name);
                    heritage.superclass = if args.is_empty() {
                        name
                    } else {
                        let args: Vec<String> = args.iter().map(ForeignType::render).collect();
                        format!("{name}<{}>", args.join(", "))
                    };
                    heritage.superclass_decl = receiver_decl(ty);
                }
                Ok(Supertype::Class { name, .. }) => {
                    self.drop_supertype(block, origin, ty, &format!("`{name}` is a second superclass"));
                }
                Err(err) => self.drop_supertype(block, origin, ty, &err.reason),
            }
        }
        heritage
    }

    fn drop_supertype(&self, block: &mut Block, origin: &Origin, ty: &TypeRef, reason: &str) {
        warn!(%origin, supertype = %ty, reason, "supertype dropped");
        block.warnings.push(GenerationWarning::new(
            ErrorCode::E4003,
            origin.clone(),
            format!("supertype `{ty}` dropped: {reason}"),
        ));
    }

    /// The primary constructor, else the first exported one.
    fn designated(&self, members: &[MemberId]) -> Option<MemberId> {
        let mut first = None;
        for &id in members {
            if let Some(Member::Constructor(ctor)) = self.graph.member(id) {
                if ctor.primary {
                    return Some(id);
                }
                first.get_or_insert(id);
            }
        }
        first
    }

    /// Render one member into `block`, recording a warning when it has to
    /// be left out. Returns the selector of a rendered initializer.
    fn member(
        &self,
        block: &mut Block,
        cx: &MemberContext<'a>,
        id: MemberId,
        designated: Option<MemberId>,
    ) -> Option<String> {
        let member = self.graph.member(id)?;
        let symbol = self.symbols.member(id)?;
        let is_designated = designated == Some(id);
        match self.signatures.member(cx, member, symbol, is_designated) {
            Ok(rendered) => {
                block.push(&rendered);
                if is_designated && symbol.selector.is_nullary() {
                    block.push(&RenderedMember::Method(
                        RenderedSignature::bare(MethodKind::Class, "new", ForeignType::INSTANCE_TYPE)
                            .with_attribute(
                                "availability(swift, unavailable, message=\"use object initializers instead\")",
                            ),
                    ));
                }
                matches!(member, Member::Constructor(_)).then(|| symbol.selector.to_string())
            }
            Err(omitted) => {
                warn!(origin = %cx.origin, member = member.name(), code = %omitted.code, "member omitted: {omitted}");
                block.warnings.push(omitted.warning());
                None
            }
        }
    }

    /// Re-declare the superclass's designated initializer as unavailable
    /// unless the subclass declares the same selector.
    fn inherited_initializers(&self, block: &mut Block, superclass: DeclId, own: &[String]) {
        let Some(decl) = self.graph.get(superclass) else {
            return;
        };
        let members = self.symbols.members_of(superclass);
        let Some(id) = self.designated(members) else {
            return;
        };
        let (Some(member), Some(symbol)) = (self.graph.member(id), self.symbols.member(id)) else {
            return;
        };
        if own.contains(&symbol.selector.to_string()) {
            return;
        }
        let cx = MemberContext::new(Origin::of(self.graph, superclass), Scope::of_class(decl.generics()));
        match self.signatures.member(&cx, member, symbol, true) {
            Ok(RenderedMember::Method(signature)) => {
                let mut signature = signature.with_attribute("unavailable");
                signature.doc = Doc::new();
                block.push(&RenderedMember::Method(signature));
            }
            Ok(RenderedMember::Property(_)) => {}
            Err(omitted) => trace!(%omitted, "inherited initializer not redeclared"),
        }
    }

    fn unavailable_allocation(&self, block: &mut Block, with_new: bool) {
        let zone = RenderedSignature {
            selector: objx_mangle::Selector::keyword(["allocWithZone".to_string()]),
            params: vec![RenderedParam {
                name: "zone".to_string(),
                ty: ForeignType::scalar("struct _NSZone *"),
            }],
            ..RenderedSignature::bare(MethodKind::Class, "allocWithZone", ForeignType::INSTANCE_TYPE)
        };
        let mut lines = vec![
            RenderedSignature::bare(MethodKind::Class, "alloc", ForeignType::INSTANCE_TYPE),
            zone,
        ];
        if with_new {
            lines.push(RenderedSignature::bare(
                MethodKind::Class,
                "new",
                ForeignType::INSTANCE_TYPE,
            ));
        }
        for line in lines {
            block.push(&RenderedMember::Method(line.with_attribute("unavailable")));
        }
    }

    fn enum_accessors(&self, block: &mut Block, name: &str) {
        let entry = ForeignType::class(name);
        let values = RenderedSignature {
            swift_name: Some("values()".to_string()),
            ..RenderedSignature::bare(
                MethodKind::Class,
                "values",
                ForeignType::generic_class(self.config.stdlib_name(ARRAY), vec![entry.clone()]),
            )
        };
        block.push(&RenderedMember::Method(values));
        let entries = RenderedProperty {
            getter: None,
            ..class_property("entries", ForeignType::generic_class("NSArray", vec![entry]))
        };
        block.push(&RenderedMember::Property(entries));
    }

    fn protocol(&self, decl: &'a Declaration, symbol: &TypeSymbol) -> Rendered {
        let origin = Origin::of(self.graph, decl.id());
        let mut block = Block::default();
        let heritage = self.heritage(decl, &origin, &mut block);
        self.preamble(&mut block, symbol, Some(&decl.info().annotations), false);
        block.line(&format!(
            "@protocol {}{}",
            symbol.objc_name,
            protocol_list(&heritage.protocols)
        ));
        block.line("@required");
        let cx = MemberContext::new(origin, Scope::empty().erasing(decl.generics()))
            .checking_variance(decl.generics());
        for &id in self.symbols.members_of(decl.id()) {
            self.member(&mut block, &cx, id, None);
        }
        block.finish(symbol.objc_name.clone(), Forward::Protocol(symbol.objc_name.clone()))
    }

    /// Concrete interface members as class methods taking the receiver.
    fn default_impls(&self, interface: DeclId, symbol: &TypeSymbol) -> Option<Rendered> {
        let decl = self.graph.get(interface)?;
        let protocol = self.symbols.decl(interface)?;
        let origin = Origin::of(self.graph, interface);
        let mut block = Block::default();
        block.require(&protocol.objc_name);
        self.preamble(&mut block, symbol, None, true);
        block.line(&format!("@interface {} : {}", symbol.objc_name, self.base()));
        let cx = MemberContext::new(origin, Scope::empty().erasing(decl.generics()))
            .with_receiver(TypeRef::reference(interface));
        for &id in self.symbols.default_members(interface) {
            self.member(&mut block, &cx, id, None);
        }
        Some(block.finish(symbol.objc_name.clone(), Forward::Class(symbol.objc_name.clone())))
    }

    /// Top-level members and hoisted extensions of one source file.
    fn facade(&self, key: &FacadeKey, symbol: &TypeSymbol) -> Rendered {
        let mut block = Block::default();
        self.preamble(&mut block, symbol, None, true);
        block.line(&format!("@interface {} : {}", symbol.objc_name, self.base()));
        for &id in self.symbols.facade_members(key) {
            let Some(decl) = self.graph.get(id.decl) else {
                continue;
            };
            let origin = Origin::of(self.graph, id.decl);
            let cx = match decl {
                Declaration::Extension(ext) => {
                    MemberContext::new(origin, Scope::empty().erasing(&ext.generics))
                        .with_receiver(ext.receiver.clone())
                }
                _ => MemberContext::new(origin, Scope::empty()),
            };
            self.member(&mut block, &cx, id, None);
        }
        block.finish(symbol.objc_name.clone(), Forward::Class(symbol.objc_name.clone()))
    }

    fn category(&self, index: usize) -> Option<Rendered> {
        let category = self.symbols.categories().get(index)?;
        let target = self.symbols.decl(category.target)?;
        let mut block = Block::default();
        block.require(&target.objc_name);
        block.line(&format!("@interface {} ({})", target.objc_name, category.name));
        for &id in &category.members {
            let Some(Declaration::Extension(ext)) = self.graph.get(id.decl) else {
                continue;
            };
            let cx = MemberContext::new(
                Origin::of(self.graph, id.decl),
                Scope::empty().erasing(&ext.generics),
            );
            self.member(&mut block, &cx, id, None);
        }
        let name = format!("{} ({})", target.objc_name, category.name);
        Some(block.finish(name, Forward::None))
    }
}

fn generic_list(generics: &[TypeParam]) -> String {
    if generics.is_empty() {
        return String::new();
    }
    let params: Vec<String> = generics
        .iter()
        .map(|p| match p.variance {
            Variance::Invariant => p.name.clone(),
            Variance::Out => format!("__covariant {}", p.name),
            Variance::In => format!("__contravariant {}", p.name),
        })
        .collect();
    format!("<{}>", params.join(", "))
}

fn protocol_list(protocols: &[String]) -> String {
    if protocols.is_empty() {
        String::new()
    } else {
        format!(" <{}>", protocols.join(", "))
    }
}

/// `@property (class, readonly, getter=name)`.
fn class_property(name: &str, ty: ForeignType) -> RenderedProperty {
    RenderedProperty {
        attrs: PropertyAttrs::CLASS | PropertyAttrs::READONLY,
        getter: Some(name.to_string()),
        ..readonly_property(name, ty)
    }
}

fn readonly_property(name: &str, ty: ForeignType) -> RenderedProperty {
    RenderedProperty {
        attrs: PropertyAttrs::READONLY,
        getter: None,
        setter: None,
        ty,
        name: name.to_string(),
        swift_name: name.to_string(),
        attributes: Vec::new(),
        doc: Doc::new(),
    }
}

#[cfg(test)]
mod tests;
