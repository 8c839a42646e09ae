//! Member pass: selectors, Swift names, and property getters.

use tracing::debug;

use objx_diagnostic::{ExportError, Origin};
use objx_ir::{
    Constructor, DeclId, DeclKind, Declaration, FailureKind, Function, Member, MemberId,
    Parameter, Property, TypeRef,
};

use super::Resolver;
use crate::names::{
    capitalize, escape_keyword, escape_method_family, is_reserved_selector, sanitize_identifier, upper_camel,
};
use crate::namespace::MemberNamespace;
use crate::selector::{CallShape, Channel, Selector};
use crate::symbols::{CategorySymbol, FacadeKey, MemberSymbol, ObjectBridge, Placement};

/// Exported members in rendering order: constructors, functions, then
/// properties, each group in declaration order.
fn ordered_members(decl: &Declaration) -> Vec<(u32, &Member)> {
    let mut members: Vec<(u32, &Member)> = (0u32..)
        .zip(decl.members())
        .filter(|(_, m)| m.is_exported())
        .collect();
    members.sort_by_key(|(_, m)| match m {
        Member::Constructor(_) => 0,
        Member::Function(_) => 1,
        Member::Property(_) => 2,
    });
    members
}

fn error_channel(throws: &[FailureKind]) -> Channel {
    if throws.is_empty() {
        Channel::None
    } else {
        Channel::ErrorOut
    }
}

fn type_list<'a>(types: impl Iterator<Item = &'a TypeRef>) -> String {
    types.map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

fn labels(params: &[Parameter]) -> Vec<String> {
    params.iter().map(|p| sanitize_identifier(&p.name)).collect()
}

/// Keyword-escaped variable names, with the receiver first when hoisted.
fn param_names(params: &[Parameter], hoisted: bool) -> Vec<String> {
    let mut names: Vec<String> = params
        .iter()
        .map(|p| escape_keyword(&sanitize_identifier(&p.name)))
        .collect();
    if hoisted {
        let mut receiver = "receiver".to_string();
        while names.contains(&receiver) {
            receiver.push('_');
        }
        names.insert(0, receiver);
    }
    names
}

/// `setName:` for a property named `name`, on rung `k` of the ladder.
fn setter_for(name: &str, k: usize) -> String {
    format!("set{}{}:", capitalize(name), "_".repeat(k))
}

fn object_bridge(func: &Function) -> Option<ObjectBridge> {
    if func.suspend || !func.throws.is_empty() {
        return None;
    }
    match (func.name.as_str(), func.params.len()) {
        ("toString", 0) => Some(ObjectBridge::Description),
        ("hashCode", 0) => Some(ObjectBridge::Hash),
        ("equals", 1) => Some(ObjectBridge::IsEqual),
        _ => None,
    }
}

impl Resolver<'_> {
    /// Resolve the selectors of a type, its supertypes first.
    pub(super) fn ensure_members(&mut self, id: DeclId) -> Result<(), ExportError> {
        if self.namespaces.contains_key(&id) || !self.expanding.insert(id) {
            return Ok(());
        }
        let graph = self.graph;
        let Some(decl) = graph.get(id) else {
            return Ok(());
        };

        let mut ns = MemberNamespace::with_reserved();
        for parent in self.supertype_decls(decl) {
            self.ensure_members(parent)?;
            if let Some(inherited) = self.namespaces.get(&parent) {
                ns.inherit(inherited);
            }
        }

        let origin = Origin::of(graph, id);
        if decl.is_singleton() {
            ns.synthesize("shared", &origin);
        }
        if decl.kind() == DeclKind::Class
            && graph.companion_of(id).is_some_and(|c| graph.is_exported(c))
        {
            ns.synthesize("companion", &origin);
        }
        if decl.kind() == DeclKind::Enum {
            for accessor in ["values", "entries", "name", "ordinal"] {
                ns.synthesize(accessor, &origin);
            }
        }

        let constructible = matches!(decl, Declaration::Class(class) if !class.is_object);
        let mut own = Vec::new();
        for (index, member) in ordered_members(decl) {
            match member {
                Member::Constructor(_) if !constructible => continue,
                _ if decl.kind() == DeclKind::Interface && !member.is_abstract() => continue,
                _ => {}
            }
            let symbol = self.member_symbol(&mut ns, &origin, member, Placement::Instance, None)?;
            let member_id = MemberId::new(id, index);
            self.table.insert_member(member_id, symbol);
            own.push(member_id);
        }
        self.table.set_type_members(id, own);

        if matches!(decl.kind(), DeclKind::Class | DeclKind::Enum) {
            self.category_members(id, &mut ns)?;
        }

        self.namespaces.insert(id, ns);
        self.expanding.remove(&id);
        Ok(())
    }

    /// Exported supertypes whose selectors a type inherits.
    fn supertype_decls(&self, decl: &Declaration) -> Vec<DeclId> {
        if let Declaration::EnumEntry(entry) = decl {
            return vec![entry.owner];
        }
        decl.supertypes()
            .iter()
            .filter_map(objx_ir::receiver_decl)
            .filter(|&id| self.table.decl(id).is_some())
            .collect()
    }

    /// Extension members attached to `target`, one category per module.
    fn category_members(
        &mut self,
        target: DeclId,
        ns: &mut MemberNamespace,
    ) -> Result<(), ExportError> {
        let graph = self.graph;
        let target_module = graph.get(target).map(|d| d.info().module);
        for &ext_id in graph.extensions_of(target) {
            if !graph.is_exported(ext_id) {
                continue;
            }
            let Some(ext) = graph.get(ext_id) else {
                continue;
            };
            let module = ext.info().module;
            let index = match self.categories.get(&(target, module)) {
                Some(&index) => index,
                None => {
                    let name = if Some(module) == target_module {
                        "Extensions".to_string()
                    } else {
                        let module_name = graph.module(module).map_or("", |m| m.name.as_str());
                        format!("{}Extensions", upper_camel(&sanitize_identifier(module_name)))
                    };
                    let index = self.table.push_category(CategorySymbol {
                        target,
                        module,
                        name,
                        members: Vec::new(),
                    });
                    self.categories.insert((target, module), index);
                    index
                }
            };

            let origin = Origin::of(graph, ext_id);
            for (member_index, member) in ordered_members(ext) {
                if matches!(member, Member::Constructor(_)) {
                    continue;
                }
                let symbol = self.member_symbol(ns, &origin, member, Placement::Instance, None)?;
                let member_id = MemberId::new(ext_id, member_index);
                self.table.insert_member(member_id, symbol);
                if let Some(category) = self.table.category_mut(index) {
                    category.members.push(member_id);
                }
            }
        }
        Ok(())
    }

    pub(super) fn facade_members(&mut self, key: FacadeKey) -> Result<(), ExportError> {
        let graph = self.graph;
        let sources = self.facades.get(&key).cloned().unwrap_or_default();
        let mut ns = MemberNamespace::with_reserved();
        let mut ids = Vec::new();
        for decl_id in sources {
            let Some(decl) = graph.get(decl_id) else {
                continue;
            };
            let origin = Origin::of(graph, decl_id);
            match decl {
                Declaration::TopLevelFunction(top) | Declaration::Property(top) => {
                    if !top.member.is_exported() {
                        continue;
                    }
                    let symbol =
                        self.member_symbol(&mut ns, &origin, &top.member, Placement::Static, None)?;
                    let member_id = MemberId::new(decl_id, 0);
                    self.table.insert_member(member_id, symbol);
                    ids.push(member_id);
                }
                Declaration::Extension(ext) => {
                    for (index, member) in ordered_members(decl) {
                        if matches!(member, Member::Constructor(_)) {
                            continue;
                        }
                        let symbol = self.member_symbol(
                            &mut ns,
                            &origin,
                            member,
                            Placement::Hoisted,
                            Some(&ext.receiver),
                        )?;
                        let member_id = MemberId::new(decl_id, index);
                        self.table.insert_member(member_id, symbol);
                        ids.push(member_id);
                    }
                }
                _ => {}
            }
        }
        self.table.set_facade_members(key, ids);
        Ok(())
    }

    pub(super) fn default_impl_members(&mut self, interface: DeclId) -> Result<(), ExportError> {
        let graph = self.graph;
        let Some(decl) = graph.get(interface) else {
            return Ok(());
        };
        let receiver = TypeRef::reference(interface);
        let origin = Origin::of(graph, interface);
        let mut ns = MemberNamespace::with_reserved();
        let mut ids = Vec::new();
        for (index, member) in ordered_members(decl) {
            if member.is_abstract() || matches!(member, Member::Constructor(_)) {
                continue;
            }
            let symbol =
                self.member_symbol(&mut ns, &origin, member, Placement::Hoisted, Some(&receiver))?;
            let member_id = MemberId::new(interface, index);
            self.table.insert_member(member_id, symbol);
            ids.push(member_id);
        }
        self.table.set_default_members(interface, ids);
        Ok(())
    }

    fn member_symbol(
        &self,
        ns: &mut MemberNamespace,
        origin: &Origin,
        member: &Member,
        placement: Placement,
        receiver: Option<&TypeRef>,
    ) -> Result<MemberSymbol, ExportError> {
        match member {
            Member::Constructor(ctor) => self.constructor_symbol(ns, origin, ctor, placement),
            Member::Function(func) => self.function_symbol(ns, origin, func, placement, receiver),
            Member::Property(prop) => self.property_symbol(ns, origin, prop, placement, receiver),
        }
    }

    fn constructor_symbol(
        &self,
        ns: &mut MemberNamespace,
        origin: &Origin,
        ctor: &Constructor,
        placement: Placement,
    ) -> Result<MemberSymbol, ExportError> {
        let labels = labels(&ctor.params);
        let shape = CallShape {
            name: "init",
            labels: labels.iter().map(String::as_str).collect(),
            receiver: false,
            initializer: true,
            channel: error_channel(&ctor.throws),
        };
        let key = format!("init({})", type_list(ctor.params.iter().map(|p| &p.ty)));
        let k = ns.claim_initializer(&key, origin, self.config.suffix_budget, |k| {
            shape.candidate(k).0.to_string()
        })?;
        let (selector, swift_name) = shape.candidate(k);
        Ok(MemberSymbol {
            selector,
            swift_name,
            property_name: None,
            getter: None,
            setter: None,
            param_names: param_names(&ctor.params, false),
            channel: shape.channel,
            placement,
            bridge: None,
        })
    }

    fn function_symbol(
        &self,
        ns: &mut MemberNamespace,
        origin: &Origin,
        func: &Function,
        placement: Placement,
        receiver: Option<&TypeRef>,
    ) -> Result<MemberSymbol, ExportError> {
        let key = match receiver {
            Some(receiver) => format!(
                "fun {}({})",
                func.name,
                type_list(std::iter::once(receiver).chain(func.params.iter().map(|p| &p.ty)))
            ),
            None => format!("fun {}({})", func.name, type_list(func.params.iter().map(|p| &p.ty))),
        };
        let channel = if func.suspend {
            Channel::Completion
        } else {
            error_channel(&func.throws)
        };

        if placement == Placement::Instance {
            if let Some(bridge) = object_bridge(func) {
                let (selector, swift_name) = match bridge {
                    ObjectBridge::Description => (Selector::nullary("description"), "description()"),
                    ObjectBridge::Hash => (Selector::nullary("hash"), "hash()"),
                    ObjectBridge::IsEqual => {
                        (Selector::keyword(["isEqual".to_string()]), "isEqual(_:)")
                    }
                };
                ns.bind(&selector.to_string(), &key, origin);
                return Ok(MemberSymbol {
                    selector,
                    swift_name: swift_name.to_string(),
                    property_name: None,
                    getter: None,
                    setter: None,
                    param_names: param_names(&func.params, false),
                    channel,
                    placement,
                    bridge: Some(bridge),
                });
            }
        }

        let name = escape_method_family(&sanitize_identifier(&func.name));
        let labels = labels(&func.params);
        let shape = CallShape {
            name: &name,
            labels: labels.iter().map(String::as_str).collect(),
            receiver: receiver.is_some(),
            initializer: false,
            channel,
        };
        let candidate = |k: usize| {
            let (selector, _) = shape.candidate(k);
            if is_reserved_selector(&selector.to_string()) {
                selector.escaped()
            } else {
                selector
            }
        };
        let k = ns.claim(&key, origin, self.config.suffix_budget, |k| {
            candidate(k).to_string()
        })?;
        if k > 0 {
            debug!(member = %key, suffix = k, %origin, "disambiguated selector");
        }
        let (_, swift_name) = shape.candidate(k);
        Ok(MemberSymbol {
            selector: candidate(k),
            swift_name,
            property_name: None,
            getter: None,
            setter: None,
            param_names: param_names(&func.params, receiver.is_some()),
            channel,
            placement,
            bridge: None,
        })
    }

    fn property_symbol(
        &self,
        ns: &mut MemberNamespace,
        origin: &Origin,
        prop: &Property,
        placement: Placement,
        receiver: Option<&TypeRef>,
    ) -> Result<MemberSymbol, ExportError> {
        let property_name = escape_keyword(&sanitize_identifier(&prop.name));
        let budget = self.config.suffix_budget;

        if let Some(receiver) = receiver {
            // Hoisted properties become getters taking the receiver.
            let key = format!("val {}({receiver})", prop.name);
            let shape = CallShape {
                name: &property_name,
                labels: Vec::new(),
                receiver: true,
                initializer: false,
                channel: Channel::None,
            };
            let k = ns.claim(&key, origin, budget, |k| shape.candidate(k).0.to_string())?;
            let (selector, swift_name) = shape.candidate(k);
            return Ok(MemberSymbol {
                selector,
                swift_name,
                property_name: Some(property_name),
                getter: None,
                setter: None,
                param_names: param_names(&[], true),
                channel: Channel::None,
                placement,
                bridge: None,
            });
        }

        // The getter keeps the raw name even when the identifier is escaped.
        let raw = sanitize_identifier(&prop.name);
        let key = format!("val {}", prop.name);

        // A property named after an `NSObject` selector keeps that getter,
        // only its identifier moves aside.
        if is_reserved_selector(&raw) && !ns.declares(&raw) {
            ns.bind(&raw, &key, origin);
            let property_name = if property_name == raw {
                format!("{raw}_")
            } else {
                property_name
            };
            let setter = if prop.mutable {
                let k = ns.claim(&key, origin, budget, |k| setter_for(&raw, k))?;
                Some(setter_for(&raw, k))
            } else {
                None
            };
            return Ok(MemberSymbol {
                selector: Selector::nullary(raw.clone()),
                swift_name: property_name.clone(),
                setter: setter.filter(|s| *s != setter_for(&property_name, 0)),
                property_name: Some(property_name),
                getter: Some(raw),
                param_names: Vec::new(),
                channel: Channel::None,
                placement,
                bridge: None,
            });
        }

        let getter_at = |k: usize| format!("{raw}{}", "_".repeat(k));
        let k = ns.claim_all(&key, origin, budget, |k| {
            let mut rung = vec![getter_at(k)];
            if prop.mutable {
                rung.push(setter_for(&raw, k));
            }
            rung
        })?;
        let getter = getter_at(k);
        if k > 0 {
            debug!(property = %prop.name, getter = %getter, %origin, "renamed accessors");
        }
        let setter = prop
            .mutable
            .then(|| setter_for(&raw, k))
            .filter(|s| *s != setter_for(&property_name, 0));
        let renamed = getter != property_name;
        Ok(MemberSymbol {
            selector: Selector::nullary(getter.clone()),
            swift_name: property_name.clone(),
            property_name: Some(property_name),
            getter: renamed.then_some(getter),
            setter,
            param_names: Vec::new(),
            channel: Channel::None,
            placement,
            bridge: None,
        })
    }
}
