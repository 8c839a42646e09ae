//! Member signatures.
//!
//! A `MemberSymbol` fixes the selector and Swift name; this module turns
//! the managed member behind it into a `RenderedMember`, applying the
//! error and completion channels, the object bridges and the doc notes.

use objx_diagnostic::{ErrorCode, ExportError, GenerationWarning, Origin};
use objx_ir::{
    Constructor, DeclarationGraph, ExportConfig, FailureKind, Function, Member, Parameter,
    Property, TypeParam, TypeRef, Variance, Visibility,
};
use objx_mangle::{Channel, MemberSymbol, ObjectBridge, Placement, SymbolTable};
use objx_types::{ForeignType, Position, Scope, TypeMapper, UnsupportedType};

use crate::doc::{availability_attributes, Doc};
use crate::member::{
    MethodKind, PropertyAttrs, RenderedMember, RenderedParam, RenderedProperty, RenderedSignature,
};

/// A member that cannot be rendered. It is left out of the header and
/// reported as a warning.
#[derive(Clone, Eq, PartialEq, Debug, thiserror::Error)]
#[error("{error}")]
pub struct Omitted {
    pub error: ExportError,
    pub code: ErrorCode,
}

impl Omitted {
    pub fn shape(origin: &Origin, member: &str, reason: impl Into<String>) -> Self {
        let error = ExportError::UnsupportedSignatureShape {
            origin: origin.clone(),
            member: member.to_string(),
            reason: reason.into(),
        };
        Omitted {
            code: error.code(),
            error,
        }
    }

    fn unsupported_type(err: UnsupportedType, origin: &Origin, member: &str) -> Self {
        let error = err.at(origin.clone()).in_member(member);
        Omitted {
            code: error.code(),
            error,
        }
    }

    fn variance(origin: &Origin, member: &str, reason: impl Into<String>) -> Self {
        Omitted {
            code: ErrorCode::E4002,
            ..Omitted::shape(origin, member, reason)
        }
    }

    pub fn warning(&self) -> GenerationWarning {
        GenerationWarning {
            code: self.code,
            ..GenerationWarning::omitted(&self.error)
        }
    }
}

/// Where a member is rendered.
#[derive(Clone, Debug)]
pub struct MemberContext<'m> {
    /// The declaration that owns the member.
    pub origin: Origin,
    pub scope: Scope<'m>,
    /// Class parameters whose declared variance constrains the member.
    pub variance: &'m [TypeParam],
    /// Receiver of a hoisted member.
    pub receiver: Option<TypeRef>,
}

impl<'m> MemberContext<'m> {
    pub fn new(origin: Origin, scope: Scope<'m>) -> Self {
        MemberContext {
            origin,
            scope,
            variance: &[],
            receiver: None,
        }
    }

    #[must_use]
    pub fn checking_variance(mut self, generics: &'m [TypeParam]) -> Self {
        self.variance = generics;
        self
    }

    #[must_use]
    pub fn with_receiver(mut self, receiver: TypeRef) -> Self {
        self.receiver = Some(receiver);
        self
    }
}

pub struct SignatureRenderer<'a> {
    graph: &'a DeclarationGraph,
    config: &'a ExportConfig,
    mapper: TypeMapper<'a>,
}

impl<'a> SignatureRenderer<'a> {
    pub fn new(
        graph: &'a DeclarationGraph,
        symbols: &'a SymbolTable,
        config: &'a ExportConfig,
    ) -> Self {
        SignatureRenderer {
            graph,
            config,
            mapper: TypeMapper::new(graph, symbols, config),
        }
    }

    pub fn mapper(&self) -> &TypeMapper<'a> {
        &self.mapper
    }

    /// Render any member. `designated` only applies to constructors.
    ///
    /// # Errors
    ///
    /// Returns `Omitted` when a type has no foreign mapping or a type
    /// parameter is used against its variance.
    pub fn member<'m>(
        &self,
        cx: &MemberContext<'m>,
        member: &'m Member,
        symbol: &MemberSymbol,
        designated: bool,
    ) -> Result<RenderedMember, Omitted> {
        match member {
            Member::Constructor(ctor) => self
                .constructor(cx, ctor, symbol, designated)
                .map(RenderedMember::Method),
            Member::Function(func) => self.function(cx, func, symbol).map(RenderedMember::Method),
            Member::Property(prop) if symbol.placement == Placement::Hoisted => self
                .hoisted_property(cx, prop, symbol)
                .map(RenderedMember::Method),
            Member::Property(prop) => self.property(cx, prop, symbol).map(RenderedMember::Property),
        }
    }

    pub fn constructor<'m>(
        &self,
        cx: &MemberContext<'m>,
        ctor: &'m Constructor,
        symbol: &MemberSymbol,
        designated: bool,
    ) -> Result<RenderedSignature, Omitted> {
        let member = "<init>";
        let mut params = self.params(cx, member, &ctor.params, symbol, &cx.scope, 0)?;
        let mut doc = Doc::new();
        doc.annotations(&ctor.annotations);

        let mut returns = ForeignType::INSTANCE_TYPE;
        if symbol.channel == Channel::ErrorOut {
            params.push(RenderedParam {
                name: unique_param("error", &params),
                ty: ForeignType::ERROR_OUT,
            });
            self.failure_doc(&mut doc, ctor.throws.iter().copied());
            returns = returns.nullable();
        }
        self.protected_doc(&mut doc, ctor.visibility, "method");
        doc.deprecation(&ctor.annotations);

        Ok(RenderedSignature {
            kind: MethodKind::Instance,
            selector: symbol.selector.clone(),
            params,
            returns,
            channel: symbol.channel,
            swift_name: Some(symbol.swift_name.clone()),
            nonnull_error: false,
            designated,
            attributes: availability_attributes(&ctor.annotations),
            doc,
        })
    }

    pub fn function<'m>(
        &self,
        cx: &MemberContext<'m>,
        func: &'m Function,
        symbol: &MemberSymbol,
    ) -> Result<RenderedSignature, Omitted> {
        let member = func.name.as_str();
        let scope = cx.scope.clone().erasing(&func.generics);
        self.check_params_variance(cx, member, &func.generics, &func.params)?;
        self.check_return_variance(cx, member, &func.generics, &func.returns)?;

        let mut params = Vec::with_capacity(symbol.selector.arity());
        let mut skip = 0;
        if symbol.placement == Placement::Hoisted {
            params.push(self.receiver(cx, member, symbol, &scope)?);
            skip = 1;
        }
        if symbol.bridge == Some(ObjectBridge::IsEqual) {
            params.extend(func.params.iter().enumerate().map(|(i, param)| RenderedParam {
                name: param_name(symbol, i, &param.name),
                ty: ForeignType::id().nullable(),
            }));
        } else {
            params.extend(self.params(cx, member, &func.params, symbol, &scope, skip)?);
        }

        let mut doc = Doc::new();
        doc.annotations(&func.annotations);
        let mut nonnull_error = false;
        let returns = match symbol.channel {
            Channel::Completion => {
                let handler = self
                    .mapper
                    .completion_handler(&func.returns, &scope)
                    .map_err(|err| Omitted::unsupported_type(err, &cx.origin, member))?;
                params.push(RenderedParam {
                    name: unique_param("completionHandler", &params),
                    ty: handler,
                });
                let failures = std::iter::once(FailureKind::Cancellation);
                self.failure_doc(&mut doc, failures.chain(func.throws.iter().copied()));
                ForeignType::VOID
            }
            Channel::ErrorOut => {
                let mapped = self.map(cx, member, &func.returns, Position::Return, &scope)?;
                params.push(RenderedParam {
                    name: unique_param("error", &params),
                    ty: ForeignType::ERROR_OUT,
                });
                self.failure_doc(&mut doc, func.throws.iter().copied());
                let (returns, flag) = throwing_return(mapped);
                nonnull_error = flag;
                returns
            }
            Channel::None => match symbol.bridge {
                Some(ObjectBridge::Description) => ForeignType::class("NSString"),
                Some(ObjectBridge::Hash) => ForeignType::NS_UINTEGER,
                Some(ObjectBridge::IsEqual) => ForeignType::BOOL,
                None => self.map(cx, member, &func.returns, Position::Return, &scope)?,
            },
        };
        self.protected_doc(&mut doc, func.visibility, "method");
        doc.deprecation(&func.annotations);

        Ok(RenderedSignature {
            kind: method_kind(symbol.placement),
            selector: symbol.selector.clone(),
            params,
            returns,
            channel: symbol.channel,
            swift_name: Some(symbol.swift_name.clone()),
            nonnull_error,
            designated: false,
            attributes: availability_attributes(&func.annotations),
            doc,
        })
    }

    pub fn property<'m>(
        &self,
        cx: &MemberContext<'m>,
        prop: &'m Property,
        symbol: &MemberSymbol,
    ) -> Result<RenderedProperty, Omitted> {
        let member = prop.name.as_str();
        self.check_return_variance(cx, member, &[], &prop.ty)?;
        if prop.mutable {
            if let Some(param) = self.owner_param(cx, &[], &prop.ty, Variance::Out) {
                return Err(Omitted::variance(
                    &cx.origin,
                    member,
                    format!("covariant `{param}` in the setter of a mutable property"),
                ));
            }
        }
        let ty = self.map(cx, member, &prop.ty, Position::Property, &cx.scope)?;

        let mut attrs = PropertyAttrs::empty();
        if symbol.placement == Placement::Static {
            attrs |= PropertyAttrs::CLASS;
        }
        if !prop.mutable {
            attrs |= PropertyAttrs::READONLY;
        }

        let mut doc = Doc::new();
        doc.annotations(&prop.annotations);
        self.protected_doc(&mut doc, prop.visibility, "property");
        doc.deprecation(&prop.annotations);

        Ok(RenderedProperty {
            attrs,
            getter: symbol.getter.clone(),
            setter: symbol.setter.clone(),
            ty,
            name: symbol
                .property_name
                .clone()
                .unwrap_or_else(|| symbol.selector.name().to_string()),
            swift_name: symbol.swift_name.clone(),
            attributes: availability_attributes(&prop.annotations),
            doc,
        })
    }

    /// A property moved out of its receiver becomes a class-method getter.
    fn hoisted_property<'m>(
        &self,
        cx: &MemberContext<'m>,
        prop: &'m Property,
        symbol: &MemberSymbol,
    ) -> Result<RenderedSignature, Omitted> {
        let member = prop.name.as_str();
        let receiver = self.receiver(cx, member, symbol, &cx.scope)?;
        let returns = self.map(cx, member, &prop.ty, Position::Return, &cx.scope)?;
        let mut doc = Doc::new();
        doc.annotations(&prop.annotations);
        self.protected_doc(&mut doc, prop.visibility, "property");
        doc.deprecation(&prop.annotations);
        Ok(RenderedSignature {
            kind: MethodKind::Class,
            selector: symbol.selector.clone(),
            params: vec![receiver],
            returns,
            channel: Channel::None,
            swift_name: Some(symbol.swift_name.clone()),
            nonnull_error: false,
            designated: false,
            attributes: availability_attributes(&prop.annotations),
            doc,
        })
    }

    fn receiver(
        &self,
        cx: &MemberContext<'_>,
        member: &str,
        symbol: &MemberSymbol,
        scope: &Scope<'_>,
    ) -> Result<RenderedParam, Omitted> {
        let receiver = cx
            .receiver
            .as_ref()
            .ok_or_else(|| Omitted::shape(&cx.origin, member, "hoisted member without a receiver"))?;
        Ok(RenderedParam {
            name: param_name(symbol, 0, "receiver"),
            ty: self.map(cx, member, receiver, Position::Parameter, scope)?,
        })
    }

    /// Map parameters; `skip` counts the names taken by a hoisted receiver.
    fn params(
        &self,
        cx: &MemberContext<'_>,
        member: &str,
        params: &[Parameter],
        symbol: &MemberSymbol,
        scope: &Scope<'_>,
        skip: usize,
    ) -> Result<Vec<RenderedParam>, Omitted> {
        params
            .iter()
            .enumerate()
            .map(|(i, param)| {
                Ok(RenderedParam {
                    name: param_name(symbol, skip + i, &param.name),
                    ty: self.map(cx, member, &param.ty, Position::Parameter, scope)?,
                })
            })
            .collect()
    }

    fn map(
        &self,
        cx: &MemberContext<'_>,
        member: &str,
        ty: &TypeRef,
        position: Position,
        scope: &Scope<'_>,
    ) -> Result<ForeignType, Omitted> {
        self.mapper
            .map(ty, position, scope)
            .map_err(|err| Omitted::unsupported_type(err, &cx.origin, member))
    }

    fn check_params_variance(
        &self,
        cx: &MemberContext<'_>,
        member: &str,
        shadowing: &[TypeParam],
        params: &[Parameter],
    ) -> Result<(), Omitted> {
        for param in params.iter().filter(|p| !p.unsafe_variance) {
            if let Some(name) = self.owner_param(cx, shadowing, &param.ty, Variance::Out) {
                return Err(Omitted::variance(
                    &cx.origin,
                    member,
                    format!("covariant `{name}` used as the type of parameter `{}`", param.name),
                ));
            }
        }
        Ok(())
    }

    fn check_return_variance(
        &self,
        cx: &MemberContext<'_>,
        member: &str,
        shadowing: &[TypeParam],
        returns: &TypeRef,
    ) -> Result<(), Omitted> {
        match self.owner_param(cx, shadowing, returns, Variance::In) {
            Some(name) => Err(Omitted::variance(
                &cx.origin,
                member,
                format!("contravariant `{name}` used as the return type"),
            )),
            None => Ok(()),
        }
    }

    /// The owner parameter with `variance` that `ty` names directly, unless
    /// a member parameter shadows it.
    fn owner_param<'t>(
        &self,
        cx: &MemberContext<'_>,
        shadowing: &[TypeParam],
        ty: &'t TypeRef,
        variance: Variance,
    ) -> Option<&'t str> {
        let TypeRef::TypeParameter(name) = ty.non_null() else {
            return None;
        };
        if shadowing.iter().any(|p| &p.name == name) {
            return None;
        }
        cx.variance
            .iter()
            .any(|p| &p.name == name && p.variance == variance)
            .then_some(name.as_str())
    }

    fn failure_doc(&self, doc: &mut Doc, failures: impl Iterator<Item = FailureKind>) {
        let mut kinds: Vec<FailureKind> = Vec::new();
        for kind in failures {
            if !kinds.contains(&kind) {
                kinds.push(kind);
            }
        }
        if kinds.is_empty() {
            return;
        }
        let language = &self.config.source_language;
        if kinds.contains(&FailureKind::Any) {
            doc.push(format!("@note This method converts all {language} exceptions to errors."));
            return;
        }
        let names: Vec<&str> = kinds
            .iter()
            .map(|kind| match kind {
                FailureKind::Class(id) => self.graph.get(*id).map_or("Throwable", |d| d.name()),
                FailureKind::Cancellation | FailureKind::Any => "CancellationException",
            })
            .collect();
        doc.push(format!(
            "@note This method converts instances of {} to errors.",
            names.join(", ")
        ));
        doc.push(format!("Other uncaught {language} exceptions are fatal."));
    }

    fn protected_doc(&self, doc: &mut Doc, visibility: Visibility, what: &str) {
        if visibility == Visibility::Protected {
            doc.push(format!(
                "@note This {what} has protected visibility in {} source and is intended only for use by subclasses.",
                self.config.source_language
            ));
        }
    }
}

const fn method_kind(placement: Placement) -> MethodKind {
    match placement {
        Placement::Instance => MethodKind::Instance,
        Placement::Static | Placement::Hoisted => MethodKind::Class,
    }
}

/// The resolved variable name at `index`, falling back to the source name.
fn param_name(symbol: &MemberSymbol, index: usize, fallback: &str) -> String {
    symbol
        .param_names
        .get(index)
        .cloned()
        .unwrap_or_else(|| fallback.to_string())
}

fn unique_param(base: &str, params: &[RenderedParam]) -> String {
    let mut name = base.to_string();
    while params.iter().any(|p| p.name == name) {
        name.push('_');
    }
    name
}

/// Return type of a method with an error out-parameter, and whether the
/// error is signalled by a non-nil error rather than the return value.
fn throwing_return(mapped: ForeignType) -> (ForeignType, bool) {
    if mapped.is_void() {
        (ForeignType::BOOL, false)
    } else if mapped.is_scalar() || mapped.is_nullable() {
        (mapped, true)
    } else {
        (mapped.nullable(), false)
    }
}

#[cfg(test)]
mod tests;
