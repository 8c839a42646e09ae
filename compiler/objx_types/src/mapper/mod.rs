//! Managed types to Objective-C types.
//!
//! The mapper reads the finished `SymbolTable`; it never chooses a name.
//! Where a type lands (return, parameter, generic argument, ...) decides
//! whether primitives stay scalars or box into the number classes, and
//! whether `Unit` collapses to `void`.

mod scope;

pub use scope::{ParamUse, Scope};

use tracing::trace;

use objx_diagnostic::{ExportError, Origin};
use objx_ir::{
    BuiltinKind, ContainerKind, DeclId, DeclKind, Declaration, DeclarationGraph, ExportConfig,
    PrimitiveKind, TypeParam, TypeRef,
};
use objx_mangle::support::{self, boxed_number};
use objx_mangle::SymbolTable;

use crate::foreign::{ForeignKind, ForeignType, Nullability};

/// Where a mapped type is used.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Position {
    Return,
    Parameter,
    Property,
    GenericArgument,
    BlockParameter,
    BlockReturn,
    CompletionResult,
}

impl Position {
    /// Positions that only hold object pointers.
    pub const fn boxes_primitives(self) -> bool {
        matches!(
            self,
            Position::GenericArgument
                | Position::BlockParameter
                | Position::BlockReturn
                | Position::CompletionResult
        )
    }

    /// Positions where `Unit` and `Nothing` become `void`.
    pub const fn is_return(self) -> bool {
        matches!(self, Position::Return | Position::BlockReturn)
    }
}

/// A type with no foreign mapping.
#[derive(Clone, Eq, PartialEq, Debug, thiserror::Error)]
#[error("{reason}")]
pub struct UnsupportedType {
    pub reason: String,
}

impl UnsupportedType {
    fn new(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        trace!(%reason, "unsupported type");
        UnsupportedType { reason }
    }

    /// Attach the declaration that mentions the type.
    pub fn at(self, origin: Origin) -> ExportError {
        ExportError::UnsupportedTypeShape {
            origin,
            reason: self.reason,
        }
    }
}

/// A supertype as it appears in an `@interface` or `@protocol` line.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum Supertype {
    Class { name: String, args: Vec<ForeignType> },
    Protocol(String),
}

/// The C scalar of a primitive.
pub fn scalar(kind: PrimitiveKind) -> ForeignType {
    ForeignType::scalar(match kind {
        PrimitiveKind::Boolean => "BOOL",
        PrimitiveKind::Byte => "int8_t",
        PrimitiveKind::UByte => "uint8_t",
        PrimitiveKind::Short => "int16_t",
        PrimitiveKind::UShort => "uint16_t",
        PrimitiveKind::Int => "int32_t",
        PrimitiveKind::UInt => "uint32_t",
        PrimitiveKind::Long => "int64_t",
        PrimitiveKind::ULong => "uint64_t",
        PrimitiveKind::Float => "float",
        PrimitiveKind::Double => "double",
        PrimitiveKind::Char => "unichar",
    })
}

#[derive(Copy, Clone, Debug)]
struct Site {
    position: Position,
    nullable: bool,
    /// Mapping the bound of an erased parameter; nested parameters
    /// become `id` so self-referential bounds terminate.
    in_bound: bool,
}

impl Site {
    fn at(self, position: Position) -> Self {
        Site {
            position,
            nullable: false,
            in_bound: self.in_bound,
        }
    }
}

pub struct TypeMapper<'a> {
    graph: &'a DeclarationGraph,
    symbols: &'a SymbolTable,
    config: &'a ExportConfig,
}

impl<'a> TypeMapper<'a> {
    pub fn new(
        graph: &'a DeclarationGraph,
        symbols: &'a SymbolTable,
        config: &'a ExportConfig,
    ) -> Self {
        TypeMapper {
            graph,
            symbols,
            config,
        }
    }

    pub fn config(&self) -> &'a ExportConfig {
        self.config
    }

    /// Map `ty` used at `position`.
    pub fn map(
        &self,
        ty: &TypeRef,
        position: Position,
        scope: &Scope<'_>,
    ) -> Result<ForeignType, UnsupportedType> {
        let site = Site {
            position,
            nullable: false,
            in_bound: false,
        };
        self.map_at(ty, site, scope)
    }

    fn map_at(
        &self,
        ty: &TypeRef,
        site: Site,
        scope: &Scope<'_>,
    ) -> Result<ForeignType, UnsupportedType> {
        match ty {
            TypeRef::Nullable(inner) => {
                let site = Site {
                    nullable: true,
                    ..site
                };
                Ok(self.map_at(inner, site, scope)?.nullable())
            }
            TypeRef::Primitive(kind) => Ok(if site.nullable || site.position.boxes_primitives() {
                self.boxed(*kind)
            } else {
                scalar(*kind)
            }),
            TypeRef::Builtin(kind) => Ok(self.builtin(*kind, site)),
            TypeRef::Reference(id) => self.declared(*id, None, site, scope),
            TypeRef::Generic { base, args } => {
                self.declared(*base, Some(args.as_slice()), site, scope)
            }
            TypeRef::ArrayLike { kind, element } => {
                let element = self.map_at(element, site.at(Position::GenericArgument), scope)?;
                let class = match kind {
                    ContainerKind::List => "NSArray".to_string(),
                    ContainerKind::MutableList => "NSMutableArray".to_string(),
                    ContainerKind::Set => "NSSet".to_string(),
                    ContainerKind::MutableSet => self.config.prefixed(support::MUTABLE_SET),
                    ContainerKind::Array => self.config.stdlib_name(support::ARRAY),
                };
                Ok(ForeignType::generic_class(class, vec![element]))
            }
            TypeRef::Map {
                mutable,
                key,
                value,
            } => {
                let arg = site.at(Position::GenericArgument);
                let key = self.map_at(key, arg, scope)?;
                let value = self.map_at(value, arg, scope)?;
                let class = if *mutable {
                    self.config.prefixed(support::MUTABLE_DICTIONARY)
                } else {
                    "NSDictionary".to_string()
                };
                Ok(ForeignType::generic_class(class, vec![key, value]))
            }
            TypeRef::Function {
                params,
                suspend,
                returns,
            } => {
                let mut mapped = params
                    .iter()
                    .map(|p| self.map_at(p, site.at(Position::BlockParameter), scope))
                    .collect::<Result<Vec<_>, _>>()?;
                let returns = if *suspend {
                    mapped.push(self.completion_at(returns, site, scope)?);
                    ForeignType::VOID
                } else {
                    self.map_at(returns, site.at(Position::BlockReturn), scope)?
                };
                Ok(ForeignType::block(returns, mapped))
            }
            TypeRef::TypeParameter(name) => self.type_parameter(name, site, scope),
        }
    }

    /// The completion block of a suspending call returning `result`:
    /// `void (^)(R, NSError * _Nullable)`, with `R` omitted for `Unit`
    /// unless `legacy_suspend_unit` is set.
    pub fn completion_handler(
        &self,
        result: &TypeRef,
        scope: &Scope<'_>,
    ) -> Result<ForeignType, UnsupportedType> {
        let site = Site {
            position: Position::CompletionResult,
            nullable: false,
            in_bound: false,
        };
        self.completion_at(result, site, scope)
    }

    fn completion_at(
        &self,
        result: &TypeRef,
        site: Site,
        scope: &Scope<'_>,
    ) -> Result<ForeignType, UnsupportedType> {
        let mut params = Vec::with_capacity(2);
        if *result == TypeRef::UNIT {
            if self.config.legacy_suspend_unit {
                params.push(ForeignType::class(self.config.stdlib_name(support::UNIT)).nullable());
            }
        } else {
            let mapped = self.map_at(result, site.at(Position::CompletionResult), scope)?;
            let nullability = if mapped.is_nullable() {
                Nullability::NullableResult
            } else {
                Nullability::Nullable
            };
            params.push(mapped.with_nullability(nullability));
        }
        params.push(ForeignType::class("NSError").nullable());
        Ok(ForeignType::block(ForeignType::VOID, params))
    }

    /// The boxed number class of a primitive; `Char` boxes to `id`.
    pub fn boxed(&self, kind: PrimitiveKind) -> ForeignType {
        match boxed_number(kind) {
            Some(boxed) => ForeignType::class(self.config.prefixed(boxed.name)),
            None => ForeignType::id(),
        }
    }

    fn builtin(&self, kind: BuiltinKind, site: Site) -> ForeignType {
        let void = !site.nullable && site.position.is_return();
        match kind {
            BuiltinKind::Any => ForeignType::id(),
            BuiltinKind::String => ForeignType::class("NSString"),
            BuiltinKind::Unit if void => ForeignType::VOID,
            BuiltinKind::Unit => ForeignType::class(self.config.stdlib_name(support::UNIT)),
            BuiltinKind::Nothing if void => ForeignType::VOID,
            BuiltinKind::Nothing => ForeignType::class(self.config.stdlib_name(support::NOTHING)),
        }
    }

    /// Emitted name of an exported type declaration.
    pub fn type_name(&self, id: DeclId) -> Result<&'a str, UnsupportedType> {
        let symbols: &'a SymbolTable = self.symbols;
        if let Some(symbol) = symbols.decl(id) {
            return Ok(symbol.objc_name.as_str());
        }
        match self.graph.get(id) {
            Some(decl) if decl.kind().is_type() => Err(UnsupportedType::new(format!(
                "`{}` is not exported",
                self.graph.qualified_name(id)
            ))),
            Some(decl) => Err(UnsupportedType::new(format!(
                "`{}` is a {}, not a type",
                self.graph.qualified_name(id),
                decl.kind().as_str()
            ))),
            None => Err(UnsupportedType::new(format!("reference to missing declaration {id}"))),
        }
    }

    fn declared(
        &self,
        id: DeclId,
        args: Option<&[TypeRef]>,
        site: Site,
        scope: &Scope<'_>,
    ) -> Result<ForeignType, UnsupportedType> {
        let name = self.type_name(id)?;
        let Some(decl) = self.graph.get(id) else {
            return Err(UnsupportedType::new(format!("reference to missing declaration {id}")));
        };
        let Some(args) = args else {
            return Ok(match decl.kind() {
                DeclKind::Interface => ForeignType::protocol(name),
                _ => ForeignType::class(name),
            });
        };

        match decl.kind() {
            DeclKind::Class | DeclKind::Interface => {}
            other => {
                return Err(UnsupportedType::new(format!(
                    "generic base `{}` is a {}, not a class or interface",
                    self.graph.qualified_name(id),
                    other.as_str()
                )))
            }
        }
        let expected = decl.generics().len();
        if args.len() != expected {
            return Err(UnsupportedType::new(format!(
                "`{}` takes {expected} type arguments, found {}",
                self.graph.qualified_name(id),
                args.len()
            )));
        }
        if decl.kind() == DeclKind::Interface {
            return Ok(ForeignType::protocol(name));
        }
        if !self.config.generics {
            return Ok(ForeignType::class(name));
        }
        let args = args
            .iter()
            .map(|arg| self.map_at(arg, site.at(Position::GenericArgument), scope))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ForeignType::generic_class(name, args))
    }

    fn type_parameter(
        &self,
        name: &str,
        site: Site,
        scope: &Scope<'_>,
    ) -> Result<ForeignType, UnsupportedType> {
        let param = match scope.lookup(name) {
            Some(ParamUse::Class(param)) if self.config.generics => {
                let ty = ForeignType::type_param(name);
                return Ok(if param.is_nullable() { ty.nullable() } else { ty });
            }
            Some(ParamUse::Class(param) | ParamUse::Erased(param)) => param,
            None => {
                return Err(UnsupportedType::new(format!("unknown type parameter `{name}`")));
            }
        };
        self.erase(param, site, scope)
    }

    /// The foreign form of a parameter with no foreign counterpart.
    fn erase(
        &self,
        param: &TypeParam,
        site: Site,
        scope: &Scope<'_>,
    ) -> Result<ForeignType, UnsupportedType> {
        match &param.bound {
            Some(bound) if !site.in_bound => {
                let site = Site {
                    in_bound: true,
                    nullable: false,
                    ..site
                };
                self.map_at(bound, site, scope)
            }
            Some(bound) if !bound.is_nullable() => Ok(ForeignType::id()),
            _ => Ok(ForeignType::id().nullable()),
        }
    }

    /// A supertype of a rendered declaration.
    pub fn supertype(
        &self,
        ty: &TypeRef,
        scope: &Scope<'_>,
    ) -> Result<Supertype, UnsupportedType> {
        let id = match ty.non_null() {
            TypeRef::Reference(id) | TypeRef::Generic { base: id, .. } => *id,
            other => {
                return Err(UnsupportedType::new(format!("`{other}` cannot be a supertype")));
            }
        };
        let name = self.type_name(id)?.to_string();
        match self.graph.get(id).map(Declaration::kind) {
            Some(DeclKind::Interface) => {
                self.map(ty.non_null(), Position::GenericArgument, scope)?;
                Ok(Supertype::Protocol(name))
            }
            Some(DeclKind::Class) => {
                let args = match self.map(ty.non_null(), Position::GenericArgument, scope)?.kind {
                    ForeignKind::Pointer { args, .. } => args,
                    _ => Vec::new(),
                };
                Ok(Supertype::Class { name, args })
            }
            Some(kind) => Err(UnsupportedType::new(format!(
                "`{}` is a {} and cannot be a supertype",
                self.graph.qualified_name(id),
                kind.as_str()
            ))),
            None => Err(UnsupportedType::new(format!("reference to missing declaration {id}"))),
        }
    }
}

#[cfg(test)]
mod tests;
