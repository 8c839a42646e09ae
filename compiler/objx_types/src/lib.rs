//! objx types - managed types as Objective-C type expressions
//!
//! - [`ForeignType`]: the foreign type model, rendered as abstract types or
//!   declarators
//! - [`Nullability`]: the outermost qualifier, recoverable from rendered
//!   text
//! - [`TypeMapper`]: `TypeRef` to `ForeignType`, by position and scope
//!
//! Mapping failures are [`UnsupportedType`]; callers attach the
//! originating declaration with [`UnsupportedType::at`] and scope it to a
//! member, which is then omitted with a warning.

mod foreign;
mod mapper;

pub use foreign::{ForeignKind, ForeignType, Nullability};
pub use mapper::{scalar, ParamUse, Position, Scope, Supertype, TypeMapper, UnsupportedType};
