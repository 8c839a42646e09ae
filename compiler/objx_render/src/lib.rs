//! objx render - Objective-C declarations for resolved symbols
//!
//! - [`SignatureRenderer`]: one member to a method or property line,
//!   with error and completion channels and doc notes
//! - [`DeclRenderer`]: one type symbol or category to a complete
//!   `@interface`/`@protocol` block
//!
//! Rendering only reads the declaration graph and the finished
//! `SymbolTable`. A member that cannot be expressed is left out and
//! reported as a `GenerationWarning` next to the rendered declaration.

mod decl;
mod doc;
mod member;
mod signature;

pub use decl::{render_items, DeclFlags, DeclRenderer, Forward, RenderItem, Rendered, RenderedDecl};
pub use doc::{availability_attributes, Doc};
pub use member::{
    MethodKind, PropertyAttrs, RenderedMember, RenderedParam, RenderedProperty, RenderedSignature,
};
pub use signature::{MemberContext, Omitted, SignatureRenderer};
