//! objx mangle - foreign names for the exported API graph
//!
//! Every identifier the header contains is decided here, once, before any
//! rendering starts:
//! - type names for classes, protocols, facades and default-implementation
//!   holders, unique across the whole header
//! - selectors and Swift names for members, unique per type including the
//!   selectors it inherits
//! - the linker symbol of the managed entry point
//!
//! Collisions are resolved by appending `_` in ascending `DeclId` order, so
//! the same graph always yields the same names regardless of the order in
//! which its modules were merged.

mod entry;
pub mod names;
mod namespace;
mod resolver;
mod selector;
pub mod support;
mod symbols;

pub use entry::{demangle, is_objx_symbol, mangle_entry, MANGLE_PREFIX};
pub use resolver::{category_target, has_default_impls, resolve};
pub use selector::{Channel, Selector};
pub use symbols::{
    CategorySymbol, FacadeKey, MemberSymbol, ObjectBridge, Placement, SymbolTable, TypeKey,
    TypeSymbol, TypeSymbolKind,
};
