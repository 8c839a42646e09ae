//! objx IR - the exported API graph
//!
//! This crate holds the input of the header exporter:
//! - `DeclId`/`ModuleId`/`MemberId` index types
//! - `TypeRef`, the managed type vocabulary
//! - `Declaration`, a closed variant over every exported declaration kind
//! - `DeclarationGraph`, validated and ordered by `DeclId`
//! - `ExportConfig`, shared by every pipeline stage
//!
//! # Design
//!
//! - **Index, don't own**: declarations reference each other by `DeclId`,
//!   so cycles (self-referential generics, companions pointing back at their
//!   owner) need no special handling.
//! - **Immutable after ingest**: `GraphBuilder::finish` sorts, validates,
//!   and normalizes once; later stages only read.
//!
//! With the `serde` feature, every type derives `Serialize`/`Deserialize`
//! and `GraphDocument` describes the on-disk graph format.

mod config;
mod decl;
mod decl_id;
mod graph;
mod type_ref;

pub use config::{ExportConfig, DEFAULT_SUFFIX_BUDGET};
pub use decl::{
    Annotations, ClassDecl, CompanionDecl, Constructor, DeclInfo, DeclKind, Declaration,
    Deprecation, DeprecationLevel, EnumDecl, EnumEntryDecl, ExtensionDecl, FailureKind, Function,
    InterfaceDecl, Member, Modality, Parameter, Property, TopLevelDecl, TypeParam, Variance,
    Visibility,
};
pub use decl_id::{DeclId, MemberId, ModuleId};
#[cfg(feature = "serde")]
pub use graph::GraphDocument;
pub use graph::{receiver_decl, DeclarationGraph, GraphBuilder, GraphError, Module};
pub use type_ref::{BuiltinKind, ContainerKind, PrimitiveKind, TypeRef};
