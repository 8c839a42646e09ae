//! Layout traits of a class-like declaration, computed once per render.

use bitflags::bitflags;

use objx_ir::{Declaration, DeclarationGraph, ExportConfig};

bitflags! {
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct DeclFlags: u8 {
        /// `objc_subclassing_restricted`.
        const RESTRICTED = 1 << 0;
        /// Objects, companions and enum entries.
        const SINGLETON = 1 << 1;
        const HAS_COMPANION = 1 << 2;
        const ENUM = 1 << 3;
        /// Type parameters render as lightweight generics.
        const GENERIC = 1 << 4;
    }
}

impl DeclFlags {
    pub fn of(graph: &DeclarationGraph, decl: &Declaration, config: &ExportConfig) -> Self {
        let mut flags = DeclFlags::empty();
        if decl.is_final() {
            flags |= DeclFlags::RESTRICTED;
        }
        if decl.is_singleton() {
            flags |= DeclFlags::SINGLETON;
        }
        match decl {
            Declaration::Class(class) => {
                if graph.companion_of(decl.id()).is_some_and(|c| graph.is_exported(c)) {
                    flags |= DeclFlags::HAS_COMPANION;
                }
                if config.generics && !class.generics.is_empty() {
                    flags |= DeclFlags::GENERIC;
                }
            }
            Declaration::Enum(_) => flags |= DeclFlags::ENUM,
            _ => {}
        }
        flags
    }
}
