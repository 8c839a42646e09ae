//! Declaration, module, and member identifiers.
//!
//! The graph is index-based: declarations refer to each other through
//! `DeclId`, never through owning pointers, so cyclic references (a class
//! mentioning itself generically, companions referring back to their owner)
//! need no special handling.

use std::fmt;

/// Stable identifier of a declaration in the graph.
///
/// The ordering of `DeclId` is the canonical processing order of every
/// pipeline stage. Two runs over the same graph visit declarations in the
/// same order regardless of the order in which they were ingested.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[repr(transparent)]
pub struct DeclId(u32);

impl DeclId {
    /// Create a new `DeclId`.
    #[inline]
    pub const fn new(raw: u32) -> Self {
        DeclId(raw)
    }

    /// Get the raw u32 value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for DeclId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DeclId({})", self.0)
    }
}

impl fmt::Display for DeclId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Index into the graph's module table.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[repr(transparent)]
pub struct ModuleId(u32);

impl ModuleId {
    #[inline]
    pub const fn new(raw: u32) -> Self {
        ModuleId(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Addresses one member of a declaration.
///
/// Class-like declarations number their members by position in the member
/// list. Top-level functions and properties are member `0` of their own
/// declaration.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct MemberId {
    pub decl: DeclId,
    pub index: u32,
}

impl MemberId {
    #[inline]
    pub const fn new(decl: DeclId, index: u32) -> Self {
        MemberId { decl, index }
    }
}

impl fmt::Debug for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MemberId({}.{})", self.decl.0, self.index)
    }
}
