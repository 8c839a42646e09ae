//! Export errors and the declarations they originate from.

use std::fmt;

use objx_ir::{DeclId, DeclarationGraph, GraphError};

use crate::ErrorCode;

/// The managed declaration a diagnostic is about.
///
/// Orders by declaration id so that reports follow graph order.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum Origin {
    Declaration {
        id: DeclId,
        qualified_name: String,
        module: String,
    },
    /// A name reserved by the exporter itself (support types, synthesized
    /// accessors, NSObject selectors).
    Builtin(String),
}

impl Origin {
    /// Describe a declaration of `graph`.
    pub fn of(graph: &DeclarationGraph, id: DeclId) -> Self {
        let module = graph
            .get(id)
            .and_then(|decl| graph.module(decl.info().module))
            .map(|module| module.name.clone())
            .unwrap_or_default();
        Origin::Declaration {
            id,
            qualified_name: graph.qualified_name(id),
            module,
        }
    }

    pub fn builtin(name: impl Into<String>) -> Self {
        Origin::Builtin(name.into())
    }

    pub fn decl(&self) -> Option<DeclId> {
        match self {
            Origin::Declaration { id, .. } => Some(*id),
            Origin::Builtin(_) => None,
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Declaration {
                id,
                qualified_name,
                module,
            } => write!(f, "`{qualified_name}` ({id} in module `{module}`)"),
            Origin::Builtin(name) => write!(f, "built-in `{name}`"),
        }
    }
}

/// Errors raised while exporting a graph.
///
/// Only `SymbolCollisionUnresolved` and `Graph` abort a run. The shape
/// errors are scoped to one member and turn into warnings.
#[derive(Clone, Eq, PartialEq, Debug, thiserror::Error)]
pub enum ExportError {
    #[error(
        "cannot disambiguate `{symbol}` within {budget} suffixes: {first} and {second} both claim it"
    )]
    SymbolCollisionUnresolved {
        symbol: String,
        first: Origin,
        second: Origin,
        budget: usize,
    },

    #[error("cannot render `{member}` of {origin}: {reason}")]
    UnsupportedSignatureShape {
        origin: Origin,
        member: String,
        reason: String,
    },

    #[error("unsupported type in {origin}: {reason}")]
    UnsupportedTypeShape { origin: Origin, reason: String },

    #[error("invalid declaration graph: {0}")]
    Graph(#[from] GraphError),
}

impl ExportError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ExportError::SymbolCollisionUnresolved { .. } => ErrorCode::E2001,
            ExportError::UnsupportedSignatureShape { .. } => ErrorCode::E4001,
            ExportError::UnsupportedTypeShape { .. } => ErrorCode::E3001,
            ExportError::Graph(err) => match err {
                GraphError::DuplicateDeclaration(_) => ErrorCode::E1001,
                GraphError::UnknownModule { .. } => ErrorCode::E1002,
                GraphError::DanglingReference { .. } => ErrorCode::E1003,
                GraphError::MisplacedOwner { .. } => ErrorCode::E1004,
                GraphError::DuplicateCompanion { .. } => ErrorCode::E1005,
                GraphError::MemberKindMismatch { .. } => ErrorCode::E1006,
            },
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.code().is_fatal()
    }

    /// Scope a type failure to the member that mentions the type.
    ///
    /// Any other error is returned unchanged.
    #[must_use]
    pub fn in_member(self, member: &str) -> Self {
        match self {
            ExportError::UnsupportedTypeShape { origin, reason } => {
                ExportError::UnsupportedSignatureShape {
                    origin,
                    member: member.to_string(),
                    reason: format!("unsupported type: {reason}"),
                }
            }
            other => other,
        }
    }
}

/// A recorded, non-fatal problem: something was left out of the header.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct GenerationWarning {
    pub origin: Origin,
    /// The omitted member, when the warning concerns one.
    pub member: Option<String>,
    pub code: ErrorCode,
    pub message: String,
}

impl GenerationWarning {
    pub fn new(code: ErrorCode, origin: Origin, message: impl Into<String>) -> Self {
        GenerationWarning {
            origin,
            member: None,
            code,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn with_member(mut self, member: impl Into<String>) -> Self {
        self.member = Some(member.into());
        self
    }

    /// Record an omitted member.
    pub fn omitted(err: &ExportError) -> Self {
        match err {
            ExportError::UnsupportedSignatureShape {
                origin,
                member,
                reason,
            } => GenerationWarning {
                origin: origin.clone(),
                member: Some(member.clone()),
                code: err.code(),
                message: format!("omitted: {reason}"),
            },
            ExportError::UnsupportedTypeShape { origin, reason } => GenerationWarning {
                origin: origin.clone(),
                member: None,
                code: err.code(),
                message: format!("omitted: {reason}"),
            },
            ExportError::SymbolCollisionUnresolved { second, .. } => GenerationWarning {
                origin: second.clone(),
                member: None,
                code: err.code(),
                message: err.to_string(),
            },
            ExportError::Graph(_) => GenerationWarning {
                origin: Origin::builtin("graph"),
                member: None,
                code: err.code(),
                message: err.to_string(),
            },
        }
    }
}

impl fmt::Display for GenerationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "warning[{}]: {}", self.code, self.origin)?;
        if let Some(member) = &self.member {
            write!(f, " member `{member}`")?;
        }
        write!(f, ": {}", self.message)
    }
}
