use std::fmt;

/// Error codes for every exporter diagnostic.
///
/// Format: E#### where the first digit names the stage:
/// - E1xxx: Declaration graph
/// - E2xxx: Symbol naming
/// - E3xxx: Type mapping
/// - E4xxx: Signature and declaration rendering
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum ErrorCode {
    // Graph Errors (E1xxx)
    /// Two declarations share an id
    E1001,
    /// Declaration names a module that does not exist
    E1002,
    /// Reference to a declaration missing from the graph
    E1003,
    /// Entry, companion, or nested type attached to the wrong kind of owner
    E1004,
    /// Class with more than one companion
    E1005,
    /// Top-level declaration holding a member of the wrong kind
    E1006,

    // Naming Errors (E2xxx)
    /// Collision not resolvable within the suffix budget
    E2001,

    // Type Errors (E3xxx)
    /// Type with no foreign mapping
    E3001,

    // Rendering Errors (E4xxx)
    /// Member signature that cannot be rendered
    E4001,
    /// Type parameter used against its declared variance
    E4002,
    /// Supertype dropped from a rendered declaration
    E4003,
}

impl ErrorCode {
    /// Get the error code as a string (e.g., "E2001").
    pub fn as_str(&self) -> &'static str {
        match self {
            // Graph
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E1003 => "E1003",
            ErrorCode::E1004 => "E1004",
            ErrorCode::E1005 => "E1005",
            ErrorCode::E1006 => "E1006",
            // Naming
            ErrorCode::E2001 => "E2001",
            // Types
            ErrorCode::E3001 => "E3001",
            // Rendering
            ErrorCode::E4001 => "E4001",
            ErrorCode::E4002 => "E4002",
            ErrorCode::E4003 => "E4003",
        }
    }

    /// Whether diagnostics with this code abort the run.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ErrorCode::E1001
                | ErrorCode::E1002
                | ErrorCode::E1003
                | ErrorCode::E1004
                | ErrorCode::E1005
                | ErrorCode::E1006
                | ErrorCode::E2001
        )
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
