//! Declaration annotations that survive into the foreign surface.

/// How strongly a deprecated declaration is discouraged.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DeprecationLevel {
    /// Usable, with a compiler warning.
    Warning,
    /// Still present but unusable.
    Error,
    /// Hidden from new code entirely.
    Hidden,
}

impl DeprecationLevel {
    /// Whether the foreign declaration must be marked unavailable.
    pub const fn is_unavailable(self) -> bool {
        matches!(self, DeprecationLevel::Error | DeprecationLevel::Hidden)
    }
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Deprecation {
    pub level: DeprecationLevel,
    pub message: String,
}

/// Annotations carried by declarations and members.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Annotations {
    pub deprecation: Option<Deprecation>,
    /// Fully qualified experimental markers that require opt-in.
    pub opt_in: Vec<String>,
    /// Annotations rendered verbatim into documentation,
    /// e.g. `kotlin.SinceKotlin(version="1.3")`.
    pub documented: Vec<String>,
}

impl Annotations {
    pub fn is_empty(&self) -> bool {
        self.deprecation.is_none() && self.opt_in.is_empty() && self.documented.is_empty()
    }

    /// Deprecated at the hidden level.
    pub fn is_hidden(&self) -> bool {
        self.deprecation
            .as_ref()
            .is_some_and(|d| d.level == DeprecationLevel::Hidden)
    }

    #[must_use]
    pub fn with_deprecation(mut self, level: DeprecationLevel, message: impl Into<String>) -> Self {
        self.deprecation = Some(Deprecation {
            level,
            message: message.into(),
        });
        self
    }

    #[must_use]
    pub fn with_opt_in(mut self, marker: impl Into<String>) -> Self {
        self.opt_in.push(marker.into());
        self
    }

    #[must_use]
    pub fn with_documented(mut self, annotation: impl Into<String>) -> Self {
        self.documented.push(annotation.into());
        self
    }
}
