//! Export configuration.
//!
//! One `ExportConfig` drives a whole generation run. It is read by every
//! stage, so it lives next to the graph rather than in any one stage.

/// Default number of disambiguation underscores tried before a collision
/// is reported as unresolvable.
pub const DEFAULT_SUFFIX_BUDGET: usize = 8;

/// Configuration for a header export run.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ExportConfig {
    /// Prepended to every emitted class and protocol name.
    pub framework_prefix: String,

    /// Prefix of the support types (`KotlinUnit`, `KotlinArray`, ...).
    /// Also the Swift-side prefix of the base and boxed number classes.
    pub stdlib_prefix: String,

    /// Language named in generated documentation notes.
    pub source_language: String,

    /// Maximum number of trailing underscores appended while resolving a
    /// name collision.
    pub suffix_budget: usize,

    /// Render class type parameters as lightweight generics. When off,
    /// every type parameter erases to its bound.
    pub generics: bool,

    /// Render declarations on a thread pool once naming is settled.
    pub parallel: bool,

    /// Module whose entry point the launcher calls.
    pub entry_module: String,

    /// Name of the entry function inside `entry_module`.
    pub entry_function: String,

    /// Pass `<fw><stdlib>Unit * _Nullable` to the completion handler of a
    /// suspending function returning `Unit`, as older headers did.
    pub legacy_suspend_unit: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            framework_prefix: String::new(),
            stdlib_prefix: "Kotlin".to_string(),
            source_language: "Kotlin".to_string(),
            suffix_budget: DEFAULT_SUFFIX_BUDGET,
            generics: true,
            parallel: false,
            entry_module: "main".to_string(),
            entry_function: "main".to_string(),
            legacy_suspend_unit: false,
        }
    }
}

impl ExportConfig {
    /// Create a config with the given framework prefix.
    pub fn with_framework_prefix(prefix: impl Into<String>) -> Self {
        Self {
            framework_prefix: prefix.into(),
            ..Default::default()
        }
    }

    /// Create a config with the given suffix budget.
    pub fn with_suffix_budget(suffix_budget: usize) -> Self {
        Self {
            suffix_budget,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn generics(mut self, enabled: bool) -> Self {
        self.generics = enabled;
        self
    }

    #[must_use]
    pub fn parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    #[must_use]
    pub fn legacy_suspend_unit(mut self, enabled: bool) -> Self {
        self.legacy_suspend_unit = enabled;
        self
    }

    /// Prefix the foreign name of a type.
    #[inline]
    pub fn prefixed(&self, name: &str) -> String {
        format!("{}{name}", self.framework_prefix)
    }

    /// Foreign name of a stdlib support type such as `Unit` or `Array`.
    pub fn stdlib_name(&self, name: &str) -> String {
        format!("{}{}{name}", self.framework_prefix, self.stdlib_prefix)
    }

    /// Swift-side name of a support type.
    pub fn stdlib_swift_name(&self, name: &str) -> String {
        format!("{}{name}", self.stdlib_prefix)
    }
}
