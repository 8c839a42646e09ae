//! Type parameters visible at a use site.

use objx_ir::TypeParam;

/// Generic parameters in scope while mapping one member.
///
/// Parameters of the rendered class may appear as lightweight generics.
/// Parameters of members and extensions have no foreign counterpart and
/// erase to their bound; they shadow class parameters of the same name.
#[derive(Clone, Debug, Default)]
pub struct Scope<'a> {
    class: &'a [TypeParam],
    erased: Vec<&'a TypeParam>,
}

/// How a type parameter reference resolves.
#[derive(Copy, Clone, Debug)]
pub enum ParamUse<'a> {
    /// Declared by the rendered class.
    Class(&'a TypeParam),
    /// Declared by a member or extension.
    Erased(&'a TypeParam),
}

impl<'a> Scope<'a> {
    /// A scope without any type parameters.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn of_class(generics: &'a [TypeParam]) -> Self {
        Scope {
            class: generics,
            erased: Vec::new(),
        }
    }

    /// Add parameters that have no foreign counterpart.
    #[must_use]
    pub fn erasing(mut self, generics: &'a [TypeParam]) -> Self {
        self.erased.extend(generics);
        self
    }

    pub fn lookup(&self, name: &str) -> Option<ParamUse<'a>> {
        if let Some(param) = self.erased.iter().rev().find(|p| p.name == name) {
            return Some(ParamUse::Erased(param));
        }
        self.class.iter().find(|p| p.name == name).map(ParamUse::Class)
    }

    pub fn class_params(&self) -> &'a [TypeParam] {
        self.class
    }
}
