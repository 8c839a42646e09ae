//! Namespaces that hand out unique names.
//!
//! A claim walks the candidate ladder `name`, `name_`, `name__`, ... until
//! it finds a free slot or exhausts the suffix budget. Callers present
//! claims in a fixed order, so the suffix each claim receives is a pure
//! function of the input graph.

use rustc_hash::FxHashMap;

use objx_diagnostic::{ExportError, Origin};

use crate::names::reserved_selectors;

/// Type-level names: classes, protocols, facades, support types.
#[derive(Debug, Default)]
pub(crate) struct TypeNamespace {
    taken: FxHashMap<String, Origin>,
}

impl TypeNamespace {
    pub fn reserve(&mut self, name: impl Into<String>, origin: Origin) {
        self.taken.entry(name.into()).or_insert(origin);
    }

    /// Claim the first free candidate; returns its suffix count.
    pub fn claim(
        &mut self,
        origin: &Origin,
        budget: usize,
        candidate: impl Fn(usize) -> String,
    ) -> Result<usize, ExportError> {
        for k in 0..=budget {
            let name = candidate(k);
            if !self.taken.contains_key(&name) {
                self.taken.insert(name, origin.clone());
                return Ok(k);
            }
        }
        let symbol = candidate(0);
        let first = self
            .taken
            .get(&symbol)
            .cloned()
            .unwrap_or_else(|| Origin::builtin(symbol.clone()));
        Err(ExportError::SymbolCollisionUnresolved {
            symbol,
            first,
            second: origin.clone(),
            budget,
        })
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub(crate) enum SlotKind {
    /// `NSObject` selector.
    Reserved,
    /// Accessor generated by the exporter (`shared`, `companion`, ...).
    Synthesized,
    Declared,
}

#[derive(Clone, Debug)]
struct Slot {
    kind: SlotKind,
    /// Signature key of the member holding the slot.
    key: String,
    origin: Origin,
    inherited: bool,
}

/// Selectors of one foreign type, including those inherited from its
/// supertypes.
#[derive(Clone, Debug, Default)]
pub(crate) struct MemberNamespace {
    slots: FxHashMap<String, Slot>,
}

impl MemberNamespace {
    pub fn with_reserved() -> Self {
        let mut ns = MemberNamespace::default();
        for selector in reserved_selectors() {
            ns.slots.insert(
                selector.to_string(),
                Slot {
                    kind: SlotKind::Reserved,
                    key: String::new(),
                    origin: Origin::builtin("NSObject"),
                    inherited: true,
                },
            );
        }
        ns
    }

    /// Take over every slot of a supertype that is not already present.
    pub fn inherit(&mut self, parent: &MemberNamespace) {
        for (selector, slot) in &parent.slots {
            self.slots.entry(selector.clone()).or_insert_with(|| Slot {
                inherited: true,
                ..slot.clone()
            });
        }
    }

    pub fn synthesize(&mut self, selector: &str, origin: &Origin) {
        self.slots.insert(
            selector.to_string(),
            Slot {
                kind: SlotKind::Synthesized,
                key: String::new(),
                origin: origin.clone(),
                inherited: false,
            },
        );
    }

    /// Whether the type itself declares `selector`, as opposed to
    /// inheriting it or reserving it for `NSObject`.
    pub fn declares(&self, selector: &str) -> bool {
        self.slots
            .get(selector)
            .is_some_and(|slot| !slot.inherited && slot.kind != SlotKind::Reserved)
    }

    /// Bind a selector unconditionally, replacing whatever held it.
    pub fn bind(&mut self, selector: &str, key: &str, origin: &Origin) {
        self.slots.insert(
            selector.to_string(),
            Slot {
                kind: SlotKind::Declared,
                key: key.to_string(),
                origin: origin.clone(),
                inherited: false,
            },
        );
    }

    /// Claim the first candidate that is free, or that is inherited from a
    /// supertype member with the same signature key (an override).
    pub fn claim(
        &mut self,
        key: &str,
        origin: &Origin,
        budget: usize,
        candidate: impl Fn(usize) -> String,
    ) -> Result<usize, ExportError> {
        self.claim_all(key, origin, budget, |k| vec![candidate(k)])
    }

    /// Claim every selector of one rung together, e.g. a property's getter
    /// and setter. A rung is taken only when all of its selectors are.
    pub fn claim_all(
        &mut self,
        key: &str,
        origin: &Origin,
        budget: usize,
        candidates: impl Fn(usize) -> Vec<String>,
    ) -> Result<usize, ExportError> {
        for k in 0..=budget {
            let selectors = candidates(k);
            if selectors.iter().all(|s| self.available(s, key)) {
                for selector in &selectors {
                    self.take(selector, key, origin);
                }
                return Ok(k);
            }
        }
        let first = |k: usize| candidates(k).into_iter().next().unwrap_or_default();
        Err(self.exhausted(origin, budget, &first))
    }

    fn available(&self, selector: &str, key: &str) -> bool {
        self.slots.get(selector).map_or(true, |slot| {
            slot.inherited && slot.kind == SlotKind::Declared && slot.key == key
        })
    }

    fn take(&mut self, selector: &str, key: &str, origin: &Origin) {
        match self.slots.get_mut(selector) {
            Some(slot) if slot.inherited => {
                slot.inherited = false;
                slot.origin = origin.clone();
            }
            _ => self.bind(selector, key, origin),
        }
    }

    /// Claim for an initializer. Initializers are not inherited, so only
    /// slots the type declares itself block a candidate.
    pub fn claim_initializer(
        &mut self,
        key: &str,
        origin: &Origin,
        budget: usize,
        candidate: impl Fn(usize) -> String,
    ) -> Result<usize, ExportError> {
        for k in 0..=budget {
            let selector = candidate(k);
            if self.slots.get(&selector).map_or(true, |slot| slot.inherited) {
                self.bind(&selector, key, origin);
                return Ok(k);
            }
        }
        Err(self.exhausted(origin, budget, &candidate))
    }

    fn exhausted(
        &self,
        origin: &Origin,
        budget: usize,
        candidate: &impl Fn(usize) -> String,
    ) -> ExportError {
        let symbol = candidate(0);
        let first = self
            .slots
            .get(&symbol)
            .map_or_else(|| Origin::builtin(symbol.clone()), |slot| slot.origin.clone());
        ExportError::SymbolCollisionUnresolved {
            symbol,
            first,
            second: origin.clone(),
            budget,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "test code uses unwrap for concise assertions")]
mod tests {
    use objx_ir::DeclId;
    use pretty_assertions::assert_eq;

    use super::*;

    fn origin(raw: u32) -> Origin {
        Origin::Declaration {
            id: DeclId::new(raw),
            qualified_name: format!("T{raw}"),
            module: "m".to_string(),
        }
    }

    fn underscored(base: &str) -> impl Fn(usize) -> String + '_ {
        move |k| format!("{base}{}", "_".repeat(k))
    }

    #[test]
    fn type_claims_walk_the_ladder() {
        let mut ns = TypeNamespace::default();
        assert_eq!(ns.claim(&origin(1), 4, underscored("Job")).ok(), Some(0));
        assert_eq!(ns.claim(&origin(2), 4, underscored("Job")).ok(), Some(1));
        assert_eq!(ns.claim(&origin(3), 4, underscored("Job")).ok(), Some(2));
    }

    #[test]
    fn exhausted_budget_names_both_claimants() {
        let mut ns = TypeNamespace::default();
        ns.reserve("Job", origin(1));
        ns.reserve("Job_", origin(2));
        let err = ns.claim(&origin(3), 1, underscored("Job")).unwrap_err();
        assert_eq!(
            err,
            ExportError::SymbolCollisionUnresolved {
                symbol: "Job".to_string(),
                first: origin(1),
                second: origin(3),
                budget: 1,
            }
        );
    }

    #[test]
    fn overrides_reuse_inherited_selectors() {
        let mut parent = MemberNamespace::with_reserved();
        parent.claim("fun cancel(Throwable?)", &origin(1), 4, underscored("cancel:")).unwrap();

        let mut child = MemberNamespace::with_reserved();
        child.inherit(&parent);
        assert_eq!(
            child.claim("fun cancel(Throwable?)", &origin(2), 4, underscored("cancel:")).ok(),
            Some(0)
        );
        // A second declaration with the same key in the same type is not an
        // override.
        assert_eq!(
            child.claim("fun cancel(Throwable?)", &origin(2), 4, underscored("cancel:")).ok(),
            Some(1)
        );
    }

    #[test]
    fn reserved_and_synthesized_slots_are_never_reused() {
        let mut ns = MemberNamespace::with_reserved();
        ns.synthesize("shared", &origin(1));
        assert!(!ns.declares("release"));
        assert!(ns.declares("shared"));
        assert_eq!(ns.claim("val shared", &origin(1), 2, underscored("shared")).ok(), Some(1));
    }

    #[test]
    fn getter_and_setter_move_together() {
        let mut ns = MemberNamespace::with_reserved();
        ns.claim("fun set(Int)", &origin(1), 4, underscored("setCount:")).unwrap();
        let rung = |k: usize| {
            let suffix = "_".repeat(k);
            vec![format!("count{suffix}"), format!("setCount{suffix}:")]
        };
        assert_eq!(ns.claim_all("val count", &origin(1), 4, rung).ok(), Some(1));
        assert!(ns.declares("count_"));
        assert!(ns.declares("setCount_:"));
        assert!(!ns.declares("count"));
        assert!(!ns.declares("release"));
    }

    #[test]
    fn overridden_properties_reuse_both_accessors() {
        let rung = |k: usize| {
            let suffix = "_".repeat(k);
            vec![format!("size{suffix}"), format!("setSize{suffix}:")]
        };
        let mut parent = MemberNamespace::with_reserved();
        parent.claim_all("val size", &origin(1), 4, rung).unwrap();
        let mut child = MemberNamespace::with_reserved();
        child.inherit(&parent);
        assert_eq!(child.claim_all("val size", &origin(2), 4, rung).ok(), Some(0));
    }

    #[test]
    fn initializers_replace_inherited_slots() {
        let mut parent = MemberNamespace::with_reserved();
        parent
            .claim_initializer("init(Int)", &origin(1), 2, underscored("initWithX:"))
            .unwrap();
        let mut child = MemberNamespace::with_reserved();
        child.inherit(&parent);
        assert_eq!(
            child.claim_initializer("init(Long)", &origin(2), 2, underscored("initWithX:")).ok(),
            Some(0)
        );
        assert_eq!(
            child.claim_initializer("init()", &origin(2), 2, underscored("init")).ok(),
            Some(0)
        );
        assert_eq!(
            child.claim_initializer("init(String)", &origin(2), 2, underscored("initWithX:")).ok(),
            Some(1)
        );
    }
}
