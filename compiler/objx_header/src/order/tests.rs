use pretty_assertions::assert_eq;
use proptest::prelude::*;

use objx_render::{Forward, RenderedDecl};

use super::*;

fn decl(name: &str, requires: &[&str]) -> RenderedDecl {
    RenderedDecl {
        name: name.to_string(),
        forward: Forward::Class(name.to_string()),
        requires: requires.iter().map(|r| (*r).to_string()).collect(),
        text: format!("@interface {name}\n@end\n"),
    }
}

fn names<'d>(ordering: &Ordering<'d>) -> Vec<&'d str> {
    ordering.decls.iter().map(|d| d.name.as_str()).collect()
}

#[test]
fn independent_declarations_sort_by_name() {
    let decls = [decl("Zeta", &[]), decl("Alpha", &[]), decl("Mid", &[])];
    let ordering = order(&decls);
    assert_eq!(names(&ordering), ["Alpha", "Mid", "Zeta"]);
    assert!(ordering.forced.is_empty());
}

#[test]
fn requirements_come_first() {
    let decls = [
        decl("Alpha", &["Zeta"]),
        decl("Zeta", &["Job"]),
        decl("Job", &[]),
        decl("Alpha (Extensions)", &["Alpha"]),
    ];
    let ordering = order(&decls);
    assert_eq!(names(&ordering), ["Job", "Zeta", "Alpha", "Alpha (Extensions)"]);
}

#[test]
fn unknown_requirements_are_ignored() {
    let decls = [decl("Box", &["KotlinBase", "NSObject"]), decl("Arc", &[])];
    assert_eq!(names(&order(&decls)), ["Arc", "Box"]);
}

#[test]
fn cycles_fall_back_to_name_order() {
    let decls = [
        decl("Odd", &["Even"]),
        decl("Even", &["Odd"]),
        decl("After", &["Odd"]),
        decl("Free", &[]),
    ];
    let ordering = order(&decls);
    assert_eq!(names(&ordering), ["Free", "Even", "Odd", "After"]);
    assert_eq!(ordering.forced, ["Even"]);
}

#[test]
fn self_and_repeated_requirements() {
    let decls = [decl("Node", &["Node", "Base", "Base"]), decl("Base", &[])];
    let ordering = order(&decls);
    assert_eq!(names(&ordering), ["Base", "Node"]);
    assert!(ordering.forced.is_empty());
}

fn graph() -> impl Strategy<Value = Vec<RenderedDecl>> {
    (1usize..12).prop_flat_map(|n| {
        prop::collection::vec(prop::collection::vec(0..n, 0..3), n).prop_map(move |edges| {
            edges
                .iter()
                .enumerate()
                .map(|(i, reqs)| {
                    let reqs: Vec<String> = reqs.iter().map(|r| format!("T{r}")).collect();
                    let reqs: Vec<&str> = reqs.iter().map(String::as_str).collect();
                    decl(&format!("T{i}"), &reqs)
                })
                .collect()
        })
    })
}

proptest! {
    #[test]
    fn every_declaration_is_emitted_once(decls in graph()) {
        let ordering = order(&decls);
        let mut emitted = names(&ordering);
        emitted.sort_unstable();
        let mut expected: Vec<&str> = decls.iter().map(|d| d.name.as_str()).collect();
        expected.sort_unstable();
        prop_assert_eq!(emitted, expected);
    }

    #[test]
    fn order_ignores_input_order(decls in graph()) {
        let forward = names(&order(&decls)).into_iter().map(str::to_string).collect::<Vec<_>>();
        let mut reversed = decls.clone();
        reversed.reverse();
        let backward = names(&order(&reversed)).into_iter().map(str::to_string).collect::<Vec<_>>();
        prop_assert_eq!(forward, backward);
    }

    #[test]
    fn acyclic_requirements_are_respected(decls in graph()) {
        let ordering = order(&decls);
        if ordering.forced.is_empty() {
            let position: FxHashMap<&str, usize> =
                names(&ordering).into_iter().enumerate().map(|(i, n)| (n, i)).collect();
            for decl in &decls {
                for req in &decl.requires {
                    if req != &decl.name {
                        prop_assert!(position[req.as_str()] < position[decl.name.as_str()]);
                    }
                }
            }
        }
    }
}
