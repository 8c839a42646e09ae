//! Declaration ordering.
//!
//! A declaration is emitted after everything it `requires`: its
//! superclass, adopted protocols, category target, enum owner. Among the
//! declarations that are ready, the lexicographically smallest name goes
//! first, so the order depends only on the set of declarations and never
//! on the order they were rendered in.
//!
//! Requirements on names outside the set (the support prelude, Foundation)
//! are already satisfied. When every remaining declaration waits on
//! another one, the smallest name on a requirement cycle is released
//! anyway; the forward declarations at the top of the header keep such a
//! cycle compilable.

use std::collections::BTreeSet;

use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use objx_render::RenderedDecl;

/// Declarations in emission order.
#[derive(Debug)]
pub struct Ordering<'d> {
    pub decls: Vec<&'d RenderedDecl>,
    /// Declarations released before all of their requirements were emitted.
    pub forced: Vec<&'d str>,
}

/// Order `decls` so that requirements come first.
#[tracing::instrument(level = "debug", skip_all, fields(decls = decls.len()))]
pub fn order(decls: &[RenderedDecl]) -> Ordering<'_> {
    let mut index: FxHashMap<&str, usize> = FxHashMap::default();
    for (i, decl) in decls.iter().enumerate() {
        index.entry(decl.name.as_str()).or_insert(i);
    }

    // dependents[i]: declarations waiting on i
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); decls.len()];
    let mut requirements: Vec<Vec<usize>> = vec![Vec::new(); decls.len()];
    let mut in_degree = vec![0usize; decls.len()];
    for (i, decl) in decls.iter().enumerate() {
        for name in &decl.requires {
            match index.get(name.as_str()) {
                Some(&dep) if dep != i && !requirements[i].contains(&dep) => {
                    dependents[dep].push(i);
                    requirements[i].push(dep);
                    in_degree[i] += 1;
                }
                _ => {}
            }
        }
    }

    let mut ready: BTreeSet<(&str, usize)> = decls
        .iter()
        .enumerate()
        .filter(|&(i, _)| in_degree[i] == 0)
        .map(|(i, d)| (d.name.as_str(), i))
        .collect();
    let mut emitted = vec![false; decls.len()];
    let mut ordering = Ordering {
        decls: Vec::with_capacity(decls.len()),
        forced: Vec::new(),
    };

    while ordering.decls.len() < decls.len() {
        let next = match ready.pop_first() {
            Some((_, i)) => i,
            None => {
                let Some(i) = cycle_member(decls, &requirements, &emitted) else {
                    break;
                };
                warn!(decl = %decls[i].name, "requirement cycle; relying on forward declarations");
                ordering.forced.push(decls[i].name.as_str());
                i
            }
        };
        if emitted[next] {
            continue;
        }
        emitted[next] = true;
        ordering.decls.push(&decls[next]);
        for &dependent in &dependents[next] {
            in_degree[dependent] = in_degree[dependent].saturating_sub(1);
            if in_degree[dependent] == 0 && !emitted[dependent] {
                ready.insert((decls[dependent].name.as_str(), dependent));
            }
        }
    }

    debug!(forced = ordering.forced.len(), "declarations ordered");
    ordering
}

/// The smallest name on some cycle among the declarations not yet
/// emitted. Every one of them has an unemitted requirement, so walking
/// requirements from the smallest remaining name must revisit a node.
fn cycle_member(
    decls: &[RenderedDecl],
    requirements: &[Vec<usize>],
    emitted: &[bool],
) -> Option<usize> {
    let key = |i: usize| (decls[i].name.as_str(), i);
    let mut current = (0..decls.len()).filter(|&i| !emitted[i]).min_by_key(|&i| key(i))?;
    let mut on_path: Vec<Option<usize>> = vec![None; decls.len()];
    let mut path = Vec::new();
    loop {
        if let Some(start) = on_path[current] {
            return path[start..].iter().copied().min_by_key(|&i| key(i));
        }
        on_path[current] = Some(path.len());
        path.push(current);
        current = requirements[current]
            .iter()
            .copied()
            .filter(|&r| !emitted[r])
            .min_by_key(|&r| key(r))?;
    }
}

#[cfg(test)]
mod tests;
