//! Stable ordering of threaded message structures.
//!
//! Exports store messages either as a tree (ChatGPT `mapping`, with explicit
//! `children`) or as a list with optional parent pointers (Claude). Both are
//! flattened here into one deterministic order: depth-first from the roots,
//! children in their recorded order, and any node that cannot be reached
//! (broken or cyclic links) appended afterwards in source order.

use std::collections::HashMap;

/// One node of a message thread, borrowed from the export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadNode<'a> {
    /// Node identifier
    pub id: &'a str,
    /// Parent identifier, if linked
    pub parent: Option<&'a str>,
    /// Explicit child list, when the schema records one
    pub children: Option<Vec<&'a str>>,
}

impl<'a> ThreadNode<'a> {
    pub fn new(id: &'a str, parent: Option<&'a str>) -> Self {
        Self {
            id,
            parent,
            children: None,
        }
    }

    #[must_use]
    pub fn with_children(mut self, children: Vec<&'a str>) -> Self {
        self.children = Some(children);
        self
    }
}

/// Returns the indices of `nodes` in thread order.
///
/// Explicit child lists take precedence when any node has one; otherwise
/// children are derived from parent pointers in source order. Every index
/// appears exactly once.
pub fn thread_order(nodes: &[ThreadNode<'_>]) -> Vec<usize> {
    let mut index: HashMap<&str, usize> = HashMap::with_capacity(nodes.len());
    for (i, node) in nodes.iter().enumerate() {
        index.entry(node.id).or_insert(i);
    }

    let mut kids: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
    let explicit = nodes.iter().any(|n| n.children.is_some());

    if explicit {
        for (i, node) in nodes.iter().enumerate() {
            for child in node.children.iter().flatten() {
                if let Some(&j) = index.get(child) {
                    if j != i {
                        kids[i].push(j);
                    }
                }
            }
        }
    } else {
        for (i, node) in nodes.iter().enumerate() {
            if let Some(&p) = node.parent.and_then(|p| index.get(p)) {
                if p != i {
                    kids[p].push(i);
                }
            }
        }
    }

    let is_root = |node: &ThreadNode<'_>| match node.parent {
        None => true,
        Some(p) => p == node.id || !index.contains_key(p),
    };

    let mut visited = vec![false; nodes.len()];
    let mut order = Vec::with_capacity(nodes.len());

    let roots = nodes
        .iter()
        .enumerate()
        .filter(|(_, n)| is_root(n))
        .map(|(i, _)| i);
    let rest: Vec<usize> = (0..nodes.len()).collect();

    for start in roots.chain(rest) {
        let mut stack = vec![start];
        while let Some(i) = stack.pop() {
            if visited[i] {
                continue;
            }
            visited[i] = true;
            order.push(i);
            stack.extend(kids[i].iter().rev().copied());
        }
    }

    order
}
