//! The lookup trie: a tree keyed by a `required` spec sequence, with a
//! per-node leaf map keyed by `provided` spec.
//!
//! Shared between the `adapters` trie (leaf = name -> value) and the
//! `subscriptions` trie (leaf = insertion-ordered value list), so insertion,
//! deletion, and pruning are written once for both.

use registry_spec::{Spec, SpecKey};
use std::collections::HashMap;
use std::hash::Hash;

/// One node of the trie. Every node (not just terminal ones) carries its
/// own `leaf` map, because a registration of arity *n* lives at depth *n*
/// regardless of whether other registrations pass deeper through this node.
pub(crate) struct Node<S, L> {
    pub(crate) children: HashMap<SpecKey<S>, Box<Node<S, L>>>,
    pub(crate) leaf: HashMap<SpecKey<S>, L>,
}

impl<S, L> Node<S, L> {
    fn empty() -> Self {
        Self {
            children: HashMap::new(),
            leaf: HashMap::new(),
        }
    }
}

impl<S: Eq + Hash, L: Default> Node<S, L> {
    fn is_empty(&self) -> bool {
        self.children.is_empty() && self.leaf.is_empty()
    }
}

/// A trie keyed by `required` sequences, used identically for the adapters
/// and subscriptions tables (see `registry.rs`).
pub(crate) struct Trie<S, L> {
    pub(crate) root: Node<S, L>,
}

impl<S: Spec, L: Default> Default for Trie<S, L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Spec, L: Default> Trie<S, L> {
    pub(crate) fn new() -> Self {
        Self { root: Node::empty() }
    }

    /// Walk `required` from the root, creating child nodes as needed, and
    /// return the terminal node's leaf map so the caller can insert.
    pub(crate) fn ensure_leaf(&mut self, required: &[SpecKey<S>]) -> &mut HashMap<SpecKey<S>, L> {
        let mut node = &mut self.root;
        for key in required {
            node = node
                .children
                .entry(key.clone())
                .or_insert_with(|| Box::new(Node::empty()));
        }
        &mut node.leaf
    }

    /// Walk the exact `required` path without creating nodes, for read-only
    /// exact-key access (`registered`, and as the base case of deletion).
    pub(crate) fn get_leaf(&self, required: &[SpecKey<S>]) -> Option<&HashMap<SpecKey<S>, L>> {
        let mut node = &self.root;
        for key in required {
            node = node.children.get(key)?;
        }
        Some(&node.leaf)
    }

    /// Walk the exact `required` path without creating nodes, returning a
    /// mutable leaf map for in-place removal.
    pub(crate) fn get_leaf_mut(&mut self, required: &[SpecKey<S>]) -> Option<&mut HashMap<SpecKey<S>, L>> {
        let mut node = &mut self.root;
        for key in required {
            node = node.children.get_mut(key)?;
        }
        Some(&mut node.leaf)
    }

    /// Remove every node along `required` that's left with no children and
    /// no leaf entries, starting from the deepest and working back to (but
    /// not including) the root.
    pub(crate) fn prune(&mut self, required: &[SpecKey<S>]) {
        prune_rec(&mut self.root, required);
    }

    /// Root-level DFS used by the query engine: explore every child chain
    /// that's both present in the trie and an acceptable specialisation of
    /// `required`, invoking `visit` at each node reached at the full depth.
    pub(crate) fn for_each_match<'t>(
        &'t self,
        required: &[S],
        mut visit: impl FnMut(&smallvec::SmallVec<[u32; 4]>, &'t Node<S, L>),
    ) {
        let mut tuple = smallvec::SmallVec::new();
        walk_rec(&self.root, required, 0, &mut tuple, &mut visit);
    }
}

/// Returns true if `node` ended up empty and should be unlinked by its
/// parent.
fn prune_rec<S: Spec, L: Default>(node: &mut Node<S, L>, path: &[SpecKey<S>]) -> bool {
    if let Some((first, rest)) = path.split_first() {
        let child_is_empty = match node.children.get_mut(first) {
            Some(child) => prune_rec(child, rest),
            None => false,
        };
        if child_is_empty {
            node.children.remove(first);
        }
    }
    node.is_empty()
}

fn walk_rec<'t, S: Spec, L>(
    node: &'t Node<S, L>,
    required: &[S],
    depth: usize,
    tuple: &mut smallvec::SmallVec<[u32; 4]>,
    visit: &mut impl FnMut(&smallvec::SmallVec<[u32; 4]>, &'t Node<S, L>),
) {
    if depth == required.len() {
        visit(tuple, node);
        return;
    }
    let ancestors = required[depth].ancestors();
    for (idx, ancestor) in ancestors.iter().enumerate() {
        if let Some(child) = node.children.get(&SpecKey::Spec(ancestor.clone())) {
            tuple.push(idx as u32);
            walk_rec(child, required, depth + 1, tuple, visit);
            tuple.pop();
        }
    }
    if let Some(child) = node.children.get(&SpecKey::Any) {
        tuple.push(ancestors.len() as u32);
        walk_rec(child, required, depth + 1, tuple, visit);
        tuple.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use registry_spec::iface::IfaceTable;

    fn lattice() -> (IfaceTable, registry_spec::Iface, registry_spec::Iface) {
        let mut table = IfaceTable::new();
        let r1 = table.define("IR1", &[]).unwrap();
        let r2 = table.define("IR2", &["IR1"]).unwrap();
        (table, r1, r2)
    }

    #[test]
    fn ensure_leaf_creates_and_reuses_the_same_node() {
        let (_table, r1, _r2) = lattice();
        let mut trie: Trie<registry_spec::Iface, Vec<i32>> = Trie::new();
        trie.ensure_leaf(&[SpecKey::Spec(r1.clone())])
            .entry(SpecKey::Any)
            .or_default()
            .push(1);
        trie.ensure_leaf(&[SpecKey::Spec(r1.clone())])
            .entry(SpecKey::Any)
            .or_default()
            .push(2);
        let leaf = trie.get_leaf(&[SpecKey::Spec(r1)]).unwrap();
        assert_eq!(leaf.get(&SpecKey::Any).unwrap(), &vec![1, 2]);
    }

    #[test]
    fn prune_removes_emptied_branches_but_keeps_the_root() {
        let (_table, r1, r2) = lattice();
        let mut trie: Trie<registry_spec::Iface, Vec<i32>> = Trie::new();
        let path = [SpecKey::Spec(r1), SpecKey::Spec(r2)];
        trie.ensure_leaf(&path).entry(SpecKey::Any).or_default().push(1);
        trie.get_leaf_mut(&path).unwrap().remove(&SpecKey::Any);
        trie.prune(&path);
        assert!(trie.root.children.is_empty());
    }

    #[test]
    fn for_each_match_reaches_wildcard_and_ancestor_registrations() {
        let (_table, r1, r2) = lattice();
        let mut trie: Trie<registry_spec::Iface, Vec<&'static str>> = Trie::new();
        trie.ensure_leaf(&[SpecKey::Any])
            .entry(SpecKey::Any)
            .or_default()
            .push("wildcard");
        trie.ensure_leaf(&[SpecKey::Spec(r1.clone())])
            .entry(SpecKey::Any)
            .or_default()
            .push("r1");
        let mut seen = Vec::new();
        trie.for_each_match(&[r2], |tuple, node| {
            for bucket in node.leaf.values() {
                for value in bucket {
                    seen.push((tuple.clone(), *value));
                }
            }
        });
        seen.sort_by_key(|(tuple, _)| tuple.clone());
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].1, "r1");
        assert_eq!(seen[1].1, "wildcard");
    }
}
