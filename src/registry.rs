//! The public façade: `AdapterRegistry<S, V, W>`, wrapping the two tries and
//! the query engine behind the operation set hosts actually call.

use crate::trie::Trie;
use litemap::LiteMap;
use registry_spec::{Spec, SpecKey};
use smol_str::SmolStr;
use tracing::trace;

/// A lattice-aware adapter and subscription registry.
///
/// `S` is the host's interface-specification type (see
/// [`registry_spec::Spec`]). `V` is the adapter value type; `W` is the
/// subscription value type, defaulted to `V` since most hosts register the
/// same kind of value both ways.
pub struct AdapterRegistry<S, V, W = V> {
    adapters: Trie<S, LiteMap<SmolStr, V>>,
    subscriptions: Trie<S, Vec<W>>,
    generation: u64,
}

impl<S: Spec, V, W> Default for AdapterRegistry<S, V, W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Spec, V, W> AdapterRegistry<S, V, W> {
    pub fn new() -> Self {
        Self {
            adapters: Trie::new(),
            subscriptions: Trie::new(),
            generation: 0,
        }
    }

    /// Monotonically increasing count of mutations (`register`,
    /// `unregister`, `subscribe`, `unsubscribe`, `unsubscribe_all`) applied
    /// to this registry since construction.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn bump(&mut self) {
        self.generation += 1;
    }

    // --- adapters -----------------------------------------------------

    /// Register `value` under the exact `(required, provided, name)` key.
    /// Always stores, overwriting whatever was previously registered at
    /// that exact key, if anything (see `DESIGN.md` for why this is split
    /// from `unregister` rather than accepting an `Option<V>`).
    pub fn register(&mut self, required: &[SpecKey<S>], provided: SpecKey<S>, name: impl Into<SmolStr>, value: V) {
        let name = name.into();
        trace!(required = required.len(), %name, "register");
        self.adapters
            .ensure_leaf(required)
            .entry(provided)
            .or_default()
            .insert(name, value);
        self.bump();
    }

    /// Remove the entry at the exact `(required, provided, name)` key, if
    /// present, pruning any trie nodes left empty. A no-op (returns `None`)
    /// if nothing was registered there.
    pub fn unregister(&mut self, required: &[SpecKey<S>], provided: SpecKey<S>, name: &str) -> Option<V> {
        let removed = {
            let leaf = self.adapters.get_leaf_mut(required)?;
            let bucket = leaf.get_mut(&provided)?;
            let removed = bucket.remove(name);
            if bucket.is_empty() {
                leaf.remove(&provided);
            }
            removed
        };
        if removed.is_some() {
            self.adapters.prune(required);
            self.bump();
            trace!(required = required.len(), name, "unregister");
        }
        removed
    }

    /// Exact-key lookup: no ancestor expansion, no name fallback. Distinct
    /// from [`lookup`](Self::lookup), which walks the lattice.
    pub fn registered(&self, required: &[SpecKey<S>], provided: &SpecKey<S>, name: &str) -> Option<&V> {
        self.adapters.get_leaf(required)?.get(provided)?.get(name)
    }

    /// Lattice-walking lookup: the most specific adapter registered for a
    /// query whose `required` spec sequence and `provided` spec may be more
    /// specific than what was actually registered. Falls back to `default`
    /// if nothing qualifies.
    pub fn lookup(&self, required: &[S], provided: &S, name: &str, default: Option<&V>) -> Option<&V> {
        crate::query::best_adapter(&self.adapters, required, provided, name).or(default)
    }

    /// `lookup` specialised to a single required spec.
    pub fn lookup1(&self, required: &S, provided: &S, name: &str, default: Option<&V>) -> Option<&V> {
        self.lookup(std::slice::from_ref(required), provided, name, default)
    }

    /// One winning adapter per distinct registered name, for the given
    /// `required`/`provided` query. Iteration order is unspecified.
    pub fn lookup_all(&self, required: &[S], provided: &S) -> Vec<(SmolStr, &V)> {
        crate::query::lookup_all(&self.adapters, required, provided)
    }

    // --- subscriptions / handlers --------------------------------------

    /// Append `value` to the subscription bucket at the exact
    /// `(required, provided)` key. No ancestor expansion on write; values
    /// are retained in insertion order and duplicates are allowed.
    /// `provided = SpecKey::Any` registers a handler.
    pub fn subscribe(&mut self, required: &[SpecKey<S>], provided: SpecKey<S>, value: W) {
        trace!(required = required.len(), "subscribe");
        self.subscriptions.ensure_leaf(required).entry(provided).or_default().push(value);
        self.bump();
    }

    /// Remove the first subscription equal to `value` from the exact
    /// bucket. Returns whether anything was removed.
    pub fn unsubscribe(&mut self, required: &[SpecKey<S>], provided: SpecKey<S>, value: &W) -> bool
    where
        W: PartialEq,
    {
        let removed = {
            let Some(leaf) = self.subscriptions.get_leaf_mut(required) else {
                return false;
            };
            let Some(bucket) = leaf.get_mut(&provided) else {
                return false;
            };
            let removed = match bucket.iter().position(|existing| existing == value) {
                Some(idx) => {
                    bucket.remove(idx);
                    true
                }
                None => false,
            };
            if bucket.is_empty() {
                leaf.remove(&provided);
            }
            removed
        };
        if removed {
            self.subscriptions.prune(required);
            self.bump();
            trace!(required = required.len(), "unsubscribe");
        }
        removed
    }

    /// Clear every subscription in the exact `(required, provided)` bucket,
    /// regardless of value. Returns how many were removed.
    pub fn unsubscribe_all(&mut self, required: &[SpecKey<S>], provided: SpecKey<S>) -> usize {
        let count = {
            let Some(leaf) = self.subscriptions.get_leaf_mut(required) else {
                return 0;
            };
            match leaf.remove(&provided) {
                Some(bucket) => bucket.len(),
                None => 0,
            }
        };
        if count > 0 {
            self.subscriptions.prune(required);
            self.bump();
            trace!(required = required.len(), count, "unsubscribe_all");
        }
        count
    }

    /// Every subscription reachable from the query, concatenated
    /// broad-to-narrow (the opposite ranking direction from `lookup`),
    /// preserving insertion order within ties.
    pub fn subscriptions(&self, required: &[S], provided: &S) -> Vec<&W> {
        crate::query::all_subscriptions(&self.subscriptions, required, provided)
    }
}
