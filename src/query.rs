//! Interprets the trie: specificity ranking, name filtering, and
//! subscription ordering. The trie (see `trie.rs`) only knows how to store
//! and traverse; everything about *which* match wins lives here.

use crate::trie::Trie;
use registry_spec::{Spec, SpecKey};
use smallvec::SmallVec;
use smol_str::SmolStr;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

type Tuple = SmallVec<[u32; 4]>;

/// Rank a leaf key against a `provided` query, or `None` if it doesn't
/// qualify. Unlike the required axis (contravariant: a registration matches
/// if the query spec extends it), the provided axis is covariant: a
/// registration matches if *it* is-or-extends the query spec, because
/// providing a subtype interface implies providing its supertypes too.
/// Rank favours the closest match, so an exact registration beats one that
/// merely extends the query spec (see the `register([IR1], IP1, ...)`
/// beating an earlier `register([IR1], IP2, ...)` scenario this mirrors).
fn provided_rank<S: Spec>(key: &SpecKey<S>, query_provided: &S) -> Option<u32> {
    match key {
        SpecKey::Any => Some(u32::MAX),
        SpecKey::Spec(registered) => {
            if !registered.is_or_extends(query_provided) {
                return None;
            }
            let ancestors = registered.ancestors();
            ancestors.iter().position(|a| a == query_provided).map(|idx| idx as u32)
        }
    }
}

/// `lookup`/`lookup1`: the single most specific `name`-matching adapter.
pub(crate) fn best_adapter<'t, S: Spec, V>(
    trie: &'t Trie<S, litemap::LiteMap<SmolStr, V>>,
    required: &[S],
    provided: &S,
    name: &str,
) -> Option<&'t V> {
    let mut best: Option<(Tuple, &V)> = None;
    trie.for_each_match(required, |tuple, node| {
        for (key, bucket) in node.leaf.iter() {
            let Some(p_rank) = provided_rank(key, provided) else { continue };
            let Some(value) = bucket.get(name) else { continue };
            let mut full = tuple.clone();
            full.push(p_rank);
            if best.as_ref().is_none_or(|(winner, _)| full < *winner) {
                best = Some((full, value));
            }
        }
    });
    best.map(|(_, value)| value)
}

/// `lookup_all`: one winner per distinct name reachable from the query.
pub(crate) fn lookup_all<'t, S: Spec, V>(
    trie: &'t Trie<S, litemap::LiteMap<SmolStr, V>>,
    required: &[S],
    provided: &S,
) -> Vec<(SmolStr, &'t V)> {
    let mut best: HashMap<SmolStr, (Tuple, &V)> = HashMap::new();
    trie.for_each_match(required, |tuple, node| {
        for (key, bucket) in node.leaf.iter() {
            let Some(p_rank) = provided_rank(key, provided) else { continue };
            for (name, value) in bucket.iter() {
                let mut full = tuple.clone();
                full.push(p_rank);
                match best.entry(name.clone()) {
                    Entry::Occupied(mut existing) => {
                        if full < existing.get().0 {
                            existing.insert((full, value));
                        }
                    }
                    Entry::Vacant(empty) => {
                        empty.insert((full, value));
                    }
                }
            }
        }
    });
    best.into_iter().map(|(name, (_, value))| (name, value)).collect()
}

/// `subscriptions`: every matching entry, concatenated broad-to-narrow.
///
/// Unlike `best_adapter`, every reachable bucket contributes (not just the
/// most specific one), and ties are broken by insertion order, not dropped.
pub(crate) fn all_subscriptions<'t, S: Spec, W>(
    trie: &'t Trie<S, Vec<W>>,
    required: &[S],
    provided: &S,
) -> Vec<&'t W> {
    let mut entries: Vec<(Tuple, &W)> = Vec::new();
    trie.for_each_match(required, |tuple, node| {
        for (key, bucket) in node.leaf.iter() {
            let Some(p_rank) = provided_rank(key, provided) else { continue };
            for value in bucket {
                let mut full = tuple.clone();
                full.push(p_rank);
                entries.push((full, value));
            }
        }
    });
    entries.sort_by(|a, b| b.0.cmp(&a.0));
    entries.into_iter().map(|(_, value)| value).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trie::Trie;
    use registry_spec::iface::IfaceTable;

    struct Lattice {
        _table: IfaceTable,
        ir1: registry_spec::Iface,
        ir2: registry_spec::Iface,
        ip1: registry_spec::Iface,
        ip2: registry_spec::Iface,
    }

    fn build() -> Lattice {
        let mut table = IfaceTable::new();
        let ir1 = table.define("IR1", &[]).unwrap();
        let ir2 = table.define("IR2", &["IR1"]).unwrap();
        let ip1 = table.define("IP1", &[]).unwrap();
        let ip2 = table.define("IP2", &["IP1"]).unwrap();
        Lattice {
            _table: table,
            ir1,
            ir2,
            ip1,
            ip2,
        }
    }

    #[test]
    fn best_adapter_prefers_the_more_specific_required_registration() {
        let lat = build();
        let mut trie: Trie<registry_spec::Iface, litemap::LiteMap<SmolStr, &'static str>> = Trie::new();
        trie.ensure_leaf(&[SpecKey::Spec(lat.ir1.clone())])
            .entry(SpecKey::Spec(lat.ip1.clone()))
            .or_default()
            .insert(SmolStr::new(""), "broad");
        trie.ensure_leaf(&[SpecKey::Spec(lat.ir2.clone())])
            .entry(SpecKey::Spec(lat.ip1.clone()))
            .or_default()
            .insert(SmolStr::new(""), "narrow");
        let found = best_adapter(&trie, &[lat.ir2.clone()], &lat.ip1, "");
        assert_eq!(found, Some(&"narrow"));
    }

    #[test]
    fn subscriptions_order_broad_before_narrow_per_scenario_six() {
        let lat = build();
        let mut trie: Trie<registry_spec::Iface, Vec<&'static str>> = Trie::new();
        trie.ensure_leaf(&[SpecKey::Spec(lat.ir1.clone())])
            .entry(SpecKey::Spec(lat.ip2.clone()))
            .or_default()
            .push("a");
        trie.ensure_leaf(&[SpecKey::Spec(lat.ir1.clone())])
            .entry(SpecKey::Spec(lat.ip2.clone()))
            .or_default()
            .push("b");
        trie.ensure_leaf(&[SpecKey::Any])
            .entry(SpecKey::Spec(lat.ip1.clone()))
            .or_default()
            .push("c");
        trie.ensure_leaf(&[SpecKey::Spec(lat.ir2.clone())])
            .entry(SpecKey::Spec(lat.ip2.clone()))
            .or_default()
            .push("d");
        let found = all_subscriptions(&trie, &[lat.ir2.clone()], &lat.ip1);
        assert_eq!(found, vec![&"c", &"a", &"b", &"d"]);
    }

    #[test]
    fn best_adapter_follows_a_more_specific_provided_registration_down_to_a_broader_query() {
        // IP2 extends IP1. A component registered as providing IP2 also
        // provides IP1, so a query for the broader IP1 must still find it.
        let lat = build();
        let mut trie: Trie<registry_spec::Iface, litemap::LiteMap<SmolStr, i32>> = Trie::new();
        trie.ensure_leaf(&[SpecKey::Spec(lat.ir1.clone())])
            .entry(SpecKey::Spec(lat.ip2.clone()))
            .or_default()
            .insert(SmolStr::new(""), 12);
        assert_eq!(best_adapter(&trie, &[lat.ir1.clone()], &lat.ip1, ""), Some(&12));

        // An exact registration at the queried spec beats one that merely
        // extends it, even though IP2 is the more specific interface.
        trie.ensure_leaf(&[SpecKey::Spec(lat.ir1.clone())])
            .entry(SpecKey::Spec(lat.ip1.clone()))
            .or_default()
            .insert(SmolStr::new(""), 11);
        assert_eq!(best_adapter(&trie, &[lat.ir1.clone()], &lat.ip1, ""), Some(&11));
    }

    #[test]
    fn lookup_all_returns_one_winner_per_name() {
        let lat = build();
        let mut trie: Trie<registry_spec::Iface, litemap::LiteMap<SmolStr, &'static str>> = Trie::new();
        trie.ensure_leaf(&[SpecKey::Spec(lat.ir1.clone())])
            .entry(SpecKey::Spec(lat.ip1.clone()))
            .or_default()
            .insert(SmolStr::new("x"), "x-broad");
        trie.ensure_leaf(&[SpecKey::Spec(lat.ir2.clone())])
            .entry(SpecKey::Spec(lat.ip1.clone()))
            .or_default()
            .insert(SmolStr::new("x"), "x-narrow");
        trie.ensure_leaf(&[SpecKey::Spec(lat.ir2.clone())])
            .entry(SpecKey::Spec(lat.ip1.clone()))
            .or_default()
            .insert(SmolStr::new("y"), "y-only");
        let mut all = lookup_all(&trie, &[lat.ir2.clone()], &lat.ip1);
        all.sort_by(|a, b| a.0.cmp(&b.0));
        assert_eq!(all, vec![(SmolStr::new("x"), &"x-narrow"), (SmolStr::new("y"), &"y-only")]);
    }
}
