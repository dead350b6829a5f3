//! Abstract interface-specification contract consumed by `adapter-registry`.
//!
//! This crate owns none of the interesting behaviour — it just fixes the
//! shape an adapter registry needs from a host type system's interface
//! model: stable identity, an authoritative ancestor chain, and an "any"
//! wildcard for registration keys. A small reference lattice ([`Iface`]) is
//! included so the registry core and its demos are testable without a real
//! host type system.

use std::fmt::{self, Debug, Formatter};

pub mod iface;

pub use iface::{Iface, IfaceError, IfaceTable};

/// An abstract interface specification.
///
/// Implementations are expected to be cheap to clone (most real interface
/// systems hand out interned handles or reference-counted descriptors) and
/// to compare by identity rather than structural equality.
///
/// The registry never constructs a `Spec` value and never re-derives or
/// re-sorts [`ancestors`](Self::ancestors) — that ordering is authoritative.
pub trait Spec: Clone + Eq + std::hash::Hash {
    /// Ordered ancestors of `self`: `self` first, most-general last. Must
    /// never be empty (an interface is always its own first ancestor).
    fn ancestors(&self) -> smallvec::SmallVec<[Self; 4]>;

    /// True iff `self` equals `other` or transitively extends it.
    ///
    /// The default implementation is correct for any lawful [`ancestors`]
    /// but implementations with a cheaper identity check (e.g. a bitset of
    /// ancestor ids) are welcome to override it.
    ///
    /// [`ancestors`]: Self::ancestors
    fn is_or_extends(&self, other: &Self) -> bool {
        self.ancestors().iter().any(|a| a == other)
    }
}

/// The union of a concrete spec and the "any" wildcard.
///
/// This is the `NULL_SPEC` sentinel from the original adapter-registry
/// design, given its own variant instead of overloading `Option::None` (or a
/// null object of type `S`) so it can't be confused with "no key supplied"
/// at a registration call site.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecKey<S> {
    /// Matches any query spec at this position; ranks least-specific.
    Any,
    /// A concrete, registered spec.
    Spec(S),
}

impl<S: Debug> Debug for SpecKey<S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("Any"),
            Self::Spec(s) => Debug::fmt(s, f),
        }
    }
}

impl<S> From<S> for SpecKey<S> {
    fn from(value: S) -> Self {
        Self::Spec(value)
    }
}

impl<S> SpecKey<S> {
    /// Borrow the concrete spec, if this isn't [`SpecKey::Any`].
    #[inline]
    pub const fn as_spec(&self) -> Option<&S> {
        match self {
            Self::Any => None,
            Self::Spec(s) => Some(s),
        }
    }

    #[inline]
    pub const fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::iface::Iface;

    #[test]
    fn top_is_its_own_ancestor_chain_terminator() {
        let top = Iface::top();
        let ancestors = top.ancestors();
        assert_eq!(ancestors.len(), 1);
        assert_eq!(ancestors[0], top);
    }

    #[test]
    fn ancestors_includes_self_first_and_top_last() {
        let base = Iface::new("IBase", []).unwrap();
        let child = Iface::new("IChild", [base.clone()]).unwrap();
        let ancestors = child.ancestors();
        assert_eq!(ancestors[0], child);
        assert_eq!(*ancestors.last().unwrap(), Iface::top());
        assert!(ancestors.contains(&base));
    }

    #[test]
    fn is_or_extends_is_reflexive_and_transitive() {
        let a = Iface::new("IA", []).unwrap();
        let b = Iface::new("IB", [a.clone()]).unwrap();
        let c = Iface::new("IC", [b.clone()]).unwrap();
        assert!(c.is_or_extends(&c));
        assert!(c.is_or_extends(&b));
        assert!(c.is_or_extends(&a));
        assert!(!a.is_or_extends(&c));
    }

    #[test]
    fn diamond_inheritance_deduplicates_ancestors() {
        let top_ish = Iface::new("IRoot", []).unwrap();
        let left = Iface::new("ILeft", [top_ish.clone()]).unwrap();
        let right = Iface::new("IRight", [top_ish.clone()]).unwrap();
        let diamond = Iface::new("IDiamond", [left.clone(), right.clone()]).unwrap();
        let ancestors = diamond.ancestors();
        let root_count = ancestors.iter().filter(|a| **a == top_ish).count();
        assert_eq!(root_count, 1, "diamond bases must only list shared ancestors once");
    }

    #[test]
    fn spec_key_any_roundtrips_and_distinguishes_from_spec() {
        let iface = Iface::new("IFoo", []).unwrap();
        let key: SpecKey<Iface> = iface.clone().into();
        assert!(!key.is_any());
        assert_eq!(key.as_spec(), Some(&iface));
        let any: SpecKey<Iface> = SpecKey::Any;
        assert!(any.is_any());
        assert_eq!(any.as_spec(), None);
    }
}
