//! A small reference interface lattice implementing [`Spec`](crate::Spec).
//!
//! This is deliberately minimal: it exists so `adapter-registry`'s tests,
//! doctests, and `demos/` walkthrough have a concrete, pointer-identity
//! interface type to register against, not to be a production interface
//! system. Defining interfaces, their inheritance syntax, and "implemented
//! by" declarations for real types is out of scope for this workspace.

use crate::Spec;
use smallvec::SmallVec;
use smol_str::SmolStr;
use std::collections::HashMap;
use std::fmt::{self, Debug, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock};
use thiserror::Error;

struct IfaceInner {
    name: SmolStr,
    bases: Vec<Iface>,
}

/// A reference interface handle: a name plus its direct bases, most-specific
/// first. Identity is by pointer, so two `Iface`s compare equal iff they're
/// clones of the same declaration — structurally identical but separately
/// declared interfaces are deliberately distinct, matching how a real
/// interface system treats declarations as nominal, not structural.
#[derive(Clone)]
pub struct Iface(Arc<IfaceInner>);

impl Iface {
    /// Declare a new interface extending `bases` (most-specific first).
    pub fn new(name: impl Into<SmolStr>, bases: impl IntoIterator<Item = Iface>) -> Result<Self, IfaceError> {
        Ok(Self(Arc::new(IfaceInner {
            name: name.into(),
            bases: bases.into_iter().collect(),
        })))
    }

    /// The universal top spec every interface ultimately extends.
    ///
    /// Plays the role of `TOP`/`Interface` in the original design; treated
    /// interchangeably with `SpecKey::Any` by consumers that don't care
    /// about the distinction (see `registry-spec`'s crate docs).
    pub fn top() -> Self {
        static TOP: OnceLock<Iface> = OnceLock::new();
        TOP.get_or_init(|| {
            Iface(Arc::new(IfaceInner {
                name: SmolStr::new_static("Interface"),
                bases: Vec::new(),
            }))
        })
        .clone()
    }

    /// The name this interface was declared with.
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// The direct bases this interface was declared with, most-specific
    /// first. Does not include transitive bases or [`top`](Self::top) — use
    /// [`Spec::ancestors`] for the full chain.
    pub fn bases(&self) -> &[Iface] {
        &self.0.bases
    }
}

impl PartialEq for Iface {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}
impl Eq for Iface {}
impl Hash for Iface {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Arc::as_ptr(&self.0) as *const () as usize).hash(state);
    }
}
impl Debug for Iface {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Iface({})", self.0.name)
    }
}
impl Display for Iface {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0.name, f)
    }
}

impl Spec for Iface {
    fn ancestors(&self) -> SmallVec<[Self; 4]> {
        let mut seen: SmallVec<[Self; 4]> = SmallVec::new();
        visit(self, &mut seen);
        let top = Iface::top();
        if !seen.contains(&top) {
            seen.push(top);
        }
        seen
    }
}

/// Depth-first, duplicate-suppressing walk used to linearise an interface's
/// ancestors. Bases are visited in declaration order, so a diamond's shared
/// grandparent surfaces once, at the position of its first occurrence.
fn visit(iface: &Iface, seen: &mut SmallVec<[Iface; 4]>) {
    if seen.contains(iface) {
        return;
    }
    seen.push(iface.clone());
    for base in iface.bases() {
        visit(base, seen);
    }
}

/// Error building an [`Iface`] lattice through [`IfaceTable`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IfaceError {
    /// A declaration named a base that hasn't been defined (yet) in the
    /// table. Interfaces must be declared in dependency order.
    #[error("interface {0:?} has no prior declaration in this table")]
    UnknownBase(SmolStr),
    /// A declaration reused a name already present in the table.
    #[error("interface {0:?} is already declared in this table")]
    DuplicateName(SmolStr),
}

/// A small data-driven way to build an [`Iface`] lattice from
/// `(name, base_names)` pairs, for demos and fixtures.
///
/// Real hosts declare interfaces through their own syntax ([`Iface`] exists
/// to make this crate's tests self-contained); `IfaceTable` is the
/// equivalent for this reference implementation.
#[derive(Debug, Default)]
pub struct IfaceTable {
    by_name: HashMap<SmolStr, Iface>,
}

impl IfaceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `name` extending the already-declared interfaces named in
    /// `base_names`. Returns the new interface's handle.
    pub fn define(&mut self, name: &str, base_names: &[&str]) -> Result<Iface, IfaceError> {
        if self.by_name.contains_key(name) {
            return Err(IfaceError::DuplicateName(name.into()));
        }
        let mut bases = Vec::with_capacity(base_names.len());
        for base_name in base_names {
            let base = self
                .by_name
                .get(*base_name)
                .cloned()
                .ok_or_else(|| IfaceError::UnknownBase((*base_name).into()))?;
            bases.push(base);
        }
        let iface = Iface::new(name, bases)?;
        self.by_name.insert(name.into(), iface.clone());
        Ok(iface)
    }

    /// Look up a previously defined interface by name.
    pub fn get(&self, name: &str) -> Option<&Iface> {
        self.by_name.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_rejects_unknown_base() {
        let mut table = IfaceTable::new();
        let err = table.define("IChild", &["IMissing"]).unwrap_err();
        assert_eq!(err, IfaceError::UnknownBase("IMissing".into()));
    }

    #[test]
    fn table_rejects_duplicate_names() {
        let mut table = IfaceTable::new();
        table.define("IFoo", &[]).unwrap();
        let err = table.define("IFoo", &[]).unwrap_err();
        assert_eq!(err, IfaceError::DuplicateName("IFoo".into()));
    }

    #[test]
    fn table_builds_a_multi_level_lattice() {
        let mut table = IfaceTable::new();
        table.define("IR1", &[]).unwrap();
        table.define("IR2", &["IR1"]).unwrap();
        let r2 = table.get("IR2").unwrap();
        let r1 = table.get("IR1").unwrap();
        assert!(r2.is_or_extends(r1));
        assert!(!r1.is_or_extends(r2));
    }
}
