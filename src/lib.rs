//! A lattice-aware adapter and subscription registry, modelled on a
//! component architecture's `Components` object: looks up a registered value
//! by the combination of what an object *requires* and what it *provides*,
//! ranking matches by how specific each side is.
//!
//! The registry itself is generic over an abstract [`Spec`](registry_spec::Spec):
//! it never constructs or interprets an interface lattice, only walks the
//! ancestor chains a host type system hands it. `registry-spec` supplies
//! that contract plus a small reference lattice (`Iface`) for tests and the
//! `demos/` walkthroughs.
//!
//! Two registration kinds are supported:
//! - **Adapters** (`register`/`unregister`/`lookup*`): one named value per
//!   `(required, provided, name)` key; lookup picks the single most specific
//!   match.
//! - **Subscriptions** (`subscribe`/`unsubscribe*`/`subscriptions`): many
//!   unnamed values per `(required, provided)` key; queries return every
//!   match, broadest first. A subscription registered with
//!   `provided = SpecKey::Any` is a *handler*, invoked for side effect only.
//!
//! Mutating methods take `&mut self`; reading methods take `&self` and
//! return data borrowed from the registry. That split is the whole
//! concurrency story: a caller wanting concurrent mutation wraps the
//! registry in its own `RwLock`.

mod factory;
mod query;
mod registry;
mod trie;

pub use factory::{AnyArc, Factory};
pub use registry::AdapterRegistry;
pub use registry_spec::{Iface, IfaceError, IfaceTable, Spec, SpecKey};
