//! Type-erased adaptation helpers: `query_adapter`, `query_multi_adapter`,
//! `adapter_hook`, and `subscribers`. These operate only on registries whose
//! value type implements [`Factory`]; the trie and query engine themselves
//! never inspect a value beyond equality (for `unsubscribe`).

use registry_spec::Spec;
use std::any::Any;
use std::sync::Arc;

/// A type-erased, shareable handle: the currency `Factory` trades in so the
/// registry core never needs to know concrete adapter or adaptee types.
pub type AnyArc = Arc<dyn Any + Send + Sync>;

/// A registered value that can build an adapter from a sequence of objects.
///
/// `build` returning `None` means "not applicable to these objects" (see
/// `DESIGN.md`): for [`AdapterRegistry::query_adapter`] and
/// [`AdapterRegistry::query_multi_adapter`] this falls back to the caller's
/// `default`; for [`AdapterRegistry::subscribers`] the entry is silently
/// skipped. A `Factory` that needs fallible construction should bake that
/// into its own return convention rather than panicking.
///
/// [`AdapterRegistry::query_adapter`]: crate::AdapterRegistry::query_adapter
/// [`AdapterRegistry::query_multi_adapter`]: crate::AdapterRegistry::query_multi_adapter
/// [`AdapterRegistry::subscribers`]: crate::AdapterRegistry::subscribers
pub trait Factory: Send + Sync {
    fn build(&self, objects: &[AnyArc]) -> Option<AnyArc>;
}

impl<F: Factory + ?Sized> Factory for Arc<F> {
    fn build(&self, objects: &[AnyArc]) -> Option<AnyArc> {
        (**self).build(objects)
    }
}

impl<S, V, W> crate::AdapterRegistry<S, V, W>
where
    S: Spec,
    V: Factory,
{
    /// Adapt a single `obj` (known to provide `obj_spec`) to `provided`,
    /// under `name`. Falls back to `default` if no adapter is registered or
    /// the winning factory declines (`build` returns `None`).
    pub fn query_adapter(
        &self,
        obj: AnyArc,
        obj_spec: &S,
        provided: &S,
        name: &str,
        default: Option<AnyArc>,
    ) -> Option<AnyArc> {
        match self.lookup(std::slice::from_ref(obj_spec), provided, name, None) {
            Some(factory) => factory.build(std::slice::from_ref(&obj)).or_else(|| {
                tracing::trace!(factory = %disqualified::ShortName::of::<V>(), name, "factory declined, falling back to default");
                default
            }),
            None => default,
        }
    }

    /// `query_adapter` generalised to multiple objects, each with its own
    /// required spec at the matching position.
    pub fn query_multi_adapter(
        &self,
        objs: &[AnyArc],
        obj_specs: &[S],
        provided: &S,
        name: &str,
        default: Option<AnyArc>,
    ) -> Option<AnyArc> {
        match self.lookup(obj_specs, provided, name, None) {
            Some(factory) => factory.build(objs).or(default),
            None => default,
        }
    }

    /// `query_adapter` with its arguments reordered to put `provided` first,
    /// the shape a host's single global adaptation entry point usually
    /// wants (`adapter_hook(IWhatIWant, obj, ...)` reads like a cast).
    pub fn adapter_hook(&self, provided: &S, obj: AnyArc, obj_spec: &S, name: &str, default: Option<AnyArc>) -> Option<AnyArc> {
        self.query_adapter(obj, obj_spec, provided, name, default)
    }
}

impl<S, V, W> crate::AdapterRegistry<S, V, W>
where
    S: Spec,
    W: Factory,
{
    /// Call every subscriber/handler reachable from the query with `objects`,
    /// collecting the `Some` results in broad-to-narrow order. For handlers
    /// (subscriptions registered with `provided = SpecKey::Any`) the return
    /// value is meaningless and callers invoke this purely for side effect.
    pub fn subscribers(&self, objects: &[AnyArc], specs: &[S], provided: &S) -> Vec<AnyArc> {
        self.subscriptions(specs, provided)
            .into_iter()
            .filter_map(|factory| factory.build(objects))
            .collect()
    }
}
