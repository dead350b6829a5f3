//! Handler/subscription walkthrough: register several handlers against an
//! event lattice and dispatch through `subscribers`, which calls every
//! matching handler and discards their results.
//!
//! Run with `cargo run --example event_handlers`.

use adapter_registry::{AnyArc, Factory, IfaceTable, SpecKey};
use anyhow::Result;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

struct CountingHandler {
    label: &'static str,
    calls: Arc<AtomicUsize>,
}

impl Factory for CountingHandler {
    fn build(&self, objects: &[AnyArc]) -> Option<AnyArc> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        let event = objects.first().and_then(|obj| obj.downcast_ref::<&'static str>());
        println!("[{}] observed event: {event:?}", self.label);
        None
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let mut table = IfaceTable::new();
    let event = table.define("IEvent", &[])?;
    let click_event = table.define("IClickEvent", &["IEvent"])?;

    let mut registry: adapter_registry::AdapterRegistry<_, (), Arc<dyn Factory>> = adapter_registry::AdapterRegistry::new();

    let audit_calls = Arc::new(AtomicUsize::new(0));
    let click_calls = Arc::new(AtomicUsize::new(0));

    // An audit handler for every event...
    registry.subscribe(
        &[SpecKey::Spec(event.clone())],
        SpecKey::Any,
        Arc::new(CountingHandler {
            label: "audit",
            calls: audit_calls.clone(),
        }),
    );
    // ...and one that only cares about clicks specifically.
    registry.subscribe(
        &[SpecKey::Spec(click_event.clone())],
        SpecKey::Any,
        Arc::new(CountingHandler {
            label: "click-only",
            calls: click_calls.clone(),
        }),
    );

    let payload: AnyArc = Arc::new("button#save clicked");
    let results = registry.subscribers(&[payload], &[click_event.clone()], &event);

    // Handlers' return values are discarded by convention; the Vec here is
    // just whatever each factory happened to return (nothing, in this demo).
    assert!(results.is_empty());
    assert_eq!(audit_calls.load(Ordering::Relaxed), 1);
    assert_eq!(click_calls.load(Ordering::Relaxed), 1);

    // A plain IEvent only reaches the broad audit handler.
    let plain_payload: AnyArc = Arc::new("window resized");
    registry.subscribers(&[plain_payload], &[event.clone()], &event);
    assert_eq!(audit_calls.load(Ordering::Relaxed), 2);
    assert_eq!(click_calls.load(Ordering::Relaxed), 1);

    println!("registry generation: {}", registry.generation());
    Ok(())
}
