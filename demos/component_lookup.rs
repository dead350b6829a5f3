//! Adapter lookup walkthrough: build a small interface lattice, register
//! adapters at varying specificity and under different names, then show how
//! `lookup`/`lookup1`/`lookup_all` pick among them.
//!
//! Run with `cargo run --example component_lookup`.

use adapter_registry::{AdapterRegistry, IfaceTable, SpecKey};
use anyhow::{Context, Result};

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    // IWidget <- IButton <- IToggleButton, plus an unrelated IRenderable.
    let mut table = IfaceTable::new();
    let renderable = table.define("IRenderable", &[])?;
    let widget = table.define("IWidget", &["IRenderable"])?;
    let button = table.define("IButton", &["IWidget"])?;
    let toggle_button = table.define("IToggleButton", &["IButton"])?;

    let mut registry: AdapterRegistry<_, &'static str> = AdapterRegistry::new();

    // A broad adapter for anything renderable...
    registry.register(
        &[SpecKey::Spec(renderable.clone())],
        SpecKey::Spec(renderable.clone()),
        "",
        "generic renderer",
    );
    // ...and a more specific one that only applies to buttons.
    registry.register(
        &[SpecKey::Spec(button.clone())],
        SpecKey::Spec(renderable.clone()),
        "",
        "button renderer",
    );
    // A named variant, registered only under "compact".
    registry.register(
        &[SpecKey::Spec(button.clone())],
        SpecKey::Spec(renderable.clone()),
        "compact",
        "compact button renderer",
    );

    let winner = registry
        .lookup1(&toggle_button, &renderable, "", None)
        .context("expected a renderer for IToggleButton")?;
    println!("default renderer for a toggle button: {winner}");
    assert_eq!(*winner, "button renderer");

    let compact = registry.lookup1(&toggle_button, &renderable, "compact", None);
    println!("compact renderer: {compact:?}");
    assert_eq!(compact, Some(&"compact button renderer"));

    let mut all = registry.lookup_all(&[toggle_button.clone()], &renderable);
    all.sort_by(|a, b| a.0.cmp(&b.0));
    println!("every name registered for a toggle button:");
    for (name, value) in &all {
        println!("  {name:?} -> {value}");
    }

    // `widget` never had its own registration, so it falls back through its
    // single ancestor, IRenderable.
    let fallback = registry
        .lookup1(&widget, &renderable, "", None)
        .context("expected the generic renderer to apply to IWidget")?;
    assert_eq!(*fallback, "generic renderer");
    println!("generation after three registrations: {}", registry.generation());

    Ok(())
}
