use std::rc::Rc;

use api::fetch_collection;
use dioxus::prelude::*;
use store::{CacheEvent, Resource};

use crate::context::use_console;

/// Snapshot of a cached collection for rendering.
#[derive(Clone, Debug, PartialEq)]
pub struct Collection<R> {
    pub items: Vec<R>,
    /// True until the first successful read. A failed read stays loading.
    pub loading: bool,
}

/// Read `R`'s collection through the shared cache, refetching whenever the
/// entry is invalidated.
pub fn use_collection<R: Resource>() -> Collection<R> {
    use_optional_collection::<R>(true)
}

/// Like [`use_collection`], but reads nothing while `enabled` is false.
pub fn use_optional_collection<R: Resource>(enabled: bool) -> Collection<R> {
    let console = use_console();
    let revision = use_signal(|| 0u64);

    let cache = console.cache.clone();
    use_hook(move || {
        Rc::new(cache.subscribe(R::KIND, move |event| {
            if let CacheEvent::Invalidated(_) = event {
                let mut revision = revision;
                *revision.write() += 1;
            }
        }))
    });

    let items = use_resource(move || {
        let api = console.api.clone();
        let cache = console.cache.clone();
        let revision = revision();
        async move {
            if !enabled {
                return Ok(Vec::new());
            }
            tracing::debug!("reading {} (revision {revision})", R::KIND);
            fetch_collection::<R, _>(&api, &cache).await
        }
    });

    let snapshot = match &*items.read() {
        Some(Ok(items)) => Collection {
            items: items.clone(),
            loading: false,
        },
        _ => Collection {
            items: Vec::new(),
            loading: enabled,
        },
    };
    snapshot
}
