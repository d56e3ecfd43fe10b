//! # Resource cache — one collection per REST resource
//!
//! [`ResourceCache`] holds the last fetched collection for each
//! [`ResourceKind`]. It is an explicit object: the app creates one and hands it
//! to every screen, and tests create their own.
//!
//! ## Lifecycle of an entry
//!
//! 1. A screen mounts and asks for a kind. If the entry is missing or stale,
//!    the reader calls [`begin_fetch`](ResourceCache::begin_fetch), performs the
//!    network call, and hands the result back through
//!    [`complete_fetch`](ResourceCache::complete_fetch).
//! 2. A mutation succeeds and calls [`invalidate`](ResourceCache::invalidate).
//!    The entry is marked stale, its generation advances, and subscribers are
//!    told so they can refetch.
//! 3. A fetch that began before an invalidation completes after it: its
//!    ticket carries the old generation, so the result is dropped and the
//!    newer fetch wins.
//!
//! Items are replaced wholesale on every completed fetch; nothing patches an
//! entry in place.
//!
//! ## Threading
//!
//! The console runs on a single UI thread, so state lives in `Rc<RefCell<_>>`.
//! Listeners are called after the interior borrow is released, which lets a
//! listener read from or invalidate the cache itself.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

use serde_json::Value;

use crate::models::RecordId;
use crate::resource::{Resource, ResourceKind};

/// What happened to an entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CacheEvent {
    Invalidated(ResourceKind),
    Refreshed(ResourceKind),
}

impl CacheEvent {
    pub fn kind(&self) -> ResourceKind {
        match self {
            CacheEvent::Invalidated(kind) | CacheEvent::Refreshed(kind) => *kind,
        }
    }
}

/// Proof that a fetch was started at a given generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FetchTicket {
    pub kind: ResourceKind,
    generation: u64,
}

#[derive(Default)]
struct Entry {
    items: Option<Rc<Vec<Value>>>,
    stale: bool,
    loading: bool,
    generation: u64,
}

type Listener = Rc<dyn Fn(&CacheEvent)>;

#[derive(Default)]
struct Inner {
    entries: HashMap<ResourceKind, Entry>,
    listeners: Vec<(u64, ResourceKind, Listener)>,
    next_listener: u64,
}

/// Client-side cache keyed by resource kind.
#[derive(Clone, Default)]
pub struct ResourceCache {
    inner: Rc<RefCell<Inner>>,
    /// Listeners whose [`Subscription`] dropped while `inner` was borrowed.
    dropped: Rc<RefCell<Vec<u64>>>,
}

impl fmt::Debug for ResourceCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        let mut kinds: Vec<_> = inner.entries.keys().collect();
        kinds.sort();
        f.debug_struct("ResourceCache")
            .field("entries", &kinds)
            .field("listeners", &inner.listeners.len())
            .finish()
    }
}

impl ResourceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached items for a kind, stale or not.
    pub fn get(&self, kind: ResourceKind) -> Option<Rc<Vec<Value>>> {
        self.inner
            .borrow()
            .entries
            .get(&kind)
            .and_then(|entry| entry.items.clone())
    }

    /// The cached collection decoded as `R`, or `None` if nothing is cached.
    /// Items that do not decode are left out.
    pub fn get_as<R: Resource>(&self) -> Option<Vec<R>> {
        let items = self.get(R::KIND)?;
        let decoded = items
            .iter()
            .filter_map(|item| match serde_json::from_value(item.clone()) {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::warn!("skipping undecodable cached {} item: {e}", R::KIND);
                    None
                }
            })
            .collect();
        Some(decoded)
    }

    /// The raw cached item whose `id` matches, stale or not.
    pub fn find(&self, kind: ResourceKind, id: &RecordId) -> Option<Value> {
        let items = self.get(kind)?;
        items
            .iter()
            .find(|item| {
                item.get("id")
                    .and_then(|raw| serde_json::from_value::<RecordId>(raw.clone()).ok())
                    .is_some_and(|item_id| &item_id == id)
            })
            .cloned()
    }

    /// Items present and not invalidated since they were fetched.
    pub fn is_fresh(&self, kind: ResourceKind) -> bool {
        self.inner
            .borrow()
            .entries
            .get(&kind)
            .is_some_and(|entry| entry.items.is_some() && !entry.stale)
    }

    /// A fetch for the current generation is outstanding.
    pub fn is_loading(&self, kind: ResourceKind) -> bool {
        self.inner
            .borrow()
            .entries
            .get(&kind)
            .is_some_and(|entry| entry.loading)
    }

    pub fn begin_fetch(&self, kind: ResourceKind) -> FetchTicket {
        let mut inner = self.inner.borrow_mut();
        let entry = inner.entries.entry(kind).or_default();
        entry.loading = true;
        tracing::debug!("fetching {kind} (generation {})", entry.generation);
        FetchTicket {
            kind,
            generation: entry.generation,
        }
    }

    /// Store a fetched collection. Returns `false` when the ticket was
    /// overtaken by an invalidation and the items were dropped.
    pub fn complete_fetch(&self, ticket: FetchTicket, items: Vec<Value>) -> bool {
        {
            let mut inner = self.inner.borrow_mut();
            let entry = inner.entries.entry(ticket.kind).or_default();
            if entry.generation != ticket.generation {
                tracing::debug!("dropping outdated {} fetch", ticket.kind);
                return false;
            }
            entry.items = Some(Rc::new(items));
            entry.stale = false;
            entry.loading = false;
        }
        self.notify(CacheEvent::Refreshed(ticket.kind));
        true
    }

    /// Record that a fetch failed. Existing items, if any, are kept.
    pub fn fail_fetch(&self, ticket: FetchTicket) {
        let mut inner = self.inner.borrow_mut();
        if let Some(entry) = inner.entries.get_mut(&ticket.kind) {
            if entry.generation == ticket.generation {
                entry.loading = false;
            }
        }
    }

    /// Mark a kind stale so the next read refetches.
    pub fn invalidate(&self, kind: ResourceKind) {
        {
            let mut inner = self.inner.borrow_mut();
            let entry = inner.entries.entry(kind).or_default();
            entry.stale = true;
            entry.loading = false;
            entry.generation += 1;
        }
        tracing::debug!("invalidated {kind}");
        self.notify(CacheEvent::Invalidated(kind));
    }

    /// Register a listener for one kind. Dropping the returned
    /// [`Subscription`] removes it.
    pub fn subscribe(
        &self,
        kind: ResourceKind,
        listener: impl Fn(&CacheEvent) + 'static,
    ) -> Subscription {
        self.prune_listeners();
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_listener;
        inner.next_listener += 1;
        inner.listeners.push((id, kind, Rc::new(listener)));
        Subscription {
            id,
            cache: Rc::downgrade(&self.inner),
            dropped: Rc::downgrade(&self.dropped),
        }
    }

    /// Remove listeners whose unsubscribe had to be deferred.
    fn prune_listeners(&self) {
        let dropped = std::mem::take(&mut *self.dropped.borrow_mut());
        if !dropped.is_empty() {
            self.inner
                .borrow_mut()
                .listeners
                .retain(|(id, _, _)| !dropped.contains(id));
        }
    }

    fn notify(&self, event: CacheEvent) {
        self.prune_listeners();
        let listeners: Vec<Listener> = self
            .inner
            .borrow()
            .listeners
            .iter()
            .filter(|(_, kind, _)| *kind == event.kind())
            .map(|(_, _, listener)| listener.clone())
            .collect();
        for listener in listeners {
            listener(&event);
        }
    }
}

/// Handle returned by [`ResourceCache::subscribe`].
pub struct Subscription {
    id: u64,
    cache: Weak<RefCell<Inner>>,
    dropped: Weak<RefCell<Vec<u64>>>,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let Some(inner) = self.cache.upgrade() else {
            return;
        };
        if let Ok(mut inner) = inner.try_borrow_mut() {
            inner.listeners.retain(|(id, _, _)| *id != self.id);
            return;
        }
        // The cache is mid-borrow; the next notify or subscribe removes it.
        tracing::debug!("deferring removal of cache listener {}", self.id);
        if let Some(dropped) = self.dropped.upgrade() {
            dropped.borrow_mut().push(self.id);
        }
    }
}
