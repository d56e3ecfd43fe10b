use store::{Resource, ResourceCache};

use crate::client::{decode_all, ResourceApi};
use crate::error::ApiError;

/// Read a collection through the cache.
///
/// Served from the cache when the entry is fresh; otherwise listed from the
/// backend and stored. A failed read leaves whatever was cached in place.
pub async fn fetch_collection<R, C>(api: &C, cache: &ResourceCache) -> Result<Vec<R>, ApiError>
where
    R: Resource,
    C: ResourceApi,
{
    if cache.is_fresh(R::KIND) {
        if let Some(items) = cache.get_as::<R>() {
            return Ok(items);
        }
    }

    let ticket = cache.begin_fetch(R::KIND);
    let items = match api.list_raw(R::KIND).await {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!("failed to load {}: {e}", R::KIND);
            cache.fail_fetch(ticket);
            return Err(e);
        }
    };
    let decoded = decode_all::<R>(items.clone());
    cache.complete_fetch(ticket, items);
    Ok(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemoryBackend, Method};
    use serde_json::json;
    use store::{Lead, ResourceKind};

    #[tokio::test]
    async fn test_second_read_is_served_from_cache() {
        let backend = MemoryBackend::new();
        backend.seed(ResourceKind::Leads, json!({ "name": "Alice" }));
        let cache = ResourceCache::new();

        let first: Vec<Lead> = fetch_collection(&backend, &cache).await.unwrap();
        let second: Vec<Lead> = fetch_collection(&backend, &cache).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(backend.calls_to(Method::List).len(), 1);
    }

    #[tokio::test]
    async fn test_invalidation_forces_refetch() {
        let backend = MemoryBackend::new();
        let cache = ResourceCache::new();
        let empty: Vec<Lead> = fetch_collection(&backend, &cache).await.unwrap();
        assert!(empty.is_empty());

        backend.seed(ResourceKind::Leads, json!({ "name": "Alice" }));
        cache.invalidate(ResourceKind::Leads);

        let leads: Vec<Lead> = fetch_collection(&backend, &cache).await.unwrap();
        assert_eq!(leads.len(), 1);
        assert_eq!(backend.calls_to(Method::List).len(), 2);
    }

    #[tokio::test]
    async fn test_failed_read_keeps_previous_items() {
        let backend = MemoryBackend::new();
        backend.seed(ResourceKind::Leads, json!({ "name": "Alice" }));
        let cache = ResourceCache::new();
        let _: Vec<Lead> = fetch_collection(&backend, &cache).await.unwrap();

        cache.invalidate(ResourceKind::Leads);
        backend.fail_next(ApiError::Transport("offline".into()));
        let err = fetch_collection::<Lead, _>(&backend, &cache).await.unwrap_err();

        assert_eq!(err, ApiError::Transport("offline".into()));
        assert!(!cache.is_loading(ResourceKind::Leads));
        assert_eq!(cache.get(ResourceKind::Leads).unwrap().len(), 1);
    }
}
