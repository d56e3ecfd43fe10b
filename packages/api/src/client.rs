//! # Resource client seam
//!
//! [`ResourceApi`] is the async interface every screen talks to. It is
//! deliberately untyped: five methods over a [`ResourceKind`] and raw JSON,
//! mirroring the REST table one-to-one. Implementations live in sibling
//! modules ([`crate::rest`] for the real backend, [`crate::memory`] for tests).
//!
//! [`ResourceClient`] layers the typed per-resource view on top, obtained via
//! [`ResourceApi::resource`]:
//!
//! ```ignore
//! let leads: Vec<Lead> = api.resource::<Lead>().list().await?;
//! ```

use std::future::Future;
use std::marker::PhantomData;

use serde::Serialize;
use serde_json::Value;
use store::{RecordId, Resource, ResourceKind};

use crate::error::ApiError;

/// Async access to the REST collections.
pub trait ResourceApi {
    /// `GET /{kind}` — the whole collection, unwrapped from its envelope.
    fn list_raw(
        &self,
        kind: ResourceKind,
    ) -> impl Future<Output = Result<Vec<Value>, ApiError>>;

    /// `GET /{kind}/{id}`
    fn get_raw(
        &self,
        kind: ResourceKind,
        id: &RecordId,
    ) -> impl Future<Output = Result<Value, ApiError>>;

    /// `POST /{kind}` — `body` is the full record minus its id.
    fn create_raw(
        &self,
        kind: ResourceKind,
        body: Value,
    ) -> impl Future<Output = Result<Value, ApiError>>;

    /// `PUT /{kind}/{id}` — full or partial record.
    fn update_raw(
        &self,
        kind: ResourceKind,
        id: &RecordId,
        body: Value,
    ) -> impl Future<Output = Result<Value, ApiError>>;

    /// `DELETE /{kind}/{id}`
    fn delete(
        &self,
        kind: ResourceKind,
        id: &RecordId,
    ) -> impl Future<Output = Result<(), ApiError>>;

    /// Typed accessor for one resource.
    fn resource<R: Resource>(&self) -> ResourceClient<'_, Self, R>
    where
        Self: Sized,
    {
        ResourceClient {
            api: self,
            _resource: PhantomData,
        }
    }
}

/// Typed view of a [`ResourceApi`] for a single resource.
pub struct ResourceClient<'a, C, R> {
    api: &'a C,
    _resource: PhantomData<R>,
}

impl<C: ResourceApi, R: Resource> ResourceClient<'_, C, R> {
    pub async fn list(&self) -> Result<Vec<R>, ApiError> {
        let items = self.api.list_raw(R::KIND).await?;
        Ok(decode_all(items))
    }

    pub async fn get(&self, id: &RecordId) -> Result<R, ApiError> {
        let item = self.api.get_raw(R::KIND, id).await?;
        Ok(serde_json::from_value(item)?)
    }

    pub async fn create<B: Serialize>(&self, body: &B) -> Result<R, ApiError> {
        let item = self.api.create_raw(R::KIND, serde_json::to_value(body)?).await?;
        Ok(serde_json::from_value(item)?)
    }

    pub async fn update<B: Serialize>(&self, id: &RecordId, body: &B) -> Result<R, ApiError> {
        let item = self
            .api
            .update_raw(R::KIND, id, serde_json::to_value(body)?)
            .await?;
        Ok(serde_json::from_value(item)?)
    }

    pub async fn delete(&self, id: &RecordId) -> Result<(), ApiError> {
        self.api.delete(R::KIND, id).await
    }
}

/// Decode a raw collection. Items that do not decode as `R` are skipped
/// with a warning; the rest of the collection still loads.
pub fn decode_all<R: Resource>(items: Vec<Value>) -> Vec<R> {
    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!("skipping undecodable {} item: {e}", R::KIND);
                None
            }
        })
        .collect()
}

/// Strip a `{ "data": ... }` envelope if the body has one.
pub(crate) fn unwrap_envelope(body: Value) -> Value {
    match body {
        Value::Object(mut map) if map.len() == 1 && map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use store::Contract;

    #[test]
    fn test_unwrap_envelope() {
        assert_eq!(unwrap_envelope(json!({ "data": [1, 2] })), json!([1, 2]));
        assert_eq!(unwrap_envelope(json!({ "id": 1 })), json!({ "id": 1 }));
        assert_eq!(
            unwrap_envelope(json!({ "data": 1, "meta": 2 })),
            json!({ "data": 1, "meta": 2 })
        );
        assert_eq!(unwrap_envelope(Value::Null), Value::Null);
    }

    #[test]
    fn test_decode_all_skips_bad_items() {
        let contracts: Vec<Contract> = decode_all(vec![
            json!({ "id": 1, "name": "C1", "status": "DRAFT" }),
            json!({ "id": 2, "name": "C2", "status": "ARCHIVED" }),
            json!("not a record"),
        ]);
        assert_eq!(contracts.len(), 1);
        assert_eq!(contracts[0].name, "C1");
    }
}
