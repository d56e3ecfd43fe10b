use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use serde_json::{Map, Value};
use store::{RecordId, ResourceKind};

use crate::client::ResourceApi;
use crate::error::ApiError;

/// Which [`ResourceApi`] method a [`Call`] went through.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    List,
    Get,
    Create,
    Update,
    Delete,
}

/// One request as seen by the [`MemoryBackend`].
#[derive(Clone, Debug, PartialEq)]
pub struct Call {
    pub method: Method,
    pub kind: ResourceKind,
    pub id: Option<RecordId>,
    pub body: Option<Value>,
}

#[derive(Default)]
struct State {
    tables: HashMap<ResourceKind, BTreeMap<i64, Map<String, Value>>>,
    next_id: i64,
    calls: Vec<Call>,
    fail_next: Option<ApiError>,
}

/// In-memory backend for tests and offline demos.
///
/// Behaves like the REST backend: integer ids are assigned on create, PUT
/// bodies are merged key by key into the stored record (so a partial user
/// update keeps the old password), and `password` is never echoed back.
#[derive(Clone, Default)]
pub struct MemoryBackend {
    state: Rc<RefCell<State>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record directly, bypassing the call log. Returns its id.
    pub fn seed(&self, kind: ResourceKind, record: Value) -> RecordId {
        let mut state = self.state.borrow_mut();
        state.next_id += 1;
        let id = state.next_id;
        let mut object = match record {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        object.insert("id".to_string(), Value::from(id));
        state.tables.entry(kind).or_default().insert(id, object);
        RecordId::Int(id)
    }

    /// Stored records exactly as held, including write-only fields.
    pub fn records(&self, kind: ResourceKind) -> Vec<Value> {
        self.state
            .borrow()
            .tables
            .get(&kind)
            .map(|table| table.values().cloned().map(Value::Object).collect())
            .unwrap_or_default()
    }

    /// Every call made so far, oldest first.
    pub fn calls(&self) -> Vec<Call> {
        self.state.borrow().calls.clone()
    }

    /// Calls made so far for one method.
    pub fn calls_to(&self, method: Method) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|call| call.method == method)
            .collect()
    }

    pub fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }

    /// Make the next call, whatever it is, fail with `error`.
    pub fn fail_next(&self, error: ApiError) {
        self.state.borrow_mut().fail_next = Some(error);
    }

    fn record_call(
        &self,
        method: Method,
        kind: ResourceKind,
        id: Option<&RecordId>,
        body: Option<&Value>,
    ) -> Result<(), ApiError> {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call {
            method,
            kind,
            id: id.cloned(),
            body: body.cloned(),
        });
        match state.fail_next.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

fn key(kind: ResourceKind, id: &RecordId) -> Result<i64, ApiError> {
    match id {
        RecordId::Int(n) => Ok(*n),
        RecordId::Text(_) => Err(ApiError::not_found(format!("{} {id}", kind.noun()))),
    }
}

fn public_view(record: &Map<String, Value>) -> Value {
    let mut record = record.clone();
    record.remove("password");
    Value::Object(record)
}

impl ResourceApi for MemoryBackend {
    async fn list_raw(&self, kind: ResourceKind) -> Result<Vec<Value>, ApiError> {
        self.record_call(Method::List, kind, None, None)?;
        let state = self.state.borrow();
        Ok(state
            .tables
            .get(&kind)
            .map(|table| table.values().map(public_view).collect())
            .unwrap_or_default())
    }

    async fn get_raw(&self, kind: ResourceKind, id: &RecordId) -> Result<Value, ApiError> {
        self.record_call(Method::Get, kind, Some(id), None)?;
        let key = key(kind, id)?;
        let state = self.state.borrow();
        state
            .tables
            .get(&kind)
            .and_then(|table| table.get(&key))
            .map(public_view)
            .ok_or_else(|| ApiError::not_found(format!("{} {id}", kind.noun())))
    }

    async fn create_raw(&self, kind: ResourceKind, body: Value) -> Result<Value, ApiError> {
        self.record_call(Method::Create, kind, None, Some(&body))?;
        let Value::Object(mut object) = body else {
            return Err(ApiError::Status {
                status: 400,
                body: "expected a JSON object".to_string(),
            });
        };
        let mut state = self.state.borrow_mut();
        state.next_id += 1;
        let id = state.next_id;
        object.insert("id".to_string(), Value::from(id));
        let view = public_view(&object);
        state.tables.entry(kind).or_default().insert(id, object);
        Ok(view)
    }

    async fn update_raw(
        &self,
        kind: ResourceKind,
        id: &RecordId,
        body: Value,
    ) -> Result<Value, ApiError> {
        self.record_call(Method::Update, kind, Some(id), Some(&body))?;
        let key = key(kind, id)?;
        let Value::Object(changes) = body else {
            return Err(ApiError::Status {
                status: 400,
                body: "expected a JSON object".to_string(),
            });
        };
        let mut state = self.state.borrow_mut();
        let record = state
            .tables
            .get_mut(&kind)
            .and_then(|table| table.get_mut(&key))
            .ok_or_else(|| ApiError::not_found(format!("{} {id}", kind.noun())))?;
        for (field, value) in changes {
            if field != "id" {
                record.insert(field, value);
            }
        }
        Ok(public_view(record))
    }

    async fn delete(&self, kind: ResourceKind, id: &RecordId) -> Result<(), ApiError> {
        self.record_call(Method::Delete, kind, Some(id), None)?;
        let key = key(kind, id)?;
        let mut state = self.state.borrow_mut();
        state
            .tables
            .get_mut(&kind)
            .and_then(|table| table.remove(&key))
            .map(|_| ())
            .ok_or_else(|| ApiError::not_found(format!("{} {id}", kind.noun())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use store::{Lead, User};

    #[tokio::test]
    async fn test_create_then_list_assigns_id() {
        let backend = MemoryBackend::new();
        let leads = backend.resource::<Lead>();

        let created = leads
            .create(&json!({
                "name": "Alice",
                "email": "a@x.com",
                "status": "NEW",
                "source": "web",
            }))
            .await
            .unwrap();
        assert_eq!(created.id, RecordId::Int(1));

        let listed = leads.list().await.unwrap();
        assert_eq!(listed, vec![created]);
    }

    #[tokio::test]
    async fn test_get_and_missing_record() {
        let backend = MemoryBackend::new();
        let id = backend.seed(ResourceKind::Leads, json!({ "name": "Alice" }));

        let lead: Lead = backend.resource::<Lead>().get(&id).await.unwrap();
        assert_eq!(lead.name, "Alice");

        let err = backend.resource::<Lead>().get(&RecordId::Int(99)).await.unwrap_err();
        assert!(matches!(err, ApiError::Status { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_partial_update_merges_and_hides_password() {
        let backend = MemoryBackend::new();
        let id = backend.seed(
            ResourceKind::Users,
            json!({ "name": "Bob", "email": "b@x.com", "role": "USER", "password": "old" }),
        );

        let updated: User = backend
            .resource::<User>()
            .update(&id, &json!({ "name": "Robert", "email": "b@x.com", "role": "ADMIN" }))
            .await
            .unwrap();
        assert_eq!(updated.name, "Robert");

        let raw = backend.records(ResourceKind::Users);
        assert_eq!(raw[0]["password"], "old");

        let listed = backend.list_raw(ResourceKind::Users).await.unwrap();
        assert!(listed[0].get("password").is_none());
    }

    #[tokio::test]
    async fn test_update_cannot_change_id() {
        let backend = MemoryBackend::new();
        let id = backend.seed(ResourceKind::Leads, json!({ "name": "Alice" }));
        let body = json!({ "id": 500, "name": "Alicia" });
        let updated = backend.update_raw(ResourceKind::Leads, &id, body).await.unwrap();
        assert_eq!(updated["id"], 1);
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let backend = MemoryBackend::new();
        let err = backend
            .delete(ResourceKind::Leads, &RecordId::Int(4))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Status { status: 404, .. }));
        assert_eq!(backend.calls_to(Method::Delete).len(), 1);
    }

    #[tokio::test]
    async fn test_fail_next_is_one_shot() {
        let backend = MemoryBackend::new();
        backend.fail_next(ApiError::Transport("offline".into()));
        assert!(backend.list_raw(ResourceKind::Leads).await.is_err());
        assert!(backend.list_raw(ResourceKind::Leads).await.is_ok());
        assert_eq!(backend.calls().len(), 2);
    }
}
