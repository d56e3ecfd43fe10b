use serde_json::Value;
use store::config::BackendMode;
use store::{ConsoleConfig, RecordId, ResourceKind};

use crate::client::ResourceApi;
use crate::error::ApiError;
use crate::memory::MemoryBackend;
use crate::rest::RestClient;

/// The backend chosen by `console.toml`, behind one concrete type so screens
/// need not be generic over it.
#[derive(Clone)]
pub enum Backend {
    Rest(RestClient),
    Memory(MemoryBackend),
}

impl Backend {
    pub fn from_config(config: &ConsoleConfig) -> Result<Self, ApiError> {
        match config.api.backend {
            BackendMode::Rest => {
                tracing::info!("using REST backend at {}", config.api.base_url);
                Ok(Backend::Rest(RestClient::new(config)?))
            }
            BackendMode::Memory => {
                tracing::info!("using in-memory backend");
                Ok(Backend::Memory(MemoryBackend::new()))
            }
        }
    }
}

impl ResourceApi for Backend {
    async fn list_raw(&self, kind: ResourceKind) -> Result<Vec<Value>, ApiError> {
        match self {
            Backend::Rest(client) => client.list_raw(kind).await,
            Backend::Memory(memory) => memory.list_raw(kind).await,
        }
    }

    async fn get_raw(&self, kind: ResourceKind, id: &RecordId) -> Result<Value, ApiError> {
        match self {
            Backend::Rest(client) => client.get_raw(kind, id).await,
            Backend::Memory(memory) => memory.get_raw(kind, id).await,
        }
    }

    async fn create_raw(&self, kind: ResourceKind, body: Value) -> Result<Value, ApiError> {
        match self {
            Backend::Rest(client) => client.create_raw(kind, body).await,
            Backend::Memory(memory) => memory.create_raw(kind, body).await,
        }
    }

    async fn update_raw(
        &self,
        kind: ResourceKind,
        id: &RecordId,
        body: Value,
    ) -> Result<Value, ApiError> {
        match self {
            Backend::Rest(client) => client.update_raw(kind, id, body).await,
            Backend::Memory(memory) => memory.update_raw(kind, id, body).await,
        }
    }

    async fn delete(&self, kind: ResourceKind, id: &RecordId) -> Result<(), ApiError> {
        match self {
            Backend::Rest(client) => client.delete(kind, id).await,
            Backend::Memory(memory) => memory.delete(kind, id).await,
        }
    }
}
