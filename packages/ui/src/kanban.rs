//! Contract board: five status columns, drag a card to change its status.
//!
//! A move sends the loaded record back exactly as the server returned it,
//! with only `status` replaced.
//! Moves the board cannot resolve (nothing loaded yet, a card that vanished
//! in a refetch, a drop on the card's own column) are silently ignored.

use api::{fetch_collection, ApiError, ResourceApi};
use serde_json::Value;
use store::{Contract, ContractStatus, RecordId, ResourceCache, ResourceKind};

use crate::notice::{Notice, NoticeLog};

#[derive(Clone, Debug, PartialEq)]
pub struct KanbanColumn {
    pub status: ContractStatus,
    pub cards: Vec<Contract>,
}

impl KanbanColumn {
    pub fn title(&self) -> &'static str {
        self.status.title()
    }
}

/// Group `contracts` into the five columns, in status order. Empty columns
/// are kept.
pub fn columns(contracts: &[Contract]) -> Vec<KanbanColumn> {
    ContractStatus::ALL
        .into_iter()
        .map(|status| KanbanColumn {
            status,
            cards: contracts
                .iter()
                .filter(|c| c.status == status)
                .cloned()
                .collect(),
        })
        .collect()
}

/// The body to PUT for moving `id` to `to`: the cached raw record with its
/// `status` replaced. `None` when there is nothing to do.
pub fn plan_move(cache: &ResourceCache, id: &RecordId, to: ContractStatus) -> Option<Value> {
    let Some(mut record) = cache.find(ResourceKind::Contracts, id) else {
        tracing::debug!("ignoring move of unknown contract {id}");
        return None;
    };
    let Value::Object(fields) = &mut record else {
        return None;
    };
    if fields.get("status").and_then(Value::as_str) == Some(to.as_str()) {
        return None;
    }
    fields.insert("status".into(), Value::from(to.as_str()));
    Some(record)
}

pub async fn perform_move<C: ResourceApi>(
    api: &C,
    id: &RecordId,
    body: Value,
) -> Result<(), ApiError> {
    api.update_raw(ResourceKind::Contracts, id, body)
        .await
        .map(|_| ())
}

pub fn move_notice(result: &Result<(), ApiError>) -> Notice {
    match result {
        Ok(()) => Notice::success("Contract status updated!"),
        Err(e) => {
            tracing::error!("failed to update contract status: {e}");
            Notice::error("Failed to update contract status.")
        }
    }
}

/// Drag in progress and the card shown in the detail drawer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct KanbanState {
    pub dragging: Option<RecordId>,
    pub selected: Option<Contract>,
}

impl KanbanState {
    pub fn start_drag(&mut self, id: RecordId) {
        self.dragging = Some(id);
    }

    /// End the drag over `status`, returning the move to attempt.
    pub fn drop_on(&mut self, status: ContractStatus) -> Option<(RecordId, ContractStatus)> {
        self.dragging.take().map(|id| (id, status))
    }

    pub fn open(&mut self, contract: Contract) {
        self.selected = Some(contract);
    }

    pub fn close(&mut self) {
        self.selected = None;
    }
}

/// The board without a renderer.
pub struct KanbanController<C> {
    pub state: KanbanState,
    pub notices: NoticeLog,
    api: C,
    cache: ResourceCache,
}

impl<C: ResourceApi> KanbanController<C> {
    pub fn new(api: C, cache: ResourceCache) -> Self {
        Self {
            state: KanbanState::default(),
            notices: NoticeLog::default(),
            api,
            cache,
        }
    }

    pub async fn columns(&self) -> Result<Vec<KanbanColumn>, ApiError> {
        let contracts = fetch_collection::<Contract, C>(&self.api, &self.cache).await?;
        Ok(columns(&contracts))
    }

    /// Move a card between columns against whatever is currently loaded.
    pub async fn move_card(&mut self, id: &RecordId, to: ContractStatus) -> Option<Notice> {
        let body = plan_move(&self.cache, id, to)?;
        tracing::info!("moving contract {id} to {to}");
        let result = perform_move(&self.api, id, body).await;
        let notice = move_notice(&result);
        self.notices.push(notice.clone());
        if result.is_ok() {
            self.cache.invalidate(ResourceKind::Contracts);
        }
        Some(notice)
    }

    pub fn cache(&self) -> &ResourceCache {
        &self.cache
    }
}
