//! # CRUD table screens as a command machine
//!
//! Every table screen (leads, contracts, users) is the same machine over a
//! different [`Editable`] record:
//!
//! 1. [`CrudState::handle`] applies a [`CrudCommand`] synchronously and may
//!    return an [`Effect`], the one network call the command needs.
//! 2. [`perform`] runs that effect against a [`ResourceApi`].
//! 3. [`CrudState::settle`] folds the outcome back into the state and
//!    produces the operator [`Notice`]. On success the caller then
//!    invalidates the resource's cache entry, so the notice and modal close
//!    always land before the refetch starts.
//!
//! The Dioxus screens drive these steps from event handlers;
//! [`CrudController`] runs them end to end without a renderer.

use api::{fetch_collection, ApiError, ResourceApi};
use chrono::{DateTime, Utc};
use serde::Serialize;
use store::{
    validate, Editable, FieldErrors, FieldSpec, FormContext, FormValues, Lead, RecordId,
    ResourceCache, ResourceKind,
};

use crate::notice::{Notice, NoticeLog};

#[derive(Clone, Debug, PartialEq)]
pub enum CrudCommand<R> {
    OpenCreate,
    OpenEdit(R),
    /// Hide the modal. An in-flight submit still settles.
    Close,
    Submit(FormValues),
    /// Delete immediately, without a confirmation or existence check.
    Delete(RecordId),
}

/// The network call a command asks for.
#[derive(Clone, Debug, PartialEq)]
pub enum Effect<P> {
    Create(P),
    Update(RecordId, P),
    Delete(RecordId),
}

impl<P> Effect<P> {
    pub fn action(&self) -> &'static str {
        match self {
            Effect::Create(_) => "create",
            Effect::Update(..) => "update",
            Effect::Delete(_) => "delete",
        }
    }

    fn past_tense(&self) -> &'static str {
        match self {
            Effect::Create(_) => "created",
            Effect::Update(..) => "updated",
            Effect::Delete(_) => "deleted",
        }
    }
}

/// Modal and form state of one table screen.
#[derive(Clone, Debug, PartialEq)]
pub struct CrudState<R> {
    pub is_modal_open: bool,
    /// Record being edited; `None` means the modal creates.
    pub editing: Option<R>,
    pub errors: FieldErrors,
    pub submitting: bool,
}

impl<R> Default for CrudState<R> {
    fn default() -> Self {
        Self {
            is_modal_open: false,
            editing: None,
            errors: FieldErrors::default(),
            submitting: false,
        }
    }
}

impl<R: Editable> CrudState<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Form schema for the current mode.
    pub fn fields(&self, ctx: &FormContext) -> Vec<FieldSpec> {
        R::fields(ctx, self.editing.is_some())
    }

    /// Initial control values: the edited record, or an empty form.
    pub fn form_values(&self) -> FormValues {
        self.editing
            .as_ref()
            .map(R::to_values)
            .unwrap_or_default()
    }

    pub fn modal_title(&self) -> String {
        let mode = if self.editing.is_some() { "Edit" } else { "Add" };
        format!("{mode} {}", R::KIND.title())
    }

    pub fn handle(
        &mut self,
        command: CrudCommand<R>,
        ctx: &FormContext,
        now: DateTime<Utc>,
    ) -> Option<Effect<R::Payload>> {
        match command {
            CrudCommand::OpenCreate => {
                self.editing = None;
                self.errors = FieldErrors::default();
                self.is_modal_open = true;
                None
            }
            CrudCommand::OpenEdit(record) => {
                self.editing = Some(record);
                self.errors = FieldErrors::default();
                self.is_modal_open = true;
                None
            }
            CrudCommand::Close => {
                self.is_modal_open = false;
                self.errors = FieldErrors::default();
                None
            }
            CrudCommand::Submit(values) => {
                if let Err(errors) = validate(&self.fields(ctx), &values) {
                    tracing::debug!("{} form rejected: {errors}", R::KIND.noun());
                    self.errors = errors;
                    return None;
                }
                self.errors = FieldErrors::default();
                self.submitting = true;
                Some(match &self.editing {
                    Some(record) => {
                        Effect::Update(record.id().clone(), record.update_payload(&values, now))
                    }
                    None => Effect::Create(R::create_payload(&values, now)),
                })
            }
            CrudCommand::Delete(id) => Some(Effect::Delete(id)),
        }
    }

    /// Apply the outcome of `effect` and describe it for the operator.
    pub fn settle<P>(&mut self, effect: &Effect<P>, result: &Result<(), ApiError>) -> Notice {
        let kind = R::KIND;
        match result {
            Ok(()) => {
                tracing::info!("{} {}", kind.noun(), effect.past_tense());
                match effect {
                    Effect::Delete(id) => {
                        if self.editing.as_ref().is_some_and(|r| r.id() == id) {
                            self.editing = None;
                        }
                    }
                    Effect::Create(_) | Effect::Update(..) => {
                        self.is_modal_open = false;
                        self.editing = None;
                        self.submitting = false;
                    }
                }
                Notice::success(format!(
                    "{} {} successfully!",
                    kind.title(),
                    effect.past_tense()
                ))
            }
            Err(e) => {
                tracing::error!("failed to {} {}: {e}", effect.action(), kind.noun());
                if !matches!(effect, Effect::Delete(_)) {
                    self.submitting = false;
                }
                Notice::error(format!("Failed to {} {}.", effect.action(), kind.noun()))
            }
        }
    }
}

/// Run `effect` against the backend. Any 2xx counts as success; the
/// response body is not inspected.
pub async fn perform<C, P>(api: &C, kind: ResourceKind, effect: &Effect<P>) -> Result<(), ApiError>
where
    C: ResourceApi,
    P: Serialize,
{
    match effect {
        Effect::Create(payload) => {
            let body = serde_json::to_value(payload)?;
            api.create_raw(kind, body).await.map(|_| ())
        }
        Effect::Update(id, payload) => {
            let body = serde_json::to_value(payload)?;
            api.update_raw(kind, id, body).await.map(|_| ())
        }
        Effect::Delete(id) => api.delete(kind, id).await,
    }
}

/// Read the lead collection when `R`'s form needs it.
pub async fn form_context<R: Editable, C: ResourceApi>(
    api: &C,
    cache: &ResourceCache,
) -> FormContext {
    if !R::NEEDS_LEADS {
        return FormContext::default();
    }
    match fetch_collection::<Lead, C>(api, cache).await {
        Ok(leads) => FormContext { leads },
        Err(_) => FormContext::default(),
    }
}

type Clock = Box<dyn Fn() -> DateTime<Utc>>;

/// One table screen without a renderer: state, backend, cache and notices.
pub struct CrudController<R, C> {
    pub state: CrudState<R>,
    pub notices: NoticeLog,
    api: C,
    cache: ResourceCache,
    clock: Clock,
}

impl<R: Editable, C: ResourceApi> CrudController<R, C> {
    pub fn new(api: C, cache: ResourceCache) -> Self {
        Self {
            state: CrudState::new(),
            notices: NoticeLog::default(),
            api,
            cache,
            clock: Box::new(Utc::now),
        }
    }

    /// Replace the clock used to stamp contract timestamps.
    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Utc> + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn cache(&self) -> &ResourceCache {
        &self.cache
    }

    /// The table rows, through the cache.
    pub async fn rows(&self) -> Result<Vec<R>, ApiError> {
        fetch_collection::<R, C>(&self.api, &self.cache).await
    }

    /// Handle `command`, run its effect if any, and return the notice.
    pub async fn dispatch(&mut self, command: CrudCommand<R>) -> Option<Notice> {
        let ctx = form_context::<R, C>(&self.api, &self.cache).await;
        let effect = self.state.handle(command, &ctx, (self.clock)())?;
        let result = perform(&self.api, R::KIND, &effect).await;
        let notice = self.state.settle(&effect, &result);
        self.notices.push(notice.clone());
        if result.is_ok() {
            self.cache.invalidate(R::KIND);
        }
        Some(notice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use api::memory::Method;
    use api::MemoryBackend;
    use chrono::TimeZone;
    use serde_json::json;
    use store::{Contract, ContractStatus, Role, User};

    fn controller<R: Editable>(backend: &MemoryBackend) -> CrudController<R, MemoryBackend> {
        CrudController::new(backend.clone(), ResourceCache::new())
    }

    fn alice() -> FormValues {
        FormValues::new()
            .with("name", "Alice")
            .with("email", "a@x.com")
            .with("status", "NEW")
            .with("source", "web")
    }

    fn parse_ts(value: &serde_json::Value) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(value.as_str().unwrap())
            .unwrap()
            .with_timezone(&Utc)
    }

    #[tokio::test]
    async fn test_create_lead_then_list() {
        let backend = MemoryBackend::new();
        let mut leads = controller::<Lead>(&backend);

        leads.dispatch(CrudCommand::OpenCreate).await;
        assert!(leads.state.is_modal_open);

        let notice = leads.dispatch(CrudCommand::Submit(alice())).await.unwrap();
        assert_eq!(notice, Notice::success("Lead created successfully!"));
        assert!(!leads.state.is_modal_open);
        assert!(!leads.state.submitting);

        let rows = leads.rows().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Alice");
        assert_eq!(rows[0].id, RecordId::Int(1));
    }

    #[tokio::test]
    async fn test_missing_email_blocks_create() {
        let backend = MemoryBackend::new();
        let mut leads = controller::<Lead>(&backend);
        leads.dispatch(CrudCommand::OpenCreate).await;

        let notice = leads
            .dispatch(CrudCommand::Submit(alice().with("email", "  ")))
            .await;

        assert_eq!(notice, None);
        assert!(backend.calls_to(Method::Create).is_empty());
        assert!(leads.state.is_modal_open);
        assert_eq!(leads.state.errors.get("email"), Some("Please input the email!"));
        assert_eq!(leads.state.errors.len(), 1);
    }

    #[tokio::test]
    async fn test_failed_create_keeps_modal_open() {
        let backend = MemoryBackend::new();
        let mut leads = controller::<Lead>(&backend);
        leads.dispatch(CrudCommand::OpenCreate).await;
        backend.fail_next(ApiError::Status {
            status: 500,
            body: String::new(),
        });

        let notice = leads.dispatch(CrudCommand::Submit(alice())).await.unwrap();

        assert_eq!(notice, Notice::error("Failed to create lead."));
        assert!(leads.state.is_modal_open);
        assert!(leads.state.editing.is_none());
        assert!(!leads.state.submitting);
    }

    #[tokio::test]
    async fn test_edit_lead_sends_full_record() {
        let backend = MemoryBackend::new();
        let id = backend.seed(
            ResourceKind::Leads,
            json!({ "name": "Alice", "email": "a@x.com", "status": "NEW", "source": "web" }),
        );
        let mut leads = controller::<Lead>(&backend);
        let record = leads.rows().await.unwrap().remove(0);

        leads.dispatch(CrudCommand::OpenEdit(record.clone())).await;
        assert_eq!(leads.state.modal_title(), "Edit Lead");
        let values = leads.state.form_values().with("status", "QUALIFIED");
        let notice = leads.dispatch(CrudCommand::Submit(values)).await.unwrap();

        assert_eq!(notice, Notice::success("Lead updated successfully!"));
        assert!(leads.state.editing.is_none());
        let update = &backend.calls_to(Method::Update)[0];
        assert_eq!(update.id, Some(id));
        assert_eq!(
            update.body,
            Some(json!({
                "name": "Alice",
                "email": "a@x.com",
                "status": "QUALIFIED",
                "source": "web",
            }))
        );
        assert!(!leads.cache().is_fresh(ResourceKind::Leads));
    }

    #[tokio::test]
    async fn test_contract_edit_keeps_created_and_advances_updated() {
        let backend = MemoryBackend::new();
        backend.seed(ResourceKind::Leads, json!({ "name": "Acme" }));
        backend.seed(
            ResourceKind::Contracts,
            json!({
                "name": "C1",
                "leadId": 1,
                "status": "DRAFT",
                "amount": 1500.0,
                "createdAt": "2024-01-01T00:00:00Z",
                "updatedAt": "2024-06-01T00:00:00Z",
            }),
        );
        // Clock behind the stored updatedAt.
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let mut contracts = controller::<Contract>(&backend).with_clock(move || now);
        let record = contracts.rows().await.unwrap().remove(0);

        contracts.dispatch(CrudCommand::OpenEdit(record.clone())).await;
        let values = contracts.state.form_values().with("name", "C1 renewed");
        contracts.dispatch(CrudCommand::Submit(values)).await.unwrap();

        let body = backend.calls_to(Method::Update)[0].body.clone().unwrap();
        assert_eq!(body["name"], "C1 renewed");
        assert_eq!(body["leadId"], 1);
        assert_eq!(parse_ts(&body["createdAt"]), record.created_at.unwrap());
        let updated = parse_ts(&body["updatedAt"]);
        assert!(updated > record.updated_at.unwrap());
    }

    #[tokio::test]
    async fn test_contract_form_lists_loaded_leads() {
        let backend = MemoryBackend::new();
        backend.seed(ResourceKind::Leads, json!({ "name": "Acme" }));
        let cache = ResourceCache::new();

        let ctx = form_context::<Contract, _>(&backend, &cache).await;
        assert_eq!(ctx.leads.len(), 1);

        let ctx = form_context::<Lead, _>(&backend, &cache).await;
        assert!(ctx.leads.is_empty());
        assert_eq!(backend.calls_to(Method::List).len(), 1);
    }

    #[tokio::test]
    async fn test_delete_uncached_id_still_calls_backend() {
        let backend = MemoryBackend::new();
        let mut leads = controller::<Lead>(&backend);
        assert!(leads.rows().await.unwrap().is_empty());

        // Created elsewhere; this screen's cache has never seen it.
        let id = backend.seed(ResourceKind::Leads, json!({ "name": "Ghost" }));
        let notice = leads.dispatch(CrudCommand::Delete(id.clone())).await.unwrap();

        assert_eq!(notice, Notice::success("Lead deleted successfully!"));
        assert_eq!(backend.calls_to(Method::Delete)[0].id, Some(id));
        assert!(!leads.cache().is_fresh(ResourceKind::Leads));
    }

    #[tokio::test]
    async fn test_failed_delete_keeps_cache() {
        let backend = MemoryBackend::new();
        let mut users = controller::<User>(&backend);
        users.rows().await.unwrap();

        let notice = users
            .dispatch(CrudCommand::Delete(RecordId::Int(42)))
            .await
            .unwrap();

        assert_eq!(notice, Notice::error("Failed to delete user."));
        assert!(users.cache().is_fresh(ResourceKind::Users));
        assert_eq!(users.notices.messages(), vec!["Failed to delete user."]);
    }

    #[tokio::test]
    async fn test_user_password_only_sent_when_reentered() {
        let backend = MemoryBackend::new();
        backend.seed(
            ResourceKind::Users,
            json!({ "name": "Bob", "email": "b@x.com", "role": "USER", "password": "old" }),
        );
        let mut users = controller::<User>(&backend);
        let bob = users.rows().await.unwrap().remove(0);

        users.dispatch(CrudCommand::OpenEdit(bob.clone())).await;
        assert!(users
            .state
            .fields(&FormContext::default())
            .iter()
            .all(|f| f.name != "password"));
        let blank = users.state.form_values().with("password", "");
        users.dispatch(CrudCommand::Submit(blank)).await.unwrap();

        users.dispatch(CrudCommand::OpenEdit(bob)).await;
        let fresh = users.state.form_values().with("password", "s3cret");
        users.dispatch(CrudCommand::Submit(fresh)).await.unwrap();

        let updates = backend.calls_to(Method::Update);
        assert!(updates[0].body.as_ref().unwrap().get("password").is_none());
        assert_eq!(updates[1].body.as_ref().unwrap()["password"], "s3cret");
        assert_eq!(backend.records(ResourceKind::Users)[0]["password"], "s3cret");
    }

    #[tokio::test]
    async fn test_create_user_then_list_without_password() {
        let backend = MemoryBackend::new();
        let mut users = controller::<User>(&backend);
        users.dispatch(CrudCommand::OpenCreate).await;
        let values = FormValues::new()
            .with("name", "Carol")
            .with("email", "c@x.com")
            .with("role", "ADMIN")
            .with("password", "hunter2");

        let notice = users.dispatch(CrudCommand::Submit(values)).await.unwrap();
        assert_eq!(notice, Notice::success("User created successfully!"));

        let rows = users.rows().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Carol");
        assert_eq!(rows[0].email, "c@x.com");
        assert_eq!(rows[0].role, Role::Admin);
        let listed = users.cache().get(ResourceKind::Users).unwrap();
        assert!(listed[0].get("password").is_none());
        assert_eq!(backend.records(ResourceKind::Users)[0]["password"], "hunter2");
    }

    #[tokio::test]
    async fn test_create_contract_then_list() {
        let backend = MemoryBackend::new();
        let lead_id = backend.seed(ResourceKind::Leads, json!({ "name": "Acme" }));
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        let mut contracts = controller::<Contract>(&backend).with_clock(move || now);
        contracts.dispatch(CrudCommand::OpenCreate).await;
        let values = FormValues::new()
            .with("name", "C1")
            .with("leadId", lead_id.to_string())
            .with("status", "DRAFT")
            .with("amount", "1500");

        let notice = contracts.dispatch(CrudCommand::Submit(values)).await.unwrap();
        assert_eq!(notice, Notice::success("Contract created successfully!"));

        let rows = contracts.rows().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "C1");
        assert_eq!(rows[0].lead_id, Some(lead_id));
        assert_eq!(rows[0].status, ContractStatus::Draft);
        assert_eq!(rows[0].amount, 1500.0);
        assert_eq!(rows[0].created_at, Some(now));
        assert_eq!(rows[0].updated_at, Some(now));
    }

    #[tokio::test]
    async fn test_user_create_requires_password() {
        let backend = MemoryBackend::new();
        let mut users = controller::<User>(&backend);
        users.dispatch(CrudCommand::OpenCreate).await;
        let values = FormValues::new()
            .with("name", "Carol")
            .with("email", "c@x.com")
            .with("role", "ADMIN");

        assert_eq!(users.dispatch(CrudCommand::Submit(values)).await, None);
        assert_eq!(
            users.state.errors.get("password"),
            Some("Please input the password!")
        );
    }

    #[test]
    fn test_open_create_clears_editing_and_errors() {
        let mut state = CrudState::<Contract>::new();
        let now = Utc::now();
        let ctx = FormContext::default();
        let contract = Contract {
            id: RecordId::Int(7),
            name: "C7".into(),
            lead_id: None,
            status: ContractStatus::Pending,
            amount: 10.0,
            description: String::new(),
            document_link: String::new(),
            created_at: None,
            updated_at: None,
        };

        state.handle(CrudCommand::OpenEdit(contract), &ctx, now);
        state.handle(CrudCommand::Submit(FormValues::new()), &ctx, now);
        assert!(!state.errors.is_empty());

        state.handle(CrudCommand::OpenCreate, &ctx, now);
        assert!(state.editing.is_none());
        assert!(state.errors.is_empty());
        assert_eq!(state.form_values(), FormValues::new());
        assert_eq!(state.modal_title(), "Add Contract");
    }
}
