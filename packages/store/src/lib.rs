pub mod cache;
pub mod config;
pub mod form;
pub mod models;
pub mod resource;
pub mod schema;

pub use cache::{CacheEvent, FetchTicket, ResourceCache, Subscription};
pub use config::ConsoleConfig;
pub use form::{
    validate, Editable, FieldErrors, FieldKind, FieldSpec, FormContext, FormValues, SelectOption,
};
pub use models::{
    format_timestamp, lead_label, next_updated_at, Contract, ContractStatus, Lead, RecordId, Role,
    User,
};
pub use resource::{Resource, ResourceKind};
pub use schema::{ContractPayload, LeadPayload, Tabular, UserPayload};
