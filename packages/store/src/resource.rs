use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::models::{Contract, Lead, RecordId, User};

/// The REST collections the console talks to. Also the cache key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceKind {
    Leads,
    Contracts,
    Users,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 3] = [
        ResourceKind::Leads,
        ResourceKind::Contracts,
        ResourceKind::Users,
    ];

    /// Path segment under the API base: `leads`, `contracts`, `users`.
    pub fn path(&self) -> &'static str {
        match self {
            ResourceKind::Leads => "leads",
            ResourceKind::Contracts => "contracts",
            ResourceKind::Users => "users",
        }
    }

    /// Lowercase singular noun used in operator notices.
    pub fn noun(&self) -> &'static str {
        match self {
            ResourceKind::Leads => "lead",
            ResourceKind::Contracts => "contract",
            ResourceKind::Users => "user",
        }
    }

    /// Capitalised singular noun used in modal titles and buttons.
    pub fn title(&self) -> &'static str {
        match self {
            ResourceKind::Leads => "Lead",
            ResourceKind::Contracts => "Contract",
            ResourceKind::Users => "User",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// A REST-backed record kind.
pub trait Resource: Clone + PartialEq + fmt::Debug + Serialize + DeserializeOwned + 'static {
    const KIND: ResourceKind;

    fn id(&self) -> &RecordId;
}

impl Resource for Lead {
    const KIND: ResourceKind = ResourceKind::Leads;

    fn id(&self) -> &RecordId {
        &self.id
    }
}

impl Resource for Contract {
    const KIND: ResourceKind = ResourceKind::Contracts;

    fn id(&self) -> &RecordId {
        &self.id
    }
}

impl Resource for User {
    const KIND: ResourceKind = ResourceKind::Users;

    fn id(&self) -> &RecordId {
        &self.id
    }
}
