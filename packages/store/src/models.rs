//! # Record models for the console
//!
//! Defines the three record kinds the console manages and the JSON shapes
//! they take on the wire. Every struct is `Serialize + Deserialize` with
//! camelCase field names so it matches the backend's payloads exactly.
//!
//! ## Types
//!
//! | Type | Represents |
//! |------|-----------|
//! | [`RecordId`] | A server-assigned identifier. The backend may hand out integers or strings; both are kept in their original JSON shape. |
//! | [`Lead`] | A sales lead. `status` and `source` are free text. |
//! | [`Contract`] | A contract with a soft reference to a lead (`leadId`), a [`ContractStatus`], an amount and client-set timestamps. |
//! | [`User`] | A console user with a [`Role`]. The password is write-only and never part of this struct. |
//!
//! ## Tolerant reads
//!
//! Text fields that come back as `null` decode to an empty string, and
//! timestamps accept both RFC 3339 and naive ISO-8601 date-times (treated as
//! UTC). Anything else in a timestamp slot decodes to `None` with a warning.
//! A row that still fails to decode (say, a contract status outside the five
//! known ones) is skipped by the collection readers rather than failing the
//! whole table.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A backend-assigned record identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Text(String),
}

impl RecordId {
    /// Parse an id coming back from a form control (select values are strings).
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        Some(match raw.parse::<i64>() {
            Ok(n) => RecordId::Int(n),
            Err(_) => RecordId::Text(raw.to_string()),
        })
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Int(n) => write!(f, "{n}"),
            RecordId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for RecordId {
    fn from(n: i64) -> Self {
        RecordId::Int(n)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        RecordId::Text(s.to_string())
    }
}

/// A sales lead.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: RecordId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub source: String,
}

/// Workflow state of a contract. Any state may move to any other.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContractStatus {
    #[default]
    Draft,
    Pending,
    Approved,
    Rejected,
    Completed,
}

impl ContractStatus {
    /// Column order on the kanban board.
    pub const ALL: [ContractStatus; 5] = [
        ContractStatus::Draft,
        ContractStatus::Pending,
        ContractStatus::Approved,
        ContractStatus::Rejected,
        ContractStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContractStatus::Draft => "DRAFT",
            ContractStatus::Pending => "PENDING",
            ContractStatus::Approved => "APPROVED",
            ContractStatus::Rejected => "REJECTED",
            ContractStatus::Completed => "COMPLETED",
        }
    }

    /// Human-readable column title.
    pub fn title(&self) -> &'static str {
        match self {
            ContractStatus::Draft => "Drafts",
            ContractStatus::Pending => "Pending",
            ContractStatus::Approved => "Approved",
            ContractStatus::Rejected => "Rejected",
            ContractStatus::Completed => "Completed",
        }
    }
}

impl fmt::Display for ContractStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContractStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ContractStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("unknown contract status: {s}"))
    }
}

/// A contract tied (softly) to a lead.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    pub id: RecordId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Not checked against the lead collection.
    #[serde(default)]
    pub lead_id: Option<RecordId>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: ContractStatus,
    #[serde(default, deserialize_with = "null_as_default")]
    pub amount: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub document_link: String,
    #[serde(default, deserialize_with = "timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::User, Role::Admin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| format!("unknown role: {s}"))
    }
}

/// A console user. The backend never returns the password.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: RecordId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub role: Role,
}

/// Resolve a contract's lead for display. Misses fall back to the raw id.
pub fn lead_label(leads: &[Lead], lead_id: Option<&RecordId>) -> String {
    let Some(id) = lead_id else {
        return String::new();
    };
    leads
        .iter()
        .find(|lead| &lead.id == id)
        .map(|lead| lead.name.clone())
        .unwrap_or_else(|| id.to_string())
}

/// Next `updatedAt` for an edit: the client clock, but never at or before
/// the value being replaced.
pub fn next_updated_at(previous: Option<DateTime<Utc>>, now: DateTime<Utc>) -> DateTime<Utc> {
    match previous {
        Some(prev) if now <= prev => prev + Duration::milliseconds(1),
        _ => now,
    }
}

/// Table rendering for timestamps: `YYYY-MM-DD HH:MM:SS`, empty when unset.
pub fn format_timestamp(ts: Option<&DateTime<Utc>>) -> String {
    ts.map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default()
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    if let Ok(parsed) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(Some(parsed.with_timezone(&Utc)));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(Some(naive.and_utc()));
    }
    tracing::warn!("ignoring unparseable timestamp {raw:?}");
    Ok(None)
}
