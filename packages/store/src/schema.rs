//! # Per-record form schemas, payloads and table columns
//!
//! | Record | Form fields (`*` required) | Update semantics |
//! |--------|----------------------------|------------------|
//! | [`Lead`] | name\*, email\*, status\*, source\* | Full record PUT |
//! | [`Contract`] | name\*, lead\*, status\*, amount\*, description, documentLink | Full record PUT; `createdAt` kept, `updatedAt` advanced |
//! | [`User`] | name\*, email\*, role\*, password\* (create only) | Partial PUT; `password` only when re-entered |
//!
//! [`Tabular`] describes the columns each table shows. Cells are plain
//! strings; the contract table joins its lead id against the loaded leads.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::form::{Editable, FieldKind, FieldSpec, FormContext, FormValues, SelectOption};
use crate::models::{
    format_timestamp, lead_label, next_updated_at, Contract, ContractStatus, Lead, RecordId, Role,
    User,
};
use crate::resource::Resource;

/// Body for creating or replacing a lead.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LeadPayload {
    pub name: String,
    pub email: String,
    pub status: String,
    pub source: String,
}

/// Body for creating or replacing a contract.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractPayload {
    pub name: String,
    pub lead_id: Option<RecordId>,
    pub status: ContractStatus,
    pub amount: f64,
    pub description: String,
    pub document_link: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body for creating a user or partially updating one.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct UserPayload {
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl LeadPayload {
    fn from_values(values: &FormValues) -> Self {
        Self {
            name: values.text("name"),
            email: values.text("email"),
            status: values.text("status"),
            source: values.text("source"),
        }
    }
}

impl Editable for Lead {
    type Payload = LeadPayload;

    fn fields(_ctx: &FormContext, _editing: bool) -> Vec<FieldSpec> {
        vec![
            FieldSpec::required("name", "Name", FieldKind::Text, "Please input the name!"),
            FieldSpec::required("email", "Email", FieldKind::Text, "Please input the email!"),
            FieldSpec::required("status", "Status", FieldKind::Text, "Please input the status!"),
            FieldSpec::required("source", "Source", FieldKind::Text, "Please input the source!"),
        ]
    }

    fn to_values(&self) -> FormValues {
        FormValues::new()
            .with("name", self.name.as_str())
            .with("email", self.email.as_str())
            .with("status", self.status.as_str())
            .with("source", self.source.as_str())
    }

    fn create_payload(values: &FormValues, _now: DateTime<Utc>) -> LeadPayload {
        LeadPayload::from_values(values)
    }

    fn update_payload(&self, values: &FormValues, _now: DateTime<Utc>) -> LeadPayload {
        LeadPayload::from_values(values)
    }
}

fn status_options() -> Vec<SelectOption> {
    ContractStatus::ALL
        .into_iter()
        .map(|s| SelectOption::new(s.as_str(), s.as_str()))
        .collect()
}

impl ContractPayload {
    fn from_values(
        values: &FormValues,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            name: values.text("name"),
            lead_id: values.get("leadId").and_then(RecordId::parse),
            status: values.text("status").parse().unwrap_or_default(),
            amount: values.number("amount").unwrap_or_default(),
            description: values.text("description"),
            document_link: values.text("documentLink"),
            created_at,
            updated_at,
        }
    }
}

impl Editable for Contract {
    type Payload = ContractPayload;

    const NEEDS_LEADS: bool = true;

    fn fields(ctx: &FormContext, _editing: bool) -> Vec<FieldSpec> {
        let leads = ctx
            .leads
            .iter()
            .map(|lead| SelectOption::new(lead.id.to_string(), lead.name.as_str()))
            .collect();
        vec![
            FieldSpec::required("name", "Name", FieldKind::Text, "Please input the name!"),
            FieldSpec::required(
                "leadId",
                "Lead",
                FieldKind::Reference(leads),
                "Please select a lead!",
            ),
            FieldSpec::required(
                "status",
                "Status",
                FieldKind::Enum(status_options()),
                "Please select a status!",
            ),
            FieldSpec::required("amount", "Amount", FieldKind::Number, "Please input the amount!"),
            FieldSpec::optional("description", "Description", FieldKind::Text),
            FieldSpec::optional("documentLink", "Document Link", FieldKind::Text),
        ]
    }

    fn to_values(&self) -> FormValues {
        FormValues::new()
            .with("name", self.name.as_str())
            .with(
                "leadId",
                self.lead_id.as_ref().map(ToString::to_string).unwrap_or_default(),
            )
            .with("status", self.status.as_str())
            .with("amount", self.amount.to_string())
            .with("description", self.description.as_str())
            .with("documentLink", self.document_link.as_str())
    }

    fn create_payload(values: &FormValues, now: DateTime<Utc>) -> ContractPayload {
        ContractPayload::from_values(values, now, now)
    }

    fn update_payload(&self, values: &FormValues, now: DateTime<Utc>) -> ContractPayload {
        let created_at = self.created_at.unwrap_or(now);
        let updated_at = next_updated_at(self.updated_at, now);
        ContractPayload::from_values(values, created_at, updated_at)
    }
}

fn role_options() -> Vec<SelectOption> {
    Role::ALL
        .into_iter()
        .map(|r| SelectOption::new(r.as_str(), r.as_str()))
        .collect()
}

impl Editable for User {
    type Payload = UserPayload;

    fn fields(_ctx: &FormContext, editing: bool) -> Vec<FieldSpec> {
        let mut fields = vec![
            FieldSpec::required("name", "Name", FieldKind::Text, "Please input the name!"),
            FieldSpec::required("email", "Email", FieldKind::Text, "Please input the email!"),
            FieldSpec::required(
                "role",
                "Role",
                FieldKind::Enum(role_options()),
                "Please select a role!",
            ),
        ];
        if !editing {
            fields.push(FieldSpec::required(
                "password",
                "Password",
                FieldKind::Password,
                "Please input the password!",
            ));
        }
        fields
    }

    fn to_values(&self) -> FormValues {
        FormValues::new()
            .with("name", self.name.as_str())
            .with("email", self.email.as_str())
            .with("role", self.role.as_str())
    }

    fn create_payload(values: &FormValues, _now: DateTime<Utc>) -> UserPayload {
        UserPayload {
            name: values.text("name"),
            email: values.text("email"),
            role: values.text("role").parse().unwrap_or_default(),
            password: Some(values.get("password").unwrap_or_default().to_string()),
        }
    }

    fn update_payload(&self, values: &FormValues, _now: DateTime<Utc>) -> UserPayload {
        // Sent untrimmed; whitespace alone counts as blank.
        let password = values
            .get("password")
            .filter(|p| !p.trim().is_empty())
            .map(str::to_string);
        UserPayload {
            name: values.text("name"),
            email: values.text("email"),
            role: values.text("role").parse().unwrap_or_default(),
            password,
        }
    }
}

/// Column layout for a record table.
pub trait Tabular: Resource {
    fn columns() -> &'static [&'static str];

    /// One string per column, joined against `leads` where relevant.
    fn cells(&self, leads: &[Lead]) -> Vec<String>;
}

impl Tabular for Lead {
    fn columns() -> &'static [&'static str] {
        &["Name", "Email", "Status", "Source"]
    }

    fn cells(&self, _leads: &[Lead]) -> Vec<String> {
        vec![
            self.name.clone(),
            self.email.clone(),
            self.status.clone(),
            self.source.clone(),
        ]
    }
}

impl Tabular for Contract {
    fn columns() -> &'static [&'static str] {
        &[
            "Name",
            "Lead ID",
            "Status",
            "Amount",
            "Description",
            "Document Link",
            "Created At",
            "Updated At",
        ]
    }

    fn cells(&self, leads: &[Lead]) -> Vec<String> {
        vec![
            self.name.clone(),
            lead_label(leads, self.lead_id.as_ref()),
            self.status.to_string(),
            self.amount.to_string(),
            self.description.clone(),
            self.document_link.clone(),
            format_timestamp(self.created_at.as_ref()),
            format_timestamp(self.updated_at.as_ref()),
        ]
    }
}

impl Tabular for User {
    fn columns() -> &'static [&'static str] {
        &["Name", "Email", "Role"]
    }

    fn cells(&self, _leads: &[Lead]) -> Vec<String> {
        vec![self.name.clone(), self.email.clone(), self.role.to_string()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::validate;
    use chrono::TimeZone;

    fn contract() -> Contract {
        Contract {
            id: RecordId::Int(5),
            name: "C1".into(),
            lead_id: Some(RecordId::Int(1)),
            status: ContractStatus::Draft,
            amount: 100.0,
            description: "first".into(),
            document_link: "https://docs/c1".into(),
            created_at: Some(Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap()),
            updated_at: Some(Utc.with_ymd_and_hms(2024, 1, 2, 8, 0, 0).unwrap()),
        }
    }

    #[test]
    fn test_contract_edit_keeps_created_at_and_advances_updated_at() {
        let existing = contract();
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let values = existing.to_values().with("amount", "250");

        let payload = existing.update_payload(&values, now);

        assert_eq!(Some(payload.created_at), existing.created_at);
        assert!(Some(payload.updated_at) > existing.updated_at);
        assert_eq!(payload.amount, 250.0);
        assert_eq!(payload.lead_id, Some(RecordId::Int(1)));
    }

    #[test]
    fn test_contract_create_stamps_both_timestamps() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let values = FormValues::new()
            .with("name", "C1")
            .with("leadId", "1")
            .with("status", "DRAFT")
            .with("amount", "100");
        let payload = Contract::create_payload(&values, now);
        assert_eq!(payload.created_at, now);
        assert_eq!(payload.updated_at, now);
        assert_eq!(payload.status, ContractStatus::Draft);

        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("id").is_none());
        assert_eq!(json["leadId"], 1);
    }

    #[test]
    fn test_user_update_omits_blank_password() {
        let user = User {
            id: RecordId::Int(1),
            name: "Bob".into(),
            email: "b@x.com".into(),
            role: Role::User,
        };
        let now = Utc::now();

        let blank = user.update_payload(&user.to_values().with("password", ""), now);
        let json = serde_json::to_value(&blank).unwrap();
        assert!(json.get("password").is_none());

        let absent = user.update_payload(&user.to_values(), now);
        assert!(serde_json::to_value(&absent).unwrap().get("password").is_none());

        let fresh = user.update_payload(&user.to_values().with("password", "s3cret"), now);
        assert_eq!(serde_json::to_value(&fresh).unwrap()["password"], "s3cret");
    }

    #[test]
    fn test_user_password_only_required_on_create() {
        let ctx = FormContext::default();
        let values = FormValues::new()
            .with("name", "Bob")
            .with("email", "b@x.com")
            .with("role", "ADMIN");
        assert!(validate(&User::fields(&ctx, true), &values).is_ok());
        let errors = validate(&User::fields(&ctx, false), &values).unwrap_err();
        assert_eq!(errors.get("password"), Some("Please input the password!"));
    }

    #[test]
    fn test_contract_lead_options_come_from_context() {
        let ctx = FormContext {
            leads: vec![Lead {
                id: RecordId::Int(1),
                name: "Alice".into(),
                email: String::new(),
                status: String::new(),
                source: String::new(),
            }],
        };
        let fields = Contract::fields(&ctx, false);
        let lead = fields.iter().find(|f| f.name == "leadId").unwrap();
        assert_eq!(
            lead.kind,
            FieldKind::Reference(vec![SelectOption::new("1", "Alice")])
        );
    }

    #[test]
    fn test_contract_cells_join_lead_name() {
        let leads = vec![Lead {
            id: RecordId::Int(1),
            name: "Alice".into(),
            email: String::new(),
            status: String::new(),
            source: String::new(),
        }];
        let cells = contract().cells(&leads);
        assert_eq!(cells.len(), Contract::columns().len());
        assert_eq!(cells[1], "Alice");
        assert_eq!(cells[6], "2024-01-01 08:00:00");
    }
}
