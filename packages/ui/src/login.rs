//! The placeholder login form's behaviour, separate from its markup.

use api::MockLogin;
use store::{validate, FieldErrors, FieldKind, FieldSpec, FormValues};

use crate::notice::Notice;

pub const LOGIN_SUCCESS: &str = "Login successful!";

pub fn login_fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec::required(
            "username",
            "Username",
            FieldKind::Text,
            "Please input your username!",
        ),
        FieldSpec::required(
            "password",
            "Password",
            FieldKind::Password,
            "Please input your password!",
        ),
    ]
}

#[derive(Clone, Debug, PartialEq)]
pub enum LoginOutcome {
    /// A field was left empty; nothing was checked.
    Incomplete(FieldErrors),
    Rejected(Notice),
    Accepted(Notice),
}

/// Presence-check the form, then ask the gate.
pub async fn submit_login(gate: &MockLogin, values: &FormValues) -> LoginOutcome {
    if let Err(errors) = validate(&login_fields(), values) {
        return LoginOutcome::Incomplete(errors);
    }
    let username = values.text("username");
    let password = values.get("password").unwrap_or_default();
    match gate.login(&username, password).await {
        Ok(()) => LoginOutcome::Accepted(Notice::success(LOGIN_SUCCESS)),
        Err(e) => LoginOutcome::Rejected(Notice::error(e.to_string())),
    }
}
