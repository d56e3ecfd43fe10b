use dioxus::prelude::*;
use store::{Contract, Lead, User};

use super::crud_screen;

#[component]
pub fn LeadsView() -> Element {
    crud_screen::<Lead>("Leads")
}

#[component]
pub fn ContractsView() -> Element {
    crud_screen::<Contract>("Contracts")
}

#[component]
pub fn UsersView() -> Element {
    crud_screen::<User>("Users")
}
