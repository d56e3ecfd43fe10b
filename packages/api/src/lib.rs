//! # API crate — the console's resource client
//!
//! Everything that leaves the browser goes through this crate. Screens only
//! see the [`ResourceApi`] trait; which implementation sits behind it is
//! decided once, when the app starts.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`client`] | The [`ResourceApi`] trait (list/get/create/update/delete over raw JSON) and the typed [`ResourceClient`] view |
//! | [`rest`] | [`RestClient`]: reqwest against `{base_url}/{leads,contracts,users}` with JSON bodies |
//! | [`backend`] | [`Backend`]: whichever of the two `console.toml` selects |
//! | [`memory`] | [`MemoryBackend`]: the same contract held in memory, with a call log and failure injection |
//! | [`query`] | [`fetch_collection`]: cache-aware collection reads |
//! | [`auth`] | [`MockLogin`]: the placeholder login gate |
//! | [`error`] | [`ApiError`] |

pub mod auth;
pub mod backend;
pub mod client;
pub mod error;
pub mod memory;
pub mod query;
pub mod rest;

pub use auth::{AuthError, MockLogin};
pub use backend::Backend;
pub use client::{ResourceApi, ResourceClient};
pub use error::ApiError;
pub use memory::MemoryBackend;
pub use query::fetch_collection;
pub use rest::RestClient;
