//! Screens and headless controllers for the CRM console.
//!
//! The command machines ([`crud`], [`kanban`], [`login`]) are plain Rust and
//! tested against [`api::MemoryBackend`]. The components in [`views`] drive
//! them from Dioxus event handlers.

use dioxus::prelude::*;

pub mod context;
pub mod crud;
pub mod hooks;
pub mod kanban;
pub mod login;
pub mod notice;
pub mod views;

mod navbar;
mod notice_tray;

pub use context::{use_console, ConsoleContext, ConsoleProvider};
pub use crud::{CrudCommand, CrudController, CrudState, Effect};
pub use hooks::{use_collection, use_optional_collection, Collection};
pub use kanban::{KanbanController, KanbanState};
pub use navbar::Navbar;
pub use notice::{show_notice, use_notices, Notice, NoticeLevel, NoticeLog};
pub use notice_tray::NoticeTray;

pub const CONSOLE_CSS: Asset = asset!("/assets/console.css");
