//! Transient operator notices ("Lead created successfully!" and friends).
//!
//! Controllers return a [`Notice`]; the app keeps the recent ones in a
//! [`NoticeLog`] signal shared through context, and [`crate::NoticeTray`]
//! renders them.

use std::time::Duration;

use dioxus::prelude::*;

/// How long a notice stays on screen.
pub const NOTICE_TTL: Duration = Duration::from_secs(3);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NoticeEntry {
    pub id: u64,
    pub timestamp: String,
    pub notice: Notice,
}

#[derive(Clone, Debug, Default)]
pub struct NoticeLog {
    pub entries: Vec<NoticeEntry>,
    next_id: u64,
}

impl NoticeLog {
    /// Append a notice, returning the id to dismiss it with.
    pub fn push(&mut self, notice: Notice) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push(NoticeEntry {
            id,
            timestamp: chrono::Local::now().format("%H:%M:%S").to_string(),
            notice,
        });
        id
    }

    pub fn dismiss(&mut self, id: u64) {
        self.entries.retain(|entry| entry.id != id);
    }

    pub fn messages(&self) -> Vec<&str> {
        self.entries
            .iter()
            .map(|entry| entry.notice.message.as_str())
            .collect()
    }
}

pub fn use_notices() -> Signal<NoticeLog> {
    use_context::<Signal<NoticeLog>>()
}

/// Show `notice` and schedule its removal after [`NOTICE_TTL`].
pub fn show_notice(log: &mut Signal<NoticeLog>, notice: Notice) {
    if notice.is_error() {
        tracing::warn!("{}", notice.message);
    } else {
        tracing::info!("{}", notice.message);
    }
    let id = log.write().push(notice);
    let mut log = *log;
    spawn(async move {
        sleep(NOTICE_TTL).await;
        log.write().dismiss(id);
    });
}

pub(crate) async fn sleep(delay: Duration) {
    #[cfg(target_arch = "wasm32")]
    gloo_timers::future::sleep(delay).await;
    #[cfg(not(target_arch = "wasm32"))]
    tokio::time::sleep(delay).await;
}
