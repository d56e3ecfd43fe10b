//! App-wide services shared through Dioxus context.

use api::{ApiError, Backend, MemoryBackend, MockLogin};
use dioxus::prelude::*;
use store::{ConsoleConfig, ResourceCache};

use crate::notice::NoticeLog;

/// Backend, cache and login gate for one running console.
#[derive(Clone)]
pub struct ConsoleContext {
    pub api: Backend,
    pub cache: ResourceCache,
    pub login: MockLogin,
}

impl ConsoleContext {
    pub fn from_config(config: &ConsoleConfig) -> Result<Self, ApiError> {
        Ok(Self {
            api: Backend::from_config(config)?,
            cache: ResourceCache::new(),
            login: MockLogin::new(&config.login),
        })
    }

    /// A context over an in-memory backend, for demos and tests.
    pub fn in_memory(backend: MemoryBackend, config: &ConsoleConfig) -> Self {
        Self {
            api: Backend::Memory(backend),
            cache: ResourceCache::new(),
            login: MockLogin::new(&config.login),
        }
    }
}

pub fn use_console() -> ConsoleContext {
    use_context::<ConsoleContext>()
}

/// Provides [`ConsoleContext`] and the notice log to everything below it.
#[component]
pub fn ConsoleProvider(config: ConsoleConfig, children: Element) -> Element {
    use_context_provider(move || match ConsoleContext::from_config(&config) {
        Ok(console) => console,
        Err(e) => {
            tracing::error!("backend unavailable, falling back to memory: {e}");
            ConsoleContext::in_memory(MemoryBackend::new(), &config)
        }
    });
    use_context_provider(|| Signal::new(NoticeLog::default()));

    rsx! {
        {children}
    }
}
