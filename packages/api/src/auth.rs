//! Placeholder login gate.
//!
//! There is no session and no token. [`MockLogin`] waits for the configured
//! delay and then compares against one hard-coded credential pair.

use std::time::Duration;

use store::config::LoginConfig;
use thiserror::Error;

pub const DEMO_USERNAME: &str = "admin";
pub const DEMO_PASSWORD: &str = "admin";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AuthError {
    #[error("Invalid username or password!")]
    InvalidCredentials,
}

#[derive(Clone, Debug)]
pub struct MockLogin {
    delay: Duration,
}

impl MockLogin {
    pub fn new(config: &LoginConfig) -> Self {
        Self {
            delay: Duration::from_millis(config.delay_ms),
        }
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<(), AuthError> {
        sleep(self.delay).await;
        if username == DEMO_USERNAME && password == DEMO_PASSWORD {
            tracing::info!("login accepted for {username}");
            Ok(())
        } else {
            tracing::info!("login rejected for {username}");
            Err(AuthError::InvalidCredentials)
        }
    }
}

async fn sleep(delay: Duration) {
    if delay.is_zero() {
        return;
    }
    #[cfg(target_arch = "wasm32")]
    gloo_timers::future::sleep(delay).await;
    #[cfg(not(target_arch = "wasm32"))]
    tokio::time::sleep(delay).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate(delay_ms: u64) -> MockLogin {
        MockLogin::new(&LoginConfig { delay_ms })
    }

    #[tokio::test]
    async fn test_demo_credentials_pass() {
        assert_eq!(gate(0).login("admin", "admin").await, Ok(()));
    }

    #[tokio::test]
    async fn test_anything_else_is_rejected() {
        let login = gate(5);
        assert_eq!(
            login.login("admin", "wrong").await,
            Err(AuthError::InvalidCredentials)
        );
        assert_eq!(
            login.login("root", "admin").await,
            Err(AuthError::InvalidCredentials)
        );
    }
}
