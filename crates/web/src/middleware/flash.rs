//! Flash messages.
//!
//! Notices set while handling one request and shown on the next rendered
//! page. They live in the session and are removed when read.

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::models::session_keys;

/// Pending flash messages, grouped by kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    #[serde(default)]
    pub success: Vec<String>,
    #[serde(default)]
    pub error: Vec<String>,
}

impl Flash {
    /// Whether there is nothing to show.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.success.is_empty() && self.error.is_empty()
    }
}

/// Queue a success notice.
pub async fn flash_success(session: &Session, message: impl Into<String>) {
    push(session, |flash| flash.success.push(message.into())).await;
}

/// Queue an error notice.
pub async fn flash_error(session: &Session, message: impl Into<String>) {
    push(session, |flash| flash.error.push(message.into())).await;
}

/// Remove and return every pending notice.
///
/// A session that cannot be read yields no messages.
pub async fn take_flash(session: &Session) -> Flash {
    match session.remove::<Flash>(session_keys::FLASH).await {
        Ok(flash) => flash.unwrap_or_default(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read flash messages");
            Flash::default()
        }
    }
}

async fn push(session: &Session, add: impl FnOnce(&mut Flash)) {
    let mut flash = session
        .get::<Flash>(session_keys::FLASH)
        .await
        .ok()
        .flatten()
        .unwrap_or_default();
    add(&mut flash);

    if let Err(e) = session.insert(session_keys::FLASH, flash).await {
        tracing::warn!(error = %e, "Failed to store flash message");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::MemoryStore;

    use super::*;

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    #[tokio::test]
    async fn test_flash_is_taken_once() {
        let session = session();
        flash_success(&session, "Created a new campground!").await;
        flash_error(&session, "Oops").await;
        flash_success(&session, "Welcome back!").await;

        let flash = take_flash(&session).await;
        assert_eq!(flash.success, vec!["Created a new campground!", "Welcome back!"]);
        assert_eq!(flash.error, vec!["Oops"]);

        assert!(take_flash(&session).await.is_empty());
    }
}
