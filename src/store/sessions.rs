use tracing::{debug, info};

use super::ChatStore;
use crate::errors::AppError;

impl ChatStore {
    /// Replaces the directory with the `limit` most recently updated
    /// conversations. A full page means more may exist.
    pub async fn fetch_sessions(&self, limit: usize) -> Result<(), AppError> {
        self.lock().sessions_in_flight += 1;

        let result = self.api.list_sessions(limit, None).await;

        let mut inner = self.lock();
        inner.sessions_in_flight -= 1;
        match result {
            Ok(page) => {
                info!(count = page.len(), "loaded session directory");
                inner.view.has_more_sessions = limit > 0 && page.len() == limit;
                inner.view.sessions = page;
                Ok(())
            }
            Err(e) => {
                inner.note_error("fetch sessions", &e);
                Err(e)
            }
        }
    }

    /// Appends the next page of older conversations. Does nothing when the
    /// directory is exhausted, empty, or already being fetched.
    pub async fn fetch_more_sessions(&self, limit: usize) -> Result<(), AppError> {
        let cursor = {
            let mut inner = self.lock();
            if !inner.view.has_more_sessions || inner.sessions_in_flight > 0 {
                debug!("no further session page to fetch");
                return Ok(());
            }
            let Some(last) = inner.view.sessions.last() else {
                return Ok(());
            };
            let cursor = last.updated_at.clone();
            inner.sessions_in_flight += 1;
            cursor
        };

        let result = self.api.list_sessions(limit, Some(&cursor)).await;

        let mut inner = self.lock();
        inner.sessions_in_flight -= 1;
        match result {
            Ok(page) => {
                inner.view.has_more_sessions = limit > 0 && page.len() == limit;
                // A conversation touched between pages can show up twice.
                let fresh: Vec<_> = page
                    .into_iter()
                    .filter(|s| !inner.view.sessions.iter().any(|known| known.id == s.id))
                    .collect();
                info!(count = fresh.len(), "appended older sessions");
                inner.view.sessions.extend(fresh);
                Ok(())
            }
            Err(e) => {
                inner.note_error("fetch more sessions", &e);
                Err(e)
            }
        }
    }

    /// Deletes a conversation. Deleting the active one also resets the
    /// active conversation and trip view.
    pub async fn delete_session(&self, session_id: &str) -> Result<(), AppError> {
        let result = self.api.delete_session(session_id).await;

        let mut inner = self.lock();
        match result {
            Ok(()) => {
                inner.view.sessions.retain(|s| s.id != session_id);
                if inner.view.current_session_id.as_deref() == Some(session_id) {
                    inner.replace_active(None);
                }
                info!(session_id, "deleted session");
                Ok(())
            }
            Err(e) => {
                inner.note_error("delete session", &e);
                Err(e)
            }
        }
    }
}
