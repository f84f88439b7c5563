use std::collections::HashSet;

use tracing::{debug, info};

use super::ChatStore;
use crate::errors::AppError;
use crate::models::{DisplayMessage, Message, MessageKey};

impl ChatStore {
    /// Makes `session_id` the active conversation and loads its history.
    /// `None` returns to an empty, unsaved conversation without a request.
    ///
    /// If another session is selected before the history arrives, the late
    /// response is dropped. Messages sent while the history loads are kept
    /// after it.
    pub async fn set_current_session(&self, session_id: Option<&str>) -> Result<(), AppError> {
        let Some(session_id) = session_id else {
            self.lock().replace_active(None);
            return Ok(());
        };

        let generation = {
            let mut inner = self.lock();
            inner.replace_active(Some(session_id.to_string()));
            inner.view.error = None;
            inner.begin();
            inner.generation
        };

        let result = self.api.get_session(session_id).await;

        let mut inner = self.lock();
        inner.finish();
        if inner.generation != generation {
            debug!(session_id, "discarding history for a session that is no longer active");
            return Ok(());
        }

        match result {
            Ok(messages) => {
                let mut loaded: Vec<DisplayMessage> =
                    messages.iter().flat_map(Message::expand).collect();
                // Bubbles from sends made while loading come after the stored
                // history, minus any exchange the history already contains.
                let known: HashSet<MessageKey> = loaded.iter().map(|m| m.key.clone()).collect();
                let local = std::mem::take(&mut inner.view.current_messages);
                loaded.extend(local.into_iter().filter(|m| !known.contains(&m.key)));
                inner.view.current_messages = loaded;

                // Only the latest reply's itinerary counts; a send that
                // committed during the load is newer than anything stored.
                if inner.view.current_itinerary.is_none() {
                    inner.view.current_itinerary = messages
                        .last()
                        .and_then(|m| m.ai_generated_output.itinerary())
                        .cloned();
                }
                info!(session_id, exchanges = messages.len(), "loaded conversation");
                Ok(())
            }
            Err(e) => {
                inner.note_error("load conversation", &e);
                Err(e)
            }
        }
    }
}
