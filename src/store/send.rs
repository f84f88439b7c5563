use serde_json::Value;
use tracing::{debug, info, warn};

use super::ChatStore;
use crate::errors::AppError;
use crate::models::{AiContent, DisplayMessage, Message};

impl ChatStore {
    /// Sends one user turn.
    ///
    /// The user's bubble is shown immediately. On success it is swapped in
    /// place for the stored exchange; on failure it stays and an error bubble
    /// follows it. Without an active conversation a new one is started and
    /// adopted. Only one send may be in flight at a time.
    pub async fn send_message(
        &self,
        user_input: &str,
        submitted_data: Option<Value>,
    ) -> Result<AiContent, AppError> {
        if user_input.trim().is_empty() {
            return Err(AppError::EmptyField { field_name: "user_input".to_string() });
        }

        let (pending_key, session_id, generation) = {
            let mut inner = self.lock();
            if inner.sending {
                warn!("rejecting send while another message is in flight");
                return Err(AppError::SendInProgress);
            }
            let pending = DisplayMessage::pending(user_input, submitted_data.clone());
            let key = pending.key.clone();
            inner.view.current_messages.push(pending);
            inner.view.error = None;
            inner.sending = true;
            inner.begin();
            (key, inner.view.current_session_id.clone(), inner.generation)
        };

        // ── Dispatch ─────────────────────────────────────────────────────────
        let result: Result<(Option<String>, Message), AppError> = match &session_id {
            None => self
                .api
                .start_session(user_input, submitted_data)
                .await
                .map(|start| (Some(start.session_id), start.message)),
            Some(id) => self
                .api
                .post_message(id, user_input, submitted_data)
                .await
                .map(|message| (None, message)),
        };

        // ── Commit / compensate ──────────────────────────────────────────────
        let (created, message) = {
            let mut inner = self.lock();
            inner.sending = false;
            inner.finish();
            let still_current = inner.generation == generation;

            match result {
                Ok((created, message)) => {
                    if still_current {
                        if let Some(id) = &created {
                            inner.view.current_session_id = Some(id.clone());
                        }
                        let stored = message.expand();
                        let messages = &mut inner.view.current_messages;
                        let pending_at = messages.iter().position(|m| m.key == pending_key);
                        // A history load may already have delivered this exchange.
                        let already_shown = messages.iter().any(|m| m.key == stored[0].key);
                        match (pending_at, already_shown) {
                            (Some(at), false) => {
                                messages.splice(at..=at, stored);
                            }
                            (Some(at), true) => {
                                messages.remove(at);
                            }
                            (None, false) => messages.extend(stored),
                            (None, true) => {}
                        }
                        if let Some(itinerary) = message.ai_generated_output.itinerary() {
                            inner.view.current_itinerary = Some(itinerary.clone());
                        }
                        info!(message_id = %message.message_id, "message committed");
                    } else {
                        debug!("active conversation changed while sending; reply not shown");
                    }
                    (created, message)
                }
                Err(e) => {
                    if still_current {
                        inner
                            .view
                            .current_messages
                            .push(DisplayMessage::error_notice(&e.display_message()));
                    }
                    inner.note_error("send message", &e);
                    return Err(e);
                }
            }
        };

        if let Some(id) = created {
            info!(session_id = %id, "started new conversation");
            if let Err(e) = self.fetch_sessions(self.page_size).await {
                warn!("session directory refresh after new conversation failed: {e}");
            }
        }

        Ok(message.ai_generated_output)
    }
}
