//! Outbound dispatch.
//!
//! | Event | Send call |
//! |-------|-----------|
//! | text | `send_text(content)` |
//! | photo | `send_image(first blob)` |
//! | video | `send_video(blob)` |
//! | file | `send_file(blob)` |
//! | anything else | rejected |

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, instrument};

use octopus_core::{Ack, Blob, CanonicalEvent, DispatchError, DispatchResult, EventKind};

use crate::model::{Contact, FILE_HELPER, find_by_id};
use crate::session::ChatSession;

/// Sends canonical events through the session.
pub struct Dispatcher {
    session: Arc<dyn ChatSession>,
}

impl Dispatcher {
    pub fn new(session: Arc<dyn ChatSession>) -> Self {
        Self { session }
    }

    /// Delivers `event` to its chat and acknowledges with the provider id.
    #[instrument(
        name = "dispatch",
        skip_all,
        fields(kind = %event.kind, chat = %event.chat.id)
    )]
    pub async fn dispatch(&self, event: &CanonicalEvent) -> DispatchResult<Ack> {
        let target = self.resolve_target(&event.chat.id).await?;
        debug!(kind = %event.kind, to = %target.id, "Dispatching event");

        let sent = match event.kind {
            EventKind::Text => self.session.send_text(&target, &event.content).await?,
            EventKind::Photo => {
                let blob = event
                    .blobs()
                    .and_then(<[Blob]>::first)
                    .or_else(|| event.blob())
                    .ok_or(DispatchError::MissingData(EventKind::Photo))?;
                self.session.send_image(&target, &blob.binary).await?
            }
            EventKind::Video => {
                let blob = required_blob(event)?;
                self.session.send_video(&target, &blob.binary).await?
            }
            EventKind::File => {
                let blob = required_blob(event)?;
                self.session
                    .send_file(&target, &blob.name, &blob.binary)
                    .await?
            }
            kind @ (EventKind::Audio
            | EventKind::App
            | EventKind::Voip
            | EventKind::Revoke
            | EventKind::Sync) => return Err(DispatchError::Unsupported(kind)),
        };

        Ok(Ack {
            id: sent.msg_id,
            timestamp: Utc::now().timestamp(),
        })
    }

    async fn resolve_target(&self, chat_id: &str) -> DispatchResult<Contact> {
        if chat_id == FILE_HELPER {
            return Ok(self.session.file_helper());
        }

        let members = self.session.members().await?;
        find_by_id(&members, chat_id)
            .cloned()
            .ok_or_else(|| DispatchError::ChatNotFound(chat_id.to_string()))
    }
}

fn required_blob(event: &CanonicalEvent) -> DispatchResult<&Blob> {
    event
        .blob()
        .ok_or(DispatchError::MissingData(event.kind))
}
