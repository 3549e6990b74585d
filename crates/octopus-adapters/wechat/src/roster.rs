//! Roster snapshots.
//!
//! A snapshot is a single `sync` event listing every chat the account can
//! reach, in a fixed order:
//!
//! 1. the account itself (private chat)
//! 2. friends (private chats)
//! 3. groups (group chats)
//!
//! A failed directory query leaves its section empty instead of aborting the
//! snapshot.

use chrono::Utc;
use tracing::{debug, instrument, warn};

use octopus_core::{CanonicalEvent, Chat, EventData, EventKind, Vendor};

use crate::model::Contact;
use crate::session::ChatSession;

/// Id of every snapshot event.
pub const SYNC_EVENT_ID: &str = "sync";

/// Builds a snapshot of the account's chats, stamped in milliseconds.
#[instrument(name = "roster_snapshot", skip_all, fields(uid = %vendor.uid))]
pub async fn snapshot(session: &dyn ChatSession, me: &Contact, vendor: &Vendor) -> CanonicalEvent {
    let mut chats = vec![Chat::private(&me.id, &me.nick_name)];

    match session.friends().await {
        Ok(friends) => chats.extend(
            friends
                .iter()
                .filter(|f| !f.id.is_empty())
                .map(|f| Chat::private(&f.id, f.title())),
        ),
        Err(e) => warn!(error = %e, "Failed to get friend list"),
    }

    match session.groups().await {
        Ok(groups) => chats.extend(
            groups
                .iter()
                .filter(|g| !g.id.is_empty())
                .map(|g| Chat::group(&g.id, g.group_title())),
        ),
        Err(e) => warn!(error = %e, "Failed to get group list"),
    }

    debug!(chats = chats.len(), "Roster snapshot built");

    let timestamp = Utc::now().timestamp_millis();
    let mut event = CanonicalEvent::new(vendor.clone(), SYNC_EVENT_ID, timestamp);
    event.kind = EventKind::Sync;
    event.data = Some(EventData::Chats(chats));
    event
}
