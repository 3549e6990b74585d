//! Chat session contract.
//!
//! The limb never talks to the provider directly. Everything it needs from
//! the logged-in web client goes through [`ChatSession`], which keeps the
//! protocol client (login polling, sync keys, uploads) out of this crate.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Response;

use octopus_core::SessionResult;

use crate::model::{Contact, WechatMessage};

/// Result of a successful send call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SentMessage {
    /// Provider-assigned message id.
    pub msg_id: String,
    /// Client-generated id used for the upload.
    pub local_id: String,
}

/// A logged-in provider session.
#[async_trait]
pub trait ChatSession: Send + Sync + 'static {
    /// Authenticates the session, blocking until the login completes.
    async fn login(&self) -> SessionResult<()>;

    /// Returns the logged-in account.
    async fn current_user(&self) -> SessionResult<Contact>;

    /// Returns the friend list.
    async fn friends(&self) -> SessionResult<Vec<Contact>>;

    /// Returns the group list.
    async fn groups(&self) -> SessionResult<Vec<Contact>>;

    /// Returns every known contact, friends and groups alike.
    async fn members(&self) -> SessionResult<Vec<Contact>>;

    /// Returns the file transfer helper.
    fn file_helper(&self) -> Contact {
        Contact::file_helper()
    }

    /// Waits for the next message. `None` means the session has ended.
    async fn next_message(&self) -> Option<WechatMessage>;

    /// Starts the download of the file attached to `message`.
    async fn get_file(&self, message: &WechatMessage) -> SessionResult<Response>;

    /// Resolves the conversation partner: the friend, or the group for group
    /// messages.
    async fn sender(&self, message: &WechatMessage) -> SessionResult<Contact>;

    /// Resolves the group member who authored a group message.
    async fn sender_in_group(&self, message: &WechatMessage) -> SessionResult<Contact>;

    async fn send_text(&self, to: &Contact, text: &str) -> SessionResult<SentMessage>;

    async fn send_image(&self, to: &Contact, data: &[u8]) -> SessionResult<SentMessage>;

    async fn send_video(&self, to: &Contact, data: &[u8]) -> SessionResult<SentMessage>;

    async fn send_file(&self, to: &Contact, name: &str, data: &[u8]) -> SessionResult<SentMessage>;

    /// Terminates the session.
    async fn logout(&self) -> SessionResult<()>;
}

/// A shared session trait object.
pub type BoxedSession = Arc<dyn ChatSession>;
