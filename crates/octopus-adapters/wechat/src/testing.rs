//! In-memory session used by the unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::Response;
use tracing::Subscriber;
use tracing::dispatcher::DefaultGuard;
use tracing::span::{Attributes, Id};
use tracing_subscriber::Registry;
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

use octopus_core::{SessionError, SessionResult};

use crate::model::{Contact, WechatMessage, find_by_user_name};
use crate::session::{ChatSession, SentMessage};

pub(crate) fn contact(id: &str, nick: &str) -> Contact {
    Contact {
        id: id.into(),
        user_name: format!("@{id}"),
        nick_name: nick.into(),
        ..Default::default()
    }
}

pub(crate) fn group(id: &str, nick: &str) -> Contact {
    Contact {
        id: id.into(),
        user_name: format!("@@{id}"),
        nick_name: nick.into(),
        ..Default::default()
    }
}

/// Names of the spans opened on this thread while the guard lives.
pub(crate) fn record_spans() -> (DefaultGuard, Arc<Mutex<Vec<&'static str>>>) {
    let names = Arc::new(Mutex::new(Vec::new()));
    let subscriber = Registry::default().with(SpanNames(names.clone()));
    (tracing::subscriber::set_default(subscriber), names)
}

struct SpanNames(Arc<Mutex<Vec<&'static str>>>);

impl<S: Subscriber> Layer<S> for SpanNames {
    fn on_new_span(&self, attrs: &Attributes<'_>, _id: &Id, _ctx: Context<'_, S>) {
        self.0.lock().push(attrs.metadata().name());
    }
}

/// A send recorded by [`MockSession`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Sent {
    pub kind: &'static str,
    pub to: String,
    pub name: String,
    pub payload: Vec<u8>,
}

#[derive(Default)]
pub(crate) struct MockSession {
    pub me: Contact,
    pub friends: Vec<Contact>,
    pub groups: Vec<Contact>,
    /// Group members keyed by session username.
    pub group_members: Vec<Contact>,
    /// File URLs keyed by message id.
    pub files: HashMap<String, String>,
    pub fail_directory: bool,
    pub messages: Mutex<VecDeque<WechatMessage>>,
    pub sent: Mutex<Vec<Sent>>,
    pub member_queries: AtomicUsize,
    pub logged_out: AtomicBool,
}

impl MockSession {
    pub fn new() -> Self {
        Self {
            me: contact("self", "Me"),
            ..Default::default()
        }
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().clone()
    }

    pub fn member_queries(&self) -> usize {
        self.member_queries.load(Ordering::SeqCst)
    }

    fn directory(&self) -> SessionResult<Vec<Contact>> {
        if self.fail_directory {
            return Err(SessionError::Request("directory unavailable".into()));
        }
        Ok(self.friends.iter().chain(&self.groups).cloned().collect())
    }

    fn record(&self, kind: &'static str, to: &Contact, name: &str, payload: &[u8]) -> SentMessage {
        let mut sent = self.sent.lock();
        sent.push(Sent {
            kind,
            to: to.user_name.clone(),
            name: name.to_string(),
            payload: payload.to_vec(),
        });
        SentMessage {
            msg_id: format!("sent-{}", sent.len()),
            local_id: String::new(),
        }
    }
}

#[async_trait]
impl ChatSession for MockSession {
    async fn login(&self) -> SessionResult<()> {
        Ok(())
    }

    async fn current_user(&self) -> SessionResult<Contact> {
        Ok(self.me.clone())
    }

    async fn friends(&self) -> SessionResult<Vec<Contact>> {
        if self.fail_directory {
            return Err(SessionError::Request("directory unavailable".into()));
        }
        Ok(self.friends.clone())
    }

    async fn groups(&self) -> SessionResult<Vec<Contact>> {
        if self.fail_directory {
            return Err(SessionError::Request("directory unavailable".into()));
        }
        Ok(self.groups.clone())
    }

    async fn members(&self) -> SessionResult<Vec<Contact>> {
        self.member_queries.fetch_add(1, Ordering::SeqCst);
        self.directory()
    }

    async fn next_message(&self) -> Option<WechatMessage> {
        self.messages.lock().pop_front()
    }

    async fn get_file(&self, message: &WechatMessage) -> SessionResult<Response> {
        let url = self
            .files
            .get(&message.msg_id)
            .ok_or_else(|| SessionError::NotFound(format!("file of {}", message.msg_id)))?;
        reqwest::get(url)
            .await
            .map_err(|e| SessionError::Request(e.to_string()))
    }

    async fn sender(&self, message: &WechatMessage) -> SessionResult<Contact> {
        let directory = self.directory()?;
        find_by_user_name(&directory, &message.from_user_name)
            .cloned()
            .ok_or_else(|| SessionError::NotFound(message.from_user_name.clone()))
    }

    async fn sender_in_group(&self, message: &WechatMessage) -> SessionResult<Contact> {
        let author = message.content.split(':').next().unwrap_or_default();
        find_by_user_name(&self.group_members, author)
            .cloned()
            .ok_or_else(|| SessionError::NotFound(author.to_string()))
    }

    async fn send_text(&self, to: &Contact, text: &str) -> SessionResult<SentMessage> {
        Ok(self.record("text", to, "", text.as_bytes()))
    }

    async fn send_image(&self, to: &Contact, data: &[u8]) -> SessionResult<SentMessage> {
        Ok(self.record("image", to, "", data))
    }

    async fn send_video(&self, to: &Contact, data: &[u8]) -> SessionResult<SentMessage> {
        Ok(self.record("video", to, "", data))
    }

    async fn send_file(&self, to: &Contact, name: &str, data: &[u8]) -> SessionResult<SentMessage> {
        Ok(self.record("file", to, name, data))
    }

    async fn logout(&self) -> SessionResult<()> {
        self.logged_out.store(true, Ordering::SeqCst);
        Ok(())
    }
}
