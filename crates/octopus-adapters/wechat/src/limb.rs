//! WeChat limb lifecycle.
//!
//! After `start` two tasks run until `stop`:
//!
//! - **message loop**: pulls messages from the session one at a time,
//!   classifies them and pushes the resulting events, so ordering from the
//!   session is kept end to end;
//! - **roster timer**: waits `sync_delay`, then spawns a snapshot every
//!   `sync_interval`. Snapshots run on their own tasks and may overlap.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use octopus_core::{
    Ack, BoxedSink, CanonicalEvent, DispatchResult, Limb, LimbError, LimbResult, Vendor,
};
use octopus_transport::AttachmentResolver;

use crate::config::WechatConfig;
use crate::inbound::Classifier;
use crate::model::Contact;
use crate::outbound::Dispatcher;
use crate::roster;
use crate::session::ChatSession;

/// Vendor type reported on every event.
pub const VENDOR_TYPE: &str = "wechat";

#[derive(Debug, Clone)]
struct Account {
    me: Contact,
    vendor: Vendor,
}

/// Bridges a WeChat session to an event sink.
pub struct WechatLimb {
    config: WechatConfig,
    session: Arc<dyn ChatSession>,
    resolver: AttachmentResolver,
    dispatcher: Dispatcher,
    sink: BoxedSink,
    account: RwLock<Option<Account>>,
    shutdown: CancellationToken,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl WechatLimb {
    /// Creates a limb. The session is not touched until [`Limb::login`].
    pub fn new(
        config: WechatConfig,
        session: Arc<dyn ChatSession>,
        sink: BoxedSink,
    ) -> LimbResult<Self> {
        config.validate()?;
        let resolver = AttachmentResolver::new(&config.http)?;

        Ok(Self {
            dispatcher: Dispatcher::new(session.clone()),
            config,
            session,
            resolver,
            sink,
            account: RwLock::new(None),
            shutdown: CancellationToken::new(),
            tasks: Mutex::new(Vec::new()),
        })
    }

    /// Builds and pushes a roster snapshot right away.
    pub async fn sync_now(&self) -> LimbResult<()> {
        let account = self.account()?;
        let event = roster::snapshot(self.session.as_ref(), &account.me, &account.vendor).await;
        self.sink.push(event).await;
        Ok(())
    }

    fn account(&self) -> LimbResult<Account> {
        self.account.read().clone().ok_or(LimbError::NotLoggedIn)
    }
}

#[async_trait]
impl Limb for WechatLimb {
    fn name(&self) -> &'static str {
        VENDOR_TYPE
    }

    fn vendor(&self) -> Option<Vendor> {
        self.account.read().as_ref().map(|a| a.vendor.clone())
    }

    async fn login(&self) -> LimbResult<()> {
        self.session.login().await?;
        let me = self.session.current_user().await?;
        if me.id.is_empty() {
            return Err(LimbError::MissingSelfId);
        }

        info!(id = %me.id, nickname = %me.nick_name, "Logged in");
        *self.account.write() = Some(Account {
            vendor: Vendor::new(VENDOR_TYPE, &me.id),
            me,
        });
        Ok(())
    }

    async fn start(&self) -> LimbResult<()> {
        let account = self.account()?;
        let mut tasks = self.tasks.lock();
        if !tasks.is_empty() {
            return Err(LimbError::AlreadyStarted);
        }

        let classifier = Classifier::new(
            self.session.clone(),
            self.resolver.clone(),
            account.me.clone(),
            account.vendor.clone(),
        );
        tasks.push(tokio::spawn(message_loop(
            self.session.clone(),
            classifier,
            self.sink.clone(),
            self.shutdown.clone(),
        )));
        tasks.push(tokio::spawn(roster_timer(
            self.config.clone(),
            self.session.clone(),
            account,
            self.sink.clone(),
            self.shutdown.clone(),
        )));

        info!("WeChat limb started");
        Ok(())
    }

    async fn stop(&self) {
        info!("WeChat limb stopping");
        self.shutdown.cancel();

        if let Err(e) = self.session.logout().await {
            warn!(error = %e, "Failed to log out");
        }

        // Tasks observe the token; their handles are detached, not aborted.
        self.tasks.lock().clear();
    }

    async fn dispatch(&self, event: &CanonicalEvent) -> DispatchResult<Ack> {
        self.dispatcher.dispatch(event).await
    }
}

async fn message_loop(
    session: Arc<dyn ChatSession>,
    classifier: Classifier,
    sink: BoxedSink,
    shutdown: CancellationToken,
) {
    loop {
        let message = tokio::select! {
            () = shutdown.cancelled() => break,
            message = session.next_message() => message,
        };
        let Some(message) = message else {
            info!("Session message stream ended");
            break;
        };

        if let Some(event) = classifier.classify(&message).await {
            sink.push(event).await;
        }
    }
    debug!("Message loop stopped");
}

async fn roster_timer(
    config: WechatConfig,
    session: Arc<dyn ChatSession>,
    account: Account,
    sink: BoxedSink,
    shutdown: CancellationToken,
) {
    tokio::select! {
        () = shutdown.cancelled() => return,
        () = time::sleep(config.sync_delay()) => {}
    }
    spawn_snapshot(&session, &account, &sink);

    let period = config.sync_interval();
    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    info!(interval_secs = config.sync_interval_secs, "Roster sync scheduled");

    loop {
        tokio::select! {
            () = shutdown.cancelled() => break,
            _ = ticker.tick() => spawn_snapshot(&session, &account, &sink),
        }
    }
    debug!("Roster timer stopped");
}

fn spawn_snapshot(session: &Arc<dyn ChatSession>, account: &Account, sink: &BoxedSink) {
    let session = session.clone();
    let account = account.clone();
    let sink = sink.clone();
    tokio::spawn(async move {
        let event = roster::snapshot(session.as_ref(), &account.me, &account.vendor).await;
        sink.push(event).await;
    });
}
