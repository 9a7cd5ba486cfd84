use std::sync::{Arc, Weak};
use tokio::sync::{broadcast, mpsc, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::{AppError, Result};
use crate::websocket::{ChannelEvent, HandlerId, RealtimeChannel, RECEIVE_NOTIFY};

use super::notification_dto::FeedResponse;
use super::notification_models::{FeedEvent, Toast};
use super::notification_repository::NotificationRepository;
use super::notification_store::NotificationStore;

const BROADCAST_CAPACITY: usize = 100;

/// Reconciles one viewer's feed from the REST snapshot, the live channel, and
/// the delete/mark-read mutations.
///
/// Every result of a network call is tagged with the session generation it
/// started in and dropped if the viewer changed or the session ended in the
/// meantime.
#[derive(Clone)]
pub struct FeedController {
    inner: Arc<FeedInner>,
}

struct FeedInner {
    repository: NotificationRepository,
    channel: RealtimeChannel,
    reconcile_unread: bool,
    session: RwLock<FeedSession>,
    feed_tx: broadcast::Sender<FeedEvent>,
    toast_tx: broadcast::Sender<Toast>,
}

#[derive(Default)]
struct FeedSession {
    viewer_id: Option<String>,
    generation: u64,
    store: NotificationStore,
    subscription: Option<LiveSubscription>,
}

struct LiveSubscription {
    handler_id: HandlerId,
    task: JoinHandle<()>,
}

impl FeedController {
    pub fn new(
        repository: NotificationRepository,
        channel: RealtimeChannel,
        reconcile_unread: bool,
    ) -> Self {
        let (feed_tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        let (toast_tx, _) = broadcast::channel(BROADCAST_CAPACITY);

        Self {
            inner: Arc::new(FeedInner {
                repository,
                channel,
                reconcile_unread,
                session: RwLock::new(FeedSession::default()),
                feed_tx,
                toast_tx,
            }),
        }
    }

    pub fn subscribe_feed(&self) -> broadcast::Receiver<FeedEvent> {
        self.inner.feed_tx.subscribe()
    }

    pub fn subscribe_toasts(&self) -> broadcast::Receiver<Toast> {
        self.inner.toast_tx.subscribe()
    }

    /// Activate `viewer_id`: drop the previous viewer's feed and live handler,
    /// register a fresh handler, then load the snapshot once. Activating the
    /// viewer that is already active does nothing and returns false.
    pub async fn set_viewer(&self, viewer_id: String) -> bool {
        let generation = {
            let mut session = self.inner.session.write().await;
            if session.viewer_id.as_deref() == Some(viewer_id.as_str()) {
                return false;
            }

            self.teardown(&mut session);
            session.viewer_id = Some(viewer_id.clone());
            session.subscription = Some(self.subscribe_live(session.generation));
            session.generation
        };

        info!("Viewer {} activated", viewer_id);
        self.load_snapshot(&viewer_id, generation).await;
        true
    }

    /// End the current session, deregistering the live handler.
    pub async fn end_session(&self) {
        let mut session = self.inner.session.write().await;
        if let Some(viewer_id) = session.viewer_id.take() {
            info!("Viewer {} session ended", viewer_id);
        }
        self.teardown(&mut session);
    }

    pub async fn viewer_id(&self) -> Option<String> {
        self.inner.session.read().await.viewer_id.clone()
    }

    pub async fn snapshot(&self) -> FeedResponse {
        let session = self.inner.session.read().await;
        FeedResponse {
            viewer_id: session.viewer_id.clone(),
            notifications: session.store.notifications().to_vec(),
            unread_count: session.store.unread_count(),
            all_read: session.store.all_read(),
        }
    }

    /// Delete `id` upstream, then locally once the backend confirms.
    pub async fn delete(&self, id: &str) -> Result<()> {
        let (viewer_id, generation) = self.active_viewer().await?;

        match self.inner.repository.delete(id, &viewer_id).await {
            Ok(()) => {
                let mut session = self.inner.session.write().await;
                if session.generation == generation {
                    if session.store.remove(id).is_some() {
                        self.publish(FeedEvent::Removed { id: id.to_string() });
                        self.reconcile(&mut session);
                    }
                    self.toast(Toast::success("Notification deleted"));
                }
                Ok(())
            }
            Err(e) => {
                warn!("Failed to delete notification {}: {}", id, e);
                if self.is_current(generation).await {
                    self.toast(Toast::error("Error deleting notification"));
                }
                Err(e)
            }
        }
    }

    /// Mark `id` read upstream. The local flag follows on success; the badge
    /// counter is left to `update_unread_count` unless reconciliation is on.
    pub async fn mark_read(&self, id: &str) -> Result<()> {
        let (_, generation) = self.active_viewer().await?;

        match self.inner.repository.mark_as_read(id).await {
            Ok(()) => {
                let mut session = self.inner.session.write().await;
                if session.generation == generation {
                    if session.store.mark_read(id) {
                        self.publish(FeedEvent::Read { id: id.to_string() });
                        self.reconcile(&mut session);
                    }
                    self.toast(Toast::success("Update notification success"));
                }
                Ok(())
            }
            Err(e) => {
                warn!("Failed to mark notification {} read: {}", id, e);
                if self.is_current(generation).await {
                    self.toast(Toast::error("Error updating notification"));
                }
                Err(e)
            }
        }
    }

    /// Overwrite the badge counter with a value computed by the view.
    pub async fn update_unread_count(&self, count: usize) {
        let mut session = self.inner.session.write().await;
        session.store.update_unread_count(count);
        self.publish_unread(&session.store);
    }

    async fn active_viewer(&self) -> Result<(String, u64)> {
        let session = self.inner.session.read().await;
        session
            .viewer_id
            .clone()
            .map(|viewer_id| (viewer_id, session.generation))
            .ok_or(AppError::NoActiveViewer)
    }

    async fn is_current(&self, generation: u64) -> bool {
        self.inner.session.read().await.generation == generation
    }

    async fn load_snapshot(&self, viewer_id: &str, generation: u64) {
        let result = self.inner.repository.find_all_by_viewer(viewer_id).await;

        let mut session = self.inner.session.write().await;
        if session.generation != generation {
            debug!("Discarding stale snapshot for {}", viewer_id);
            return;
        }

        match result {
            Ok(mut records) => {
                records.reverse();
                session.store.load(records);
                info!(
                    "Loaded {} notifications for {} ({} unread)",
                    session.store.len(),
                    viewer_id,
                    session.store.unread_count()
                );
                self.publish(FeedEvent::Loaded {
                    notifications: session.store.notifications().to_vec(),
                    unread_count: session.store.unread_count(),
                    all_read: session.store.all_read(),
                });
            }
            Err(e) => {
                warn!("Failed to load notifications for {}: {}", viewer_id, e);
                self.toast(Toast::error("Failed to display notifications"));
            }
        }
    }

    fn subscribe_live(&self, generation: u64) -> LiveSubscription {
        let (tx, mut rx) = mpsc::unbounded_channel::<ChannelEvent>();
        let handler_id = self.inner.channel.on(RECEIVE_NOTIFY, tx);
        debug!(
            "{} handler(s) registered for {}",
            self.inner.channel.handler_count(RECEIVE_NOTIFY),
            RECEIVE_NOTIFY
        );

        // Weak so a dangling task never keeps the controller alive.
        let weak: Weak<FeedInner> = Arc::downgrade(&self.inner);
        let task = tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                let Some(inner) = weak.upgrade() else { break };
                FeedController { inner }
                    .handle_live_event(event, generation)
                    .await;
            }
        });

        LiveSubscription { handler_id, task }
    }

    async fn handle_live_event(&self, event: ChannelEvent, generation: u64) {
        let ChannelEvent::ReceiveNotify { notification, .. } = event;

        let mut session = self.inner.session.write().await;
        if session.generation != generation {
            return;
        }
        let Some(viewer_id) = session.viewer_id.clone() else {
            return;
        };

        let id = notification.id.clone();
        if session.store.prepend(notification.clone(), &viewer_id) {
            debug!("Live notification {} delivered to {}", id, viewer_id);
            self.publish(FeedEvent::Prepended {
                notification,
                unread_count: session.store.unread_count(),
                all_read: session.store.all_read(),
            });
        } else {
            debug!("Ignoring live notification {} for another receiver", id);
        }
    }

    /// Deregister the live handler and discard the feed. Bumps the generation
    /// so in-flight results for the old session are dropped.
    fn teardown(&self, session: &mut FeedSession) {
        if let Some(subscription) = session.subscription.take() {
            self.inner
                .channel
                .off(RECEIVE_NOTIFY, subscription.handler_id);
            subscription.task.abort();
        }
        session.generation += 1;
        session.store.clear();
        self.publish(FeedEvent::Cleared);
    }

    fn reconcile(&self, session: &mut FeedSession) {
        if !self.inner.reconcile_unread {
            return;
        }
        let unread = session.store.count_unread();
        session.store.update_unread_count(unread);
        self.publish_unread(&session.store);
    }

    fn publish_unread(&self, store: &NotificationStore) {
        self.publish(FeedEvent::UnreadCount {
            unread_count: store.unread_count(),
            all_read: store.all_read(),
        });
    }

    fn publish(&self, event: FeedEvent) {
        let _ = self.inner.feed_tx.send(event);
    }

    fn toast(&self, toast: Toast) {
        let _ = self.inner.toast_tx.send(toast);
    }
}
