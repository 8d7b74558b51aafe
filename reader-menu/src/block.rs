//! Block requests are published here; whoever owns the feed decides what blocking means.
//!
//! The bus is an ordinary value. Create one per process (or per test), share it behind an
//! `Arc`, and drop it when the reader goes away.

use log::{debug, trace};
use reader_post::Post;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};

pub const BLOCK_SITE_EVENT: &str = "ReaderPostMenuBlockSiteNotification";

#[derive(Clone, Debug, PartialEq)]
pub struct BlockRequested {
    pub post: Post,
}

impl BlockRequested {
    pub fn name(&self) -> &'static str {
        BLOCK_SITE_EVENT
    }
}

pub type BlockSubscriber = Arc<dyn Fn(&BlockRequested) + Send + Sync>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Default)]
struct Subscribers {
    next_id: u64,
    entries: Vec<(SubscriptionId, BlockSubscriber)>,
}

#[derive(Default)]
pub struct BlockBus {
    subscribers: Mutex<Subscribers>,
}

impl BlockBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, subscriber: F) -> SubscriptionId
    where
        F: Fn(&BlockRequested) + Send + Sync + 'static,
    {
        let mut subscribers = self.lock();
        let id = SubscriptionId(subscribers.next_id);
        subscribers.next_id += 1;
        subscribers.entries.push((id, Arc::new(subscriber)));
        trace!("block subscriber {:?} added", id);
        id
    }

    /// Subscribe with a channel, for listeners that live on their own task.
    pub fn subscribe_channel(&self) -> (SubscriptionId, UnboundedReceiver<BlockRequested>) {
        let (sender, receiver) = unbounded_channel();
        let id = self.subscribe(move |event: &BlockRequested| {
            if sender.send(event.clone()).is_err() {
                trace!("block channel receiver dropped");
            }
        });
        (id, receiver)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.lock();
        let before = subscribers.entries.len();
        subscribers.entries.retain(|(entry_id, _)| *entry_id != id);
        before != subscribers.entries.len()
    }

    pub fn unsubscribe_all(&self) {
        self.lock().entries.clear();
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().entries.len()
    }

    /// Publishes one event to every current subscriber and returns how many were notified.
    pub fn emit_block_requested(&self, post: &Post) -> usize {
        // Snapshot so subscribers may (un)subscribe from inside their callback.
        let subscribers: Vec<BlockSubscriber> = self
            .lock()
            .entries
            .iter()
            .map(|(_, subscriber)| subscriber.clone())
            .collect();

        debug!(
            "{}: post {} on site {} to {} subscriber(s)",
            BLOCK_SITE_EVENT,
            post.id,
            post.site_id,
            subscribers.len()
        );

        let event = BlockRequested { post: post.clone() };
        for subscriber in subscribers.iter() {
            subscriber(&event);
        }
        subscribers.len()
    }

    fn lock(&self) -> MutexGuard<'_, Subscribers> {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
