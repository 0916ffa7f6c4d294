use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

use crate::util::lock_or_recover;

#[cfg(test)]
mod tests;

/// published by every write path after the store changes; subscribers should
/// re-derive whatever cached view they hold
pub const PROJECT_DATA_CHANGED: &str = "project_data_changed";

pub type Handler = Arc<dyn Fn() + Send + Sync>;

/// returned by subscribe calls; passing it back to [`EventBus::unsubscribe`] is
/// the owner's deterministic teardown path
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct SubscriptionToken {
    topic: String,
    id: u64,
}

enum Subscriber {
    Strong { id: u64, handler: Handler },
    Weak { id: u64, handler: Weak<dyn Fn() + Send + Sync> },
}

impl Subscriber {
    fn id(&self) -> u64 {
        match self {
            Subscriber::Strong { id, .. } => *id,
            Subscriber::Weak { id, .. } => *id,
        }
    }
}

/// Topic-keyed publish/subscribe channel. Delivery is synchronous, in
/// subscription order, on the publisher's thread; a panicking handler is
/// logged and the remaining handlers still run.
pub struct EventBus {
    topics: Mutex<HashMap<String, Vec<Subscriber>>>,
    next_id: AtomicU64,
}

impl EventBus {
    pub fn new() -> Self {
        EventBus {
            topics: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Registers the handler for the topic. Subscribing the identical handler
    /// (same allocation) twice is a no-op that returns the original token.
    pub fn subscribe(&self, topic: &str, handler: Handler) -> SubscriptionToken {
        let mut topics = lock_or_recover(&self.topics);
        let subscribers = topics.entry(topic.to_string()).or_default();
        for existing in subscribers.iter() {
            if let Subscriber::Strong { id, handler: registered } = existing {
                if Arc::ptr_eq(registered, &handler) {
                    log::debug!("Handler already subscribed to topic {topic}");
                    return SubscriptionToken {
                        topic: topic.to_string(),
                        id: *id,
                    };
                }
            }
        }
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        subscribers.push(Subscriber::Strong { id, handler });
        log::debug!("Subscribed to topic {topic}");
        SubscriptionToken {
            topic: topic.to_string(),
            id,
        }
    }

    /// Registers the handler without keeping it alive: once the owning `Arc`
    /// is dropped, the subscription is silently discarded on the next publish.
    /// This is how short-lived observers listen without explicit teardown.
    pub fn subscribe_weak(&self, topic: &str, handler: &Handler) -> SubscriptionToken {
        let weak = Arc::downgrade(handler);
        let mut topics = lock_or_recover(&self.topics);
        let subscribers = topics.entry(topic.to_string()).or_default();
        for existing in subscribers.iter() {
            if let Subscriber::Weak { id, handler: registered } = existing {
                if registered.ptr_eq(&weak) {
                    log::debug!("Handler already weakly subscribed to topic {topic}");
                    return SubscriptionToken {
                        topic: topic.to_string(),
                        id: *id,
                    };
                }
            }
        }
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        subscribers.push(Subscriber::Weak { id, handler: weak });
        SubscriptionToken {
            topic: topic.to_string(),
            id,
        }
    }

    /// Drops the subscription behind the token. Unknown tokens are ignored.
    pub fn unsubscribe(&self, token: &SubscriptionToken) {
        let mut topics = lock_or_recover(&self.topics);
        if let Some(subscribers) = topics.get_mut(&token.topic) {
            subscribers.retain(|s| s.id() != token.id);
            log::debug!("Unsubscribed from topic {}", token.topic);
        }
    }

    /// Invokes every live handler for the topic, in subscription order. Dead
    /// weak subscriptions are pruned here rather than invoked.
    pub fn publish(&self, topic: &str) {
        // handlers are cloned out so a handler can re-subscribe without deadlocking
        let handlers: Vec<Handler> = {
            let mut topics = lock_or_recover(&self.topics);
            match topics.get_mut(topic) {
                Some(subscribers) => {
                    subscribers.retain(|s| match s {
                        Subscriber::Weak { handler, .. } => handler.strong_count() > 0,
                        Subscriber::Strong { .. } => true,
                    });
                    subscribers
                        .iter()
                        .filter_map(|s| match s {
                            Subscriber::Strong { handler, .. } => Some(handler.clone()),
                            Subscriber::Weak { handler, .. } => handler.upgrade(),
                        })
                        .collect()
                }
                None => Vec::new(),
            }
        };
        for handler in handlers {
            if catch_unwind(AssertUnwindSafe(|| handler())).is_err() {
                log::error!("A subscriber panicked while handling topic {topic}");
            }
        }
        log::debug!("Published topic {topic}");
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
