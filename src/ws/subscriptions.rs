//! Subscription tracking for replay after reconnect.
//!
//! The server forgets subscriptions when a connection drops. The registry
//! remembers what the application asked for so the supervisor can re-send
//! it after authentication when `resubscribe_on_reconnect` is enabled.

use super::MessageOut;
use crate::shared::{FeedType, SubscriptionKey};

/// One tracked subscription.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Subscription {
    MarketData { feed: FeedType, key: SubscriptionKey },
    Orders { account_id: String },
}

impl Subscription {
    pub fn subscription_key(&self) -> String {
        match self {
            Subscription::MarketData {
                feed: FeedType::Touchline,
                key,
            } => format!("touchline:{}", key),
            Subscription::MarketData {
                feed: FeedType::SnapQuote,
                key,
            } => format!("snapquote:{}", key),
            Subscription::Orders { account_id } => format!("orders:{}", account_id),
        }
    }
}

/// Insertion-ordered set of active subscriptions.
#[derive(Debug, Clone, Default)]
pub struct SubscriptionRegistry {
    active: Vec<Subscription>,
}

impl SubscriptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update the registry from an outbound frame. Frames that are not
    /// (un)subscriptions are ignored.
    pub fn track(&mut self, message: &MessageOut) {
        match message {
            MessageOut::Touchline { k } => self.add_keys(FeedType::Touchline, k),
            MessageOut::SnapQuote { k } => self.add_keys(FeedType::SnapQuote, k),
            MessageOut::UnsubscribeTouchline { k } => self.remove_keys(FeedType::Touchline, k),
            MessageOut::UnsubscribeSnapQuote { k } => self.remove_keys(FeedType::SnapQuote, k),
            MessageOut::OrderWatch { actid } => self.insert(Subscription::Orders {
                account_id: actid.clone(),
            }),
            MessageOut::OrderUnwatch => self
                .active
                .retain(|s| !matches!(s, Subscription::Orders { .. })),
            MessageOut::Connect(_) | MessageOut::Heartbeat => {}
        }
    }

    pub fn active(&self) -> &[Subscription] {
        &self.active
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn clear(&mut self) {
        self.active.clear();
    }

    /// Frames that re-establish every tracked subscription: one frame per feed
    /// type carrying all its keys, then the order watch.
    pub fn replay(&self) -> Vec<MessageOut> {
        let mut frames = Vec::new();
        for feed in [FeedType::Touchline, FeedType::SnapQuote] {
            let keys: Vec<SubscriptionKey> = self
                .active
                .iter()
                .filter_map(|s| match s {
                    Subscription::MarketData { feed: f, key } if *f == feed => Some(key.clone()),
                    _ => None,
                })
                .collect();
            if !keys.is_empty() {
                frames.push(MessageOut::subscribe(&keys, feed));
            }
        }
        for s in &self.active {
            if let Subscription::Orders { account_id } = s {
                frames.push(MessageOut::order_watch(account_id));
            }
        }
        frames
    }

    fn insert(&mut self, subscription: Subscription) {
        let key = subscription.subscription_key();
        if !self.active.iter().any(|s| s.subscription_key() == key) {
            self.active.push(subscription);
        }
    }

    fn add_keys(&mut self, feed: FeedType, joined: &str) {
        for key in split_keys(joined) {
            self.insert(Subscription::MarketData { feed, key });
        }
    }

    fn remove_keys(&mut self, feed: FeedType, joined: &str) {
        let removed: Vec<SubscriptionKey> = split_keys(joined).collect();
        self.active.retain(|s| match s {
            Subscription::MarketData { feed: f, key } => !(*f == feed && removed.contains(key)),
            Subscription::Orders { .. } => true,
        });
    }
}

fn split_keys(joined: &str) -> impl Iterator<Item = SubscriptionKey> + '_ {
    joined
        .split('#')
        .filter(|k| !k.is_empty())
        .map(SubscriptionKey::from)
}
