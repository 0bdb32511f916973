//! Change notification channel.
//!
//! Every successful mutation publishes a [`ChangeEvent`] naming the address
//! it touched. Observers hold a [`Subscription`] for an address of interest
//! and only see events that concern it:
//!
//! - a change at exactly the watched address,
//! - a change at an ancestor (a collection-wide change reaches item watchers),
//! - a change below it, when the subscription was taken with `descendants`.
//!
//! Delivery is best effort. An observer that falls more than the channel
//! capacity behind receives a single resync event for its own address
//! instead of the events it missed, and should re-query.

use std::sync::atomic::{AtomicU64, Ordering};

use stockroom_core::ResourceAddress;
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tracing::{trace, warn};

/// A change published after a mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    /// The address passed to the mutating operation.
    pub address: ResourceAddress,
    /// Publication order, starting at 1. Zero on resync events.
    pub sequence: u64,
    /// True when events were dropped and the observer should re-query.
    pub resync: bool,
}

impl ChangeEvent {
    fn resync(address: ResourceAddress) -> Self {
        Self {
            address,
            sequence: 0,
            resync: true,
        }
    }
}

/// Which changes a subscription wants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interest {
    pub address: ResourceAddress,
    pub descendants: bool,
}

impl Interest {
    pub fn matches(&self, changed: &ResourceAddress) -> bool {
        *changed == self.address
            || changed.is_ancestor_of(&self.address)
            || (self.descendants && self.address.is_ancestor_of(changed))
    }
}

/// Fan-out publisher shared by every mutation path of one gateway.
pub struct ChangeNotifier {
    tx: broadcast::Sender<ChangeEvent>,
    sequence: AtomicU64,
}

impl ChangeNotifier {
    /// Create a notifier buffering up to `capacity` events per observer.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self {
            tx,
            sequence: AtomicU64::new(0),
        }
    }

    /// Publish a change. Returns the event's sequence number.
    ///
    /// Never fails: with no observers the event is simply dropped.
    pub fn notify(&self, address: &ResourceAddress) -> u64 {
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let event = ChangeEvent {
            address: address.clone(),
            sequence,
            resync: false,
        };
        let receivers = self.tx.send(event).unwrap_or(0);
        trace!(%address, sequence, receivers, "change published");
        sequence
    }

    /// Register an observer for `address`.
    pub fn subscribe(&self, address: ResourceAddress, descendants: bool) -> Subscription {
        Subscription {
            rx: self.tx.subscribe(),
            interest: Interest {
                address,
                descendants,
            },
        }
    }

    /// Number of live subscriptions.
    pub fn observer_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

/// A live observer registration. Dropping it unregisters.
pub struct Subscription {
    rx: broadcast::Receiver<ChangeEvent>,
    interest: Interest,
}

impl Subscription {
    pub fn interest(&self) -> &Interest {
        &self.interest
    }

    /// Wait for the next matching change.
    ///
    /// Returns `None` once the notifier is gone.
    pub async fn changed(&mut self) -> Option<ChangeEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) if self.interest.matches(&event.address) => return Some(event),
                Ok(_) => continue,
                Err(RecvError::Lagged(missed)) => {
                    warn!(address = %self.interest.address, missed, "observer lagged");
                    return Some(ChangeEvent::resync(self.interest.address.clone()));
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// The next matching change that is already buffered, if any.
    pub fn try_changed(&mut self) -> Option<ChangeEvent> {
        loop {
            match self.rx.try_recv() {
                Ok(event) if self.interest.matches(&event.address) => return Some(event),
                Ok(_) => continue,
                Err(TryRecvError::Lagged(missed)) => {
                    warn!(address = %self.interest.address, missed, "observer lagged");
                    return Some(ChangeEvent::resync(self.interest.address.clone()));
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return None,
            }
        }
    }
}
