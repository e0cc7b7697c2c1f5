//! Shared application state.

use fawry_core::signing::NotificationVerifier;
use tokio::sync::broadcast;

use crate::events::PaymentEvent;

pub struct AppState {
    pub verifier: NotificationVerifier,
    /// Authenticated notifications only.
    pub events_tx: broadcast::Sender<PaymentEvent>,
}

impl AppState {
    pub fn new(security_key: &str, channel_capacity: usize) -> Self {
        let (events_tx, _) = broadcast::channel(channel_capacity.max(1));
        Self {
            verifier: NotificationVerifier::new(security_key),
            events_tx,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PaymentEvent> {
        self.events_tx.subscribe()
    }

    /// Broadcast `event`; returns how many subscribers received it.
    pub fn publish(&self, event: PaymentEvent) -> usize {
        self.events_tx.send(event).unwrap_or(0)
    }
}
