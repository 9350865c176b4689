//! Notification delivery
//!
//! Notifications are fire-and-forget: the engines hand a human-readable
//! message to the sink and move on. Delivery failures are logged, never
//! surfaced to the caller, and nothing is retried.

use crate::core::record_store::RecordStore;
use crate::types::Patron;
use std::sync::Arc;

/// Receives human-readable messages addressed to a patron
pub trait NotificationSink: Send + Sync {
    /// Deliver a message to the patron; failures must not propagate
    fn notify(&self, patron_id: &str, message: &str);
}

/// Default sink: appends the message to the patron's in-memory inbox
///
/// The inbox is not part of the persisted patron schema, so delivery never
/// triggers a file rewrite. An unknown patron id degrades to a warning.
pub struct PatronInbox {
    patrons: Arc<RecordStore<Patron>>,
}

impl PatronInbox {
    /// Create a sink delivering into the given patron store
    pub fn new(patrons: Arc<RecordStore<Patron>>) -> Self {
        PatronInbox { patrons }
    }
}

impl NotificationSink for PatronInbox {
    fn notify(&self, patron_id: &str, message: &str) {
        let delivered = self.patrons.modify(patron_id, |patron| {
            patron.notifications.push(message.to_string());
        });

        if delivered {
            tracing::info!(patron = patron_id, "Notification sent: {}", message);
        } else {
            tracing::warn!(
                patron = patron_id,
                "Dropping notification for unknown patron: {}",
                message
            );
        }
    }
}
