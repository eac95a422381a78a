//! Bridge from attribute-change notifications to the rebalancing logic.
//!
//! One long-lived listener owns the inbound channel and processes events
//! sequentially; each invocation holds the apartment lock for its full
//! duration, so rebalancing never interleaves with manager-driven writes.

use std::sync::mpsc::Receiver;

use tracing::{debug, info};

use crate::mib::{Oid, oid};
use crate::model::SharedApartment;
use crate::rebalance;

/// An attribute-change event pushed by an external source.
#[derive(Debug, Clone)]
pub struct Notification {
    /// Identifier of the changed attribute.
    pub oid: Oid,
    /// The new value as reported by the sender. Informational only: the
    /// rebalancer reads the live scalar state instead.
    pub value: String,
}

impl Notification {
    /// Creates a notification for the given identifier and reported value.
    pub fn new(oid: Oid, value: impl Into<String>) -> Self {
        Self {
            oid,
            value: value.into(),
        }
    }
}

/// Translates solar-generation change events into rebalancing runs on the
/// bound apartment. Events for any other identifier are logged and ignored.
pub struct NotificationBridge {
    apartment: SharedApartment,
}

impl NotificationBridge {
    /// Creates a bridge bound to one apartment instance.
    pub fn new(apartment: SharedApartment) -> Self {
        Self { apartment }
    }

    /// Handles one notification.
    ///
    /// Returns `true` when the event triggered a rebalancing run.
    pub fn handle(&self, event: &Notification) -> bool {
        if event.oid != Oid::new(oid::APT_GENERATION_BY_SOLAR) {
            debug!(
                oid = %event.oid,
                "notification is not for solar generation, skipping"
            );
            return false;
        }
        info!(value = %event.value, "solar generation changed, rebalancing");
        let mut apartment = self.apartment.lock();
        rebalance::apply(&mut apartment);
        true
    }

    /// Consumes events sequentially until the sending side closes.
    pub fn run(&self, events: Receiver<Notification>) {
        for event in events {
            self.handle(&event);
        }
        debug!("notification channel closed, listener stopping");
    }
}
