//! Observable lifecycle state for one banner slot.

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::trace;

use crate::{error::LoadError, size::AdSize};

/// Shared handle to one banner slot's state.
///
/// Owned by whichever layer mounts the slot (typically the UI), referenced by
/// the coordinator for the lifetime of one display session.
pub type SharedAdState = Arc<Mutex<BannerAdState>>;

/// Immutable view of a banner slot's last-known lifecycle facts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdStateSnapshot {
    /// True once at least one load has succeeded; never reset by failures.
    pub did_load: bool,
    /// Most recent load failure, retained as historical fact even after a
    /// later successful load.
    pub last_error: Option<LoadError>,
    /// True once the ad has been clicked.
    pub did_click: bool,
    /// True once an impression has been recorded.
    pub did_record_impression: bool,
    /// True once full-screen content was about to be presented.
    pub will_present_screen: bool,
    /// True once full-screen content was about to be dismissed.
    pub will_dismiss_screen: bool,
    /// True once full-screen content has been dismissed.
    pub did_dismiss_screen: bool,
    /// Dimensions reported at the most recent successful load; zero until
    /// the first load.
    pub ad_size: AdSize,
}

/// Mutable, observable record of lifecycle events for one banner slot.
///
/// Only the coordinator mutates this object. Observers read `snapshot()` or
/// `subscribe()`; every mutation publishes a fresh snapshot after the field
/// write, so notifications always carry the mutation that caused them.
#[derive(Debug)]
pub struct BannerAdState {
    snapshot: AdStateSnapshot,
    tx: watch::Sender<AdStateSnapshot>,
}

impl BannerAdState {
    pub fn new() -> Self {
        let snapshot = AdStateSnapshot::default();
        let (tx, _) = watch::channel(snapshot.clone());
        Self { snapshot, tx }
    }

    /// Wrap a fresh state for sharing between the UI layer and a coordinator.
    pub fn shared() -> SharedAdState {
        Arc::new(Mutex::new(Self::new()))
    }

    /// Current snapshot of all lifecycle facts.
    pub fn snapshot(&self) -> AdStateSnapshot {
        self.snapshot.clone()
    }

    /// Subscribe to snapshot updates; the receiver starts at the current value.
    pub fn subscribe(&self) -> watch::Receiver<AdStateSnapshot> {
        self.tx.subscribe()
    }

    pub(crate) fn record_load(&mut self, ad_size: AdSize) {
        self.snapshot.did_load = true;
        self.snapshot.ad_size = ad_size;
        self.publish();
    }

    /// Record a load failure.
    ///
    /// `last_error` is deliberately not cleared by a later successful load;
    /// only process restart clears it.
    pub(crate) fn record_error(&mut self, error: LoadError) {
        self.snapshot.last_error = Some(error);
        self.publish();
    }

    pub(crate) fn record_click(&mut self) {
        self.snapshot.did_click = true;
        self.publish();
    }

    pub(crate) fn record_impression(&mut self) {
        self.snapshot.did_record_impression = true;
        self.publish();
    }

    pub(crate) fn record_will_present_screen(&mut self) {
        self.snapshot.will_present_screen = true;
        self.publish();
    }

    pub(crate) fn record_will_dismiss_screen(&mut self) {
        self.snapshot.will_dismiss_screen = true;
        self.publish();
    }

    pub(crate) fn record_did_dismiss_screen(&mut self) {
        self.snapshot.did_dismiss_screen = true;
        self.publish();
    }

    fn publish(&self) {
        trace!("publishing banner state snapshot");
        self.tx.send_replace(self.snapshot.clone());
    }
}

impl Default for BannerAdState {
    fn default() -> Self {
        Self::new()
    }
}
