//! Simulated banner display component for demos and tests.

use std::{
    collections::VecDeque,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use banner_core::{AdSize, BannerCoordinator, BannerHandle, BannerSizeClass, LoadError};
use tracing::debug;

/// In-memory banner display component.
///
/// Counts issued load requests and reports a fixed rendered size taken from a
/// [`BannerSizeClass`]. As with real display components, the mount-time load
/// is the mounting layer's job; the counter covers it plus any retries.
#[derive(Debug)]
pub struct SimBanner {
    ad_unit_id: String,
    size: AdSize,
    load_requests: AtomicUsize,
}

impl SimBanner {
    pub fn new(ad_unit_id: impl Into<String>, size_class: BannerSizeClass) -> Arc<Self> {
        Arc::new(Self {
            ad_unit_id: ad_unit_id.into(),
            size: size_class.dimensions(),
            load_requests: AtomicUsize::new(0),
        })
    }

    pub fn ad_unit_id(&self) -> &str {
        &self.ad_unit_id
    }

    /// Number of load requests issued so far.
    pub fn load_request_count(&self) -> usize {
        self.load_requests.load(Ordering::SeqCst)
    }
}

impl BannerHandle for SimBanner {
    fn load_request(&self) {
        let issued = self.load_requests.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(ad_unit_id = %self.ad_unit_id, issued, "sim banner load request");
    }

    fn rendered_size(&self) -> AdSize {
        self.size
    }
}

/// Scripted outcome for one delivered lifecycle event.
#[derive(Debug, Clone, PartialEq)]
pub enum SimOutcome {
    Loaded,
    Failed(LoadError),
    Clicked,
    ImpressionRecorded,
    WillPresentScreen,
    WillDismissScreen,
    DidDismissScreen,
}

/// Feeds a scripted sequence of outcomes into a coordinator, standing in for
/// the ad network's delegate callbacks.
pub struct SimAdNetwork {
    script: VecDeque<SimOutcome>,
}

impl SimAdNetwork {
    pub fn new(script: impl IntoIterator<Item = SimOutcome>) -> Self {
        Self {
            script: script.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }

    /// Deliver the next scripted outcome; returns `false` once exhausted.
    pub fn deliver_next(
        &mut self,
        coordinator: &mut BannerCoordinator,
        banner: &Arc<dyn BannerHandle>,
    ) -> bool {
        let Some(outcome) = self.script.pop_front() else {
            return false;
        };
        debug!(outcome = ?outcome, "sim network delivering outcome");

        match outcome {
            SimOutcome::Loaded => coordinator.banner_did_load(banner),
            SimOutcome::Failed(error) => coordinator.banner_did_fail(banner, error),
            SimOutcome::Clicked => coordinator.banner_did_record_click(banner),
            SimOutcome::ImpressionRecorded => coordinator.banner_did_record_impression(banner),
            SimOutcome::WillPresentScreen => coordinator.banner_will_present_screen(banner),
            SimOutcome::WillDismissScreen => coordinator.banner_will_dismiss_screen(banner),
            SimOutcome::DidDismissScreen => coordinator.banner_did_dismiss_screen(banner),
        }
        true
    }
}
