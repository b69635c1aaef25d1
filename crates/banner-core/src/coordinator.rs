//! Bridges banner display-component lifecycle events onto observable state.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use tracing::{debug, trace, warn};

use crate::{
    callbacks::BannerCallbacks,
    error::LoadError,
    retry::{RetrySession, backoff_delay},
    size::AdSize,
    state::{BannerAdState, SharedAdState},
};

/// Display-component capability consumed by the coordinator.
///
/// The coordinator uses the handle only to read the rendered size on a
/// successful load and to re-issue a load request when a retry fires. The
/// mount-time load is issued by the display layer itself.
pub trait BannerHandle: Send + Sync {
    /// Fire a new ad fetch.
    fn load_request(&self);

    /// Current rendered size of the component.
    fn rendered_size(&self) -> AdSize;
}

/// Receives lifecycle events from a banner display component, updates the
/// shared [`BannerAdState`], invokes optional callbacks, and schedules
/// bounded exponential-backoff retries on load failure.
///
/// All entry points are expected to arrive on one serialized callback
/// context; the coordinator assumes at most one event in flight per instance.
/// For each event the order is fixed: state mutation, then the paired
/// callback, then the retry decision.
///
/// Retry scheduling spawns onto the ambient Tokio runtime, so entry points
/// must run inside one. A scheduled retry checks the coordinator's liveness
/// flag at fire time and becomes a no-op once the coordinator is dropped.
pub struct BannerCoordinator {
    state: SharedAdState,
    callbacks: BannerCallbacks,
    retry: RetrySession,
    live: Arc<AtomicBool>,
}

impl BannerCoordinator {
    /// Attach a fresh coordinator to a state object for one display session.
    ///
    /// `retry_limit` of 0 disables retries entirely.
    pub fn new(state: SharedAdState, retry_limit: u32, callbacks: BannerCallbacks) -> Self {
        debug!(retry_limit, "attaching banner coordinator");
        Self {
            state,
            callbacks,
            retry: RetrySession::new(retry_limit),
            live: Arc::new(AtomicBool::new(true)),
        }
    }

    /// The display component received an ad.
    ///
    /// Records the rendered size, marks `did_load`, resets the retry counter,
    /// and invokes `on_load`.
    pub fn banner_did_load(&mut self, banner: &Arc<dyn BannerHandle>) {
        let ad_size = banner.rendered_size();
        debug!(
            width = ad_size.width,
            height = ad_size.height,
            "banner loaded"
        );
        self.lock_state().record_load(ad_size);
        self.retry.record_success();
        if let Some(on_load) = &self.callbacks.on_load {
            on_load();
        }
    }

    /// The display component failed to receive an ad.
    ///
    /// Records the error and invokes `on_error` unconditionally. When the
    /// Nth consecutive failure since the last success is within the retry
    /// limit, a deferred task re-issues `load_request` on the handle after
    /// `2^N` seconds; past the limit the failure is terminal for this session.
    pub fn banner_did_fail(&mut self, banner: &Arc<dyn BannerHandle>, error: LoadError) {
        warn!(code = %error.code, "banner failed to load");
        self.lock_state().record_error(error.clone());
        if let Some(on_error) = &self.callbacks.on_error {
            on_error(&error);
        }

        let Some(attempt) = self.retry.next_attempt() else {
            debug!(
                retry_limit = self.retry.retry_limit(),
                "retry limit exhausted; waiting for a manual reload"
            );
            return;
        };

        let delay = backoff_delay(attempt);
        debug!(
            attempt,
            delay_secs = delay.as_secs(),
            "scheduling banner load retry"
        );
        let live = Arc::clone(&self.live);
        let banner = Arc::clone(banner);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if !live.load(Ordering::Acquire) {
                trace!(attempt, "skipping banner retry: coordinator is gone");
                return;
            }
            debug!(attempt, "re-issuing banner load request");
            banner.load_request();
        });
    }

    /// The user clicked the banner ad.
    pub fn banner_did_record_click(&mut self, _banner: &Arc<dyn BannerHandle>) {
        trace!("banner click recorded");
        self.lock_state().record_click();
        if let Some(on_click) = &self.callbacks.on_click {
            on_click();
        }
    }

    /// The ad registered an impression.
    pub fn banner_did_record_impression(&mut self, _banner: &Arc<dyn BannerHandle>) {
        trace!("banner impression recorded");
        self.lock_state().record_impression();
        if let Some(on_impression) = &self.callbacks.on_impression {
            on_impression();
        }
    }

    /// Full-screen content is about to be presented (for example a
    /// click-through).
    pub fn banner_will_present_screen(&mut self, _banner: &Arc<dyn BannerHandle>) {
        trace!("banner will present screen");
        self.lock_state().record_will_present_screen();
        if let Some(on_will_present_screen) = &self.callbacks.on_will_present_screen {
            on_will_present_screen();
        }
    }

    /// Full-screen content is about to be dismissed.
    pub fn banner_will_dismiss_screen(&mut self, _banner: &Arc<dyn BannerHandle>) {
        trace!("banner will dismiss screen");
        self.lock_state().record_will_dismiss_screen();
        if let Some(on_will_dismiss_screen) = &self.callbacks.on_will_dismiss_screen {
            on_will_dismiss_screen();
        }
    }

    /// Full-screen content has been dismissed.
    pub fn banner_did_dismiss_screen(&mut self, _banner: &Arc<dyn BannerHandle>) {
        trace!("banner did dismiss screen");
        self.lock_state().record_did_dismiss_screen();
        if let Some(on_did_dismiss_screen) = &self.callbacks.on_did_dismiss_screen {
            on_did_dismiss_screen();
        }
    }

    /// Invalidate pending retries ahead of teardown.
    ///
    /// Already-scheduled retries observe the flag at fire time and skip the
    /// load request. Dropping the coordinator has the same effect.
    pub fn shutdown(&self) {
        self.live.store(false, Ordering::Release);
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, BannerAdState> {
        self.state.lock().expect("banner state lock poisoned")
    }
}

impl Drop for BannerCoordinator {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    use tokio::time::sleep;

    use super::*;

    struct MockBanner {
        size: AdSize,
        load_requests: AtomicUsize,
    }

    impl MockBanner {
        fn new(size: AdSize) -> Arc<Self> {
            Arc::new(Self {
                size,
                load_requests: AtomicUsize::new(0),
            })
        }

        fn load_request_count(&self) -> usize {
            self.load_requests.load(Ordering::SeqCst)
        }
    }

    impl BannerHandle for MockBanner {
        fn load_request(&self) {
            self.load_requests.fetch_add(1, Ordering::SeqCst);
        }

        fn rendered_size(&self) -> AdSize {
            self.size
        }
    }

    fn mock_banner(size: AdSize) -> (Arc<MockBanner>, Arc<dyn BannerHandle>) {
        let mock = MockBanner::new(size);
        let handle: Arc<dyn BannerHandle> = Arc::clone(&mock) as Arc<dyn BannerHandle>;
        (mock, handle)
    }

    #[tokio::test]
    async fn load_marks_state_and_invokes_callback_once() {
        let state = BannerAdState::shared();
        let loads = Arc::new(AtomicUsize::new(0));
        let loads_in_callback = Arc::clone(&loads);
        let callbacks = BannerCallbacks::new().on_load(move || {
            loads_in_callback.fetch_add(1, Ordering::SeqCst);
        });
        let mut coordinator = BannerCoordinator::new(Arc::clone(&state), 0, callbacks);
        let (_, banner) = mock_banner(AdSize::new(320.0, 50.0));

        coordinator.banner_did_load(&banner);

        let snapshot = state
            .lock()
            .expect("state lock should not be poisoned")
            .snapshot();
        assert!(snapshot.did_load);
        assert_eq!(snapshot.ad_size, AdSize::new(320.0, 50.0));
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn failure_records_error_without_retry_when_limit_is_zero() {
        let state = BannerAdState::shared();
        let errors = Arc::new(AtomicUsize::new(0));
        let errors_in_callback = Arc::clone(&errors);
        let callbacks = BannerCallbacks::new().on_error(move |_| {
            errors_in_callback.fetch_add(1, Ordering::SeqCst);
        });
        let mut coordinator = BannerCoordinator::new(Arc::clone(&state), 0, callbacks);
        let (mock, banner) = mock_banner(AdSize::ZERO);

        coordinator.banner_did_fail(&banner, LoadError::no_fill());
        sleep(Duration::from_secs(60)).await;

        let snapshot = state
            .lock()
            .expect("state lock should not be poisoned")
            .snapshot();
        assert_eq!(
            snapshot.last_error.map(|error| error.code),
            Some("no_fill".to_owned())
        );
        assert_eq!(errors.load(Ordering::SeqCst), 1);
        assert_eq!(mock.load_request_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn first_retry_fires_after_two_seconds() {
        let state = BannerAdState::shared();
        let mut coordinator = BannerCoordinator::new(state, 3, BannerCallbacks::new());
        let (mock, banner) = mock_banner(AdSize::ZERO);

        coordinator.banner_did_fail(&banner, LoadError::no_fill());

        sleep(Duration::from_millis(1_900)).await;
        assert_eq!(mock.load_request_count(), 0);

        sleep(Duration::from_millis(200)).await;
        assert_eq!(mock.load_request_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn schedules_no_more_retries_than_the_limit() {
        let state = BannerAdState::shared();
        let mut coordinator = BannerCoordinator::new(state, 2, BannerCallbacks::new());
        let (mock, banner) = mock_banner(AdSize::ZERO);

        coordinator.banner_did_fail(&banner, LoadError::no_fill());
        coordinator.banner_did_fail(&banner, LoadError::no_fill());
        coordinator.banner_did_fail(&banner, LoadError::no_fill());

        sleep(Duration::from_secs(60)).await;
        assert_eq!(mock.load_request_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn success_resets_consecutive_failure_count() {
        let state = BannerAdState::shared();
        let mut coordinator = BannerCoordinator::new(state, 3, BannerCallbacks::new());
        let (mock, banner) = mock_banner(AdSize::new(320.0, 50.0));

        coordinator.banner_did_fail(&banner, LoadError::no_fill());
        sleep(Duration::from_secs(3)).await;
        assert_eq!(mock.load_request_count(), 1);

        coordinator.banner_did_load(&banner);
        coordinator.banner_did_fail(&banner, LoadError::no_fill());

        // Treated as the 1st failure again: retry due 2 seconds out, not 4.
        sleep(Duration::from_millis(1_900)).await;
        assert_eq!(mock.load_request_count(), 1);
        sleep(Duration::from_millis(200)).await;
        assert_eq!(mock.load_request_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn retry_counter_follows_consecutive_failure_history() {
        let state = BannerAdState::shared();
        let mut coordinator = BannerCoordinator::new(Arc::clone(&state), 3, BannerCallbacks::new());
        let (mock, banner) = mock_banner(AdSize::new(320.0, 50.0));

        coordinator.banner_did_fail(&banner, LoadError::new("a", "first failure"));
        {
            let snapshot = state
                .lock()
                .expect("state lock should not be poisoned")
                .snapshot();
            assert_eq!(
                snapshot.last_error.map(|error| error.code),
                Some("a".to_owned())
            );
        }

        // Second failure lands before the first retry fires.
        coordinator.banner_did_fail(&banner, LoadError::new("b", "second failure"));
        {
            let snapshot = state
                .lock()
                .expect("state lock should not be poisoned")
                .snapshot();
            assert_eq!(
                snapshot.last_error.map(|error| error.code),
                Some("b".to_owned())
            );
        }

        // First retry (delay 2s) fires; second (delay 4s) is still pending.
        sleep(Duration::from_millis(2_500)).await;
        assert_eq!(mock.load_request_count(), 1);

        coordinator.banner_did_load(&banner);
        {
            let snapshot = state
                .lock()
                .expect("state lock should not be poisoned")
                .snapshot();
            assert!(snapshot.did_load);
            assert_eq!(snapshot.ad_size, AdSize::new(320.0, 50.0));
        }

        // After the reset, failure "c" counts as the 1st again: retry in 2s.
        coordinator.banner_did_fail(&banner, LoadError::new("c", "third failure"));

        // t=4s: the retry scheduled by failure "b" fires.
        sleep(Duration::from_millis(1_600)).await;
        assert_eq!(mock.load_request_count(), 2);

        // t=4.5s: the retry scheduled by failure "c" fires.
        sleep(Duration::from_millis(500)).await;
        assert_eq!(mock.load_request_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_coordinator_cancels_pending_retry() {
        let state = BannerAdState::shared();
        let mut coordinator = BannerCoordinator::new(Arc::clone(&state), 1, BannerCallbacks::new());
        let (mock, banner) = mock_banner(AdSize::ZERO);

        coordinator.banner_did_fail(&banner, LoadError::no_fill());
        let snapshot_before = state
            .lock()
            .expect("state lock should not be poisoned")
            .snapshot();
        drop(coordinator);

        sleep(Duration::from_secs(60)).await;
        assert_eq!(mock.load_request_count(), 0);
        let snapshot_after = state
            .lock()
            .expect("state lock should not be poisoned")
            .snapshot();
        assert_eq!(snapshot_before, snapshot_after);
    }

    #[tokio::test]
    async fn omitted_callbacks_are_skipped_without_error() {
        let state = BannerAdState::shared();
        let mut coordinator =
            BannerCoordinator::new(Arc::clone(&state), 0, BannerCallbacks::new());
        let (_, banner) = mock_banner(AdSize::new(320.0, 100.0));

        coordinator.banner_did_fail(&banner, LoadError::no_fill());
        coordinator.banner_did_load(&banner);
        coordinator.banner_did_record_click(&banner);
        coordinator.banner_did_record_impression(&banner);
        coordinator.banner_will_present_screen(&banner);
        coordinator.banner_will_dismiss_screen(&banner);
        coordinator.banner_did_dismiss_screen(&banner);

        let snapshot = state
            .lock()
            .expect("state lock should not be poisoned")
            .snapshot();
        assert!(snapshot.did_load);
        assert!(snapshot.did_click);
        assert!(snapshot.did_record_impression);
        assert!(snapshot.will_present_screen);
        assert!(snapshot.will_dismiss_screen);
        assert!(snapshot.did_dismiss_screen);
    }

    #[tokio::test]
    async fn each_entry_point_invokes_its_paired_callback_per_call() {
        let state = BannerAdState::shared();
        let clicks = Arc::new(AtomicUsize::new(0));
        let impressions = Arc::new(AtomicUsize::new(0));
        let dismissals = Arc::new(AtomicUsize::new(0));

        let clicks_in_callback = Arc::clone(&clicks);
        let impressions_in_callback = Arc::clone(&impressions);
        let dismissals_in_callback = Arc::clone(&dismissals);
        let callbacks = BannerCallbacks::new()
            .on_click(move || {
                clicks_in_callback.fetch_add(1, Ordering::SeqCst);
            })
            .on_impression(move || {
                impressions_in_callback.fetch_add(1, Ordering::SeqCst);
            })
            .on_did_dismiss_screen(move || {
                dismissals_in_callback.fetch_add(1, Ordering::SeqCst);
            });
        let mut coordinator = BannerCoordinator::new(state, 0, callbacks);
        let (_, banner) = mock_banner(AdSize::ZERO);

        coordinator.banner_did_record_click(&banner);
        coordinator.banner_did_record_click(&banner);
        coordinator.banner_did_record_impression(&banner);
        coordinator.banner_did_dismiss_screen(&banner);
        coordinator.banner_did_dismiss_screen(&banner);
        coordinator.banner_did_dismiss_screen(&banner);

        assert_eq!(clicks.load(Ordering::SeqCst), 2);
        assert_eq!(impressions.load(Ordering::SeqCst), 1);
        assert_eq!(dismissals.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn state_is_updated_before_callbacks_run() {
        let state = BannerAdState::shared();
        let load_rx = state
            .lock()
            .expect("state lock should not be poisoned")
            .subscribe();
        let error_rx = load_rx.clone();

        let load_saw_mutation = Arc::new(AtomicBool::new(false));
        let error_saw_mutation = Arc::new(AtomicBool::new(false));
        let load_saw_in_callback = Arc::clone(&load_saw_mutation);
        let error_saw_in_callback = Arc::clone(&error_saw_mutation);
        let callbacks = BannerCallbacks::new()
            .on_load(move || {
                load_saw_in_callback.store(load_rx.borrow().did_load, Ordering::SeqCst);
            })
            .on_error(move |_| {
                error_saw_in_callback
                    .store(error_rx.borrow().last_error.is_some(), Ordering::SeqCst);
            });
        let mut coordinator = BannerCoordinator::new(state, 0, callbacks);
        let (_, banner) = mock_banner(AdSize::new(320.0, 50.0));

        coordinator.banner_did_fail(&banner, LoadError::no_fill());
        coordinator.banner_did_load(&banner);

        assert!(error_saw_mutation.load(Ordering::SeqCst));
        assert!(load_saw_mutation.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_invalidates_pending_retry_without_drop() {
        let state = BannerAdState::shared();
        let mut coordinator = BannerCoordinator::new(state, 1, BannerCallbacks::new());
        let (mock, banner) = mock_banner(AdSize::ZERO);

        coordinator.banner_did_fail(&banner, LoadError::no_fill());
        coordinator.shutdown();

        sleep(Duration::from_secs(60)).await;
        assert_eq!(mock.load_request_count(), 0);
    }
}
