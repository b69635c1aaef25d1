mod logging;

use std::{sync::Arc, time::Duration};

use banner_core::{
    BannerAdState, BannerCallbacks, BannerCoordinator, BannerHandle, BannerSizeClass, LoadError,
    MobileAds, MobileAdsConfig,
};
use banner_sim::{SimAdNetwork, SimBanner, SimOutcome};
use tracing::info;

const RETRY_LIMIT: u32 = 3;

#[tokio::main]
async fn main() {
    logging::init();

    let config = match MobileAdsConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Failed to start ads SDK: {err}");
            eprintln!("Set ADMOB_APP_ID (and optionally BANNER_AD_UNIT_ID) to run the smoke.");
            std::process::exit(1);
        }
    };
    let sdk = MobileAds::start(config);
    let ad_unit_id = sdk
        .config()
        .banner_ad_unit_id
        .clone()
        .unwrap_or_else(|| "sim-banner-demo".to_owned());

    let state = BannerAdState::shared();
    let events = state
        .lock()
        .expect("banner state lock poisoned")
        .subscribe();

    let callbacks = BannerCallbacks::new()
        .on_load(|| info!("banner loaded"))
        .on_error(|error| info!(code = %error.code, "banner load failed"))
        .on_click(|| info!("banner clicked"));
    let mut coordinator = BannerCoordinator::new(Arc::clone(&state), RETRY_LIMIT, callbacks);

    let sim = SimBanner::new(ad_unit_id, BannerSizeClass::Medium);
    let banner: Arc<dyn BannerHandle> = Arc::clone(&sim) as Arc<dyn BannerHandle>;
    // Mount-time load; in a real integration the display layer fires this.
    banner.load_request();

    let mut network = SimAdNetwork::new([
        SimOutcome::Failed(LoadError::no_fill()),
        SimOutcome::Failed(LoadError::new("network", "request timed out")),
        SimOutcome::Loaded,
        SimOutcome::ImpressionRecorded,
        SimOutcome::Clicked,
    ]);
    while network.deliver_next(&mut coordinator, &banner) {
        tokio::time::sleep(Duration::from_millis(250)).await;
    }

    // Let the two scheduled backoff retries (2s and 4s) fire before reporting.
    tokio::time::sleep(Duration::from_secs(5)).await;

    let snapshot = events.borrow().clone();
    println!(
        "did_load={} ad_size={}x{} last_error={:?}",
        snapshot.did_load,
        snapshot.ad_size.width,
        snapshot.ad_size.height,
        snapshot.last_error.map(|error| error.code)
    );
    println!("load requests issued: {}", sim.load_request_count());
}
