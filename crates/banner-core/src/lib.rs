//! Core banner-ad lifecycle adapter shared between display integrations and
//! UI consumers.
//!
//! This crate binds a banner display component's lifecycle events onto an
//! observable state object, forwards them to optional per-event callbacks,
//! and owns the retry-with-backoff policy applied on load failure.

/// Ads SDK bootstrap and env-backed startup configuration.
pub mod bootstrap;
/// Optional per-event callback set invoked by the coordinator.
pub mod callbacks;
/// Lifecycle event coordinator and the display-component seam.
pub mod coordinator;
/// Opaque load-failure payload recorded in state and handed to callbacks.
pub mod error;
mod retry;
/// Banner size categories and their dimensions.
pub mod size;
/// Observable per-slot lifecycle state.
pub mod state;

pub use bootstrap::{BootstrapError, MobileAds, MobileAdsConfig};
pub use callbacks::{BannerCallbacks, ErrorCallback, EventCallback};
pub use coordinator::{BannerCoordinator, BannerHandle};
pub use error::LoadError;
pub use size::{AdSize, BannerSizeClass};
pub use state::{AdStateSnapshot, BannerAdState, SharedAdState};
