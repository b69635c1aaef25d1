use std::sync::Arc;

use crate::error::LoadError;

/// Callback invoked for parameterless lifecycle events.
pub type EventCallback = Arc<dyn Fn() + Send + Sync + 'static>;

/// Callback invoked when a load attempt fails.
pub type ErrorCallback = Arc<dyn Fn(&LoadError) + Send + Sync + 'static>;

/// Optional per-event callbacks invoked by the coordinator.
///
/// Every slot is independently optional; omitted callbacks are skipped
/// without error.
#[derive(Clone, Default)]
pub struct BannerCallbacks {
    pub(crate) on_load: Option<EventCallback>,
    pub(crate) on_error: Option<ErrorCallback>,
    pub(crate) on_click: Option<EventCallback>,
    pub(crate) on_impression: Option<EventCallback>,
    pub(crate) on_will_present_screen: Option<EventCallback>,
    pub(crate) on_will_dismiss_screen: Option<EventCallback>,
    pub(crate) on_did_dismiss_screen: Option<EventCallback>,
}

impl BannerCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called when an ad loads successfully.
    pub fn on_load(mut self, callback: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_load = Some(Arc::new(callback));
        self
    }

    /// Called when an ad fails to load, with the reported error.
    pub fn on_error(mut self, callback: impl Fn(&LoadError) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Arc::new(callback));
        self
    }

    /// Called when the ad is clicked.
    pub fn on_click(mut self, callback: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_click = Some(Arc::new(callback));
        self
    }

    /// Called when an impression is recorded.
    pub fn on_impression(mut self, callback: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_impression = Some(Arc::new(callback));
        self
    }

    /// Called before full-screen content is presented.
    pub fn on_will_present_screen(mut self, callback: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_will_present_screen = Some(Arc::new(callback));
        self
    }

    /// Called before full-screen content is dismissed.
    pub fn on_will_dismiss_screen(mut self, callback: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_will_dismiss_screen = Some(Arc::new(callback));
        self
    }

    /// Called after full-screen content has been dismissed.
    pub fn on_did_dismiss_screen(mut self, callback: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_did_dismiss_screen = Some(Arc::new(callback));
        self
    }
}
