use serde::{Deserialize, Serialize};

/// Rendered banner dimensions in points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AdSize {
    pub width: f32,
    pub height: f32,
}

impl AdSize {
    /// Zero-valued size used before the first successful load.
    pub const ZERO: Self = Self {
        width: 0.0,
        height: 0.0,
    };

    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Closed set of named banner size categories offered to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BannerSizeClass {
    /// Standard banner, 320x50.
    Small,
    /// Large banner, 320x100.
    Medium,
    /// Medium rectangle, 300x250.
    Large,
}

impl BannerSizeClass {
    /// Dimensions for this category.
    pub fn dimensions(self) -> AdSize {
        match self {
            BannerSizeClass::Small => AdSize::new(320.0, 50.0),
            BannerSizeClass::Medium => AdSize::new(320.0, 100.0),
            BannerSizeClass::Large => AdSize::new(300.0, 250.0),
        }
    }
}
