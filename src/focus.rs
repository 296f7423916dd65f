//! Scroll position to pixelation strength.

use crate::config::FocusConfig;

/// Vertical extent of the tracked element in viewport coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ElementRect {
    pub top: f64,
    pub height: f64,
}

/// What the engine needs to know about the page on each tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FocusProbe {
    /// `None` when the tracked element is missing from the document.
    pub element: Option<ElementRect>,
    pub viewport_height: f64,
}

impl FocusProbe {
    pub fn distance(&self) -> f64 {
        match self.element {
            Some(rect) => {
                let center = rect.top + rect.height / 2.0;
                (center - self.viewport_height / 2.0).abs()
            }
            None => f64::INFINITY,
        }
    }
}

/// Pixel block size for an element `distance` px away from viewport center.
///
/// Exactly 1 inside the focus zone, then linear up to `max_pixel_size`
/// one viewport height past the zone. Unknown distances saturate.
pub fn focus_pixel_size(distance: f64, viewport_height: f64, config: &FocusConfig) -> f64 {
    let zone = config.focus_zone_px;
    if distance.is_nan() {
        return config.max_pixel_size;
    }
    if distance <= zone {
        return 1.0;
    }
    let reach = viewport_height.max(zone + 1.0) - zone;
    let normalized = ((distance - zone) / reach).clamp(0.0, 1.0);
    1.0 + normalized * (config.max_pixel_size - 1.0)
}

/// Rounded block size; redraws only happen when this changes.
pub fn pixel_bucket(pixel_size: f64) -> u32 {
    // NaN.max(1.0) is 1.0 and float casts saturate
    pixel_size.round().max(1.0) as u32
}

pub fn is_in_focus(bucket: u32) -> bool {
    bucket <= 1
}
