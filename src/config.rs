//! Tunables for both effects.
//!
//! Every field has a default matching the live site, so a host page only needs
//! to send the keys it wants to change:
//!
//! ```json
//! { "trail": { "capacity": 6, "bpm": 119 }, "logLevel": "debug" }
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{FxError, Result};

/// An opaque sRGB color parsed from `#rgb` / `#rrggbb`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl FromStr for Color {
    type Err = FxError;

    fn from_str(s: &str) -> Result<Self> {
        let bad = || FxError::Color(s.to_owned());
        let hex = s.trim().strip_prefix('#').ok_or_else(bad)?;
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(bad());
        }
        let channel = |digits: &str| u8::from_str_radix(digits, 16).map_err(|_| bad());
        match hex.len() {
            3 => {
                // #abc expands to #aabbcc
                let expand = |i: usize| channel(&hex[i..=i].repeat(2));
                Ok(Self::rgb(expand(0)?, expand(1)?, expand(2)?))
            }
            6 => Ok(Self::rgb(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            _ => Err(bad()),
        }
    }
}

impl TryFrom<String> for Color {
    type Error = FxError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Upper bound for `trail.capacity`; each live particle is a DOM element.
pub const MAX_TRAIL_CAPACITY: usize = 1024;

/// Cursor trail behaviour.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TrailConfig {
    /// Maximum live particles; the oldest is evicted beyond this.
    pub capacity: usize,
    /// Pointer or scroll travel (px) between two spawns.
    pub spawn_threshold_px: f64,
    pub palette: Vec<Color>,
    /// Rhythm mode tempo while external playback is on.
    pub bpm: f64,
    /// Full jitter span (x, y) around pointer and rhythm anchors.
    pub pointer_jitter_px: (f64, f64),
    /// Full jitter span (x, y) around scroll anchors.
    pub scroll_jitter_px: (f64, f64),
    /// Long side range of a particle, inclusive.
    pub long_side_px: (u32, u32),
    /// Short side range of a particle, inclusive.
    pub short_side_px: (u32, u32),
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self {
            capacity: 7,
            spawn_threshold_px: 64.0,
            palette: vec![
                Color::rgb(0xb0, 0xfb, 0x90),
                Color::rgb(0xff, 0x69, 0xb4),
                Color::rgb(0xff, 0xff, 0xff),
                Color::rgb(0x07, 0x45, 0xad),
                Color::rgb(0xf8, 0xf9, 0xfa),
                Color::rgb(0x02, 0x08, 0x17),
                Color::rgb(0xeb, 0xec, 0xf0),
            ],
            bpm: 120.0,
            pointer_jitter_px: (64.0, 64.0),
            scroll_jitter_px: (128.0, 64.0),
            long_side_px: (40, 120),
            short_side_px: (8, 25),
        }
    }
}

impl TrailConfig {
    /// Milliseconds between two rhythm ticks.
    pub fn rhythm_interval_ms(&self) -> f64 {
        60_000.0 / self.bpm
    }

    fn validate(&self) -> Result<()> {
        if !(1..=MAX_TRAIL_CAPACITY).contains(&self.capacity) {
            return Err(out_of_range("trail.capacity", "must be between 1 and 1024"));
        }
        if self.palette.is_empty() {
            return Err(out_of_range("trail.palette", "must not be empty"));
        }
        if !(self.spawn_threshold_px > 0.0) {
            return Err(out_of_range("trail.spawnThresholdPx", "must be positive"));
        }
        if !(self.bpm > 0.0) {
            return Err(out_of_range("trail.bpm", "must be positive"));
        }
        for (field, (lo, hi)) in [
            ("trail.longSidePx", self.long_side_px),
            ("trail.shortSidePx", self.short_side_px),
        ] {
            if lo == 0 || lo > hi {
                return Err(out_of_range(field, "must be a non-empty range of positive sizes"));
            }
        }
        let jitters = [self.pointer_jitter_px, self.scroll_jitter_px];
        if jitters.iter().any(|&(x, y)| !(x >= 0.0 && y >= 0.0)) {
            return Err(out_of_range("trail.*JitterPx", "must not be negative"));
        }
        Ok(())
    }
}

/// Scroll-focus pixelation behaviour.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FocusConfig {
    /// Half-height of the band around viewport center that renders sharp.
    pub focus_zone_px: f64,
    /// Largest pixel block, reached one viewport height past the zone.
    pub max_pixel_size: f64,
    pub display_width: u32,
    pub display_height: u32,
    /// Floor for per-frame GIF delays; guards against 0 and garbage values.
    pub min_frame_delay_ms: f64,
    /// URL of the animated GIF.
    pub source: String,
    /// Id of the element whose position drives the focus metric.
    pub container_id: String,
}

impl Default for FocusConfig {
    fn default() -> Self {
        Self {
            focus_zone_px: 100.0,
            max_pixel_size: 100.0,
            display_width: 270,
            display_height: 480,
            min_frame_delay_ms: 20.0,
            source: "/assets/notable-small.gif".to_owned(),
            container_id: "notable-projects".to_owned(),
        }
    }
}

impl FocusConfig {
    fn validate(&self) -> Result<()> {
        if !(self.focus_zone_px >= 0.0) {
            return Err(out_of_range("focus.focusZonePx", "must not be negative"));
        }
        if !(self.max_pixel_size >= 1.0) {
            return Err(out_of_range("focus.maxPixelSize", "must be at least 1"));
        }
        if self.display_width == 0 || self.display_height == 0 {
            return Err(out_of_range("focus.displayWidth/Height", "must be non-zero"));
        }
        if !(self.min_frame_delay_ms > 0.0) {
            return Err(out_of_range("focus.minFrameDelayMs", "must be positive"));
        }
        Ok(())
    }
}

/// Custom cursor glyph.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CursorConfig {
    /// Side of the square glyph; the hotspot is its center.
    pub size_px: f64,
    pub image: String,
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            size_px: 28.0,
            image: "/mouse.png".to_owned(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FxConfig {
    pub trail: TrailConfig,
    pub focus: FocusConfig,
    pub cursor: CursorConfig,
    /// `log` level name for the console backend; unknown names fall back to info.
    pub log_level: Option<String>,
}

impl FxConfig {
    /// Parses and validates a (possibly partial) JSON config.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.trail.validate()?;
        self.focus.validate()?;
        if !(self.cursor.size_px > 0.0) {
            return Err(out_of_range("cursor.sizePx", "must be positive"));
        }
        Ok(())
    }

    pub fn log_level(&self) -> log::Level {
        self.log_level
            .as_deref()
            .and_then(|name| name.parse().ok())
            .unwrap_or(log::Level::Info)
    }
}

fn out_of_range(field: &'static str, reason: &'static str) -> FxError {
    FxError::OutOfRange { field, reason }
}
