//! Scroll-focus pixelation: a GIF that plays sharp near the middle of the
//! screen and freezes into coarse blocks as it scrolls away.
//!
//! ```text
//! Decoding --ok--> Ready{in_focus} <--> Ready{!in_focus}
//!     |                      \               /
//!     +--err--> Inert         +--> Unmounted <+
//! ```
//!
//! Focus is re-evaluated once per animation frame from [`FocusProbe`]; there is
//! no hysteresis beyond the focus zone itself.

use crate::config::FocusConfig;
use crate::decode::DecodedGif;
use crate::error::Result;
use crate::focus::{focus_pixel_size, is_in_focus, pixel_bucket, FocusProbe};
use crate::pixelate::PixelationPlan;
use crate::player::GifPlayer;
use crate::surface::FrameSurface;
use crate::task::CancelToken;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Decoding,
    Ready { in_focus: bool },
    /// Decode failed; nothing is ever drawn.
    Inert,
    Unmounted,
}

/// What one tick decided.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickReport {
    pub pixel_size: f64,
    pub bucket: u32,
    pub in_focus: bool,
    pub advanced: bool,
    pub redrawn: bool,
}

pub struct PixelationEngine<S> {
    config: FocusConfig,
    phase: Phase,
    player: Option<GifPlayer>,
    surface: S,
    last_bucket: Option<u32>,
    redraw_pending: bool,
    cancel: CancelToken,
    dpr: f64,
}

impl<S: FrameSurface> PixelationEngine<S> {
    pub fn new(config: FocusConfig, mut surface: S, dpr: f64) -> Self {
        let dpr = sanitize_dpr(dpr);
        surface.resize(display(&config), dpr);
        Self {
            config,
            phase: Phase::Decoding,
            player: None,
            surface,
            last_bucket: None,
            redraw_pending: false,
            cancel: CancelToken::new(),
            dpr,
        }
    }

    /// Token for the decode task; cancelled on unmount.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Accepts the decode result unless the engine moved on meanwhile.
    pub fn finish_decode(&mut self, decoded: Result<DecodedGif>, now_ms: f64) {
        if self.cancel.is_cancelled() || self.phase != Phase::Decoding {
            log::debug!("discarding gif decode that finished after teardown");
            return;
        }
        match decoded {
            Ok(gif) => {
                log::info!(
                    "pixelation ready: {}x{} gif, {} frames",
                    gif.width(),
                    gif.height(),
                    gif.frames().len()
                );
                self.player = Some(GifPlayer::new(gif, self.config.min_frame_delay_ms, now_ms));
                self.phase = Phase::Ready { in_focus: false };
                self.redraw_pending = true;
            }
            Err(err) => {
                log::warn!("pixelation disabled: {err}");
                self.phase = Phase::Inert;
            }
        }
    }

    /// One animation-frame step. `None` unless the engine is ready.
    pub fn tick(&mut self, now_ms: f64, probe: FocusProbe) -> Option<TickReport> {
        let Phase::Ready { in_focus: was_in_focus } = self.phase else {
            return None;
        };
        let player = self.player.as_mut()?;

        let pixel_size = focus_pixel_size(probe.distance(), probe.viewport_height, &self.config);
        let bucket = pixel_bucket(pixel_size);
        let in_focus = is_in_focus(bucket);
        if in_focus != was_in_focus {
            log::debug!("pixelation {}", if in_focus { "in focus" } else { "out of focus" });
            if in_focus {
                player.restart_clock(now_ms);
            }
            self.phase = Phase::Ready { in_focus };
        }

        // out of focus the gif freezes on whatever frame it reached
        let advanced = in_focus && player.advance_if_due(now_ms);
        let bucket_changed = self.last_bucket != Some(bucket);
        let redrawn = advanced || bucket_changed || self.redraw_pending;
        if redrawn {
            self.redraw(bucket);
        }

        Some(TickReport {
            pixel_size,
            bucket,
            in_focus,
            advanced,
            redrawn,
        })
    }

    /// New device pixel ratio (or just a window resize); redraws next tick.
    pub fn resize(&mut self, dpr: f64) {
        if self.phase == Phase::Unmounted {
            return;
        }
        self.dpr = sanitize_dpr(dpr);
        self.surface.resize(display(&self.config), self.dpr);
        self.redraw_pending = true;
    }

    fn redraw(&mut self, bucket: u32) {
        let Some(player) = self.player.as_ref() else {
            return;
        };
        let canvas = player.canvas();
        let Some(plan) = PixelationPlan::new((canvas.width(), canvas.height()), display(&self.config), bucket)
        else {
            return;
        };
        self.surface.present(canvas, &plan);
        self.last_bucket = Some(bucket);
        self.redraw_pending = false;
    }

    /// Stops everything for good. Safe to call repeatedly.
    pub fn unmount(&mut self) {
        if self.phase == Phase::Unmounted {
            return;
        }
        self.cancel.cancel();
        self.player = None;
        self.surface.clear();
        self.phase = Phase::Unmounted;
        log::info!("pixelation unmounted");
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn player(&self) -> Option<&GifPlayer> {
        self.player.as_ref()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn dpr(&self) -> f64 {
        self.dpr
    }

    pub fn config(&self) -> &FocusConfig {
        &self.config
    }
}

fn display(config: &FocusConfig) -> (u32, u32) {
    (config.display_width, config.display_height)
}

fn sanitize_dpr(dpr: f64) -> f64 {
    if dpr.is_finite() && dpr > 0.0 {
        dpr
    } else {
        1.0
    }
}
