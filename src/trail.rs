//! Cursor trail: colored rectangles dropped along the pointer path, on scroll,
//! and on a fixed tempo while music is playing.
//!
//! The engine owns every live particle. A surface only mirrors what the engine
//! tells it to attach and detach, so the queue here is the source of truth for
//! what is on screen.

use std::collections::VecDeque;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::{Color, TrailConfig};
use crate::geom::{Point, Viewport};
use crate::surface::TrailSurface;

pub type ParticleId = u64;

/// How a particle is positioned relative to the document.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Anchor {
    /// Stays put on screen while the page scrolls (CSS `fixed`).
    Viewport,
    /// Glued to page content (CSS `absolute`); coordinates include scroll.
    Page,
}

/// What triggered a spawn. Decides jitter span and anchoring.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpawnSource {
    Pointer,
    Scroll,
    Rhythm,
}

impl SpawnSource {
    fn anchor(self) -> Anchor {
        match self {
            SpawnSource::Pointer | SpawnSource::Scroll => Anchor::Page,
            SpawnSource::Rhythm => Anchor::Viewport,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TrailParticle {
    pub id: ParticleId,
    /// Top-left corner; page coordinates for [`Anchor::Page`].
    pub left: f64,
    pub top: f64,
    pub width: u32,
    pub height: u32,
    pub color: Color,
    pub anchor: Anchor,
    pub born_ms: f64,
}

/// Slots reserved up front; larger queues grow on demand.
const PREALLOCATED_SLOTS: usize = 16;

/// Bounded FIFO of live particles.
#[derive(Debug)]
pub struct ParticleQueue {
    capacity: usize,
    items: VecDeque<TrailParticle>,
}

impl ParticleQueue {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            items: VecDeque::with_capacity(capacity.min(PREALLOCATED_SLOTS)),
        }
    }

    /// Appends `particle` and returns whatever had to make room, oldest first.
    pub fn push(&mut self, particle: TrailParticle) -> Vec<TrailParticle> {
        self.items.push_back(particle);
        let overflow = self.items.len().saturating_sub(self.capacity);
        self.items.drain(..overflow).collect()
    }

    pub fn drain(&mut self) -> impl Iterator<Item = TrailParticle> + '_ {
        self.items.drain(..)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrailParticle> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Pointer and scroll bookkeeping between spawns.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CursorState {
    /// Position distance is measured from; `None` until the first move and
    /// after the pointer leaves the viewport.
    pub tracked: Option<Point>,
    /// Latest pointer position; scroll spawns land here.
    pub pointer: Option<Point>,
    pub travel: f64,
    pub last_scroll: f64,
    pub scroll_travel: f64,
    pub playing: bool,
}

pub struct TrailEngine<S, R> {
    config: TrailConfig,
    state: CursorState,
    queue: ParticleQueue,
    surface: S,
    rng: R,
    next_id: ParticleId,
    disposed: bool,
}

impl<S: TrailSurface, R: Rng> TrailEngine<S, R> {
    pub fn new(config: TrailConfig, surface: S, rng: R, initial_scroll: f64) -> Self {
        let queue = ParticleQueue::new(config.capacity);
        Self {
            config,
            state: CursorState {
                last_scroll: initial_scroll,
                ..CursorState::default()
            },
            queue,
            surface,
            rng,
            next_id: 0,
            disposed: false,
        }
    }

    pub fn pointer_move(&mut self, at: Point, view: &Viewport, now_ms: f64) -> Option<ParticleId> {
        if self.disposed {
            return None;
        }
        if !view.contains(at) {
            self.pointer_left();
            return None;
        }
        self.state.pointer = Some(at);

        if self.state.playing {
            // rhythm ticks are the only spawn source while playing
            self.state.tracked = Some(at);
            return None;
        }

        let Some(last) = self.state.tracked.replace(at) else {
            return Some(self.spawn(at, SpawnSource::Pointer, view, now_ms));
        };

        self.state.travel += last.distance_to(at);
        if self.state.travel >= self.config.spawn_threshold_px {
            self.state.travel = 0.0;
            return Some(self.spawn(at, SpawnSource::Pointer, view, now_ms));
        }
        None
    }

    pub fn scroll(&mut self, view: &Viewport, now_ms: f64) -> Option<ParticleId> {
        if self.disposed {
            return None;
        }
        let delta = (view.scroll_y - self.state.last_scroll).abs();
        self.state.last_scroll = view.scroll_y;
        if self.state.playing {
            return None;
        }

        self.state.scroll_travel += delta;
        let at = self.state.pointer?;
        if self.state.scroll_travel >= self.config.spawn_threshold_px {
            self.state.scroll_travel = 0.0;
            return Some(self.spawn(at, SpawnSource::Scroll, view, now_ms));
        }
        None
    }

    pub fn pointer_left(&mut self) {
        if self.state.playing {
            return;
        }
        self.state.tracked = None;
        self.state.travel = 0.0;
    }

    /// Returns true when the gate actually flipped.
    pub fn set_playing(&mut self, playing: bool) -> bool {
        if self.state.playing == playing {
            return false;
        }
        log::debug!("trail rhythm mode {}", if playing { "on" } else { "off" });
        self.state.playing = playing;
        true
    }

    pub fn rhythm_tick(&mut self, view: &Viewport, now_ms: f64) -> Option<ParticleId> {
        if self.disposed || !self.state.playing {
            return None;
        }
        let x = uniform(&mut self.rng, view.width);
        let y = uniform(&mut self.rng, view.height);
        Some(self.spawn(Point::new(x, y), SpawnSource::Rhythm, view, now_ms))
    }

    /// Builds a particle around `at`, shows it and evicts past capacity.
    pub fn spawn(&mut self, at: Point, source: SpawnSource, view: &Viewport, now_ms: f64) -> ParticleId {
        let particle = self.roll_particle(at, source, view, now_ms);
        let id = particle.id;
        log::trace!("trail spawn #{id} {source:?} at ({:.0}, {:.0})", particle.left, particle.top);

        self.surface.attach(&particle);
        for evicted in self.queue.push(particle) {
            self.surface.detach(evicted.id);
        }
        id
    }

    fn roll_particle(&mut self, at: Point, source: SpawnSource, view: &Viewport, now_ms: f64) -> TrailParticle {
        let cfg = &self.config;
        let long = self.rng.gen_range(cfg.long_side_px.0..=cfg.long_side_px.1);
        let short = self.rng.gen_range(cfg.short_side_px.0..=cfg.short_side_px.1);
        let (width, height) = if self.rng.gen_bool(0.5) {
            (long, short)
        } else {
            (short, long)
        };

        let color = *cfg.palette.choose(&mut self.rng).unwrap_or(&Color::rgb(0xff, 0xff, 0xff));

        let (span_x, span_y) = match source {
            SpawnSource::Scroll => cfg.scroll_jitter_px,
            SpawnSource::Pointer | SpawnSource::Rhythm => cfg.pointer_jitter_px,
        };
        let jitter_x = uniform(&mut self.rng, span_x) - span_x / 2.0;
        let jitter_y = uniform(&mut self.rng, span_y) - span_y / 2.0;

        let anchor = source.anchor();
        let (offset_x, offset_y) = match anchor {
            Anchor::Page => (view.scroll_x, view.scroll_y),
            Anchor::Viewport => (0.0, 0.0),
        };

        let id = self.next_id;
        self.next_id += 1;
        TrailParticle {
            id,
            left: at.x + offset_x + jitter_x - f64::from(width) / 2.0,
            top: at.y + offset_y + jitter_y - f64::from(height) / 2.0,
            width,
            height,
            color,
            anchor,
            born_ms: now_ms,
        }
    }

    /// Removes every live particle. Later events are ignored.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.state.playing = false;
        for particle in self.queue.drain() {
            self.surface.detach(particle.id);
        }
        log::info!("trail disposed");
    }

    pub fn particles(&self) -> impl Iterator<Item = &TrailParticle> {
        self.queue.iter()
    }

    pub fn live_count(&self) -> usize {
        self.queue.len()
    }

    pub fn state(&self) -> &CursorState {
        &self.state
    }

    pub fn config(&self) -> &TrailConfig {
        &self.config
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

/// Uniform in `[0, span)`; zero for empty or degenerate spans.
fn uniform<R: Rng>(rng: &mut R, span: f64) -> f64 {
    if span > 0.0 && span.is_finite() {
        rng.gen_range(0.0..span)
    } else {
        0.0
    }
}
