//! Composition root: builds both engines on the live document and wires them
//! to browser events.
//!
//! Callbacks only hold `Weak` handles to engine state; [`Mounted`] owns the
//! strong ones, so dropping it (or [`Mounted::unmount`]) lets every callback go
//! quiet even if the browser still fires it once more.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo_timers::callback::{Interval, Timeout};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, Element, Event, HtmlElement, KeyboardEvent, MouseEvent, Response, Window};

use super::canvas::CanvasSurface;
use super::dom::{self, Listener};
use super::render::FrameLoop;
use super::trail_layer::{CursorLayer, DomTrailSurface};
use crate::config::{FocusConfig, FxConfig};
use crate::decode::DecodedGif;
use crate::engine::PixelationEngine;
use crate::error::{FxError, Result};
use crate::focus::{ElementRect, FocusProbe};
use crate::geom::Point;
use crate::heuristic::{FocusedElement, PlaybackDetector, BLUR_SETTLE_MS};
use crate::trail::TrailEngine;

type Pixelation = PixelationEngine<CanvasSurface>;

struct TrailSide {
    trail: TrailEngine<DomTrailSurface, SmallRng>,
    cursor: CursorLayer,
    detector: PlaybackDetector,
    rhythm: Option<Interval>,
    blur_settle: Option<Timeout>,
}

pub struct Mounted {
    listeners: Vec<Listener>,
    frame_loop: Option<FrameLoop>,
    trail: Rc<RefCell<TrailSide>>,
    pixelation: Option<Rc<RefCell<Pixelation>>>,
    unmounted: bool,
}

impl Mounted {
    pub fn mount(config: FxConfig) -> Result<Self> {
        let window = dom::window()?;
        let document = dom::document()?;

        let trail = Rc::new(RefCell::new(TrailSide {
            trail: TrailEngine::new(
                config.trail.clone(),
                DomTrailSurface::new(&document)?,
                SmallRng::from_entropy(),
                window.scroll_y().unwrap_or(0.0),
            ),
            cursor: CursorLayer::new(&document, &config.cursor)?,
            detector: PlaybackDetector::default(),
            rhythm: None,
            blur_settle: None,
        }));

        let mut listeners = trail_listeners(&window, &document, &trail)?;

        let (pixelation, frame_loop) = match mount_pixelation(&window, &document, &config.focus)? {
            Some((engine, frame_loop)) => {
                let weak = Rc::downgrade(&engine);
                listeners.push(Listener::new(&window, "resize", move |_| {
                    let (Some(engine), Ok(window)) = (weak.upgrade(), dom::window()) else {
                        return;
                    };
                    engine.borrow_mut().resize(window.device_pixel_ratio());
                })?);
                (Some(engine), Some(frame_loop))
            }
            None => (None, None),
        };

        log::info!("portfolio effects mounted");
        Ok(Self {
            listeners,
            frame_loop,
            trail,
            pixelation,
            unmounted: false,
        })
    }

    /// Host-page override for the playback guess.
    pub fn set_playing(&self, playing: bool) {
        if self.unmounted {
            return;
        }
        let changed = self.trail.borrow_mut().detector.set(playing);
        if let Some(playing) = changed {
            apply_playing(&self.trail, playing);
        }
    }

    /// Tears everything down in dependency order. Idempotent.
    pub fn unmount(&mut self) {
        if self.unmounted {
            return;
        }
        self.unmounted = true;
        self.listeners.clear();
        if let Some(frame_loop) = self.frame_loop.take() {
            frame_loop.cancel();
        }
        {
            let mut side = self.trail.borrow_mut();
            side.rhythm = None;
            side.blur_settle = None;
            side.trail.dispose();
            side.cursor.remove();
        }
        if let Some(engine) = self.pixelation.take() {
            engine.borrow_mut().unmount();
        }
        log::info!("portfolio effects unmounted");
    }
}

impl Drop for Mounted {
    fn drop(&mut self) {
        self.unmount();
    }
}

fn trail_listeners(window: &Window, document: &Document, trail: &Rc<RefCell<TrailSide>>) -> Result<Vec<Listener>> {
    let mut listeners = Vec::new();

    let weak = Rc::downgrade(trail);
    listeners.push(Listener::new(document, "mousemove", move |event: Event| {
        let (Some(shared), Some(event), Ok(window)) =
            (weak.upgrade(), event.dyn_ref::<MouseEvent>(), dom::window())
        else {
            return;
        };
        let at = Point::new(f64::from(event.client_x()), f64::from(event.client_y()));
        let mut side = shared.borrow_mut();
        side.cursor.glyph_mut().pointer_moved(at);
        side.cursor.sync();
        side.trail.pointer_move(at, &dom::viewport(&window), dom::now_ms());
    })?);

    for (kind, visible) in [("mouseenter", true), ("mouseleave", false)] {
        let weak = Rc::downgrade(trail);
        listeners.push(Listener::new(document, kind, move |_| {
            let Some(shared) = weak.upgrade() else {
                return;
            };
            let mut side = shared.borrow_mut();
            if visible {
                side.cursor.glyph_mut().pointer_entered();
            } else {
                side.cursor.glyph_mut().pointer_left();
            }
            side.cursor.sync();
        })?);
    }

    let weak = Rc::downgrade(trail);
    listeners.push(Listener::new(window, "scroll", move |_| {
        let (Some(shared), Ok(window)) = (weak.upgrade(), dom::window()) else {
            return;
        };
        shared
            .borrow_mut()
            .trail
            .scroll(&dom::viewport(&window), dom::now_ms());
    })?);

    let weak = Rc::downgrade(trail);
    listeners.push(Listener::new(window, "blur", move |_| {
        let Some(shared) = weak.upgrade() else {
            return;
        };
        let settle = Timeout::new(BLUR_SETTLE_MS, settle_blur(Rc::downgrade(&shared)));
        // a newer blur replaces (and cancels) a pending one
        shared.borrow_mut().blur_settle = Some(settle);
    })?);

    let weak = Rc::downgrade(trail);
    listeners.push(Listener::new(window, "keydown", move |event: Event| {
        let is_escape = event
            .dyn_ref::<KeyboardEvent>()
            .is_some_and(|key| key.key() == "Escape");
        let Some(shared) = weak.upgrade().filter(|_| is_escape) else {
            return;
        };
        let changed = shared.borrow_mut().detector.set(false);
        if changed.is_some() {
            apply_playing(&shared, false);
        }
    })?);

    Ok(listeners)
}

fn settle_blur(weak: Weak<RefCell<TrailSide>>) -> impl FnOnce() + 'static {
    move || {
        let Some(shared) = weak.upgrade() else {
            return;
        };
        let tag = dom::document()
            .ok()
            .and_then(|document| document.active_element())
            .map(|el| el.tag_name());
        let focused = FocusedElement::from_tag_name(tag.as_deref());
        let toggled = shared.borrow_mut().detector.observe_blur(focused);
        if let Some(playing) = toggled {
            log::info!("embedded player focus toggle, guessing playing={playing}");
            apply_playing(&shared, playing);
        }
    }
}

/// Flips the trail's rhythm gate and starts or stops the tempo timer.
fn apply_playing(shared: &Rc<RefCell<TrailSide>>, playing: bool) {
    let mut side = shared.borrow_mut();
    if !side.trail.set_playing(playing) {
        return;
    }
    if !playing {
        side.rhythm = None;
        return;
    }
    let interval_ms = side.trail.config().rhythm_interval_ms().round().max(1.0) as u32;
    let weak = Rc::downgrade(shared);
    side.rhythm = Some(Interval::new(interval_ms, move || {
        let (Some(shared), Ok(window)) = (weak.upgrade(), dom::window()) else {
            return;
        };
        shared
            .borrow_mut()
            .trail
            .rhythm_tick(&dom::viewport(&window), dom::now_ms());
    }));
}

fn mount_pixelation(
    window: &Window,
    document: &Document,
    config: &FocusConfig,
) -> Result<Option<(Rc<RefCell<Pixelation>>, FrameLoop)>> {
    let Some(container) = document.get_element_by_id(&config.container_id) else {
        log::info!("no #{} on this page, pixelation skipped", config.container_id);
        return Ok(None);
    };
    let container: HtmlElement = container.dyn_into().map_err(wasm_bindgen::JsValue::from)?;
    let style = container.style();
    style.set_property("position", "relative")?;
    style.set_property("overflow", "hidden")?;
    style.set_property("width", &format!("{}px", config.display_width))?;
    style.set_property("height", &format!("{}px", config.display_height))?;

    let surface = CanvasSurface::new(document, &container)?;
    let engine = Rc::new(RefCell::new(PixelationEngine::new(
        config.clone(),
        surface,
        window.device_pixel_ratio(),
    )));

    let token = engine.borrow().cancel_token();
    let weak = Rc::downgrade(&engine);
    let source = config.source.clone();
    wasm_bindgen_futures::spawn_local(async move {
        let decoded = match fetch_bytes(&source).await {
            Ok(bytes) if !token.is_cancelled() => DecodedGif::from_bytes(&bytes),
            Ok(_) => return,
            Err(err) => Err(err),
        };
        if token.is_cancelled() {
            log::debug!("gif {source} arrived after unmount, dropped");
            return;
        }
        if let Some(engine) = weak.upgrade() {
            engine.borrow_mut().finish_decode(decoded, dom::now_ms());
        }
    });

    let weak = Rc::downgrade(&engine);
    let tracked: Element = container.into();
    let frame_loop = FrameLoop::start(move |ts| {
        let (Some(engine), Ok(window)) = (weak.upgrade(), dom::window()) else {
            return;
        };
        let probe = focus_probe(&window, &tracked);
        engine.borrow_mut().tick(ts, probe);
    })?;

    Ok(Some((engine, frame_loop)))
}

fn focus_probe(window: &Window, tracked: &Element) -> FocusProbe {
    let element = tracked.is_connected().then(|| {
        let rect = tracked.get_bounding_client_rect();
        ElementRect {
            top: rect.top(),
            height: rect.height(),
        }
    });
    FocusProbe {
        element,
        viewport_height: dom::viewport(window).height,
    }
}

async fn fetch_bytes(url: &str) -> Result<Vec<u8>> {
    let window = dom::window()?;
    let response: Response = JsFuture::from(window.fetch_with_str(url)).await?.dyn_into()?;
    if !response.ok() {
        return Err(FxError::Dom(format!("GET {url} answered {}", response.status())));
    }
    let buffer = JsFuture::from(response.array_buffer()?).await?;
    Ok(js_sys::Uint8Array::new(&buffer).to_vec())
}
