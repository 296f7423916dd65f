use std::collections::HashMap;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, HtmlElement, HtmlImageElement};

use crate::config::CursorConfig;
use crate::cursor::CursorGlyph;
use crate::error::{FxError, Result};
use crate::surface::TrailSurface;
use crate::trail::{Anchor, ParticleId, TrailParticle};

/// Sits between the pink page background and the profile image.
const TRAIL_Z_INDEX: &str = "5";
const CURSOR_Z_INDEX: &str = "99999";

/// Trail particles as absolutely/fixed positioned `div`s under `<body>`.
pub struct DomTrailSurface {
    document: Document,
    body: HtmlElement,
    live: HashMap<ParticleId, HtmlElement>,
}

impl DomTrailSurface {
    pub fn new(document: &Document) -> Result<Self> {
        let body = document.body().ok_or_else(|| FxError::Dom("no body".into()))?;
        Ok(Self {
            document: document.clone(),
            body,
            live: HashMap::new(),
        })
    }

    fn build(&self, particle: &TrailParticle) -> Result<HtmlElement> {
        let el: HtmlElement = self.document.create_element("div")?.dyn_into().map_err(JsValue::from)?;
        el.set_class_name("cursor-trail-rect");
        let style = el.style();
        let position = match particle.anchor {
            Anchor::Viewport => "fixed",
            Anchor::Page => "absolute",
        };
        for (name, value) in [
            ("position", position.to_owned()),
            ("left", format!("{}px", particle.left)),
            ("top", format!("{}px", particle.top)),
            ("width", format!("{}px", particle.width)),
            ("height", format!("{}px", particle.height)),
            ("background-color", particle.color.to_string()),
            ("z-index", TRAIL_Z_INDEX.to_owned()),
            ("border-radius", "2px".to_owned()),
            ("pointer-events", "none".to_owned()),
        ] {
            style.set_property(name, &value)?;
        }
        Ok(el)
    }
}

impl TrailSurface for DomTrailSurface {
    fn attach(&mut self, particle: &TrailParticle) {
        let attached = self
            .build(particle)
            .and_then(|el| {
                self.body.append_child(&el)?;
                Ok(el)
            });
        match attached {
            Ok(el) => {
                self.live.insert(particle.id, el);
            }
            Err(err) => log::debug!("trail particle #{} not shown: {err}", particle.id),
        }
    }

    fn detach(&mut self, id: ParticleId) {
        if let Some(el) = self.live.remove(&id) {
            el.remove();
        }
    }
}

/// The `<img>` that follows the pointer in place of the system cursor.
pub struct CursorLayer {
    glyph: CursorGlyph,
    image: HtmlImageElement,
}

impl CursorLayer {
    pub fn new(document: &Document, config: &CursorConfig) -> Result<Self> {
        let image: HtmlImageElement = document.create_element("img")?.dyn_into().map_err(JsValue::from)?;
        image.set_src(&config.image);
        image.set_alt("");
        image.set_draggable(false);
        image.set_class_name("custom-cursor");
        let style = image.style();
        let size = format!("{}px", config.size_px);
        for (name, value) in [
            ("position", "fixed"),
            ("pointer-events", "none"),
            ("z-index", CURSOR_Z_INDEX),
            ("width", size.as_str()),
            ("height", size.as_str()),
            ("display", "none"),
        ] {
            style.set_property(name, value)?;
        }
        if let Some(body) = document.body() {
            body.append_child(&image)?;
        }
        Ok(Self {
            glyph: CursorGlyph::new(config),
            image,
        })
    }

    pub fn glyph_mut(&mut self) -> &mut CursorGlyph {
        &mut self.glyph
    }

    /// Pushes the glyph state into the element's style.
    pub fn sync(&self) {
        let style = self.image.style();
        let result = match self.glyph.placement() {
            Some(at) => style
                .set_property("left", &format!("{}px", at.x))
                .and_then(|_| style.set_property("top", &format!("{}px", at.y)))
                .and_then(|_| style.set_property("display", "block")),
            None => style.set_property("display", "none"),
        };
        if result.is_err() {
            log::trace!("cursor style update rejected");
        }
    }

    pub fn remove(&self) {
        self.image.remove();
    }
}
