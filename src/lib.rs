//! Decorative effects for the portfolio page: a custom cursor with a trail of
//! colored rectangles, and a GIF that pixelates as it scrolls away from the
//! middle of the screen.
//!
//! The engines are plain Rust and render through the traits in [`surface`], so
//! they run (and are tested) anywhere. The browser bindings are only compiled
//! for `wasm32`.

#![cfg_attr(target_arch = "wasm32", allow(dead_code))]

pub mod buffer;
pub mod config;
pub mod cursor;
pub mod decode;
pub mod engine;
pub mod error;
pub mod focus;
pub mod geom;
pub mod heuristic;
pub mod pixelate;
pub mod player;
pub mod surface;
pub mod task;
pub mod trail;

pub use config::FxConfig;
pub use error::{FxError, Result};

// Only compile wasm-specific code when targeting wasm32.

#[cfg(target_arch = "wasm32")]
mod wasm {
    use std::cell::RefCell;

    use wasm_bindgen::prelude::*;

    use crate::config::FxConfig;

    mod app;
    mod canvas;
    mod dom;
    mod render;
    mod trail_layer;

    /// Element holding a JSON config for the auto-mounted effects.
    const PAGE_CONFIG_ID: &str = "fx-config";

    thread_local! {
        /// The instance mounted by the start hook, kept alive for the page's lifetime.
        static AUTO_MOUNTED: RefCell<Option<FxHandle>> = const { RefCell::new(None) };
    }

    /// A mounted set of effects. Dropping it (or calling `unmount`) tears them down.
    #[wasm_bindgen]
    pub struct FxHandle {
        mounted: app::Mounted,
    }

    #[wasm_bindgen]
    impl FxHandle {
        /// Removes listeners, timers, particles and canvas content. Idempotent.
        pub fn unmount(&mut self) {
            self.mounted.unmount();
        }

        /// Lets the host page report playback state it knows for sure.
        #[wasm_bindgen(js_name = setPlaying)]
        pub fn set_playing(&self, playing: bool) {
            self.mounted.set_playing(playing);
        }
    }

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        let (config, from_page) = page_config();
        console_log::init_with_level(config.log_level()).ok();

        if !from_page && !has_container(&config) {
            log::debug!("no #{PAGE_CONFIG_ID} or #{} on this page, not auto-mounting", config.focus.container_id);
            return Ok(());
        }
        let handle = mount_with(config)?;
        AUTO_MOUNTED.with(|slot| *slot.borrow_mut() = Some(handle));
        Ok(())
    }

    /// Mounts the effects. `config_json` may be partial; missing keys keep
    /// their defaults. Without it the page's `#fx-config` (or the defaults)
    /// apply.
    #[wasm_bindgen]
    pub fn mount(config_json: Option<String>) -> Result<FxHandle, JsValue> {
        let config = match config_json {
            Some(json) => FxConfig::from_json(&json)?,
            None => page_config().0,
        };
        mount_with(config)
    }

    fn mount_with(config: FxConfig) -> Result<FxHandle, JsValue> {
        Ok(FxHandle {
            mounted: app::Mounted::mount(config)?,
        })
    }

    fn has_container(config: &FxConfig) -> bool {
        dom::document()
            .ok()
            .and_then(|document| document.get_element_by_id(&config.focus.container_id))
            .is_some()
    }

    /// The page config and whether the page actually carried one.
    fn page_config() -> (FxConfig, bool) {
        let json = dom::document()
            .ok()
            .and_then(|document| document.get_element_by_id(PAGE_CONFIG_ID))
            .and_then(|el| el.text_content());
        match json.as_deref().map(FxConfig::from_json) {
            Some(Ok(config)) => (config, true),
            Some(Err(err)) => {
                web_sys::console::warn_1(&format!("ignoring #{PAGE_CONFIG_ID}: {err}").into());
                (FxConfig::default(), true)
            }
            None => (FxConfig::default(), false),
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm::{mount, FxHandle};
