use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::{closure::Closure, JsCast};

use super::dom;
use crate::error::Result;

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// A `requestAnimationFrame` loop that runs until [`FrameLoop::cancel`].
///
/// The callback reschedules itself once per display refresh, so ticks are
/// strictly sequential and never more than one per frame.
pub struct FrameLoop {
    callback: FrameCallback,
    pending: Rc<Cell<Option<i32>>>,
    cancelled: Rc<Cell<bool>>,
}

impl FrameLoop {
    pub fn start(mut tick: impl FnMut(f64) + 'static) -> Result<Self> {
        // `f` holds the animation-frame closure so that it can keep calling
        // `request_animation_frame` on itself. Storing it inside an `Option`
        // allows us to create the `Closure` first and then obtain a reference to
        // it from within itself.
        let f: FrameCallback = Rc::new(RefCell::new(None));
        let g = f.clone();
        let pending = Rc::new(Cell::new(None));
        let cancelled = Rc::new(Cell::new(false));

        let (pending_in, cancelled_in) = (pending.clone(), cancelled.clone());
        *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
            pending_in.set(None);
            if cancelled_in.get() {
                return;
            }
            tick(ts);

            // schedule next
            let next = f.borrow().as_ref().and_then(|cb| {
                web_sys::window()?
                    .request_animation_frame(cb.as_ref().unchecked_ref())
                    .ok()
            });
            if next.is_none() {
                log::warn!("animation frame request failed, loop stopped");
            }
            pending_in.set(next);
        }) as Box<dyn FnMut(f64)>));

        let first = {
            let cb = g.borrow();
            let cb = cb.as_ref().map(|cb| cb.as_ref().unchecked_ref::<js_sys::Function>().clone());
            match cb {
                Some(cb) => Some(dom::window()?.request_animation_frame(&cb)?),
                None => None,
            }
        };
        pending.set(first);

        Ok(Self {
            callback: g,
            pending,
            cancelled,
        })
    }

    /// Cancels the pending frame and frees the closure. Idempotent.
    pub fn cancel(&self) {
        if self.cancelled.replace(true) {
            return;
        }
        if let (Some(id), Some(window)) = (self.pending.take(), web_sys::window()) {
            if window.cancel_animation_frame(id).is_err() {
                log::debug!("cancel_animation_frame({id}) failed");
            }
        }
        // breaks the closure's reference to itself
        self.callback.borrow_mut().take();
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.cancel();
    }
}
