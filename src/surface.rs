//! Rendering seams. The engines only ever talk to these traits; the DOM and
//! canvas adapters in `wasm/` implement them for the browser, tests implement
//! them with plain recorders.

use crate::buffer::FrameBuffer;
use crate::pixelate::PixelationPlan;
use crate::trail::{ParticleId, TrailParticle};

/// Where trail particles become visible.
pub trait TrailSurface {
    fn attach(&mut self, particle: &TrailParticle);
    fn detach(&mut self, id: ParticleId);
}

/// The visible pixelation canvas.
pub trait FrameSurface {
    /// Size the backing store for a `display` box (CSS px) at `dpr`.
    fn resize(&mut self, display: (u32, u32), dpr: f64);
    /// Draw `frame` through `plan`, replacing whatever was shown.
    fn present(&mut self, frame: &FrameBuffer, plan: &PixelationPlan);
    fn clear(&mut self);
}
