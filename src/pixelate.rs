//! The downscale/upscale filter.
//!
//! A [`PixelationPlan`] is geometry only: which part of the source to show
//! (a centered "cover" crop), how big the coarse grid is, and how big the
//! result is. The canvas adapter executes it with `drawImage`; [`rasterize`]
//! executes it in software.

use crate::buffer::FrameBuffer;
use crate::surface::FrameSurface;

/// Sub-pixel region of the source image.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SourceRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Largest centered region of `src` with the aspect ratio of `dest`.
pub fn cover_crop(src: (f64, f64), dest: (f64, f64)) -> Option<SourceRect> {
    let (src_w, src_h) = src;
    let (dest_w, dest_h) = dest;
    if !(src_w > 0.0 && src_h > 0.0 && dest_w > 0.0 && dest_h > 0.0) {
        return None;
    }
    let dest_aspect = dest_w / dest_h;
    if src_w / src_h > dest_aspect {
        let width = src_h * dest_aspect;
        Some(SourceRect {
            x: (src_w - width) / 2.0,
            y: 0.0,
            width,
            height: src_h,
        })
    } else {
        let height = src_w / dest_aspect;
        Some(SourceRect {
            x: 0.0,
            y: (src_h - height) / 2.0,
            width: src_w,
            height,
        })
    }
}

/// Cells needed to cover `display` with `block`-sized squares.
pub fn grid_size(display: (u32, u32), block: u32) -> (u32, u32) {
    let block = block.max(1);
    (
        display.0.div_ceil(block).max(1),
        display.1.div_ceil(block).max(1),
    )
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PixelationPlan {
    pub crop: SourceRect,
    /// Output size in CSS pixels.
    pub display: (u32, u32),
    /// Block edge in CSS pixels; 1 means native resolution.
    pub block: u32,
    /// Intermediate buffer size; equals `display` when native.
    pub grid: (u32, u32),
}

impl PixelationPlan {
    pub fn new(source: (u32, u32), display: (u32, u32), block: u32) -> Option<Self> {
        let crop = cover_crop(
            (f64::from(source.0), f64::from(source.1)),
            (f64::from(display.0), f64::from(display.1)),
        )?;
        let block = block.max(1);
        let grid = if block == 1 {
            display
        } else {
            grid_size(display, block)
        };
        Some(Self {
            crop,
            display,
            block,
            grid,
        })
    }

    pub fn is_native(&self) -> bool {
        self.block <= 1
    }
}

/// Renders `plan` with nearest sampling at both steps.
pub fn rasterize(frame: &FrameBuffer, plan: &PixelationPlan) -> FrameBuffer {
    let (grid_w, grid_h) = plan.grid;
    let max_x = frame.width().saturating_sub(1);
    let max_y = frame.height().saturating_sub(1);
    let crop = plan.crop;

    let grid = FrameBuffer::from_fn(grid_w, grid_h, |gx, gy| {
        let sx = crop.x + (f64::from(gx) + 0.5) * crop.width / f64::from(grid_w);
        let sy = crop.y + (f64::from(gy) + 0.5) * crop.height / f64::from(grid_h);
        frame.pixel((sx as u32).min(max_x), (sy as u32).min(max_y))
    });
    if plan.grid == plan.display {
        return grid;
    }

    let (dw, dh) = plan.display;
    FrameBuffer::from_fn(dw, dh, |x, y| {
        let gx = u64::from(x) * u64::from(grid_w) / u64::from(dw);
        let gy = u64::from(y) * u64::from(grid_h) / u64::from(dh);
        grid.pixel(gx as u32, gy as u32)
    })
}

/// A [`FrameSurface`] that keeps the last rendered image in memory.
#[derive(Debug, Default)]
pub struct SoftwareSurface {
    pub display: (u32, u32),
    pub dpr: f64,
    pub output: Option<FrameBuffer>,
    pub last_plan: Option<PixelationPlan>,
    pub presents: usize,
}

impl FrameSurface for SoftwareSurface {
    fn resize(&mut self, display: (u32, u32), dpr: f64) {
        self.display = display;
        self.dpr = dpr;
    }

    fn present(&mut self, frame: &FrameBuffer, plan: &PixelationPlan) {
        self.output = Some(rasterize(frame, plan));
        self.last_plan = Some(*plan);
        self.presents += 1;
    }

    fn clear(&mut self) {
        self.output = None;
    }
}
