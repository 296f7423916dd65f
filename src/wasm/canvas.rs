use wasm_bindgen::{Clamped, JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlElement, ImageData};

use crate::buffer::FrameBuffer;
use crate::error::{FxError, Result};
use crate::pixelate::PixelationPlan;
use crate::surface::FrameSurface;

/// Runs [`PixelationPlan`]s on a visible 2D canvas.
///
/// Two detached canvases do the work: `source` holds the composited GIF frame
/// at native size, `scratch` holds the coarse grid that gets blown up.
pub struct CanvasSurface {
    visible: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    source: HtmlCanvasElement,
    source_ctx: CanvasRenderingContext2d,
    scratch: HtmlCanvasElement,
    scratch_ctx: CanvasRenderingContext2d,
    display: (u32, u32),
}

impl CanvasSurface {
    /// Uses the first `<canvas>` inside `container`, creating one if needed.
    pub fn new(document: &Document, container: &HtmlElement) -> Result<Self> {
        let visible = match container.query_selector("canvas")? {
            Some(el) => el.dyn_into::<HtmlCanvasElement>().map_err(JsValue::from)?,
            None => {
                let canvas = create_canvas(document)?;
                container.append_child(&canvas)?;
                canvas
            }
        };
        for (name, value) in [
            ("position", "absolute"),
            ("inset", "0"),
            ("pointer-events", "none"),
            ("image-rendering", "pixelated"),
        ] {
            visible.style().set_property(name, value)?;
        }

        let source = create_canvas(document)?;
        let scratch = create_canvas(document)?;
        Ok(Self {
            ctx: context_2d(&visible)?,
            source_ctx: context_2d(&source)?,
            scratch_ctx: context_2d(&scratch)?,
            visible,
            source,
            scratch,
            display: (0, 0),
        })
    }

    fn upload(&self, frame: &FrameBuffer) -> Result<()> {
        let (w, h) = (frame.width(), frame.height());
        if self.source.width() != w || self.source.height() != h {
            self.source.set_width(w);
            self.source.set_height(h);
        }
        let data = ImageData::new_with_u8_clamped_array_and_sh(Clamped(frame.as_bytes()), w, h)?;
        self.source_ctx.put_image_data(&data, 0.0, 0.0)?;
        Ok(())
    }

    fn draw(&self, frame: &FrameBuffer, plan: &PixelationPlan) -> Result<()> {
        self.upload(frame)?;
        let (dw, dh) = (f64::from(plan.display.0), f64::from(plan.display.1));
        let crop = plan.crop;
        self.ctx.clear_rect(0.0, 0.0, dw, dh);

        if plan.is_native() {
            self.ctx.set_image_smoothing_enabled(true);
            self.ctx
                .draw_image_with_html_canvas_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                    &self.source, crop.x, crop.y, crop.width, crop.height, 0.0, 0.0, dw, dh,
                )?;
            return Ok(());
        }

        let (gw, gh) = plan.grid;
        // resizing also resets the scratch context
        self.scratch.set_width(gw);
        self.scratch.set_height(gh);
        let (gw, gh) = (f64::from(gw), f64::from(gh));
        self.scratch_ctx.clear_rect(0.0, 0.0, gw, gh);
        self.scratch_ctx.set_image_smoothing_enabled(true);
        self.scratch_ctx
            .draw_image_with_html_canvas_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                &self.source, crop.x, crop.y, crop.width, crop.height, 0.0, 0.0, gw, gh,
            )?;

        self.ctx.set_image_smoothing_enabled(false);
        self.ctx
            .draw_image_with_html_canvas_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                &self.scratch, 0.0, 0.0, gw, gh, 0.0, 0.0, dw, dh,
            )?;
        Ok(())
    }

    fn apply_size(&mut self, display: (u32, u32), dpr: f64) -> Result<()> {
        self.display = display;
        let (w, h) = (f64::from(display.0), f64::from(display.1));
        self.visible.set_width((w * dpr).round() as u32);
        self.visible.set_height((h * dpr).round() as u32);
        let style = self.visible.style();
        style.set_property("width", &format!("{w}px"))?;
        style.set_property("height", &format!("{h}px"))?;
        // draw in CSS pixels, land on device pixels
        self.ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0)?;
        Ok(())
    }
}

impl FrameSurface for CanvasSurface {
    fn resize(&mut self, display: (u32, u32), dpr: f64) {
        if let Err(err) = self.apply_size(display, dpr) {
            log::warn!("pixelation canvas resize failed: {err}");
        }
    }

    fn present(&mut self, frame: &FrameBuffer, plan: &PixelationPlan) {
        if let Err(err) = self.draw(frame, plan) {
            log::debug!("pixelation draw skipped: {err}");
        }
    }

    fn clear(&mut self) {
        let (w, h) = self.display;
        self.ctx.clear_rect(0.0, 0.0, f64::from(w), f64::from(h));
    }
}

fn create_canvas(document: &Document) -> Result<HtmlCanvasElement> {
    Ok(document
        .create_element("canvas")?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(JsValue::from)?)
}

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d> {
    Ok(canvas
        .get_context("2d")?
        .ok_or_else(|| FxError::Dom("2d canvas context unavailable".into()))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(JsValue::from)?)
}
