//! Frame compositing and timing for a decoded GIF.

use crate::buffer::FrameBuffer;
use crate::decode::{DecodedGif, Disposal, FramePatch};

pub struct GifPlayer {
    frames: Vec<FramePatch>,
    canvas: FrameBuffer,
    /// Canvas as it was right before a restore-to-previous frame was drawn.
    saved: Option<FrameBuffer>,
    index: usize,
    /// Frame whose disposal is still owed; `None` before the first draw.
    displayed: Option<usize>,
    last_advance_ms: f64,
    min_delay_ms: f64,
}

impl GifPlayer {
    /// Composites frame 0 and starts its clock at `now_ms`.
    pub fn new(gif: DecodedGif, min_delay_ms: f64, now_ms: f64) -> Self {
        let canvas = FrameBuffer::new(gif.width(), gif.height());
        let mut player = Self {
            frames: gif.into_frames(),
            canvas,
            saved: None,
            index: 0,
            displayed: None,
            last_advance_ms: now_ms,
            min_delay_ms,
        };
        player.render_frame(0);
        player
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn canvas(&self) -> &FrameBuffer {
        &self.canvas
    }

    fn current_delay_ms(&self) -> f64 {
        f64::from(self.frames[self.index].delay_ms).max(self.min_delay_ms)
    }

    /// Cleans up after the displayed frame, then draws `index` (wrapped).
    pub fn render_frame(&mut self, index: usize) {
        let index = index % self.frames.len();
        if let Some(prev) = self.displayed.take() {
            self.apply_disposal(prev);
        }

        let frame = &self.frames[index];
        if frame.disposal == Disposal::RestorePrevious {
            self.saved = Some(self.canvas.clone());
        }
        self.canvas.composite(&frame.rgba, frame.rect);

        self.index = index;
        self.displayed = Some(index);
    }

    fn apply_disposal(&mut self, prev: usize) {
        let frame = &self.frames[prev];
        match frame.disposal {
            Disposal::None => {}
            Disposal::RestoreBackground => self.canvas.clear_rect(frame.rect),
            Disposal::RestorePrevious => match self.saved.take() {
                Some(snapshot) => self.canvas = snapshot,
                None => self.canvas.clear_rect(frame.rect),
            },
        }
    }

    /// Moves one frame forward if the current one has been shown long enough.
    ///
    /// At most one frame per call, and the clock restarts at `now_ms`, so a
    /// long gap never fast-forwards through missed frames.
    pub fn advance_if_due(&mut self, now_ms: f64) -> bool {
        if self.frames.len() < 2 {
            return false;
        }
        if now_ms - self.last_advance_ms < self.current_delay_ms() {
            return false;
        }
        self.render_frame(self.index + 1);
        self.last_advance_ms = now_ms;
        true
    }

    /// Gives the current frame its full duration again, counted from `now_ms`.
    pub fn restart_clock(&mut self, now_ms: f64) {
        self.last_advance_ms = now_ms;
    }
}
