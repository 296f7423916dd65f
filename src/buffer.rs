use crate::geom::Rect;

/// A straight-alpha RGBA8 raster; the GIF's logical screen lives in one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl FrameBuffer {
    /// Fully transparent `width × height` buffer.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 4],
        }
    }

    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> [u8; 4]) -> Self {
        let mut buffer = Self::new(width, height);
        for y in 0..height {
            for x in 0..width {
                buffer.put(x, y, f(x, y));
            }
        }
        buffer
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    /// Panics when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = self.offset(x, y);
        [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]]
    }

    pub fn put(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        let i = self.offset(x, y);
        self.data[i..i + 4].copy_from_slice(&rgba);
    }

    /// Resets `rect` (clipped) to transparent.
    pub fn clear_rect(&mut self, rect: Rect) {
        let rect = rect.clip_to(self.width, self.height);
        for y in rect.top..rect.bottom() {
            let start = self.offset(rect.left, y);
            let end = self.offset(rect.right(), y);
            self.data[start..end].fill(0);
        }
    }

    /// Paints an RGBA `patch` of `rect.width × rect.height` at `rect`.
    ///
    /// Transparent patch pixels keep what is underneath; anything else
    /// replaces it. The patch is clipped to the buffer.
    pub fn composite(&mut self, patch: &[u8], rect: Rect) {
        let stride = rect.width as usize * 4;
        if patch.len() < stride * rect.height as usize {
            log::warn!("patch shorter than its {}x{} rect, skipped", rect.width, rect.height);
            return;
        }
        let visible = rect.clip_to(self.width, self.height);
        for y in visible.top..visible.bottom() {
            let row = (y - rect.top) as usize * stride;
            for x in visible.left..visible.right() {
                let src = row + (x - rect.left) as usize * 4;
                let px = &patch[src..src + 4];
                if px[3] == 0 {
                    continue;
                }
                let dst = self.offset(x, y);
                self.data[dst..dst + 4].copy_from_slice(px);
            }
        }
    }
}
