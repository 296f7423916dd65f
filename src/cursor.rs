use crate::config::CursorConfig;
use crate::geom::Point;

/// The custom cursor image that replaces the system pointer.
#[derive(Clone, Debug, PartialEq)]
pub struct CursorGlyph {
    size: f64,
    position: Point,
    visible: bool,
}

impl CursorGlyph {
    pub fn new(config: &CursorConfig) -> Self {
        Self {
            size: config.size_px,
            position: Point::default(),
            visible: false,
        }
    }

    pub fn pointer_moved(&mut self, at: Point) {
        self.position = at;
        self.visible = true;
    }

    pub fn pointer_entered(&mut self) {
        self.visible = true;
    }

    pub fn pointer_left(&mut self) {
        self.visible = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn size(&self) -> f64 {
        self.size
    }

    /// Top-left of the glyph with its hotspot centered on the pointer, or
    /// `None` while hidden.
    pub fn placement(&self) -> Option<Point> {
        self.visible.then(|| {
            let half = self.size / 2.0;
            Point::new(self.position.x - half, self.position.y - half)
        })
    }
}
