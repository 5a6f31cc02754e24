/// Axis-aligned rectangle in pixels (top-left origin).
///
/// Used by game code for placement and collision; the renderer itself takes
/// integer rectangles.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    #[inline]
    pub fn right(self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(self) -> f32 {
        self.y + self.height
    }

    #[inline]
    pub fn center(self) -> (f32, f32) {
        (self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Normalizes the rectangle so width/height are non-negative.
    #[inline]
    pub fn normalized(self) -> Self {
        let mut r = self;
        if r.width < 0.0 {
            r.x += r.width;
            r.width = -r.width;
        }
        if r.height < 0.0 {
            r.y += r.height;
            r.height = -r.height;
        }
        r
    }

    /// Returns `true` if the rectangles share interior area.
    ///
    /// Rectangles that only touch along an edge do not overlap.
    #[inline]
    pub fn overlaps(self, other: Rect) -> bool {
        !(self.right() <= other.x
            || other.right() <= self.x
            || self.bottom() <= other.y
            || other.bottom() <= self.y)
    }

    /// Closed containment: both edges are inclusive.
    #[inline]
    pub fn contains_point(self, px: f32, py: f32) -> bool {
        px >= self.x && px <= self.right() && py >= self.y && py <= self.bottom()
    }

    /// Overlapping region of two rectangles, if any.
    #[inline]
    pub fn intersect(self, other: Rect) -> Option<Rect> {
        if !self.overlaps(other) {
            return None;
        }

        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = self.right().min(other.right());
        let y1 = self.bottom().min(other.bottom());

        Some(Rect::new(x0, y0, x1 - x0, y1 - y0))
    }

    /// Moves the rectangle so it lies inside `[0, width] x [0, height]`.
    ///
    /// The size is kept; a rectangle larger than the bounds is pinned to the
    /// far edge.
    #[inline]
    pub fn clamped_into(self, width: f32, height: f32) -> Rect {
        let mut r = self;
        if r.x < 0.0 {
            r.x = 0.0;
        }
        if r.y < 0.0 {
            r.y = 0.0;
        }
        if r.right() > width {
            r.x = width - r.width;
        }
        if r.bottom() > height {
            r.y = height - r.height;
        }
        r
    }
}
