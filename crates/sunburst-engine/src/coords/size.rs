/// Pixel size of the current frame's render target.
///
/// Read once per frame from the window/context. A zero or negative extent
/// disables drawing for that frame.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct DrawableSize {
    pub width: i32,
    pub height: i32,
}

impl DrawableSize {
    #[inline]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Unset size: nothing is drawable until a frame is opened.
    #[inline]
    pub const fn unset() -> Self {
        Self::new(0, 0)
    }

    #[inline]
    pub fn is_drawable(self) -> bool {
        self.width > 0 && self.height > 0
    }
}

impl From<winit::dpi::PhysicalSize<u32>> for DrawableSize {
    fn from(size: winit::dpi::PhysicalSize<u32>) -> Self {
        Self {
            width: i32::try_from(size.width).unwrap_or(i32::MAX),
            height: i32::try_from(size.height).unwrap_or(i32::MAX),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_is_not_drawable() {
        assert!(!DrawableSize::unset().is_drawable());
    }

    #[test]
    fn negative_extent_is_not_drawable() {
        assert!(!DrawableSize::new(-800, 600).is_drawable());
        assert!(!DrawableSize::new(800, -1).is_drawable());
    }

    #[test]
    fn from_physical_size() {
        let s: DrawableSize = winit::dpi::PhysicalSize::new(1600u32, 900u32).into();
        assert_eq!(s, DrawableSize::new(1600, 900));
        assert!(s.is_drawable());
    }
}
