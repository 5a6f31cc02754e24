use core::ops::{Add, AddAssign, Mul, Neg, Sub};

/// 2D vector in pixels.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub const fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Unit vector in the same direction, or zero for a zero-length input.
    pub fn normalized_or_zero(self) -> Vec2 {
        let len = self.length();
        if len > f32::EPSILON { self * (1.0 / len) } else { Vec2::zero() }
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    #[inline]
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    #[inline]
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    #[inline]
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    #[inline]
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;
    #[inline]
    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_diagonal_movement() {
        let v = Vec2::new(1.0, 1.0).normalized_or_zero();
        assert!((v.length() - 1.0).abs() < 1e-6);
        assert!((v.x - v.y).abs() < 1e-6);
    }

    #[test]
    fn zero_stays_zero() {
        assert_eq!(Vec2::zero().normalized_or_zero(), Vec2::zero());
    }

    #[test]
    fn arithmetic() {
        let mut p = Vec2::new(1.0, 2.0);
        p += Vec2::new(0.5, -1.0) * 2.0;
        assert_eq!(p, Vec2::new(2.0, 0.0));
        assert_eq!(-p - Vec2::new(1.0, 1.0), Vec2::new(-3.0, -1.0));
    }
}
