//! 2D vector for pointer positions and panel offsets

use serde::{Deserialize, Serialize};

/// A point or offset in page pixels
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    /// Page origin (top-left of the viewport)
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Format as CSS `left`/`top` pixel values
    pub fn to_css(self) -> (String, String) {
        (format!("{}px", self.x), format!("{}px", self.y))
    }

    /// Approximate equality, for pixel positions produced by float arithmetic
    #[inline]
    pub fn approx_eq(self, other: Vec2) -> bool {
        (self.x - other.x).abs() < 0.001 && (self.y - other.y).abs() < 0.001
    }
}

impl std::ops::Add for Vec2 {
    type Output = Vec2;
    #[inline]
    fn add(self, other: Vec2) -> Vec2 {
        Vec2::new(self.x + other.x, self.y + other.y)
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Vec2;
    #[inline]
    fn sub(self, other: Vec2) -> Vec2 {
        Vec2::new(self.x - other.x, self.y - other.y)
    }
}

impl std::ops::Neg for Vec2 {
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
    fn test_offset_round_trip() {
        let origin = Vec2::new(120.0, 80.0);
        let pointer = Vec2::new(150.5, 92.0);

        let offset = origin - pointer;
        assert!((offset.x - (-30.5)).abs() < 0.001);
        assert!((offset.y - (-12.0)).abs() < 0.001);
        assert!((pointer + offset).approx_eq(origin));
        assert!((-offset).approx_eq(pointer - origin));
    }

    #[test]
    fn test_css_format() {
        let (left, top) = Vec2::new(10.0, -4.5).to_css();
        assert_eq!(left, "10px");
        assert_eq!(top, "-4.5px");
    }
}
