use nalgebra as na;
use serde_derive::{Deserialize, Serialize};

/// Axis-aligned rectangle in pixel coordinates of one frame; `x`/`y` name
/// the left-top corner. Boxes carry no identity and are not retained
/// across frames.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    #[serde(rename = "w")]
    pub width: f32,
    #[serde(rename = "h")]
    pub height: f32,
}

impl BoundingBox {
    #[inline]
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Geometric center, used as the tracked position.
    #[inline(always)]
    pub fn centroid(&self) -> na::Point2<f32> {
        na::Point2::new(self.x + self.width / 2., self.y + self.height / 2.)
    }

    #[inline(always)]
    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    #[inline(always)]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline(always)]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline(always)]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline(always)]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centroid_is_geometric_center() {
        let b = BoundingBox::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(b.centroid(), na::Point2::new(25.0, 40.0));
        assert_eq!(b.area(), 1200.0);
    }

    #[test]
    fn edges() {
        let b = BoundingBox::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(b.left(), 1.0);
        assert_eq!(b.top(), 2.0);
        assert_eq!(b.right(), 4.0);
        assert_eq!(b.bottom(), 6.0);
    }
}
