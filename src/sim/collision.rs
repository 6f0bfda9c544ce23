//! Axis-aligned box overlap tests
//!
//! Everything on the board is a rectangle anchored at its bottom-left
//! corner, with y pointing up from the floor.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Bottom-left corner
    pub min: Vec2,
    /// Top-right corner
    pub max: Vec2,
}

impl Aabb {
    pub fn from_corner(bottom_left: Vec2, width: f32, height: f32) -> Self {
        Self {
            min: bottom_left,
            max: bottom_left + Vec2::new(width, height),
        }
    }

    /// Strict overlap: boxes that only share an edge do not collide
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap() {
        let a = Aabb::from_corner(Vec2::new(0.0, 0.0), 100.0, 20.0);
        let b = Aabb::from_corner(Vec2::new(90.0, 10.0), 20.0, 20.0);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let block = Aabb::from_corner(Vec2::new(10.0, 210.0), 100.0, 20.0);

        // Ball sitting directly below the block
        let below = Aabb::from_corner(Vec2::new(50.0, 190.0), 20.0, 20.0);
        assert!(!block.overlaps(&below));

        // Ball flush against the right edge
        let right = Aabb::from_corner(Vec2::new(110.0, 215.0), 20.0, 20.0);
        assert!(!block.overlaps(&right));
    }

    #[test]
    fn test_separated() {
        let a = Aabb::from_corner(Vec2::new(0.0, 0.0), 10.0, 10.0);
        let b = Aabb::from_corner(Vec2::new(50.0, 50.0), 10.0, 10.0);
        assert!(!a.overlaps(&b));
        assert_eq!(b.max, Vec2::new(60.0, 60.0));
    }
}
