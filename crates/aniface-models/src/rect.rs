use serde::{Deserialize, Serialize};

/// An axis-aligned face bounding box in source-frame pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceRect {
    /// X coordinate of the top-left corner
    pub x: u32,
    /// Y coordinate of the top-left corner
    pub y: u32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl FaceRect {
    /// Create a new face rectangle.
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// X coordinate of the right edge (exclusive).
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Y coordinate of the bottom edge (exclusive).
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    /// Area in pixels.
    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Check whether a pixel lies inside this rectangle.
    pub fn contains(&self, px: u32, py: u32) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges_and_area() {
        let rect = FaceRect::new(10, 20, 30, 40);
        assert_eq!(rect.right(), 40);
        assert_eq!(rect.bottom(), 60);
        assert_eq!(rect.area(), 1200);
    }

    #[test]
    fn test_contains() {
        let rect = FaceRect::new(5, 5, 10, 10);
        assert!(rect.contains(5, 5));
        assert!(rect.contains(14, 14));
        assert!(!rect.contains(15, 15));
        assert!(!rect.contains(4, 5));
    }

    #[test]
    fn test_serde_round_trip() {
        let rect = FaceRect::new(1, 2, 3, 4);
        let json = serde_json::to_string(&rect).unwrap();
        let back: FaceRect = serde_json::from_str(&json).unwrap();
        assert_eq!(rect, back);
    }
}
