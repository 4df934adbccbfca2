use glam::{IVec2, UVec2};

/// Rect
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub pos: IVec2,
    pub size: UVec2,
}

impl Rect {
    pub const fn new(pos: IVec2, size: UVec2) -> Self {
        Self { pos, size }
    }

    /// Top-left corner
    pub fn min(&self) -> IVec2 {
        self.pos
    }

    /// Bottom-right corner, exclusive
    pub fn max(&self) -> IVec2 {
        self.pos + self.size.as_ivec2()
    }

    /// Whether `other` lies entirely inside this rect
    pub fn contains_rect(&self, other: &Self) -> bool {
        other.min().cmpge(self.min()).all() && other.max().cmple(self.max()).all()
    }

    pub fn is_touching(&self, other: &Self) -> bool {
        let (min, max) = (self.min(), self.max());
        let (other_min, other_max) = (other.min(), other.max());
        !(min.x >= other_max.x || max.x <= other_min.x || min.y >= other_max.y || max.y <= other_min.y)
    }
}
