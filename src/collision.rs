use crate::entities::{Bounds, Rect};

/// Strict axis-aligned overlap test. Boxes that only share an edge do not
/// collide.
pub fn overlaps(a: Rect, b: Rect) -> bool {
    a.x < b.x + b.width && a.x + a.width > b.x && a.y < b.y + b.height && a.y + a.height > b.y
}

/// Whether two entities' collision boxes overlap.
pub fn collides(a: &impl Bounds, b: &impl Bounds) -> bool {
    overlaps(a.rect(), b.rect())
}
