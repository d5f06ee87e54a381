/// Axis-aligned face box in frame pixel coordinates.
///
/// Locators are expected to return boxes with positive size that lie inside
/// the frame; consumers check with [`BoundingBox::fits_within`] before
/// touching pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl BoundingBox {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Area in pixels; zero for degenerate or negative-size boxes.
    pub fn area(&self) -> i64 {
        if self.width <= 0 || self.height <= 0 {
            return 0;
        }
        self.width as i64 * self.height as i64
    }

    /// True when the box has positive size and lies entirely inside a
    /// `frame_width` × `frame_height` frame.
    pub fn fits_within(&self, frame_width: u32, frame_height: u32) -> bool {
        self.width > 0
            && self.height > 0
            && self.x >= 0
            && self.y >= 0
            && (self.x as i64 + self.width as i64) <= frame_width as i64
            && (self.y as i64 + self.height as i64) <= frame_height as i64
    }

    /// Intersects the box with the frame rectangle.
    ///
    /// Returns `None` when nothing with positive area remains.
    pub fn clamped_to(&self, frame_width: u32, frame_height: u32) -> Option<BoundingBox> {
        let x1 = (self.x as i64).clamp(0, frame_width as i64);
        let y1 = (self.y as i64).clamp(0, frame_height as i64);
        let x2 = (self.x as i64 + self.width as i64).clamp(0, frame_width as i64);
        let y2 = (self.y as i64 + self.height as i64).clamp(0, frame_height as i64);
        if x2 <= x1 || y2 <= y1 {
            return None;
        }
        Some(BoundingBox::new(
            x1 as i32,
            y1 as i32,
            (x2 - x1) as i32,
            (y2 - y1) as i32,
        ))
    }

    /// Picks the box with the largest area.
    ///
    /// Ties go to the box seen first, so the choice is reproducible for a
    /// locator that returns faces in a fixed order.
    pub fn largest(boxes: &[BoundingBox]) -> Option<&BoundingBox> {
        boxes.iter().reduce(|best, candidate| {
            if candidate.area() > best.area() {
                candidate
            } else {
                best
            }
        })
    }
}
