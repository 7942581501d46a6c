//! Geometry of the swatch scene: where each swatch sits, which one is under
//! the pointer, and whether a press/release pair was a click or a move.

use crate::color::HexColor;
use crate::swatches::Palette;

pub const SWATCH_SIZE: f32 = 100.0;
pub const SWATCH_SPACING: f32 = 20.0;
pub const SCENE_MARGIN: f32 = 50.0;
pub const SCENE_HEIGHT: f32 = 300.0;

/// Press and release closer than this (Manhattan distance) count as a click.
pub const CLICK_SLOP: f32 = 5.0;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn manhattan(self, other: Point) -> f32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Swatch {
    pub color: HexColor,
    /// Top-left corner in scene coordinates.
    pub pos: Point,
}

impl Swatch {
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.pos.x
            && p.x < self.pos.x + SWATCH_SIZE
            && p.y >= self.pos.y
            && p.y < self.pos.y + SWATCH_SIZE
    }

    /// Where the hex label is centered.
    pub fn center(&self) -> Point {
        Point::new(self.pos.x + SWATCH_SIZE / 2.0, self.pos.y + SWATCH_SIZE / 2.0)
    }
}

#[derive(Clone, Copy, Debug)]
struct Grab {
    index: usize,
    start: Point,
    offset: Point,
}

#[derive(Clone, Debug, Default)]
pub struct SwatchBoard {
    swatches: Vec<Swatch>,
    grab: Option<Grab>,
}

/// Scene width needed for `n` swatches in a row.
pub fn scene_width(n: usize) -> f32 {
    SCENE_MARGIN + n as f32 * (SWATCH_SIZE + SWATCH_SPACING)
}

impl SwatchBoard {
    pub fn new(palette: &Palette) -> Self {
        let swatches = palette
            .iter()
            .enumerate()
            .map(|(i, color)| Swatch {
                color,
                pos: Point::new(SCENE_MARGIN + i as f32 * (SWATCH_SIZE + SWATCH_SPACING), SCENE_MARGIN),
            })
            .collect();
        Self { swatches, grab: None }
    }

    pub fn swatches(&self) -> &[Swatch] {
        &self.swatches
    }

    pub fn width(&self) -> f32 {
        scene_width(self.swatches.len())
    }

    /// Index of the top-most swatch under `p`. Later swatches paint over
    /// earlier ones.
    pub fn hit_test(&self, p: Point) -> Option<usize> {
        self.swatches.iter().rposition(|s| s.contains(p))
    }

    /// Start tracking a press. Returns whether a swatch was grabbed.
    pub fn press(&mut self, p: Point) -> bool {
        self.grab = self.hit_test(p).map(|index| {
            let pos = self.swatches[index].pos;
            Grab {
                index,
                start: p,
                offset: Point::new(p.x - pos.x, p.y - pos.y),
            }
        });
        self.grab.is_some()
    }

    /// Move the grabbed swatch so it stays under the pointer.
    pub fn drag_to(&mut self, p: Point) {
        if let Some(grab) = self.grab {
            self.swatches[grab.index].pos = Point::new(p.x - grab.offset.x, p.y - grab.offset.y);
        }
    }

    /// Finish the press. Returns the swatch color when it was a click rather
    /// than a drag.
    pub fn release(&mut self, p: Point) -> Option<HexColor> {
        let grab = self.grab?;
        self.drag_to(p);
        self.grab = None;
        (grab.start.manhattan(p) < CLICK_SLOP).then(|| self.swatches[grab.index].color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn board() -> SwatchBoard {
        SwatchBoard::new(&Palette::random(&mut StdRng::seed_from_u64(3)))
    }

    #[test]
    fn lays_out_left_to_right() {
        let board = board();
        let xs: Vec<f32> = board.swatches().iter().map(|s| s.pos.x).collect();
        assert_eq!(xs, vec![50.0, 170.0, 290.0, 410.0, 530.0]);
        assert!(board.swatches().iter().all(|s| s.pos.y == 50.0));
        assert_eq!(board.width(), 650.0);
        assert_eq!(board.swatches()[0].center(), Point::new(100.0, 100.0));
    }

    #[test]
    fn hit_test_ignores_gaps() {
        let board = board();
        assert_eq!(board.hit_test(Point::new(60.0, 60.0)), Some(0));
        assert_eq!(board.hit_test(Point::new(160.0, 60.0)), None);
        assert_eq!(board.hit_test(Point::new(175.0, 149.0)), Some(1));
        assert_eq!(board.hit_test(Point::new(175.0, 150.0)), None);
    }

    #[test]
    fn small_wobble_is_a_click() {
        let mut board = board();
        let color = board.swatches()[2].color;
        assert!(board.press(Point::new(300.0, 80.0)));
        board.drag_to(Point::new(302.0, 81.0));
        assert_eq!(board.release(Point::new(302.0, 82.0)), Some(color));
    }

    #[test]
    fn drag_moves_without_copying() {
        let mut board = board();
        assert!(board.press(Point::new(60.0, 60.0)));
        board.drag_to(Point::new(80.0, 90.0));
        assert_eq!(board.release(Point::new(100.0, 120.0)), None);
        assert_eq!(board.swatches()[0].pos, Point::new(90.0, 110.0));
        assert_eq!(board.hit_test(Point::new(175.0, 160.0)), Some(0));
        // Where they overlap, swatch 1 paints on top.
        assert_eq!(board.hit_test(Point::new(175.0, 120.0)), Some(1));
    }

    #[test]
    fn release_without_press_does_nothing() {
        let mut board = board();
        assert!(!board.press(Point::new(5.0, 5.0)));
        assert_eq!(board.release(Point::new(5.0, 5.0)), None);
    }
}
