//! Geometric paint primitives over a single map layer.
//!
//! Rectangle and circle fills clip to the map; structure stamps do not clip and
//! instead refuse to write when the 2x2 footprint would leave the map.

use serde::{Deserialize, Serialize};

use crate::error::ComposeError;
use crate::tilemap::Tilemap;
use crate::tiles::{StructureKind, TileId, ZoneId};

/// Cells beyond a town's 2x2 footprint that are cleared to the safe zone.
pub const TOWN_SAFETY_MARGIN: i32 = 2;

/// Largest accepted circle radius. Twice the largest map side, so any larger
/// circle centred on or near the map paints nothing more.
pub const MAX_RADIUS: i32 = 512;

/// Axis-aligned rectangle `[x, x+w) x [y, y+h)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= self.x as i64
            && y >= self.y as i64
            && x < self.x as i64 + self.w as i64
            && y < self.y as i64 + self.h as i64
    }
}

/// Disc of cells within Euclidean distance `radius` of `(cx, cy)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Circle {
    pub cx: i32,
    pub cy: i32,
    pub radius: i32,
}

impl Circle {
    pub const fn new(cx: i32, cy: i32, radius: i32) -> Self {
        Self { cx, cy, radius }
    }

    /// Distance test on integer cell centres, boundary included.
    pub fn contains(&self, x: i64, y: i64) -> bool {
        let dx = x - self.cx as i64;
        let dy = y - self.cy as i64;
        let r = self.radius as i64;
        dx.saturating_mul(dx).saturating_add(dy.saturating_mul(dy)) <= r * r
    }

    /// Inclusive bounding box as a rectangle, saturating at the `i32` limits.
    pub fn bounds(&self) -> Rect {
        let side = self.radius.saturating_mul(2).saturating_add(1);
        Rect::new(
            self.cx.saturating_sub(self.radius),
            self.cy.saturating_sub(self.radius),
            side,
            side,
        )
    }
}

/// Footprint of a paint operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum Shape {
    Rect(Rect),
    Circle(Circle),
}

impl Shape {
    pub fn contains(&self, x: i64, y: i64) -> bool {
        match self {
            Shape::Rect(r) => r.contains(x, y),
            Shape::Circle(c) => c.contains(x, y),
        }
    }

    pub fn bounds(&self) -> Rect {
        match self {
            Shape::Rect(r) => *r,
            Shape::Circle(c) => c.bounds(),
        }
    }
}

/// Clip a rectangle to the map, returning column and row ranges.
fn clip<T>(map: &Tilemap<T>, rect: Rect) -> (std::ops::Range<usize>, std::ops::Range<usize>) {
    let x0 = (rect.x as i64).clamp(0, map.width as i64) as usize;
    let y0 = (rect.y as i64).clamp(0, map.height as i64) as usize;
    let x1 = (rect.x as i64 + rect.w.max(0) as i64).clamp(0, map.width as i64) as usize;
    let y1 = (rect.y as i64 + rect.h.max(0) as i64).clamp(0, map.height as i64) as usize;
    (x0..x1.max(x0), y0..y1.max(y0))
}

/// Write `value` into every cell of `rect` that lies on the map.
pub fn fill_rect<T: Copy>(map: &mut Tilemap<T>, value: T, rect: Rect) {
    let (cols, rows) = clip(map, rect);
    for y in rows {
        for x in cols.clone() {
            map.set(x, y, value);
        }
    }
}

/// Write `value` into every on-map cell within `circle`.
pub fn fill_circle<T: Copy>(map: &mut Tilemap<T>, value: T, circle: Circle) {
    fill_circle_where(map, value, circle, |_| true);
}

/// Like [`fill_circle`], but only overwrites cells whose current value passes `keep`.
pub fn fill_circle_where<T: Copy, F: Fn(&T) -> bool>(
    map: &mut Tilemap<T>,
    value: T,
    circle: Circle,
    keep: F,
) -> usize {
    let (cols, rows) = clip(map, circle.bounds());
    let mut written = 0;
    for y in rows {
        for x in cols.clone() {
            if circle.contains(x as i64, y as i64) && keep(map.get(x, y)) {
                map.set(x, y, value);
                written += 1;
            }
        }
    }
    written
}

/// Fill any shape.
pub fn fill_shape<T: Copy>(map: &mut Tilemap<T>, value: T, shape: Shape) {
    match shape {
        Shape::Rect(rect) => fill_rect(map, value, rect),
        Shape::Circle(circle) => fill_circle(map, value, circle),
    }
}

/// Check that a 2x2 structure anchored at `(x, y)` fits a `width` x `height` map.
pub fn check_stamp(
    width: usize,
    height: usize,
    kind: StructureKind,
    name: &str,
    x: i64,
    y: i64,
) -> Result<(), ComposeError> {
    let fits = x >= 0 && y >= 0 && x + 1 < width as i64 && y + 1 < height as i64;
    if fits {
        Ok(())
    } else {
        Err(ComposeError::StructureOutOfBounds {
            name: name.to_string(),
            kind,
            x,
            y,
            width,
            height,
        })
    }
}

/// Write the four corner tiles of `kind` at `(x, y)`..`(x+1, y+1)`.
pub fn stamp_structure(
    tiles: &mut Tilemap<TileId>,
    kind: StructureKind,
    name: &str,
    x: i64,
    y: i64,
) -> Result<(), ComposeError> {
    check_stamp(tiles.width, tiles.height, kind, name, x, y)?;
    let (x, y) = (x as usize, y as usize);
    let [tl, tr, bl, br] = kind.corners();
    tiles.set(x, y, tl);
    tiles.set(x + 1, y, tr);
    tiles.set(x, y + 1, bl);
    tiles.set(x + 1, y + 1, br);
    Ok(())
}

/// The rectangle a town clears to [`ZoneId::None`]: footprint plus margin.
pub fn safety_margin(x: i32, y: i32) -> Rect {
    Rect::new(
        x - TOWN_SAFETY_MARGIN,
        y - TOWN_SAFETY_MARGIN,
        2 + TOWN_SAFETY_MARGIN * 2,
        2 + TOWN_SAFETY_MARGIN * 2,
    )
}

/// Clear encounters around a town anchored at `(x, y)`.
pub fn clear_safety_margin(zones: &mut Tilemap<ZoneId>, x: i32, y: i32) {
    fill_rect(zones, ZoneId::None, safety_margin(x, y));
}
