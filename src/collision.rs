/// Exact silhouette overlap.
///
/// Shapes are rasterised into a boolean mask the size of the entity's
/// bounding square, sampling at pixel centres. Two entities collide when
/// their bounding rectangles intersect and at least one pixel inside the
/// intersection is set in both masks. Non-convex shapes (the arrowhead, the
/// star) therefore only collide where they are actually drawn.

use crate::behavior::behavior;
use crate::entities::{Entity, Shape};
use crate::geometry::Point;

/// Integer screen rectangle, `x`/`y` at the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub fn centred(x: f64, y: f64, side: i32) -> Rect {
        Rect {
            x: x.round() as i32 - side / 2,
            y: y.round() as i32 - side / 2,
            w: side,
            h: side,
        }
    }

    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = (self.x + self.w).min(other.x + other.w);
        let bottom = (self.y + self.h).min(other.y + other.h);
        if right > left && bottom > top {
            Some(Rect {
                x: left,
                y: top,
                w: right - left,
                h: bottom - top,
            })
        } else {
            None
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Silhouette {
    side: i32,
    bits: Vec<bool>,
}

impl Silhouette {
    /// Rasterise `shape` into a `side`×`side` mask centred on the origin.
    pub fn rasterise(shape: &Shape, outline: u32, side: i32) -> Silhouette {
        let side = side.max(1);
        let half = f64::from(side) / 2.0;
        let mut bits = Vec::with_capacity((side * side) as usize);
        for row in 0..side {
            for col in 0..side {
                let p = Point::new(f64::from(col) + 0.5 - half, f64::from(row) + 0.5 - half);
                bits.push(covers(shape, outline, p));
            }
        }
        Silhouette { side, bits }
    }

    pub fn side(&self) -> i32 {
        self.side
    }

    pub fn get(&self, col: i32, row: i32) -> bool {
        if col < 0 || row < 0 || col >= self.side || row >= self.side {
            return false;
        }
        self.bits[(row * self.side + col) as usize]
    }

    pub fn count(&self) -> usize {
        self.bits.iter().filter(|b| **b).count()
    }
}

fn covers(shape: &Shape, outline: u32, p: Point) -> bool {
    let stroke = f64::from(outline) / 2.0;
    match shape {
        Shape::Polygon(points) if outline == 0 => inside_polygon(points, p),
        Shape::Polygon(points) => edges(points).any(|(a, b)| segment_distance(a, b, p) <= stroke),
        Shape::Circle { radius } => {
            let d = p.x.hypot(p.y);
            if outline == 0 {
                d <= *radius
            } else {
                d <= *radius && d > radius - f64::from(outline)
            }
        }
        Shape::Ring { radius, width } => {
            let d = p.x.hypot(p.y);
            d <= *radius && d > radius - width
        }
        Shape::Line { from, to } => segment_distance(*from, *to, p) <= stroke.max(0.5),
    }
}

fn edges(points: &[Point]) -> impl Iterator<Item = (Point, Point)> + '_ {
    points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(a, b)| (*a, *b))
}

/// Even-odd rule.
fn inside_polygon(points: &[Point], p: Point) -> bool {
    let mut inside = false;
    for (a, b) in edges(points) {
        if (a.y > p.y) != (b.y > p.y) {
            let cross_x = a.x + (p.y - a.y) / (b.y - a.y) * (b.x - a.x);
            if p.x < cross_x {
                inside = !inside;
            }
        }
    }
    inside
}

fn segment_distance(a: Point, b: Point, p: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    let t = if len_sq == 0.0 {
        0.0
    } else {
        (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0)
    };
    (p.x - (a.x + t * dx)).hypot(p.y - (a.y + t * dy))
}

/// Side of the square an entity is drawn in.
/// Kept even so the mask centre falls on a pixel corner.
pub fn sprite_side(entity: &Entity) -> i32 {
    let side = (entity.radius * 2.0).ceil() as i32;
    side + side % 2
}

pub fn bounding_rect(entity: &Entity) -> Rect {
    Rect::centred(entity.x, entity.y, sprite_side(entity))
}

pub fn silhouette(entity: &Entity) -> Silhouette {
    let (shape, outline) = (behavior(&entity.kind).shape)(entity);
    Silhouette::rasterise(&shape, outline, sprite_side(entity))
}

/// Do the drawn silhouettes of `a` and `b` overlap?
pub fn collides(a: &Entity, b: &Entity) -> bool {
    let ra = bounding_rect(a);
    let rb = bounding_rect(b);
    let Some(shared) = ra.intersection(&rb) else {
        return false;
    };
    let ma = silhouette(a);
    let mb = silhouette(b);
    for y in shared.y..shared.y + shared.h {
        for x in shared.x..shared.x + shared.w {
            if ma.get(x - ra.x, y - ra.y) && mb.get(x - rb.x, y - rb.y) {
                return true;
            }
        }
    }
    false
}
