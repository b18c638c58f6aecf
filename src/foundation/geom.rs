//! Small geometric constructions shared by the expression kinds.

pub use kurbo::{Affine, Line, Point, Vec2};

const PARALLEL_EPS: f64 = 1e-12;

/// Point where the infinite extensions of `a` and `b` cross.
///
/// Returns `None` for parallel (or coincident) lines and for zero-length inputs.
pub fn line_intersection(a: Line, b: Line) -> Option<Point> {
    let da = a.p1 - a.p0;
    let db = b.p1 - b.p0;
    if da.hypot2() == 0.0 || db.hypot2() == 0.0 {
        return None;
    }
    let denom = da.cross(db);
    if denom.abs() < PARALLEL_EPS {
        return None;
    }
    let t = (b.p0 - a.p0).cross(db) / denom;
    Some(a.p0 + da * t)
}

/// `true` when `a`, `b`, `c` are positive and satisfy the strict triangle inequality.
pub fn is_valid_triangle(a: f64, b: f64, c: f64) -> bool {
    a > 0.0 && b > 0.0 && c > 0.0 && a + b > c && a + c > b && b + c > a
}

/// Triangle `[A, B, C]` from side lengths, where `a` is opposite `A` and so on.
///
/// `A` sits at `base`, `B` lies at distance `c` along the x axis, and the whole triangle is rotated
/// about `A` by `rotation_deg`.
pub fn sss_triangle(a: f64, b: f64, c: f64, base: Point, rotation_deg: f64) -> Option<[Point; 3]> {
    if !is_valid_triangle(a, b, c) {
        return None;
    }
    // Law of cosines for C relative to A.
    let cx = (b * b + c * c - a * a) / (2.0 * c);
    let cy = (b * b - cx * cx).max(0.0).sqrt();

    let place = Affine::translate(base.to_vec2())
        * Affine::rotate(rotation_deg.to_radians());
    Some([
        place * Point::ORIGIN,
        place * Point::new(c, 0.0),
        place * Point::new(cx, cy),
    ])
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/geom.rs"]
mod tests;
