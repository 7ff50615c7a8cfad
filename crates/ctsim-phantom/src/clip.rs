//! Parametric (Liang-Barsky style) clipping of a line segment against a
//! convex region described as the intersection of half-planes and disks.
//!
//! The kept `original_source/` only shows `clip_rect`/`clip_circle`/
//! `clip_triangle`/`clip_segment`/`clip_sector` being *called*, not their
//! bodies, so these are derived directly from spec's algorithmic
//! description rather than transliterated: every primitive clip reduces to
//! intersecting the segment's parameter interval `[0, 1]` against one
//! linear or quadratic constraint per bounding edge/arc.

/// A point `p0 + t * dir` for `t` in `[lo, hi]` describes the surviving
/// sub-segment; `None` means the segment misses the region entirely.
pub type Interval = Option<(f64, f64)>;

fn intersect(a: Interval, b: Interval) -> Interval {
    match (a, b) {
        (Some((alo, ahi)), Some((blo, bhi))) => {
            let lo = alo.max(blo);
            let hi = ahi.min(bhi);
            if lo <= hi {
                Some((lo, hi))
            } else {
                None
            }
        }
        _ => None,
    }
}

/// Clips `[lo, hi]` against the half-plane `a*x + b*y <= c`, evaluated
/// along `p0 + t*dir`.
fn clip_halfplane(lo: f64, hi: f64, p0: (f64, f64), dir: (f64, f64), a: f64, b: f64, c: f64) -> Interval {
    // f(t) = a*(p0.x + t*dir.x) + b*(p0.y + t*dir.y) - c <= 0
    let f0 = a * p0.0 + b * p0.1 - c;
    let fd = a * dir.0 + b * dir.1;
    if fd.abs() < 1e-14 {
        return if f0 <= 1e-12 { Some((lo, hi)) } else { None };
    }
    let t_edge = -f0 / fd;
    if fd > 0.0 {
        // f increasing in t: valid region is t <= t_edge
        intersect(Some((lo, hi)), Some((f64::NEG_INFINITY, t_edge)))
    } else {
        intersect(Some((lo, hi)), Some((t_edge, f64::INFINITY)))
    }
}

/// Clips `[lo, hi]` against the disk `(x-cx)^2 + (y-cy)^2 <= r^2`.
fn clip_disk(lo: f64, hi: f64, p0: (f64, f64), dir: (f64, f64), center: (f64, f64), r: f64) -> Interval {
    let ox = p0.0 - center.0;
    let oy = p0.1 - center.1;
    let a = dir.0 * dir.0 + dir.1 * dir.1;
    let b = 2.0 * (ox * dir.0 + oy * dir.1);
    let c = ox * ox + oy * oy - r * r;
    if a < 1e-14 {
        return if c <= 1e-12 { Some((lo, hi)) } else { None };
    }
    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return None;
    }
    let sq = disc.sqrt();
    let t1 = (-b - sq) / (2.0 * a);
    let t2 = (-b + sq) / (2.0 * a);
    intersect(Some((lo, hi)), Some((t1.min(t2), t1.max(t2))))
}

/// A half-plane `a*x + b*y <= c` through `center` at direction angle
/// `theta`, oriented so that the point one unit along `bisector` from
/// `center` satisfies the constraint.
fn half_plane_toward(center: (f64, f64), theta: f64, bisector: f64) -> (f64, f64, f64) {
    let (dx, dy) = (theta.cos(), theta.sin());
    let (mut a, mut b) = (-dy, dx);
    let bx = center.0 + bisector.cos();
    let by = center.1 + bisector.sin();
    if a * bx + b * by > a * center.0 + b * center.1 + 1e-12 {
        a = -a;
        b = -b;
    }
    let c = a * center.0 + b * center.1;
    (a, b, c)
}

/// Clips a segment (in object-local coordinates) against the unit square
/// `[-1, 1]^2`: the rectangle primitive, and also the AABB pre-filter.
pub fn clip_rect(p0: (f64, f64), p1: (f64, f64)) -> Interval {
    let dir = (p1.0 - p0.0, p1.1 - p0.1);
    let mut iv = Some((0.0, 1.0));
    for (a, b, c) in [(1.0, 0.0, 1.0), (-1.0, 0.0, 1.0), (0.0, 1.0, 1.0), (0.0, -1.0, 1.0)] {
        iv = match iv {
            Some((lo, hi)) => clip_halfplane(lo, hi, p0, dir, a, b, c),
            None => None,
        };
    }
    iv
}

/// Clips against an axis-aligned rectangle `[min_x, max_x] x [min_y, max_y]`.
pub fn clip_aabb(p0: (f64, f64), p1: (f64, f64), min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> Interval {
    let dir = (p1.0 - p0.0, p1.1 - p0.1);
    let mut iv = Some((0.0, 1.0));
    for (a, b, c) in [
        (1.0, 0.0, max_x),
        (-1.0, 0.0, -min_x),
        (0.0, 1.0, max_y),
        (0.0, -1.0, -min_y),
    ] {
        iv = match iv {
            Some((lo, hi)) => clip_halfplane(lo, hi, p0, dir, a, b, c),
            None => None,
        };
    }
    iv
}

/// Clips against the unit circle centered at the origin: the ellipse
/// primitive (object-local coordinates already absorb the `(u, v)` scale).
pub fn clip_circle(p0: (f64, f64), p1: (f64, f64)) -> Interval {
    let dir = (p1.0 - p0.0, p1.1 - p0.1);
    clip_disk(0.0, 1.0, p0, dir, (0.0, 0.0), 1.0)
}

/// Clips against the unit right triangle `y >= 0, y <= 1 - x, y <= 1 + x`.
pub fn clip_triangle(p0: (f64, f64), p1: (f64, f64)) -> Interval {
    let dir = (p1.0 - p0.0, p1.1 - p0.1);
    let mut iv = Some((0.0, 1.0));
    for (a, b, c) in [(0.0, -1.0, 0.0), (1.0, 1.0, 1.0), (-1.0, 1.0, 1.0)] {
        iv = match iv {
            Some((lo, hi)) => clip_halfplane(lo, hi, p0, dir, a, b, c),
            None => None,
        };
    }
    iv
}

/// Clips a pie slice: disk of radius `r = sqrt(u^2 + v^2)` centered at
/// `(0, v)`, bounded by the two radii at angle `1.5*pi -+ theta` where
/// `theta = atan2(u, v)`. `p0`/`p1` are already rescaled to `(x*u, y*v)`
/// per spec's "re-scale before the arc test" rule.
pub fn clip_sector(p0: (f64, f64), p1: (f64, f64), u: f64, v: f64) -> Interval {
    let r = (u * u + v * v).sqrt();
    let center = (0.0, v);
    let theta = u.atan2(v);
    let bisector = 1.5 * std::f64::consts::PI;
    let dir = (p1.0 - p0.0, p1.1 - p0.1);
    let mut iv = clip_disk(0.0, 1.0, p0, dir, center, r);
    for angle in [bisector - theta, bisector + theta] {
        let (a, b, c) = half_plane_toward(center, angle, bisector);
        iv = match iv {
            Some((lo, hi)) => clip_halfplane(lo, hi, p0, dir, a, b, c),
            None => None,
        };
    }
    iv
}

/// Clips a circular segment: same disk as [`clip_sector`], but bounded by
/// the chord joining the two arc endpoints instead of the two radii.
pub fn clip_segment(p0: (f64, f64), p1: (f64, f64), u: f64, v: f64) -> Interval {
    let r = (u * u + v * v).sqrt();
    let center = (0.0, v);
    let theta = u.atan2(v);
    let bisector = 1.5 * std::f64::consts::PI;
    let a_start = bisector - theta;
    let a_stop = bisector + theta;
    let pa = (center.0 + r * a_start.cos(), center.1 + r * a_start.sin());
    let pb = (center.0 + r * a_stop.cos(), center.1 + r * a_stop.sin());
    let chord_dir = (pb.0 - pa.0, pb.1 - pa.1);
    // Normal of the chord, oriented away from the circle center.
    let mut a = -chord_dir.1;
    let mut b = chord_dir.0;
    if a * (center.0 - pa.0) + b * (center.1 - pa.1) > 0.0 {
        a = -a;
        b = -b;
    }
    let c = a * pa.0 + b * pa.1;

    let dir = (p1.0 - p0.0, p1.1 - p0.1);
    let disk_iv = clip_disk(0.0, 1.0, p0, dir, center, r);
    match disk_iv {
        Some((lo, hi)) => clip_halfplane(lo, hi, p0, dir, a, b, c),
        None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_clip_keeps_the_inside_portion() {
        let iv = clip_rect((-2.0, 0.0), (2.0, 0.0)).unwrap();
        assert!((iv.0 - 0.25).abs() < 1e-9);
        assert!((iv.1 - 0.75).abs() < 1e-9);
    }

    #[test]
    fn circle_clip_misses_a_line_outside_the_unit_disk() {
        assert!(clip_circle((-2.0, 5.0), (2.0, 5.0)).is_none());
    }

    #[test]
    fn circle_clip_keeps_a_diameter() {
        let iv = clip_circle((-1.0, 0.0), (1.0, 0.0)).unwrap();
        assert!((iv.0 - 0.0).abs() < 1e-9);
        assert!((iv.1 - 1.0).abs() < 1e-9);
    }
}
