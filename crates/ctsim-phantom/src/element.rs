//! A single phantom primitive: its shape, placement, and the derived
//! affine matrices and bounding rectangle the projector uses.

use crate::clip;
use ctsim_support::{element_transforms, Mat3};

pub const POINTS_PER_CIRCLE: u32 = 360;

/// Currently disabled (`0.0`) in the original program; kept as a hook so a
/// caller can widen every element's bounding rectangle uniformly without
/// touching the projector.
pub const SCALE_PELEM_EXTENT: f64 = 0.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Rectangle,
    Triangle,
    Ellipse,
    Sector,
    Segment,
}

impl ElementKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "rectangle" | "rect" => Some(Self::Rectangle),
            "triangle" => Some(Self::Triangle),
            "ellipse" => Some(Self::Ellipse),
            "sector" => Some(Self::Sector),
            "segment" => Some(Self::Segment),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Rectangle => "rectangle",
            Self::Triangle => "triangle",
            Self::Ellipse => "ellipse",
            Self::Sector => "sector",
            Self::Segment => "segment",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

/// Number of outline points covering an arc of `theta` radians, matching
/// `numCirclePoints`.
fn num_circle_points(theta: f64) -> u32 {
    let theta = theta.clamp(0.0, ctsim_support::TWO_PI);
    (POINTS_PER_CIRCLE as f64 * theta / ctsim_support::TWO_PI + 1.5).round() as u32
}

fn outline_points(kind: ElementKind, u: f64, v: f64) -> Vec<(f64, f64)> {
    match kind {
        ElementKind::Rectangle => vec![(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0), (-1.0, -1.0)],
        ElementKind::Triangle => vec![(-1.0, 0.0), (1.0, 0.0), (0.0, 1.0), (-1.0, 0.0)],
        ElementKind::Ellipse => {
            let n = num_circle_points(ctsim_support::TWO_PI);
            (0..n)
                .map(|i| {
                    let theta = ctsim_support::TWO_PI * i as f64 / n as f64;
                    (theta.cos(), theta.sin())
                })
                .collect()
        }
        ElementKind::Sector | ElementKind::Segment => {
            let r = (u * u + v * v).sqrt();
            let theta = u.atan2(v);
            let bisector = 1.5 * ctsim_support::PI;
            let start = bisector - theta;
            let stop = bisector + theta;
            let n = num_circle_points(stop - start).max(2);
            let mut pts: Vec<(f64, f64)> = (0..=n)
                .map(|i| {
                    let a = start + (stop - start) * i as f64 / n as f64;
                    // The arc lives in the u,v-prescaled frame; undo that
                    // scale so the outline is expressed in object-local
                    // (post-scale) coordinates like every other primitive.
                    (r * a.cos() / u, (v + r * a.sin()) / v)
                })
                .collect();
            if kind == ElementKind::Sector {
                pts.push((0.0, 1.0));
            }
            pts.push(pts[0]);
            pts
        }
    }
}

/// A placed, attenuating primitive. The object-local shape is always the
/// unit primitive (unit square, unit right triangle, unit circle, or the
/// `(u, v)`-parametrized arc shapes); `obj_to_phm` carries it to world.
#[derive(Debug, Clone, PartialEq)]
pub struct PhantomElement {
    pub kind: ElementKind,
    pub cx: f64,
    pub cy: f64,
    pub u: f64,
    pub v: f64,
    pub rot: f64,
    pub atten: f64,
    obj_to_phm: Mat3,
    phm_to_obj: Mat3,
    bounds: Rect,
}

impl PhantomElement {
    pub fn new(kind: ElementKind, cx: f64, cy: f64, u: f64, v: f64, rot: f64, atten: f64) -> Self {
        let (obj_to_phm, phm_to_obj) = element_transforms(cx, cy, u, v, rot);
        let bounds = Self::compute_bounds(kind, u, v, &obj_to_phm);
        Self {
            kind,
            cx,
            cy,
            u,
            v,
            rot,
            atten,
            obj_to_phm,
            phm_to_obj,
            bounds,
        }
    }

    fn compute_bounds(kind: ElementKind, u: f64, v: f64, obj_to_phm: &Mat3) -> Rect {
        let pts = outline_points(kind, u, v);
        let mut min_x = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        for (x, y) in pts {
            let (wx, wy) = obj_to_phm.apply(x, y);
            min_x = min_x.min(wx);
            max_x = max_x.max(wx);
            min_y = min_y.min(wy);
            max_y = max_y.max(wy);
        }
        let extra = SCALE_PELEM_EXTENT * (max_x - min_x).max(max_y - min_y);
        Rect {
            min_x: min_x - extra,
            max_x: max_x + extra,
            min_y: min_y - extra,
            max_y: max_y + extra,
        }
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn obj_to_phm(&self) -> &Mat3 {
        &self.obj_to_phm
    }

    pub fn phm_to_obj(&self) -> &Mat3 {
        &self.phm_to_obj
    }

    /// Whether a world (phantom) coordinate point lies inside the element.
    pub fn is_point_inside(&self, x: f64, y: f64) -> bool {
        let (ox, oy) = self.phm_to_obj.apply(x, y);
        match self.kind {
            ElementKind::Rectangle => ox.abs() <= 1.0 && oy.abs() <= 1.0,
            ElementKind::Triangle => oy >= 0.0 && oy <= 1.0 - ox && oy <= 1.0 + ox,
            ElementKind::Ellipse => ox * ox + oy * oy <= 1.0,
            ElementKind::Sector | ElementKind::Segment => {
                let (px, py) = (ox * self.u, oy * self.v);
                self.point_in_arc_shape(px, py)
            }
        }
    }

    fn point_in_arc_shape(&self, px: f64, py: f64) -> bool {
        let r = (self.u * self.u + self.v * self.v).sqrt();
        let center = (0.0_f64, self.v);
        if ((px - center.0).powi(2) + (py - center.1).powi(2)).sqrt() > r {
            return false;
        }
        let theta = self.u.atan2(self.v);
        let bisector = 1.5 * ctsim_support::PI;
        match self.kind {
            ElementKind::Sector => {
                let angle = (py - center.1).atan2(px - center.0);
                let mut rel = angle - (bisector - theta);
                rel = rel.rem_euclid(ctsim_support::TWO_PI);
                rel <= 2.0 * theta
            }
            ElementKind::Segment => {
                let a_start = bisector - theta;
                let a_stop = bisector + theta;
                let pa = (center.0 + r * a_start.cos(), center.1 + r * a_start.sin());
                let pb = (center.0 + r * a_stop.cos(), center.1 + r * a_stop.sin());
                let chord = (pb.0 - pa.0, pb.1 - pa.1);
                let to_point = (px - pa.0, py - pa.1);
                let to_center = (center.0 - pa.0, center.1 - pa.1);
                let cross_point = chord.0 * to_point.1 - chord.1 * to_point.0;
                let cross_center = chord.0 * to_center.1 - chord.1 * to_center.0;
                cross_point.signum() != cross_center.signum()
            }
            _ => unreachable!(),
        }
    }

    /// Clips the world-coordinate segment `(x1,y1)-(x2,y2)` to the portion
    /// that lies inside this element, returning the clipped world-space
    /// endpoints (or `None` if the segment misses it entirely). Mirrors
    /// `clipLineWorldCoords`: AABB pre-filter, transform to object space,
    /// intersect with the unit primitive, transform back.
    pub fn clip_line_world(&self, x1: f64, y1: f64, x2: f64, y2: f64) -> Option<((f64, f64), (f64, f64))> {
        if clip::clip_aabb(
            (x1, y1),
            (x2, y2),
            self.bounds.min_x,
            self.bounds.max_x,
            self.bounds.min_y,
            self.bounds.max_y,
        )
        .is_none()
        {
            return None;
        }

        let o1 = self.phm_to_obj.apply(x1, y1);
        let o2 = self.phm_to_obj.apply(x2, y2);

        let iv = match self.kind {
            ElementKind::Rectangle => clip::clip_rect(o1, o2),
            ElementKind::Ellipse => clip::clip_circle(o1, o2),
            ElementKind::Triangle => clip::clip_triangle(o1, o2),
            ElementKind::Sector => {
                let p0 = (o1.0 * self.u, o1.1 * self.v);
                let p1 = (o2.0 * self.u, o2.1 * self.v);
                clip::clip_sector(p0, p1, self.u, self.v)
            }
            ElementKind::Segment => {
                let p0 = (o1.0 * self.u, o1.1 * self.v);
                let p1 = (o2.0 * self.u, o2.1 * self.v);
                clip::clip_segment(p0, p1, self.u, self.v)
            }
        };

        let (lo, hi) = iv?;
        let dir_o = (o2.0 - o1.0, o2.1 - o1.1);
        let clipped_o1 = (o1.0 + lo * dir_o.0, o1.1 + lo * dir_o.1);
        let clipped_o2 = (o1.0 + hi * dir_o.0, o1.1 + hi * dir_o.1);
        Some((self.obj_to_phm.apply(clipped_o1.0, clipped_o1.1), self.obj_to_phm.apply(clipped_o2.0, clipped_o2.1)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unrotated_unit_ellipse_clips_a_diameter() {
        let el = PhantomElement::new(ElementKind::Ellipse, 0.0, 0.0, 1.0, 1.0, 0.0, 1.0);
        let (p1, p2) = el.clip_line_world(-5.0, 0.0, 5.0, 0.0).unwrap();
        assert!((p1.0 - -1.0).abs() < 1e-9);
        assert!((p2.0 - 1.0).abs() < 1e-9);
    }

    #[test]
    fn point_inside_matches_clip_containment() {
        let el = PhantomElement::new(ElementKind::Rectangle, 1.0, 0.5, 2.0, 1.0, 0.0, 1.0);
        assert!(el.is_point_inside(1.0, 0.5));
        assert!(!el.is_point_inside(10.0, 10.0));
    }
}
