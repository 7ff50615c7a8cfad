//! `Phantom`: a named or user-built composition of [`PhantomElement`]s.

use crate::element::{ElementKind, PhantomElement, Rect};
use ctsim_support::CoreError;
use std::io::{BufRead, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Composition {
    /// The ordinary analytic sum-of-elements phantom.
    Pelems,
    /// A single unit impulse at the scan center; `Scanner` special-cases
    /// this to synthesize the view directly rather than integrating.
    UnitPulse,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Phantom {
    pub name: String,
    pub composition: Composition,
    pub elements: Vec<PhantomElement>,
}

/// `cx, cy, u, v, rot_deg, atten` — the Shepp-Logan head phantom ellipse
/// table, grounded in `addStdShepp`.
const SHEPP_LOGAN: &[(f64, f64, f64, f64, f64, f64)] = &[
    (0.0, 0.0, 0.69, 0.92, 0.0, 1.00),
    (0.0, -0.0184, 0.6624, 0.874, 0.0, -0.98),
    (0.22, 0.0, 0.11, 0.31, -18.0, -0.02),
    (-0.22, 0.0, 0.16, 0.41, 18.0, -0.02),
    (0.0, 0.35, 0.21, 0.25, 0.0, 0.01),
    (0.0, 0.1, 0.046, 0.046, 0.0, 0.01),
    (0.0, -0.1, 0.046, 0.046, 0.0, 0.01),
    (-0.08, -0.605, 0.046, 0.023, 0.0, 0.01),
    (0.0, -0.605, 0.023, 0.023, 0.0, 0.01),
    (0.06, -0.605, 0.023, 0.046, 0.0, 0.01),
    (0.5538, -0.3858, 0.033, 0.206, -18.0, 0.03),
];

/// `kind, cx, cy, u, v, rot_deg, atten` — the Herman head phantom table,
/// grounded in `addStdHerman`.
#[allow(clippy::type_complexity)]
const HERMAN_HEAD: &[(ElementKind, f64, f64, f64, f64, f64, f64)] = &[
    (ElementKind::Ellipse, 0.0, 0.0, 0.69, 0.92, 0.0, 1.0),
    (ElementKind::Ellipse, 0.0, -0.0184, 0.6624, 0.874, 0.0, -0.8),
    (ElementKind::Ellipse, 0.22, 0.0, 0.41, 0.16, -18.0, -0.2),
    (ElementKind::Ellipse, -0.22, 0.0, 0.31, 0.11, 18.0, -0.2),
    (ElementKind::Ellipse, 0.0, 0.35, 0.25, 0.21, 0.0, 0.1),
    (ElementKind::Ellipse, 0.0, 0.1, 0.046, 0.046, 0.0, 0.1),
    (ElementKind::Ellipse, 0.0, -0.1, 0.046, 0.046, 0.0, 0.1),
    (ElementKind::Ellipse, -0.08, -0.605, 0.046, 0.023, 0.0, 0.1),
    (ElementKind::Ellipse, 0.0, -0.605, 0.023, 0.023, 0.0, 0.1),
    (ElementKind::Ellipse, 0.06, -0.605, 0.023, 0.046, 0.0, 0.1),
    (ElementKind::Rectangle, 0.0, 0.6, 0.1, 0.05, 0.0, 0.2),
    (ElementKind::Triangle, -0.5, 0.0, 0.1, 0.15, 90.0, 0.15),
    (ElementKind::Sector, 0.5, -0.2, 0.1, 0.15, 0.0, 0.25),
    (ElementKind::Segment, -0.3, -0.5, 0.1, 0.1, 45.0, 0.2),
];

impl Phantom {
    fn from_table(name: &str, elements: Vec<PhantomElement>) -> Self {
        Self {
            name: name.to_string(),
            composition: Composition::Pelems,
            elements,
        }
    }

    pub fn shepp_logan() -> Self {
        let elements = SHEPP_LOGAN
            .iter()
            .map(|&(cx, cy, u, v, rot_deg, atten)| {
                PhantomElement::new(ElementKind::Ellipse, cx, cy, u, v, rot_deg.to_radians(), atten)
            })
            .collect();
        Self::from_table("shepplogan", elements)
    }

    pub fn herman_head() -> Self {
        let elements = HERMAN_HEAD
            .iter()
            .map(|&(kind, cx, cy, u, v, rot_deg, atten)| PhantomElement::new(kind, cx, cy, u, v, rot_deg.to_radians(), atten))
            .collect();
        Self::from_table("herman", elements)
    }

    pub fn unit_pulse() -> Self {
        Self {
            name: "unit_pulse".to_string(),
            composition: Composition::UnitPulse,
            elements: vec![PhantomElement::new(ElementKind::Ellipse, 0.0, 0.0, 0.01, 0.01, 0.0, 1.0)],
        }
    }

    pub fn by_name(name: &str) -> Result<Self, CoreError> {
        match name.to_ascii_lowercase().as_str() {
            "shepplogan" | "shepp-logan" | "shepp_logan" => Ok(Self::shepp_logan()),
            "herman" | "hermanhead" => Ok(Self::herman_head()),
            "unitpulse" | "unit_pulse" => Ok(Self::unit_pulse()),
            other => Err(CoreError::InvalidArgument(format!("unknown phantom name {other:?}"))),
        }
    }

    /// The union of every element's bounding rectangle.
    pub fn bounds(&self) -> Rect {
        self.elements.iter().fold(
            Rect {
                min_x: f64::INFINITY,
                max_x: f64::NEG_INFINITY,
                min_y: f64::INFINITY,
                max_y: f64::NEG_INFINITY,
            },
            |acc, el| {
                let b = el.bounds();
                Rect {
                    min_x: acc.min_x.min(b.min_x),
                    max_x: acc.max_x.max(b.max_x),
                    min_y: acc.min_y.min(b.min_y),
                    max_y: acc.max_y.max(b.max_y),
                }
            },
        )
    }

    /// The diameter of the circle enclosing every element's bounding box,
    /// used by the rasterizer to size the output image extent.
    pub fn diameter_boundary_circle(&self) -> f64 {
        let b = self.bounds();
        let half_w = (b.max_x - b.min_x) / 2.0;
        let half_h = (b.max_y - b.min_y) / 2.0;
        2.0 * (half_w * half_w + half_h * half_h).sqrt()
    }

    /// Reads a whitespace-separated `type cx cy u v rot_deg atten` record
    /// file (case-insensitive type names), one element per line; blank
    /// lines and lines starting with `#` are skipped.
    pub fn create_from_file<R: BufRead>(name: &str, r: R) -> Result<Self, CoreError> {
        let mut elements = Vec::new();
        for (lineno, line) in r.lines().enumerate() {
            let line = line.map_err(|e| CoreError::FormatMismatch(e.to_string()))?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() != 7 {
                return Err(CoreError::FormatMismatch(format!(
                    "line {}: expected 7 fields, found {}",
                    lineno + 1,
                    fields.len()
                )));
            }
            let kind = ElementKind::from_name(fields[0])
                .ok_or_else(|| CoreError::FormatMismatch(format!("line {}: unknown element type {:?}", lineno + 1, fields[0])))?;
            let parse = |s: &str| -> Result<f64, CoreError> {
                s.parse().map_err(|_| CoreError::FormatMismatch(format!("line {}: bad number {:?}", lineno + 1, s)))
            };
            let (cx, cy, u, v, rot_deg, atten) = (
                parse(fields[1])?,
                parse(fields[2])?,
                parse(fields[3])?,
                parse(fields[4])?,
                parse(fields[5])?,
                parse(fields[6])?,
            );
            elements.push(PhantomElement::new(kind, cx, cy, u, v, rot_deg.to_radians(), atten));
        }
        Ok(Self::from_table(name, elements))
    }

    pub fn file_write<W: Write>(&self, mut w: W) -> std::io::Result<()> {
        for el in &self.elements {
            writeln!(
                w,
                "{} {} {} {} {} {} {}",
                el.kind.name(),
                el.cx,
                el.cy,
                el.u,
                el.v,
                el.rot.to_degrees(),
                el.atten
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shepp_logan_has_eleven_ellipses() {
        assert_eq!(Phantom::shepp_logan().elements.len(), 11);
    }

    #[test]
    fn definition_file_round_trips() {
        let phm = Phantom::herman_head();
        let mut buf = Vec::new();
        phm.file_write(&mut buf).unwrap();
        let reread = Phantom::create_from_file("herman", std::io::Cursor::new(buf)).unwrap();
        assert_eq!(reread.elements.len(), phm.elements.len());
    }
}
