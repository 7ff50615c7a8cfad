//! Phantom definitions and the analytic line-integral projector.

mod clip;
mod element;
mod phantom;
mod project;

pub use element::{ElementKind, PhantomElement, Rect, POINTS_PER_CIRCLE, SCALE_PELEM_EXTENT};
pub use phantom::{Composition, Phantom};
pub use project::{project_line, rasterize};
