/// The error kinds the numeric core reports, shared by every CTSim crate.
///
/// Per-crate `Error` enums wrap a `CoreError` variant alongside their own
/// I/O or format-specific cases rather than redefining these kinds.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum CoreError {
    /// Unknown filter/backproject/interpolation name, `nsample < 1`, or an
    /// unknown phantom id.
    InvalidArgument(String),
    /// Fan-beam geometry with `scan_diameter / 2 >= focal_length`, or
    /// `nView < 1` / `nDet < 1`.
    InvalidGeometry(String),
    /// File signature mismatch, header-size mismatch on read, or a
    /// truncated payload.
    FormatMismatch(String),
    /// Arithmetic between images of different `(nx, ny)`.
    DimensionMismatch { a: (u32, u32), b: (u32, u32) },
    /// A singular analytic response evaluated exactly at its singularity
    /// was replaced by its documented limit (e.g. the Shepp filter's
    /// `4 / (pi * bw^2)` at `u == 0`). Informational, never fatal.
    NumericDegeneracy(String),
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
            Self::InvalidGeometry(msg) => write!(f, "invalid geometry: {msg}"),
            Self::FormatMismatch(msg) => write!(f, "format mismatch: {msg}"),
            Self::DimensionMismatch { a, b } => {
                write!(f, "dimension mismatch: {a:?} vs {b:?}")
            }
            Self::NumericDegeneracy(msg) => write!(f, "numeric degeneracy: {msg}"),
        }
    }
}

impl std::error::Error for CoreError {}
