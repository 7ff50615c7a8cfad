//! Binary container formats: the `Array2dFile` pixel/projection layout and
//! the contiguous `Array2d<T>` grid it stores samples in.

mod array2d;
mod array2dfile;
mod error;
pub mod netorder;

pub use array2d::Array2d;
pub use array2dfile::{Array2dFile, Array2dFileLabel, AxisMetadata, DataType, LabelType, PixelFormat, SIGNATURE};
pub use error::{Error, Result};

/// Writes a single [`Array2dFileLabel`] record, for containers (like
/// `Projections`) that embed one outside of a full `Array2dFile`.
pub fn write_label<W: std::io::Write>(w: &mut W, label: &Array2dFileLabel) -> Result<()> {
    label.write(w)
}

/// Reads a single [`Array2dFileLabel`] record written by [`write_label`].
pub fn read_label<R: std::io::Read>(r: &mut R) -> Result<Array2dFileLabel> {
    Array2dFileLabel::read(r)
}
