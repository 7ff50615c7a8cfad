//! `Array2dFile`: the bit-exact, network-byte-order pixel/projection
//! container shared by `ImageFile` and `Projections`.
//!
//! Two behaviors the original program got wrong are fixed here rather than
//! carried forward:
//!   - `setAxisExtent` only ever assigned `m_minX` twice, leaving `m_maxX`
//!     stale; [`Array2dFile::set_axis_extent`] assigns all four fields.
//!   - `arrayDataClear` zeroed the imaginary plane through the real plane's
//!     pointer; [`Array2dFile::clear_imaginary`] zeroes the correct buffer.

use crate::array2d::Array2d;
use crate::error::{Error, Result};
use crate::netorder::{read_f64, read_u16, read_u32, write_f64, write_u16, write_u32};
use std::io::{Read, Seek, SeekFrom, Write};

pub const SIGNATURE: u16 = ('I' as u16) * 256 + 'F' as u16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum PixelFormat {
    Int8 = 1,
    UInt8 = 2,
    Int16 = 3,
    UInt16 = 4,
    Int32 = 5,
    UInt32 = 6,
    Float32 = 7,
    Float64 = 8,
}

impl PixelFormat {
    pub fn byte_size(self) -> u16 {
        match self {
            PixelFormat::Int8 | PixelFormat::UInt8 => 1,
            PixelFormat::Int16 | PixelFormat::UInt16 => 2,
            PixelFormat::Int32 | PixelFormat::UInt32 => 4,
            PixelFormat::Float32 => 4,
            PixelFormat::Float64 => 8,
        }
    }

    fn from_u16(v: u16) -> Result<Self> {
        Ok(match v {
            1 => PixelFormat::Int8,
            2 => PixelFormat::UInt8,
            3 => PixelFormat::Int16,
            4 => PixelFormat::UInt16,
            5 => PixelFormat::Int32,
            6 => PixelFormat::UInt32,
            7 => PixelFormat::Float32,
            8 => PixelFormat::Float64,
            other => {
                return Err(Error::Core(ctsim_support::CoreError::FormatMismatch(
                    format!("unknown pixelFormat {other}"),
                )))
            }
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum DataType {
    Real = 1,
    Complex = 2,
}

impl DataType {
    fn from_u16(v: u16) -> Result<Self> {
        Ok(match v {
            1 => DataType::Real,
            2 => DataType::Complex,
            other => {
                return Err(Error::Core(ctsim_support::CoreError::FormatMismatch(
                    format!("unknown dataType {other}"),
                )))
            }
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum LabelType {
    Empty = 0,
    History = 1,
    User = 2,
}

impl LabelType {
    fn from_u16(v: u16) -> Result<Self> {
        Ok(match v {
            0 => LabelType::Empty,
            1 => LabelType::History,
            2 => LabelType::User,
            other => {
                return Err(Error::Core(ctsim_support::CoreError::FormatMismatch(
                    format!("unknown labelType {other}"),
                )))
            }
        })
    }
}

/// One history/user annotation attached to a container, recording when and
/// (for `History`/`User`) what calculation produced the data.
#[derive(Debug, Clone, PartialEq)]
pub struct Array2dFileLabel {
    pub label_type: LabelType,
    pub year: u16,
    pub month: u16,
    pub day: u16,
    pub hour: u16,
    pub minute: u16,
    pub second: u16,
    pub calc_time: f64,
    pub text: String,
}

impl Array2dFileLabel {
    pub fn history(text: impl Into<String>, calc_time: f64, timestamp: (u16, u16, u16, u16, u16, u16)) -> Self {
        let (year, month, day, hour, minute, second) = timestamp;
        Self {
            label_type: LabelType::History,
            year,
            month,
            day,
            hour,
            minute,
            second,
            calc_time,
            text: text.into(),
        }
    }

    pub(crate) fn write<W: Write>(&self, w: &mut W) -> Result<()> {
        write_u16(w, self.label_type as u16)?;
        write_u16(w, self.year)?;
        write_u16(w, self.month)?;
        write_u16(w, self.day)?;
        write_u16(w, self.hour)?;
        write_u16(w, self.minute)?;
        write_u16(w, self.second)?;
        write_f64(w, self.calc_time)?;
        let bytes = self.text.as_bytes();
        write_u16(w, bytes.len() as u16)?;
        w.write_all(bytes)?;
        Ok(())
    }

    pub(crate) fn read<R: Read>(r: &mut R) -> Result<Self> {
        let label_type = LabelType::from_u16(read_u16(r)?)?;
        let year = read_u16(r)?;
        let month = read_u16(r)?;
        let day = read_u16(r)?;
        let hour = read_u16(r)?;
        let minute = read_u16(r)?;
        let second = read_u16(r)?;
        let calc_time = read_f64(r)?;
        let str_len = read_u16(r)?;
        let mut buf = vec![0u8; str_len as usize];
        r.read_exact(&mut buf)?;
        let text = String::from_utf8_lossy(&buf).into_owned();
        Ok(Self {
            label_type,
            year,
            month,
            day,
            hour,
            minute,
            second,
            calc_time,
            text,
        })
    }
}

/// The axis-extent and axis-increment metadata optionally attached to a
/// container's header, plus the linear pixel-value offset/scale pair.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AxisMetadata {
    pub increment_known: bool,
    pub increment_x: f64,
    pub increment_y: f64,
    pub extent_known: bool,
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
    pub offset_pv: f64,
    pub scale_pv: f64,
}

/// The bit-exact `Array2dFile` container: a header, a real pixel plane, an
/// optional imaginary plane, and a list of labels.
#[derive(Debug, Clone, PartialEq)]
pub struct Array2dFile {
    pub pixel_format: PixelFormat,
    pub data_type: DataType,
    pub axis: AxisMetadata,
    pub real: Array2d<f64>,
    pub imaginary: Option<Array2d<f64>>,
    pub labels: Vec<Array2dFileLabel>,
}

impl Array2dFile {
    pub fn new_real(nx: u32, ny: u32) -> Self {
        Self {
            pixel_format: PixelFormat::Float64,
            data_type: DataType::Real,
            axis: AxisMetadata::default(),
            real: Array2d::new(nx, ny),
            imaginary: None,
            labels: Vec::new(),
        }
    }

    pub fn new_complex(nx: u32, ny: u32) -> Self {
        Self {
            pixel_format: PixelFormat::Float64,
            data_type: DataType::Complex,
            axis: AxisMetadata::default(),
            real: Array2d::new(nx, ny),
            imaginary: Some(Array2d::new(nx, ny)),
            labels: Vec::new(),
        }
    }

    pub fn nx(&self) -> u32 {
        self.real.nx()
    }

    pub fn ny(&self) -> u32 {
        self.real.ny()
    }

    /// Sets all four axis-extent fields and marks the extent as known.
    ///
    /// The original `setAxisExtent` assigned `m_minX` twice and never
    /// touched `m_maxX`; every field below is assigned independently.
    pub fn set_axis_extent(&mut self, min_x: f64, max_x: f64, min_y: f64, max_y: f64) {
        self.axis.min_x = min_x;
        self.axis.max_x = max_x;
        self.axis.min_y = min_y;
        self.axis.max_y = max_y;
        self.axis.extent_known = true;
    }

    pub fn set_axis_increment(&mut self, increment_x: f64, increment_y: f64) {
        self.axis.increment_x = increment_x;
        self.axis.increment_y = increment_y;
        self.axis.increment_known = true;
    }

    /// Zeroes the imaginary plane, allocating it first if the container
    /// was real-only.
    pub fn clear_imaginary(&mut self) {
        let nx = self.nx();
        let ny = self.ny();
        self.imaginary = Some(Array2d::new(nx, ny));
    }

    pub fn add_label(&mut self, label: Array2dFileLabel) {
        self.labels.push(label);
    }

    pub fn write<W: Write + Seek>(&self, w: &mut W) -> Result<()> {
        let header_pos = w.stream_position()?;
        write_u16(w, 0)?; // headersize placeholder
        write_u16(w, SIGNATURE)?;
        write_u16(w, self.pixel_format as u16)?;
        write_u16(w, self.pixel_format.byte_size())?;
        write_u16(w, self.labels.len() as u16)?;
        write_u32(w, self.nx())?;
        write_u32(w, self.ny())?;
        write_u16(w, self.data_type as u16)?;
        write_u16(w, self.axis.increment_known as u16)?;
        write_f64(w, self.axis.increment_x)?;
        write_f64(w, self.axis.increment_y)?;
        write_u16(w, self.axis.extent_known as u16)?;
        write_f64(w, self.axis.min_x)?;
        write_f64(w, self.axis.max_x)?;
        write_f64(w, self.axis.min_y)?;
        write_f64(w, self.axis.max_y)?;
        write_f64(w, self.axis.offset_pv)?;
        write_f64(w, self.axis.scale_pv)?;

        let after_header = w.stream_position()?;
        w.seek(SeekFrom::Start(header_pos))?;
        write_u16(w, (after_header - header_pos) as u16)?;
        w.seek(SeekFrom::Start(after_header))?;

        for ix in 0..self.nx() {
            for &v in self.real.column(ix) {
                write_f64(w, v)?;
            }
        }
        if let Some(imag) = &self.imaginary {
            for ix in 0..self.nx() {
                for &v in imag.column(ix) {
                    write_f64(w, v)?;
                }
            }
        }
        for label in &self.labels {
            label.write(w)?;
        }
        Ok(())
    }

    pub fn read<R: Read + Seek>(r: &mut R) -> Result<Self> {
        let start = r.stream_position()?;
        let headersize = read_u16(r)?;
        let signature = read_u16(r)?;
        if signature != SIGNATURE {
            return Err(Error::Core(ctsim_support::CoreError::FormatMismatch(
                format!("bad signature {signature:#06x}, expected {SIGNATURE:#06x}"),
            )));
        }
        let pixel_format = PixelFormat::from_u16(read_u16(r)?)?;
        let _pixel_size = read_u16(r)?;
        let num_labels = read_u16(r)?;
        let nx = read_u32(r)?;
        let ny = read_u32(r)?;
        let data_type = DataType::from_u16(read_u16(r)?)?;
        let increment_known = read_u16(r)? != 0;
        let increment_x = read_f64(r)?;
        let increment_y = read_f64(r)?;
        let extent_known = read_u16(r)? != 0;
        let min_x = read_f64(r)?;
        let max_x = read_f64(r)?;
        let min_y = read_f64(r)?;
        let max_y = read_f64(r)?;
        let offset_pv = read_f64(r)?;
        let scale_pv = read_f64(r)?;

        let after_header = r.stream_position()?;
        if after_header - start != headersize as u64 {
            return Err(Error::Core(ctsim_support::CoreError::FormatMismatch(
                format!(
                    "headersize field {headersize} does not match actual header length {}",
                    after_header - start
                ),
            )));
        }

        let mut real = Array2d::new(nx, ny);
        for ix in 0..nx {
            for iy in 0..ny {
                real.set(ix, iy, read_f64(r)?);
            }
        }
        let imaginary = if data_type == DataType::Complex {
            let mut imag = Array2d::new(nx, ny);
            for ix in 0..nx {
                for iy in 0..ny {
                    imag.set(ix, iy, read_f64(r)?);
                }
            }
            Some(imag)
        } else {
            None
        };

        let mut labels = Vec::with_capacity(num_labels as usize);
        for _ in 0..num_labels {
            labels.push(Array2dFileLabel::read(r)?);
        }

        Ok(Self {
            pixel_format,
            data_type,
            axis: AxisMetadata {
                increment_known,
                increment_x,
                increment_y,
                extent_known,
                min_x,
                max_x,
                min_y,
                max_y,
                offset_pv,
                scale_pv,
            },
            real,
            imaginary,
            labels,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn round_trips_a_real_container_with_labels() {
        let mut file = Array2dFile::new_real(4, 3);
        for ix in 0..4 {
            for iy in 0..3 {
                file.real.set(ix, iy, (ix * 10 + iy) as f64);
            }
        }
        file.set_axis_extent(-1.0, 1.0, -2.0, 2.0);
        file.add_label(Array2dFileLabel::history(
            "rasterize",
            0.25,
            (2026, 7, 30, 12, 0, 0),
        ));

        let mut buf = Cursor::new(Vec::new());
        file.write(&mut buf).unwrap();
        buf.set_position(0);
        let read_back = Array2dFile::read(&mut buf).unwrap();

        assert_eq!(read_back, file);
    }

    #[test]
    fn labels_round_trip_in_insertion_order() {
        let mut file = Array2dFile::new_real(2, 2);
        file.add_label(Array2dFileLabel::history("rasterize", 0.1, (2026, 7, 30, 9, 0, 0)));
        file.add_label(Array2dFileLabel::history("project", 0.2, (2026, 7, 30, 9, 0, 1)));
        file.add_label(Array2dFileLabel::history("reconstruct", 1.5, (2026, 7, 30, 9, 0, 2)));

        let mut buf = Cursor::new(Vec::new());
        file.write(&mut buf).unwrap();
        buf.set_position(0);
        let read_back = Array2dFile::read(&mut buf).unwrap();

        let texts: Vec<&str> = read_back.labels.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["rasterize", "project", "reconstruct"]);
        assert_eq!(read_back, file);
    }

    #[test]
    fn set_axis_extent_assigns_all_four_fields() {
        let mut file = Array2dFile::new_real(1, 1);
        file.set_axis_extent(1.0, 2.0, 3.0, 4.0);
        assert_eq!(file.axis.min_x, 1.0);
        assert_eq!(file.axis.max_x, 2.0);
        assert_eq!(file.axis.min_y, 3.0);
        assert_eq!(file.axis.max_y, 4.0);
    }

    #[test]
    fn clear_imaginary_zeroes_the_imaginary_plane_not_the_real_one() {
        let mut file = Array2dFile::new_complex(2, 2);
        file.real.set(0, 0, 7.0);
        file.imaginary.as_mut().unwrap().set(0, 0, 9.0);
        file.clear_imaginary();
        assert_eq!(*file.real.get(0, 0), 7.0);
        assert_eq!(*file.imaginary.as_ref().unwrap().get(0, 0), 0.0);
    }

    #[test]
    fn rejects_a_bad_signature() {
        let mut buf = Cursor::new(vec![0u8; 64]);
        assert!(Array2dFile::read(&mut buf).is_err());
    }
}
