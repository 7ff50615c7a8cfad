//! The `Projections` sinogram container and its self-describing file
//! format.

use crate::error::{Error, Result};
use crate::geometry::Geometry;
use ctsim_io::netorder::{read_f32, read_f64, read_u16, read_u32, write_f32, write_f64, write_u16, write_u32};
use ctsim_io::Array2dFileLabel;
use ctsim_support::CoreError;
use std::io::{Read, Write};

pub const SIGNATURE: u16 = ('P' as u16) * 256 + 'J' as u16;

/// One view: the detector readings and the angle the view was collected
/// at. `Projections` exclusively owns these; they are created/destroyed
/// with the sinogram.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectorArray {
    pub view_angle: f64,
    pub values: Vec<f32>,
}

impl DetectorArray {
    pub fn new(n_det: u32, view_angle: f64) -> Self {
        Self {
            view_angle,
            values: vec![0.0; n_det as usize],
        }
    }

    pub fn n_det(&self) -> u32 {
        self.values.len() as u32
    }
}

/// The `nView x nDet` sinogram plus the scalar metadata needed to
/// reconstruct or rebin it.
#[derive(Debug, Clone, PartialEq)]
pub struct Projections {
    pub geometry: Geometry,
    pub det_start: f64,
    pub det_inc: f64,
    pub rot_start: f64,
    pub rot_inc: f64,
    pub focal_length: f64,
    pub source_detector_length: f64,
    pub view_diameter: f64,
    pub fan_beam_angle: f64,
    pub calc_time: f64,
    pub remark: String,
    pub label: Option<Array2dFileLabel>,
    views: Vec<DetectorArray>,
}

impl Projections {
    pub fn new(geometry: Geometry, n_view: u32, n_det: u32) -> Self {
        Self {
            geometry,
            det_start: 0.0,
            det_inc: 0.0,
            rot_start: 0.0,
            rot_inc: 0.0,
            focal_length: 0.0,
            source_detector_length: 0.0,
            view_diameter: 0.0,
            fan_beam_angle: 0.0,
            calc_time: 0.0,
            remark: String::new(),
            label: None,
            views: (0..n_view).map(|_| DetectorArray::new(n_det, 0.0)).collect(),
        }
    }

    pub fn n_view(&self) -> u32 {
        self.views.len() as u32
    }

    pub fn n_det(&self) -> u32 {
        self.views.first().map(DetectorArray::n_det).unwrap_or(0)
    }

    pub fn view(&self, i: u32) -> &DetectorArray {
        &self.views[i as usize]
    }

    pub fn view_mut(&mut self, i: u32) -> &mut DetectorArray {
        &mut self.views[i as usize]
    }

    pub fn views(&self) -> &[DetectorArray] {
        &self.views
    }

    pub fn views_mut(&mut self) -> &mut [DetectorArray] {
        &mut self.views
    }

    pub fn push_view(&mut self, view: DetectorArray) {
        self.views.push(view);
    }

    pub fn write<W: Write>(&self, w: &mut W) -> Result<()> {
        write_u16(w, SIGNATURE)?;
        write_u16(w, self.geometry as u16)?;
        write_u32(w, self.n_view())?;
        write_f64(w, self.det_start)?;
        write_f64(w, self.det_inc)?;
        write_f64(w, self.rot_start)?;
        write_f64(w, self.rot_inc)?;
        write_f64(w, self.focal_length)?;
        write_f64(w, self.source_detector_length)?;
        write_f64(w, self.view_diameter)?;
        write_f64(w, self.fan_beam_angle)?;
        write_f64(w, self.calc_time)?;
        let remark = self.remark.as_bytes();
        write_u16(w, remark.len() as u16)?;
        w.write_all(remark)?;
        write_u16(w, self.label.is_some() as u16)?;
        if let Some(label) = &self.label {
            ctsim_io::write_label(w, label)?;
        }
        for view in &self.views {
            write_u16(w, view.n_det() as u16)?;
            write_f64(w, view.view_angle)?;
            for &v in &view.values {
                write_f32(w, v)?;
            }
        }
        Ok(())
    }

    pub fn read<R: Read>(r: &mut R) -> Result<Self> {
        let signature = read_u16(r)?;
        if signature != SIGNATURE {
            return Err(CoreError::FormatMismatch(format!("bad projections signature {signature:#06x}")).into());
        }
        let geometry = Geometry::from_u16(read_u16(r)?)
            .ok_or_else(|| CoreError::FormatMismatch("unknown geometry tag".into()))?;
        let n_view = read_u32(r)?;
        let det_start = read_f64(r)?;
        let det_inc = read_f64(r)?;
        let rot_start = read_f64(r)?;
        let rot_inc = read_f64(r)?;
        let focal_length = read_f64(r)?;
        let source_detector_length = read_f64(r)?;
        let view_diameter = read_f64(r)?;
        let fan_beam_angle = read_f64(r)?;
        let calc_time = read_f64(r)?;
        let remark_len = read_u16(r)?;
        let mut remark_buf = vec![0u8; remark_len as usize];
        r.read_exact(&mut remark_buf)?;
        let remark = String::from_utf8_lossy(&remark_buf).into_owned();
        let has_label = read_u16(r)? != 0;
        let label = if has_label { Some(ctsim_io::read_label(r)?) } else { None };

        let mut views = Vec::with_capacity(n_view as usize);
        for _ in 0..n_view {
            let n_det = read_u16(r)?;
            let view_angle = read_f64(r)?;
            let mut values = Vec::with_capacity(n_det as usize);
            for _ in 0..n_det {
                values.push(read_f32(r)?);
            }
            views.push(DetectorArray { view_angle, values });
        }

        Ok(Self {
            geometry,
            det_start,
            det_inc,
            rot_start,
            rot_inc,
            focal_length,
            source_detector_length,
            view_diameter,
            fan_beam_angle,
            calc_time,
            remark,
            label,
            views,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_a_sinogram() {
        let mut p = Projections::new(Geometry::Parallel, 3, 5);
        for v in 0..3 {
            let view = p.view_mut(v);
            view.view_angle = v as f64 * 0.1;
            for d in 0..5 {
                view.values[d as usize] = (v * 10 + d) as f32;
            }
        }
        p.remark = "test".to_string();

        let mut buf = Vec::new();
        p.write(&mut buf).unwrap();
        let read_back = Projections::read(&mut std::io::Cursor::new(buf)).unwrap();
        assert_eq!(read_back, p);
    }
}
