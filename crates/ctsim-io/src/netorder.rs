//! Network-byte-order (big-endian) primitive I/O.
//!
//! The on-disk `Array2dFile` format is defined to be big-endian regardless
//! of the host; the original program special-cased little-endian hosts with
//! an explicit byte swap (`fnetorderstream`/`SwapBytesNIfLittleEndian`).
//! `to_be_bytes`/`from_be_bytes` make that swap unconditional and free of
//! a runtime endianness check.

use std::io::{self, Read, Write};

pub fn write_u16<W: Write>(w: &mut W, v: u16) -> io::Result<()> {
    w.write_all(&v.to_be_bytes())
}

pub fn write_u32<W: Write>(w: &mut W, v: u32) -> io::Result<()> {
    w.write_all(&v.to_be_bytes())
}

pub fn write_f32<W: Write>(w: &mut W, v: f32) -> io::Result<()> {
    w.write_all(&v.to_be_bytes())
}

pub fn write_f64<W: Write>(w: &mut W, v: f64) -> io::Result<()> {
    w.write_all(&v.to_be_bytes())
}

pub fn read_u16<R: Read>(r: &mut R) -> io::Result<u16> {
    let mut buf = [0u8; 2];
    r.read_exact(&mut buf)?;
    Ok(u16::from_be_bytes(buf))
}

pub fn read_u32<R: Read>(r: &mut R) -> io::Result<u32> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(u32::from_be_bytes(buf))
}

pub fn read_f32<R: Read>(r: &mut R) -> io::Result<f32> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(f32::from_be_bytes(buf))
}

pub fn read_f64<R: Read>(r: &mut R) -> io::Result<f64> {
    let mut buf = [0u8; 8];
    r.read_exact(&mut buf)?;
    Ok(f64::from_be_bytes(buf))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_every_width() {
        let mut buf = Vec::new();
        write_u16(&mut buf, 0xABCD).unwrap();
        write_u32(&mut buf, 0xDEADBEEF).unwrap();
        write_f32(&mut buf, 1.5).unwrap();
        write_f64(&mut buf, -2.25).unwrap();

        let mut cur = io::Cursor::new(buf);
        assert_eq!(read_u16(&mut cur).unwrap(), 0xABCD);
        assert_eq!(read_u32(&mut cur).unwrap(), 0xDEADBEEF);
        assert_eq!(read_f32(&mut cur).unwrap(), 1.5);
        assert_eq!(read_f64(&mut cur).unwrap(), -2.25);
    }

    #[test]
    fn u32_is_big_endian_on_the_wire() {
        let mut buf = Vec::new();
        write_u32(&mut buf, 1).unwrap();
        assert_eq!(buf, vec![0, 0, 0, 1]);
    }
}
