/// The scanner geometry a sinogram was (or claims to have been) collected
/// under. `Linogram` round-trips through files and the `linogram` CLI tool
/// but `ctsim-scanner` refuses to *collect* it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum Geometry {
    Parallel = 0,
    Equiangular = 1,
    Equilinear = 2,
    Linogram = 3,
}

impl Geometry {
    pub fn from_u16(v: u16) -> Option<Self> {
        Some(match v {
            0 => Self::Parallel,
            1 => Self::Equiangular,
            2 => Self::Equilinear,
            3 => Self::Linogram,
            _ => return None,
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Parallel => "parallel",
            Self::Equiangular => "equiangular",
            Self::Equilinear => "equilinear",
            Self::Linogram => "linogram",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "parallel" => Some(Self::Parallel),
            "equiangular" => Some(Self::Equiangular),
            "equilinear" => Some(Self::Equilinear),
            "linogram" => Some(Self::Linogram),
            _ => None,
        }
    }
}
