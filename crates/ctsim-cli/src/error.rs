#[derive(Debug)]
#[non_exhaustive]
pub enum Error {
    Args(String),
    Io(std::io::Error),
    Phantom(ctsim_support::CoreError),
    Scanner(ctsim_support::CoreError),
    Filter(ctsim_support::CoreError),
    Projections(ctsim_projections::Error),
    Image(ctsim_image::Error),
    Recon(ctsim_recon::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Args(msg) => write!(f, "{msg}"),
            Error::Io(e) => write!(f, "I/O error: {e}"),
            Error::Phantom(e) => write!(f, "phantom error: {e}"),
            Error::Scanner(e) => write!(f, "scanner error: {e}"),
            Error::Filter(e) => write!(f, "filter error: {e}"),
            Error::Projections(e) => write!(f, "projection file error: {e}"),
            Error::Image(e) => write!(f, "image file error: {e}"),
            Error::Recon(e) => write!(f, "reconstruction error: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Args(_) => None,
            Error::Io(e) => Some(e),
            Error::Phantom(e) | Error::Scanner(e) | Error::Filter(e) => Some(e),
            Error::Projections(e) => Some(e),
            Error::Image(e) => Some(e),
            Error::Recon(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<ctsim_projections::Error> for Error {
    fn from(e: ctsim_projections::Error) -> Self {
        Self::Projections(e)
    }
}

impl From<ctsim_image::Error> for Error {
    fn from(e: ctsim_image::Error) -> Self {
        Self::Image(e)
    }
}

impl From<ctsim_recon::Error> for Error {
    fn from(e: ctsim_recon::Error) -> Self {
        Self::Recon(e)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
