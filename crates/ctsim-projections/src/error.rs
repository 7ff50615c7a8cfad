use ctsim_support::CoreError;

#[derive(Debug)]
#[non_exhaustive]
pub enum Error {
    Io(std::io::Error),
    Core(CoreError),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "i/o error: {e}"),
            Self::Core(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Core(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<CoreError> for Error {
    fn from(e: CoreError) -> Self {
        Self::Core(e)
    }
}

impl From<ctsim_io::Error> for Error {
    fn from(e: ctsim_io::Error) -> Self {
        match e {
            ctsim_io::Error::Io(io) => Self::Io(io),
            ctsim_io::Error::Core(c) => Self::Core(c),
            _ => Self::Core(CoreError::FormatMismatch("unrecognized ctsim-io error".into())),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
