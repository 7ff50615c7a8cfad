use ctsim_support::CoreError;
use std::fmt;

#[derive(Debug)]
#[non_exhaustive]
pub enum Error {
    Io(std::io::Error),
    Core(CoreError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "i/o error: {e}"),
            Error::Core(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Core(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<CoreError> for Error {
    fn from(e: CoreError) -> Self {
        Error::Core(e)
    }
}

impl From<ctsim_io::Error> for Error {
    fn from(e: ctsim_io::Error) -> Self {
        match e {
            ctsim_io::Error::Io(io) => Error::Io(io),
            ctsim_io::Error::Core(c) => Error::Core(c),
            _ => Error::Core(CoreError::FormatMismatch("unrecognized ctsim-io error".into())),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
