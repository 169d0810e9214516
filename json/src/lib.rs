//! JSON input and output for MTNCL synthesis: gate libraries and synthesis options in, circuits
//! out.

use std::fmt::Display;
use std::io;

mod import;
mod export;

pub use import::{import_config, import_library};
pub use export::{export_circuits, export_polymorphic};

#[derive(Debug)]
pub enum Error {
    Io(io::Error),
    Json(jzon::Error),
    /// The document is well-formed JSON but does not have the expected shape.
    Format(String),
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(error) => write!(f, "{error}"),
            Error::Json(error) => write!(f, "malformed JSON: {error}"),
            Error::Format(message) => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<io::Error> for Error {
    fn from(error: io::Error) -> Self {
        Error::Io(error)
    }
}

impl From<jzon::Error> for Error {
    fn from(error: jzon::Error) -> Self {
        Error::Json(error)
    }
}
