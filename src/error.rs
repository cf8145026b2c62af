use std::fmt;

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    /// Rejected render parameters (unknown layout style, malformed color, out-of-range sizes).
    Config(String),
    /// Neither story text nor a single usable image.
    EmptyInput(String),
    Image(String),
    Font(String),
    Pdf(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {e}"),
            Error::Config(msg) => write!(f, "invalid configuration: {msg}"),
            Error::EmptyInput(msg) => write!(f, "nothing to render: {msg}"),
            Error::Image(msg) => write!(f, "image error: {msg}"),
            Error::Font(msg) => write!(f, "font error: {msg}"),
            Error::Pdf(msg) => write!(f, "PDF error: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Config(format!("parameter file: {e}"))
    }
}

impl From<image::ImageError> for Error {
    fn from(e: image::ImageError) -> Self {
        Error::Image(e.to_string())
    }
}
