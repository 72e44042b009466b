//! Unified error taxonomy for the enumeration engine (§7).
//!
//! Every fallible operation in `charset`, `registry`, `mask`, `mask_parser`,
//! `mask_file`, `bruteforce` and `range` returns `Result<T, Error>`. The CLI
//! layer (`cli::args`, `main`) additionally uses `anyhow` to attach file/line
//! context without inventing new kinds — see `cli::args`.

use std::fmt;
use std::io;

/// The five error kinds from §7, plus `Empty` for the zero-width/empty-charset case.
#[derive(Debug)]
pub enum Error {
    /// Malformed flags, bad `J/N`, bad `-c` syntax.
    BadArgs(String),
    /// Cannot open/read/write a path.
    Io { path: Option<String>, source: io::Error },
    /// Invalid UTF-8 in unicode mode.
    Decode { line: Option<u64>, message: String },
    /// Unknown charset reference, malformed mask/bruteforce grammar.
    Parse { line: Option<u64>, message: String },
    /// A 64-bit word count or product would wrap.
    Overflow(String),
    /// An empty charset or a zero-width mask.
    Empty(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn bad_args(msg: impl Into<String>) -> Self {
        Error::BadArgs(msg.into())
    }

    pub fn parse(line: Option<u64>, msg: impl Into<String>) -> Self {
        Error::Parse { line, message: msg.into() }
    }

    pub fn decode(line: Option<u64>, msg: impl Into<String>) -> Self {
        Error::Decode { line, message: msg.into() }
    }

    pub fn overflow(msg: impl Into<String>) -> Self {
        Error::Overflow(msg.into())
    }

    pub fn empty(msg: impl Into<String>) -> Self {
        Error::Empty(msg.into())
    }

    pub fn io(path: impl Into<String>, source: io::Error) -> Self {
        Error::Io { path: Some(path.into()), source }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BadArgs(msg) => write!(f, "{msg}"),
            Error::Io { path: Some(p), source } => write!(f, "{p}: {source}"),
            Error::Io { path: None, source } => write!(f, "{source}"),
            Error::Decode { line: Some(l), message } => write!(f, "line {l}: {message}"),
            Error::Decode { line: None, message } => write!(f, "{message}"),
            Error::Parse { line: Some(l), message } => write!(f, "line {l}: {message}"),
            Error::Parse { line: None, message } => write!(f, "{message}"),
            Error::Overflow(msg) => write!(f, "overflow: {msg}"),
            Error::Empty(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}
