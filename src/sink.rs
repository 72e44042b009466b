//! Output sink (§5): stdout or a named file, opened lazily.
//!
//! Opening is deferred until parsing and counting have both succeeded, so a
//! malformed mask or bruteforce file never truncates an existing output
//! file — mirroring the scoped-acquisition discipline the specification
//! requires for the output descriptor.

use std::fs::File;
use std::io::{self, BufWriter, Stdout, Write};

use anyhow::Context;

use crate::config::WORK_BUF_SIZE;

/// Either a buffered file or buffered stdout.
pub enum Sink {
    File(BufWriter<File>),
    Stdout(BufWriter<Stdout>),
}

impl Sink {
    /// Opens `path`, or stdout if `path` is `None` or `"-"`.
    pub fn open(path: Option<&str>) -> anyhow::Result<Self> {
        match path {
            None | Some("-") => Ok(Sink::Stdout(BufWriter::with_capacity(WORK_BUF_SIZE, io::stdout()))),
            Some(p) => {
                let file = File::create(p).with_context(|| format!("failed to open output file '{p}'"))?;
                Ok(Sink::File(BufWriter::with_capacity(WORK_BUF_SIZE, file)))
            }
        }
    }
}

impl Write for Sink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Sink::File(w) => w.write(buf),
            Sink::Stdout(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Sink::File(w) => w.flush(),
            Sink::Stdout(w) => w.flush(),
        }
    }
}
