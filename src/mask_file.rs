//! Mask-file generator (C6): streams [`Mask`]s from a mask-list file or a
//! single inline mask argument.
//!
//! Mirrors the restartable-generator contract every `MaskGenerator`
//! implementation follows: `next_mask` returns `Ok(Some(_))`,
//! `Ok(None)` on clean exhaustion, or `Err(_)` (which also sticks `good()`
//! to `false`); `reset()` rewinds to the first mask.

use std::fs;
use std::path::Path;

use crate::codepoint::{decode_stream, DecodeStatus, Codepoint, Mode};
use crate::error::{Error, Result};
use crate::mask::Mask;
use crate::mask_parser::{is_comment_or_empty, parse_inline_mask, parse_line};
use crate::registry::Registry;
use crate::util::is_reg_file;

/// A restartable, lazily-erroring source of masks.
pub trait MaskGenerator {
    /// Returns the next mask, `Ok(None)` on clean exhaustion, or an error
    /// (which also makes `good()` return `false` from then on).
    fn next_mask(&mut self) -> Result<Option<Mask>>;
    /// Rewinds to the beginning, clearing any exhaustion but not the
    /// sticky error flag.
    fn reset(&mut self);
    /// `false` once any call to `next_mask` has returned an error.
    fn good(&self) -> bool;
}

enum Source {
    /// Whole file content, split into lines up front; one mask per
    /// non-comment, non-empty line.
    Lines(Vec<Vec<Codepoint>>),
    /// A single inline mask argument, parsed with the mask-only grammar.
    Inline(Vec<Codepoint>),
}

pub struct MaskFileGenerator {
    source: Source,
    registry: Registry,
    cursor: usize,
    error: bool,
    done: bool,
}

impl MaskFileGenerator {
    /// Builds a generator from the CLI's trailing positional argument.
    /// `registry` supplies builtins plus any CLI-bound names (`-1..-4`,
    /// `-c`); it is never mutated here, only cloned per line.
    pub fn new(arg: &str, mode: Mode, registry: Registry) -> Result<Self> {
        let path = Path::new(arg);
        let source = if is_reg_file(path) {
            let bytes = fs::read(path).map_err(|e| Error::io(arg, e))?;
            Source::Lines(split_lines(&bytes, mode)?)
        } else {
            let bytes = arg.as_bytes();
            let (cps, consumed, status) = decode_stream(mode, bytes);
            if status != DecodeStatus::Ok || consumed != bytes.len() {
                return Err(Error::decode(None, format!("invalid UTF-8 in mask argument ({status})")));
            }
            Source::Inline(cps)
        };
        Ok(MaskFileGenerator { source, registry, cursor: 0, error: false, done: false })
    }
}

impl MaskGenerator for MaskFileGenerator {
    fn next_mask(&mut self) -> Result<Option<Mask>> {
        if self.error || self.done {
            return Ok(None);
        }
        match &self.source {
            Source::Inline(body) => {
                self.done = true;
                match parse_inline_mask(body, &self.registry) {
                    Ok(m) => Ok(Some(m)),
                    Err(e) => {
                        self.error = true;
                        Err(e)
                    }
                }
            }
            Source::Lines(lines) => {
                loop {
                    if self.cursor >= lines.len() {
                        self.done = true;
                        return Ok(None);
                    }
                    let line_no = self.cursor as u64 + 1;
                    let line = &lines[self.cursor];
                    self.cursor += 1;
                    if is_comment_or_empty(line) {
                        continue;
                    }
                    return match parse_line(line, &self.registry, Some(line_no)) {
                        Ok(m) => Ok(Some(m)),
                        Err(e) => {
                            self.error = true;
                            Err(e)
                        }
                    };
                }
            }
        }
    }

    fn reset(&mut self) {
        self.cursor = 0;
        self.done = false;
    }

    fn good(&self) -> bool {
        !self.error
    }
}

/// Splits `bytes` into lines on LF, stripping a trailing CR, and decodes
/// each line under `mode`. Fails with the offending 1-based line number on
/// invalid UTF-8.
fn split_lines(bytes: &[u8], mode: Mode) -> Result<Vec<Vec<Codepoint>>> {
    let mut lines = Vec::new();
    for (i, raw) in bytes.split(|&b| b == b'\n').enumerate() {
        let raw = if raw.last() == Some(&b'\r') { &raw[..raw.len() - 1] } else { raw };
        let (cps, consumed, status) = decode_stream(mode, raw);
        if status != DecodeStatus::Ok || consumed != raw.len() {
            return Err(Error::decode(Some(i as u64 + 1), format!("invalid UTF-8 on line ({status})")));
        }
        lines.push(cps);
    }
    // A trailing newline produces one spurious empty final line; that's
    // harmless since empty lines are skipped by the caller.
    Ok(lines)
}
