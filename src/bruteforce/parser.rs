//! Bruteforce file grammar (C7): `W` followed by `MIN MAX CHARSET` lines.
//!
//! Unlike the mask-file grammar (C5), this format has no comments and no
//! line-escape character; only blank-line skipping and `?`-expansion
//! (via [`crate::registry`]) inside each `CHARSET` field survive.

use std::rc::Rc;

use crate::codepoint::{decode_stream, Codepoint, DecodeStatus, Mode};
use crate::error::{Error, Result};
use crate::registry::Registry;

/// The reserved name under which each constraint line's charset is
/// expanded. `NUL` can never appear as a user-chosen `-c K:VAL` key because
/// the CLI layer rejects empty/control keys, so it is safe as a sentinel.
const ANONYMOUS: Codepoint = 0;

/// One `MIN MAX CHARSET` line, after expansion.
#[derive(Debug, Clone)]
pub struct Constraint {
    pub charset: Rc<[Codepoint]>,
    pub min: u64,
    pub max: u64,
}

/// A parsed bruteforce file: word width plus its constraints, in file order.
#[derive(Debug, Clone)]
pub struct BruteforceSpec {
    pub width: u64,
    pub constraints: Vec<Constraint>,
}

/// Parses `bytes` (the whole bruteforce file) under `mode`, resolving
/// `?`-references in each charset field against `base` (builtins plus any
/// CLI-bound names). `MAX` is clamped to `width` per §9's resolved open
/// question.
pub fn parse_bruteforce_file(bytes: &[u8], mode: Mode, base: &Registry) -> Result<BruteforceSpec> {
    let mut lines = Vec::new();
    for (i, raw) in bytes.split(|&b| b == b'\n').enumerate() {
        let raw = if raw.last() == Some(&b'\r') { &raw[..raw.len() - 1] } else { raw };
        if raw.is_empty() {
            continue;
        }
        let (cps, consumed, status) = decode_stream(mode, raw);
        if status != DecodeStatus::Ok || consumed != raw.len() {
            return Err(Error::decode(Some(i as u64 + 1), format!("invalid UTF-8 on line ({status})")));
        }
        lines.push((i as u64 + 1, cps));
    }

    let mut iter = lines.into_iter();
    let (w_line_no, w_line) = iter.next().ok_or_else(|| Error::parse(None, "bruteforce file has no width line"))?;
    let width = parse_width(&w_line, w_line_no)?;

    let mut constraints = Vec::new();
    for (line_no, line) in iter {
        let (min, max, charset_field) = split_constraint_line(&line, line_no)?;
        let mut reg = base.clone();
        reg.define_raw(ANONYMOUS, &charset_field);
        let body = reg.resolve(ANONYMOUS).map_err(|e| reline(e, line_no))?;
        let max = max.min(width);
        if min > max {
            return Err(Error::parse(Some(line_no), format!("min {min} exceeds clamped max {max}")));
        }
        constraints.push(Constraint { charset: body, min, max });
    }

    if constraints.is_empty() {
        return Err(Error::parse(None, "bruteforce file has no constraints"));
    }
    Ok(BruteforceSpec { width, constraints })
}

fn parse_width(line: &[Codepoint], line_no: u64) -> Result<u64> {
    let s: String = line.iter().map(|&c| char::from_u32(c).unwrap_or('\u{FFFD}')).collect();
    let s = s.trim();
    s.parse::<u64>()
        .map_err(|_| Error::parse(Some(line_no), format!("invalid width '{s}'")))
        .and_then(|w| if w == 0 { Err(Error::empty("bruteforce width must be positive")) } else { Ok(w) })
}

/// Splits `MIN MAX CHARSET` on the first two whitespace-separated tokens;
/// everything after the second token (minus exactly one separating blank)
/// is the charset field verbatim.
fn split_constraint_line(line: &[Codepoint], line_no: u64) -> Result<(u64, u64, Vec<Codepoint>)> {
    let is_blank = |c: Codepoint| c == b' ' as Codepoint || c == b'\t' as Codepoint;
    let mut i = 0;
    while i < line.len() && is_blank(line[i]) {
        i += 1;
    }
    let min_start = i;
    while i < line.len() && !is_blank(line[i]) {
        i += 1;
    }
    let min_tok = &line[min_start..i];
    while i < line.len() && is_blank(line[i]) {
        i += 1;
    }
    let max_start = i;
    while i < line.len() && !is_blank(line[i]) {
        i += 1;
    }
    let max_tok = &line[max_start..i];
    while i < line.len() && is_blank(line[i]) {
        i += 1;
    }
    let charset_field = line[i..].to_vec();

    if min_tok.is_empty() || max_tok.is_empty() {
        return Err(Error::parse(Some(line_no), "constraint line must have MIN MAX CHARSET"));
    }
    if charset_field.is_empty() {
        return Err(Error::empty("constraint charset field is empty"));
    }
    let parse_tok = |tok: &[Codepoint]| -> Result<u64> {
        let s: String = tok.iter().map(|&c| char::from_u32(c).unwrap_or('\u{FFFD}')).collect();
        s.parse::<u64>().map_err(|_| Error::parse(Some(line_no), format!("invalid integer '{s}'")))
    };
    let min = parse_tok(min_tok)?;
    let max = parse_tok(max_tok)?;
    Ok((min, max, charset_field))
}

fn reline(e: Error, line_no: u64) -> Error {
    match e {
        Error::Parse { message, .. } => Error::Parse { line: Some(line_no), message },
        other => other,
    }
}
