//! Codepoint abstraction and codec (C1).
//!
//! A [`Codepoint`] is a plain `u32` regardless of [`Mode`]: in [`Mode::Byte`]
//! it ranges over `0..=0xFF`, in [`Mode::Unicode`] it ranges over Unicode
//! scalar values (`0..=0x10FFFF`, excluding the surrogate range). Mode is
//! selected once per run and is uniform across every charset, mask and
//! output byte.
//!
//! Using a single concrete integer type instead of a generic `Alphabet`
//! parameter keeps [`crate::charset::Charset`] and [`crate::mask::Mask`]
//! monomorphic without threading a type parameter through every struct in
//! the engine. The codec functions here are only ever called once per
//! *word* (a whole codepoint buffer) by the range driver, never once per
//! codepoint inside the odometer's hot loop, so this does not reintroduce
//! the per-codepoint dispatch cost the engine is required to avoid.

use std::fmt;

/// A single character-class element: a byte value or a Unicode scalar value.
pub type Codepoint = u32;

/// The alphabet an enumeration run is operating over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Bytes `0x00..=0xFF` pass through unchanged.
    Byte,
    /// Unicode scalar values, UTF-8 encoded/decoded at the boundary.
    Unicode,
}

impl Mode {
    /// `true` when operating in [`Mode::Unicode`].
    #[inline]
    pub fn is_unicode(self) -> bool {
        matches!(self, Mode::Unicode)
    }
}

/// Outcome of a decode operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeStatus {
    Ok,
    Invalid,
    Truncated,
    BadArgs,
}

impl fmt::Display for DecodeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DecodeStatus::Ok => "ok",
            DecodeStatus::Invalid => "invalid",
            DecodeStatus::Truncated => "truncated",
            DecodeStatus::BadArgs => "bad-args",
        };
        f.write_str(s)
    }
}

/// Decode every codepoint in `bytes` under `mode`.
///
/// Returns the decoded codepoints, the number of input bytes consumed, and
/// a status. In [`Mode::Byte`] every byte is its own codepoint and the
/// status is always `Ok`. In [`Mode::Unicode`], `bytes` must be complete,
/// valid UTF-8: overlong encodings, surrogates, and values beyond
/// `U+10FFFF` are rejected by `std::str::from_utf8` already, and a
/// truncated trailing sequence is reported as [`DecodeStatus::Truncated`].
pub fn decode_stream(mode: Mode, bytes: &[u8]) -> (Vec<Codepoint>, usize, DecodeStatus) {
    match mode {
        Mode::Byte => (bytes.iter().map(|&b| b as Codepoint).collect(), bytes.len(), DecodeStatus::Ok),
        Mode::Unicode => match std::str::from_utf8(bytes) {
            Ok(s) => (s.chars().map(|c| c as Codepoint).collect(), bytes.len(), DecodeStatus::Ok),
            Err(e) => {
                let valid_up_to = e.valid_up_to();
                let codepoints: Vec<Codepoint> = unsafe { std::str::from_utf8_unchecked(&bytes[..valid_up_to]) }
                    .chars()
                    .map(|c| c as Codepoint)
                    .collect();
                let status = if e.error_len().is_none() {
                    DecodeStatus::Truncated
                } else {
                    DecodeStatus::Invalid
                };
                (codepoints, valid_up_to, status)
            }
        },
    }
}

/// Decode a single codepoint from the start of `bytes`.
///
/// Used by `-c K:VAL` parsing, where `K` is "the first UTF-8 codepoint of
/// the argument" in unicode mode.
pub fn decode_one(mode: Mode, bytes: &[u8]) -> (Option<Codepoint>, usize, DecodeStatus) {
    if bytes.is_empty() {
        return (None, 0, DecodeStatus::BadArgs);
    }
    match mode {
        Mode::Byte => (Some(bytes[0] as Codepoint), 1, DecodeStatus::Ok),
        Mode::Unicode => {
            // Probe increasing prefixes until from_utf8 accepts exactly one char,
            // or fails outright (invalid) / runs out of bytes (truncated).
            for n in 1..=4.min(bytes.len()) {
                match std::str::from_utf8(&bytes[..n]) {
                    Ok(s) => {
                        let c = s.chars().next().unwrap();
                        return (Some(c as Codepoint), n, DecodeStatus::Ok);
                    }
                    Err(e) if e.error_len().is_some() => {
                        return (None, 0, DecodeStatus::Invalid);
                    }
                    Err(_) => continue, // need more bytes
                }
            }
            (None, 0, DecodeStatus::Truncated)
        }
    }
}

/// Encode `codepoints` into `out`, appending UTF-8 (unicode mode) or raw
/// bytes (byte mode). Called once per emitted word by the range driver.
pub fn encode_stream(mode: Mode, codepoints: &[Codepoint], out: &mut Vec<u8>) {
    match mode {
        Mode::Byte => out.extend(codepoints.iter().map(|&c| c as u8)),
        Mode::Unicode => {
            let mut buf = [0u8; 4];
            for &c in codepoints {
                if let Some(ch) = char::from_u32(c) {
                    out.extend(ch.encode_utf8(&mut buf).as_bytes());
                }
            }
        }
    }
}
