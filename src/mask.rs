//! Mask (C4): an ordered list of charsets and the odometer iterator over
//! their Cartesian product.
//!
//! Positions are numbered right-to-left: the rightmost charset varies
//! fastest, exactly like a car odometer. `advance` only ever writes the
//! buffer positions whose wheel actually ticked — callers may rely on that
//! to detect unmodified positions (invariant 3 in the specification).

use crate::charset::Charset;
use crate::codepoint::Codepoint;
use crate::error::{Error, Result};

/// An ordered sequence of charsets; enumerates their Cartesian product.
#[derive(Debug, Clone)]
pub struct Mask {
    charsets: Vec<Charset>,
    /// Product of all charset lengths, overflow-checked as charsets are
    /// appended.
    len: u64,
}

impl Mask {
    pub fn new() -> Self {
        Mask { charsets: Vec::new(), len: 1 }
    }

    /// Number of positions.
    #[inline]
    pub fn width(&self) -> usize {
        self.charsets.len()
    }

    /// Total number of distinct words this mask enumerates. Zero only if
    /// the mask has no positions.
    #[inline]
    pub fn len(&self) -> u64 {
        if self.charsets.is_empty() { 0 } else { self.len }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.charsets.is_empty()
    }

    /// Append `cs` as the new rightmost (fastest-varying) position.
    /// Used by the mask-line parser, which appends positions left to right
    /// as it reads the mask body.
    pub fn push_right(&mut self, cs: Charset) -> Result<()> {
        self.len = self
            .len
            .checked_mul(cs.len())
            .ok_or_else(|| Error::overflow("mask word count exceeds 64 bits"))?;
        self.charsets.push(cs);
        Ok(())
    }

    /// Prepend `cs` as the new leftmost (slowest-varying) position. Used by
    /// the bruteforce generator, which assigns charsets to a fixed-width
    /// mask by permutation index rather than left-to-right text order.
    pub fn push_left(&mut self, cs: Charset) -> Result<()> {
        self.len = self
            .len
            .checked_mul(cs.len())
            .ok_or_else(|| Error::overflow("mask word count exceeds 64 bits"))?;
        self.charsets.insert(0, cs);
        Ok(())
    }

    /// Sets every position's cursor so that the mask represents index `o`
    /// (`0 <= o < len`). The rightmost charset is the fastest-varying digit.
    pub fn set_position(&mut self, mut o: u64) {
        for cs in self.charsets.iter_mut().rev() {
            let l = cs.len();
            cs.set_position(o % l);
            o /= l;
        }
    }

    /// Fills `buf[0..width]` with the codepoint each position's cursor
    /// currently points at. `buf` must be at least `width()` long.
    pub fn current(&self, buf: &mut [Codepoint]) {
        for (cs, slot) in self.charsets.iter().zip(buf.iter_mut()) {
            *slot = cs.current();
        }
    }

    /// Advances the mask by one, writing only the positions whose wheel
    /// ticked into `buf`. Returns `true` if the mask rolled over back to
    /// index 0 (carry out of the leftmost position).
    pub fn advance(&mut self, buf: &mut [Codepoint]) -> bool {
        let mut carry = true;
        for (i, cs) in self.charsets.iter_mut().enumerate().rev() {
            if !carry {
                break;
            }
            let (cp, wrapped) = cs.advance();
            buf[i] = cp;
            carry = wrapped;
        }
        carry
    }
}

impl Default for Mask {
    fn default() -> Self {
        Mask::new()
    }
}
