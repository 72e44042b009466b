//! Range driver (C8): counts the total word space, resolves a sub-range
//! (explicit `begin`/`end` or a `-j J/N` job partition), and streams the
//! selected words to a sink.

use std::io::Write;

use crate::codepoint::{encode_stream, Codepoint, Mode};
use crate::config::WORK_BUF_SIZE;
use crate::error::{Error, Result};
use crate::mask::Mask;
use crate::mask_file::MaskGenerator;

/// Delimiter appended after each emitted word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Newline,
    Nul,
    None,
}

impl Delimiter {
    fn bytes(self) -> &'static [u8] {
        match self {
            Delimiter::Newline => b"\n",
            Delimiter::Nul => b"\0",
            Delimiter::None => b"",
        }
    }
}

/// A job partition request: the `J`-th of `N` disjoint, contiguous slices
/// of the full index space.
#[derive(Debug, Clone, Copy)]
pub struct Job {
    pub j: u64,
    pub n: u64,
}

/// An explicit, inclusive `[begin, end]` index range.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExplicitRange {
    pub begin: Option<u64>,
    pub end: Option<u64>,
}

/// Resolved `[start, end_excl)` sub-range plus the total count it was
/// resolved against.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedRange {
    pub start: u64,
    pub end_excl: u64,
    pub total: u64,
}

/// Runs the counting pass over `gen`, summing `mask.len()` with overflow
/// checking. Fully exhausts and resets `gen`.
pub fn count_total(gen: &mut dyn MaskGenerator) -> Result<u64> {
    let mut total: u64 = 0;
    loop {
        match gen.next_mask()? {
            Some(mask) => {
                total = total
                    .checked_add(mask.len())
                    .ok_or_else(|| Error::overflow("total word count exceeds 64 bits"))?;
            }
            None => break,
        }
    }
    gen.reset();
    Ok(total)
}

/// Resolves the sub-range to emit, given the total count `total` and either
/// a job partition or an explicit range (job takes precedence if both are
/// somehow supplied by the caller — the CLI layer rejects that combination
/// before reaching here).
pub fn resolve_range(total: u64, job: Option<Job>, explicit: ExplicitRange) -> Result<ResolvedRange> {
    if let Some(Job { j, n }) = job {
        if n == 0 || j == 0 || j > n {
            return Err(Error::bad_args(format!("invalid job '{j}/{n}': require 1 <= J <= N")));
        }
        let q = total / n;
        let r = total % n;
        let start = q * (j - 1) + (j - 1).min(r);
        let len = q + if j <= r { 1 } else { 0 };
        return Ok(ResolvedRange { start, end_excl: start + len, total });
    }

    let start = explicit.begin.unwrap_or(0);
    let end_excl = match explicit.end {
        Some(e) => e
            .checked_add(1)
            .ok_or_else(|| Error::overflow("--end value exceeds 64 bits"))?,
        None => total,
    };
    if start > end_excl || end_excl > total {
        return Err(Error::bad_args(format!(
            "range [{start}, {end_excl}) is out of bounds for total {total}"
        )));
    }
    Ok(ResolvedRange { start, end_excl, total })
}

/// Streams words `[range.start, range.end_excl)` from `gen` to `sink`,
/// encoding each under `mode` and separating them with `delim`.
pub fn emit_range(
    gen: &mut dyn MaskGenerator,
    range: ResolvedRange,
    mode: Mode,
    delim: Delimiter,
    sink: &mut dyn Write,
) -> Result<()> {
    let mut remaining_to_skip = range.start;
    let mut todo = range.end_excl - range.start;
    if todo == 0 {
        return Ok(());
    }

    gen.reset();
    let mut buf = Vec::with_capacity(WORK_BUF_SIZE);
    let delim_bytes = delim.bytes();

    while todo > 0 {
        let mask = match gen.next_mask()? {
            Some(m) => m,
            None => {
                return Err(Error::overflow("generator exhausted before emitting the full requested range"));
            }
        };
        let mask_len = mask.len();
        if mask_len == 0 {
            continue;
        }
        if remaining_to_skip >= mask_len {
            remaining_to_skip -= mask_len;
            continue;
        }
        emit_from_mask(mask, remaining_to_skip, &mut todo, mode, delim_bytes, &mut buf, sink)?;
        remaining_to_skip = 0;
    }

    if !buf.is_empty() {
        sink.write_all(&buf).map_err(|e| Error::io("<output>", e))?;
    }
    Ok(())
}

/// Emits up to `*todo` words from `mask`, starting at its local offset
/// `start_within_mask`, flushing `buf` to `sink` whenever it cannot hold
/// the next encoded word plus delimiter.
fn emit_from_mask(
    mut mask: Mask,
    start_within_mask: u64,
    todo: &mut u64,
    mode: Mode,
    delim_bytes: &[u8],
    buf: &mut Vec<u8>,
    sink: &mut dyn Write,
) -> Result<()> {
    let width = mask.width();
    let mut word = vec![0 as Codepoint; width];
    mask.set_position(start_within_mask);
    let available = mask.len() - start_within_mask;
    let n = available.min(*todo);
    // Unicode mode encodes at most 4 bytes per codepoint; byte mode at most 1.
    let max_word_bytes = width * 4 + delim_bytes.len();

    for i in 0..n {
        if i == 0 {
            mask.current(&mut word);
        } else {
            mask.advance(&mut word);
        }
        if !buf.is_empty() && buf.len() + max_word_bytes > WORK_BUF_SIZE {
            sink.write_all(buf).map_err(|e| Error::io("<output>", e))?;
            buf.clear();
        }
        encode_stream(mode, &word, buf);
        buf.extend_from_slice(delim_bytes);
    }
    *todo -= n;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codepoint::Mode;
    use crate::mask_file::MaskFileGenerator;
    use crate::registry::Registry;

    fn gen_for(mask_text: &str) -> MaskFileGenerator {
        let reg = Registry::with_builtins(Mode::Unicode);
        MaskFileGenerator::new(mask_text, Mode::Unicode, reg).unwrap()
    }

    #[test]
    fn counts_total_words() {
        let mut gen = gen_for("?d?d");
        assert_eq!(count_total(&mut gen).unwrap(), 100);
    }

    #[test]
    fn scenario_3_begin_end_range() {
        let mut gen = gen_for("?d");
        let total = count_total(&mut gen).unwrap();
        let range = resolve_range(total, None, ExplicitRange { begin: Some(5), end: Some(7) }).unwrap();
        let mut out = Vec::new();
        emit_range(&mut gen, range, Mode::Unicode, Delimiter::Newline, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "5\n6\n7\n");
    }

    #[test]
    fn scenario_4_job_partitioning() {
        let total = {
            let mut gen = gen_for("?d");
            count_total(&mut gen).unwrap()
        };
        let cases: &[(u64, &str)] = &[(1, "0\n1\n"), (4, "6\n7\n"), (5, "8\n9\n")];
        for &(j, expected) in cases {
            let mut gen = gen_for("?d");
            let range = resolve_range(total, Some(Job { j, n: 5 }), ExplicitRange::default()).unwrap();
            let mut out = Vec::new();
            emit_range(&mut gen, range, Mode::Unicode, Delimiter::Newline, &mut out).unwrap();
            assert_eq!(String::from_utf8(out).unwrap(), expected, "job {j}/5");
        }
    }

    #[test]
    fn invariant_4_job_partition_concatenation_equals_whole_run() {
        let total = {
            let mut gen = gen_for("?d?d");
            count_total(&mut gen).unwrap()
        };
        let n = 7;
        let mut concatenated = Vec::new();
        for j in 1..=n {
            let mut gen = gen_for("?d?d");
            let range = resolve_range(total, Some(Job { j, n }), ExplicitRange::default()).unwrap();
            emit_range(&mut gen, range, Mode::Unicode, Delimiter::Newline, &mut concatenated).unwrap();
        }
        let mut whole_gen = gen_for("?d?d");
        let whole_range = resolve_range(total, None, ExplicitRange::default()).unwrap();
        let mut whole = Vec::new();
        emit_range(&mut whole_gen, whole_range, Mode::Unicode, Delimiter::Newline, &mut whole).unwrap();
        assert_eq!(concatenated, whole);
    }

    #[test]
    fn invariant_5_exact_word_count_for_explicit_range() {
        let mut gen = gen_for("?d?d?d");
        let total = count_total(&mut gen).unwrap();
        let range = resolve_range(total, None, ExplicitRange { begin: Some(10), end: Some(19) }).unwrap();
        let mut out = Vec::new();
        emit_range(&mut gen, range, Mode::Unicode, Delimiter::Newline, &mut out).unwrap();
        let lines = out.iter().filter(|&&b| b == b'\n').count();
        assert_eq!(lines, 10);
    }

    #[test]
    fn scenario_2_size_only_resolution() {
        let mut gen = gen_for("?d?d?d?d?l?l");
        let total = count_total(&mut gen).unwrap();
        assert_eq!(total, 6760000);
        let range = resolve_range(total, None, ExplicitRange::default()).unwrap();
        assert_eq!(range.end_excl - range.start, 6760000);
    }

    #[test]
    fn out_of_bounds_range_is_rejected() {
        let mut gen = gen_for("?d");
        let total = count_total(&mut gen).unwrap();
        assert!(resolve_range(total, None, ExplicitRange { begin: Some(0), end: Some(20) }).is_err());
    }

    #[test]
    fn multi_mask_emission_crosses_mask_boundaries() {
        let reg = Registry::with_builtins(Mode::Unicode);
        let mut gen = MaskFileGenerator::new("ab\ncd\n", Mode::Unicode, reg).unwrap();
        let total = count_total(&mut gen).unwrap();
        assert_eq!(total, 2);
        let range = resolve_range(total, None, ExplicitRange::default()).unwrap();
        let mut out = Vec::new();
        emit_range(&mut gen, range, Mode::Unicode, Delimiter::None, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "abcd");
    }
}
