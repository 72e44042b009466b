//! Mask-line parser (C5): turns one line of a mask file into a [`Mask`].
//!
//! A line is split on unescaped `,` into leading ephemeral charset
//! definitions (named `'1'..'9'`) and a trailing mask body. The line-escape
//! character is `\`, distinct from the charset-escape `?` used inside each
//! field by [`crate::registry`].

use crate::codepoint::Codepoint;
use crate::error::{Error, Result};
use crate::mask::Mask;
use crate::registry::Registry;
use crate::charset::Charset;

const COMMA: Codepoint = b',' as Codepoint;
const BACKSLASH: Codepoint = b'\\' as Codepoint;
const HASH: Codepoint = b'#' as Codepoint;
const QUESTION_MARK: Codepoint = b'?' as Codepoint;

/// Maximum number of leading ephemeral charset tokens a mask line may carry.
pub const MAX_EPHEMERAL_CHARSETS: usize = 9;

/// Split `line` on unescaped `,`, honouring `\,` (literal comma) and `\\`
/// (literal backslash). Each returned field has its line-escapes already
/// resolved to the codepoints they stand for.
fn split_fields(line: &[Codepoint]) -> Vec<Vec<Codepoint>> {
    let mut fields = Vec::new();
    let mut cur = Vec::new();
    let mut i = 0;
    while i < line.len() {
        let c = line[i];
        if c == BACKSLASH && i + 1 < line.len() {
            cur.push(line[i + 1]);
            i += 2;
            continue;
        }
        if c == COMMA {
            fields.push(std::mem::take(&mut cur));
            i += 1;
            continue;
        }
        cur.push(c);
        i += 1;
    }
    fields.push(cur);
    fields
}

/// Parse one non-comment, non-empty mask-file line into a [`Mask`], using
/// `base` as the shared registry snapshot (builtins plus any CLI-bound
/// names). `base` is cloned, not mutated, so ephemeral definitions never
/// leak across lines.
pub fn parse_line(line: &[Codepoint], base: &Registry, line_no: Option<u64>) -> Result<Mask> {
    let fields = split_fields(line);
    if fields.len() > MAX_EPHEMERAL_CHARSETS + 1 {
        return Err(Error::parse(
            line_no,
            format!("too many custom charsets on one line ({} > {})", fields.len() - 1, MAX_EPHEMERAL_CHARSETS),
        ));
    }

    let mut reg = base.clone();
    let ephemeral_count = fields.len() - 1;
    for (i, field) in fields[..ephemeral_count].iter().enumerate() {
        if field.is_empty() {
            return Err(Error::parse(line_no, format!("custom charset '{}' is empty", i + 1)));
        }
        let name = b'1' as Codepoint + i as Codepoint;
        reg.define_raw(name, field);
    }

    let body = &fields[ephemeral_count];
    if body.is_empty() {
        return Err(Error::parse(line_no, "empty mask body"));
    }
    parse_mask_body(body, &mut reg, line_no)
}

/// Parse `line` as a standalone inline mask, with no ephemeral-charset
/// splitting: used by the mask-file generator when its argument is not a
/// regular file.
pub fn parse_inline_mask(body: &[Codepoint], base: &Registry) -> Result<Mask> {
    if body.is_empty() {
        return Err(Error::parse(None, "empty mask body"));
    }
    let mut reg = base.clone();
    parse_mask_body(body, &mut reg, None)
}

/// `true` if `line` (after leading whitespace is stripped by the caller via
/// trimming, if desired) is a comment or empty and should be skipped.
pub fn is_comment_or_empty(line: &[Codepoint]) -> bool {
    line.is_empty() || line[0] == HASH
}

fn parse_mask_body(body: &[Codepoint], reg: &mut Registry, line_no: Option<u64>) -> Result<Mask> {
    let mut mask = Mask::new();
    let mut i = 0;
    while i < body.len() {
        let c = body[i];
        if c == QUESTION_MARK {
            if i + 1 < body.len() {
                let next = body[i + 1];
                if crate::registry::is_name_char(next) {
                    let resolved = reg.resolve(next).map_err(|e| reline(e, line_no))?;
                    mask.push_right(Charset::from_body(resolved))?;
                } else {
                    mask.push_right(Charset::new(vec![next])?)?;
                }
                i += 2;
                continue;
            } else {
                mask.push_right(Charset::new(vec![QUESTION_MARK])?)?;
                i += 1;
                continue;
            }
        }
        mask.push_right(Charset::new(vec![c])?)?;
        i += 1;
    }
    if mask.is_empty() {
        return Err(Error::parse(line_no, "empty mask body"));
    }
    Ok(mask)
}

/// Re-tag a registry error (which carries no line number of its own) with
/// this line's number.
fn reline(e: Error, line_no: Option<u64>) -> Error {
    match e {
        Error::Parse { message, .. } => Error::Parse { line: line_no, message },
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codepoint::Mode;

    fn cps(s: &str) -> Vec<Codepoint> {
        s.chars().map(|c| c as Codepoint).collect()
    }

    fn word_of(mask: &Mask, pos: u64) -> String {
        let mut m = mask.clone();
        m.set_position(pos);
        let mut buf = vec![0u32; m.width()];
        m.current(&mut buf);
        buf.iter().map(|&c| char::from_u32(c).unwrap()).collect()
    }

    #[test]
    fn literal_only_mask() {
        let reg = Registry::with_builtins(Mode::Unicode);
        let mask = parse_inline_mask(&cps("abc"), &reg).unwrap();
        assert_eq!(mask.width(), 3);
        assert_eq!(mask.len(), 1);
        assert_eq!(word_of(&mask, 0), "abc");
    }

    #[test]
    fn reference_expands_to_builtin() {
        let reg = Registry::with_builtins(Mode::Unicode);
        let mask = parse_inline_mask(&cps("?d"), &reg).unwrap();
        assert_eq!(mask.len(), 10);
        assert_eq!(word_of(&mask, 5), "5");
    }

    #[test]
    fn scenario_1_three_digit_binary_mask() {
        // tool -1 01 '?1?1?1' -> 000 001 010 011 100 101 110 111
        let reg = Registry::with_builtins(Mode::Unicode);
        let mask = parse_line(&cps("01,?1?1?1"), &reg, Some(1)).unwrap();
        assert_eq!(mask.len(), 8);
        let words: Vec<String> = (0..8).map(|o| word_of(&mask, o)).collect();
        assert_eq!(
            words,
            vec!["000", "001", "010", "011", "100", "101", "110", "111"]
        );
    }

    #[test]
    fn ephemeral_charset_does_not_leak_to_next_line() {
        let reg = Registry::with_builtins(Mode::Unicode);
        let mask1 = parse_line(&cps("ab,?1"), &reg, Some(1)).unwrap();
        assert_eq!(mask1.len(), 2);
        // A second, independent line referencing '1' without defining it must fail.
        let err = parse_line(&cps("?1"), &reg, Some(2));
        assert!(err.is_err());
    }

    #[test]
    fn too_many_ephemeral_charsets_is_fatal() {
        let reg = Registry::with_builtins(Mode::Unicode);
        let line = "a,b,c,d,e,f,g,h,i,j,k";
        let err = parse_line(&cps(line), &reg, Some(1));
        assert!(err.is_err());
    }

    #[test]
    fn empty_ephemeral_field_is_fatal() {
        let reg = Registry::with_builtins(Mode::Unicode);
        let err = parse_line(&cps(",?1"), &reg, Some(1));
        assert!(err.is_err());
    }

    #[test]
    fn line_escaped_comma_is_literal_in_an_ephemeral_field() {
        // Line-level `\,` (split_fields), distinct from the `?`-escape a
        // charset body uses internally — a custom charset containing a
        // literal comma via the field separator's own escape.
        let reg = Registry::with_builtins(Mode::Unicode);
        let mask = parse_line(&cps("a\\,b,?1?1"), &reg, Some(1)).unwrap();
        assert_eq!(mask.len(), 4);
    }

    #[test]
    fn double_question_mark_is_literal() {
        let reg = Registry::with_builtins(Mode::Unicode);
        let mask = parse_inline_mask(&cps("a??b"), &reg).unwrap();
        assert_eq!(mask.len(), 1);
        assert_eq!(word_of(&mask, 0), "a?b");
    }

    #[test]
    fn undefined_reference_is_fatal() {
        let reg = Registry::with_builtins(Mode::Unicode);
        assert!(parse_inline_mask(&cps("?Q"), &reg).is_err());
    }

    #[test]
    fn is_comment_or_empty_detects_both() {
        assert!(is_comment_or_empty(&[]));
        assert!(is_comment_or_empty(&cps("# a comment")));
        assert!(!is_comment_or_empty(&cps("?d")));
    }
}
