//! Command-line argument parsing (§6).
//!
//! A small hand-rolled loop over `argv`, mirroring the flag-by-flag style
//! the rest of this CLI layer uses rather than pulling in a declarative
//! argument-parsing crate for a dozen flags.

use anyhow::{anyhow, bail};

use crate::codepoint::{decode_one, Mode};
use crate::range::{Delimiter, ExplicitRange, Job};

/// Which generator the positional argument feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Mask,
    Bruteforce,
}

/// One `-1`..`-4` or `-c K:VAL` binding, exactly as given on the command
/// line. Resolution against the registry (including the file-vs-inline
/// decision) happens later, once `mode` is known.
#[derive(Debug, Clone)]
pub struct CharsetBinding {
    pub name: char,
    pub value: String,
}

#[derive(Debug)]
pub struct ParsedArgs {
    pub run_mode: RunMode,
    pub mode: Mode,
    pub job: Option<Job>,
    pub range: ExplicitRange,
    pub output: Option<String>,
    pub delimiter: Delimiter,
    pub size_only: bool,
    pub bindings: Vec<CharsetBinding>,
    pub positional: String,
    /// `--help`/`--version` were processed; caller should print nothing
    /// further and exit 0.
    pub exit_early: bool,
}

pub fn parse_args(argv: &[String]) -> anyhow::Result<ParsedArgs> {
    let mut run_mode = RunMode::Mask;
    let mut unicode = false;
    let mut job: Option<Job> = None;
    let mut range = ExplicitRange::default();
    let mut output = None;
    let mut delimiter = Delimiter::Newline;
    let mut size_only = false;
    let mut bindings = Vec::new();
    let mut positional: Option<String> = None;
    let mut exit_early = false;
    let mut all_arguments_are_files = false;

    let mut i = 0;
    while i < argv.len() {
        let arg = argv[i].as_str();

        if all_arguments_are_files {
            if positional.is_some() {
                bail!("unexpected extra argument: {arg}");
            }
            positional = Some(arg.to_owned());
            i += 1;
            continue;
        }

        if arg == "--" {
            all_arguments_are_files = true;
            i += 1;
            continue;
        }

        // Short options taking a value accept it attached (`-j4/5`) or as
        // the following argument (`-j 4/5`).
        if let Some(rest) = short_with_value(arg, "-j") {
            let val = value_or_next(rest, argv, &mut i, "-j")?;
            job = Some(parse_job(&val)?);
        } else if let Some(rest) = short_with_value(arg, "-b") {
            let val = value_or_next(rest, argv, &mut i, "-b")?;
            range.begin = Some(parse_index(&val, "-b")?);
        } else if let Some(rest) = short_with_value(arg, "-e") {
            let val = value_or_next(rest, argv, &mut i, "-e")?;
            range.end = Some(parse_index(&val, "-e")?);
        } else if let Some(rest) = short_with_value(arg, "-o") {
            output = Some(value_or_next(rest, argv, &mut i, "-o")?);
        } else if let Some(rest) = short_with_value(arg, "-c") {
            let val = value_or_next(rest, argv, &mut i, "-c")?;
            let mode = if unicode { Mode::Unicode } else { Mode::Byte };
            bindings.push(parse_c_binding(&val, mode)?);
        } else if let Some((name, rest)) = slot_with_value(arg) {
            let val = value_or_next(rest, argv, &mut i, arg)?;
            bindings.push(CharsetBinding { name, value: val });
        } else {
            match arg {
                "-h" | "--help" => {
                    crate::cli::help::print_usage(crate::cli::constants::TOOL_NAME);
                    exit_early = true;
                    break;
                }
                "-V" | "--version" => {
                    crate::cli::help::print_version();
                    exit_early = true;
                    break;
                }
                "-m" | "--mask" => run_mode = RunMode::Mask,
                "-B" | "--bruteforce" => run_mode = RunMode::Bruteforce,
                "-u" | "--unicode" => unicode = true,
                "-z" => delimiter = Delimiter::Nul,
                "-n" => delimiter = Delimiter::None,
                "-s" => size_only = true,
                _ if arg.starts_with('-') && arg.len() > 1 => {
                    bail!("unrecognised option: {arg}");
                }
                _ => {
                    if positional.is_some() {
                        bail!("unexpected extra argument: {arg}");
                    }
                    positional = Some(arg.to_owned());
                }
            }
        }
        i += 1;
    }

    if exit_early {
        return Ok(ParsedArgs {
            run_mode,
            mode: Mode::Unicode,
            job: None,
            range: ExplicitRange::default(),
            output: None,
            delimiter: Delimiter::Newline,
            size_only: false,
            bindings: Vec::new(),
            positional: String::new(),
            exit_early: true,
        });
    }

    if job.is_some() && (range.begin.is_some() || range.end.is_some()) {
        bail!("-j cannot be combined with -b/-e");
    }

    let positional = positional.ok_or_else(|| anyhow!("missing mask/maskfile/brutefile argument"))?;
    let mode = if unicode { Mode::Unicode } else { Mode::Byte };

    Ok(ParsedArgs {
        run_mode,
        mode,
        job,
        range,
        output,
        delimiter,
        size_only,
        bindings,
        positional,
        exit_early: false,
    })
}

/// If `arg` is exactly `short` or `short` followed by an attached value,
/// returns the attached remainder (empty if none was attached). Returns
/// `None` if `arg` does not match `short` at all.
fn short_with_value<'a>(arg: &'a str, short: &str) -> Option<&'a str> {
    arg.strip_prefix(short)
}

/// Like [`short_with_value`], but for `-1`..`-4`: also returns the bound
/// name (`'1'`..`'4'`).
fn slot_with_value(arg: &str) -> Option<(char, &str)> {
    let bytes = arg.as_bytes();
    if bytes.len() >= 2 && bytes[0] == b'-' && (b'1'..=b'4').contains(&bytes[1]) {
        Some((bytes[1] as char, &arg[2..]))
    } else {
        None
    }
}

/// Resolves a short option's value: `rest` if non-empty (attached, e.g.
/// `-j4/5`), otherwise the next `argv` element (`-j 4/5`).
fn value_or_next(rest: &str, argv: &[String], i: &mut usize, flag: &str) -> anyhow::Result<String> {
    if !rest.is_empty() {
        return Ok(rest.to_owned());
    }
    next_value(argv, i, flag)
}

fn next_value(argv: &[String], i: &mut usize, flag: &str) -> anyhow::Result<String> {
    *i += 1;
    argv.get(*i).cloned().ok_or_else(|| anyhow!("{flag} requires an argument"))
}

fn parse_index(s: &str, flag: &str) -> anyhow::Result<u64> {
    s.parse::<u64>().map_err(|_| anyhow!("{flag}: invalid index '{s}'"))
}

fn parse_job(s: &str) -> anyhow::Result<Job> {
    let (j_str, n_str) = s.split_once('/').ok_or_else(|| anyhow!("-j: expected J/N, got '{s}'"))?;
    let j: u64 = j_str.parse().map_err(|_| anyhow!("-j: invalid J in '{s}'"))?;
    let n: u64 = n_str.parse().map_err(|_| anyhow!("-j: invalid N in '{s}'"))?;
    if j == 0 || n == 0 || j > n {
        bail!("-j: require 1 <= J <= N, got '{s}'");
    }
    Ok(Job { j, n })
}

/// Parses `-c K:VAL`. In unicode mode `K` is the first UTF-8 codepoint of
/// the argument, which must be followed by an ASCII `:`.
fn parse_c_binding(s: &str, mode: Mode) -> anyhow::Result<CharsetBinding> {
    let bytes = s.as_bytes();
    let (cp, consumed, _status) = decode_one(mode, bytes);
    let cp = cp.ok_or_else(|| anyhow!("-c: missing charset name in '{s}'"))?;
    if bytes.get(consumed) != Some(&b':') {
        bail!("-c: expected 'K:VAL', got '{s}'");
    }
    let name = char::from_u32(cp).ok_or_else(|| anyhow!("-c: invalid charset name in '{s}'"))?;
    let value = s[consumed + 1..].to_owned();
    Ok(CharsetBinding { name, value })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn defaults_mask_mode_byte_newline() {
        let p = parse_args(&args(&["?d"])).unwrap();
        assert_eq!(p.run_mode, RunMode::Mask);
        assert_eq!(p.mode, Mode::Byte);
        assert_eq!(p.delimiter, Delimiter::Newline);
        assert_eq!(p.positional, "?d");
    }

    #[test]
    fn unicode_flag() {
        let p = parse_args(&args(&["-u", "?d"])).unwrap();
        assert_eq!(p.mode, Mode::Unicode);
    }

    #[test]
    fn bruteforce_flag() {
        let p = parse_args(&args(&["-B", "file.txt"])).unwrap();
        assert_eq!(p.run_mode, RunMode::Bruteforce);
    }

    #[test]
    fn job_flag() {
        let p = parse_args(&args(&["-j", "4/5", "?d"])).unwrap();
        let job = p.job.unwrap();
        assert_eq!((job.j, job.n), (4, 5));
    }

    #[test]
    fn invalid_job_is_rejected() {
        assert!(parse_args(&args(&["-j", "6/5", "?d"])).is_err());
    }

    #[test]
    fn begin_end_flags() {
        let p = parse_args(&args(&["-b", "5", "-e", "7", "?d"])).unwrap();
        assert_eq!(p.range.begin, Some(5));
        assert_eq!(p.range.end, Some(7));
    }

    #[test]
    fn job_and_range_conflict() {
        assert!(parse_args(&args(&["-j", "1/2", "-b", "5", "?d"])).is_err());
    }

    #[test]
    fn output_and_delimiter_flags() {
        let p = parse_args(&args(&["-o", "out.txt", "-z", "?d"])).unwrap();
        assert_eq!(p.output.as_deref(), Some("out.txt"));
        assert_eq!(p.delimiter, Delimiter::Nul);
    }

    #[test]
    fn size_only_flag() {
        let p = parse_args(&args(&["-s", "?d"])).unwrap();
        assert!(p.size_only);
    }

    #[test]
    fn numbered_charset_binding() {
        let p = parse_args(&args(&["-1", "01", "?1?1"])).unwrap();
        assert_eq!(p.bindings.len(), 1);
        assert_eq!(p.bindings[0].name, '1');
        assert_eq!(p.bindings[0].value, "01");
    }

    #[test]
    fn custom_charset_binding() {
        let p = parse_args(&args(&["-c", "l:abc", "?l"])).unwrap();
        assert_eq!(p.bindings[0].name, 'l');
        assert_eq!(p.bindings[0].value, "abc");
    }

    #[test]
    fn missing_positional_is_error() {
        assert!(parse_args(&args(&["-u"])).is_err());
    }

    #[test]
    fn unrecognised_option_is_error() {
        assert!(parse_args(&args(&["--bogus", "x"])).is_err());
    }

    #[test]
    fn help_flag_exits_early() {
        let p = parse_args(&args(&["--help"])).unwrap();
        assert!(p.exit_early);
    }

    #[test]
    fn short_flags_accept_an_attached_value() {
        let p = parse_args(&args(&["-j4/5", "?d"])).unwrap();
        let job = p.job.unwrap();
        assert_eq!((job.j, job.n), (4, 5));

        let p = parse_args(&args(&["-b5", "-e7", "?d"])).unwrap();
        assert_eq!(p.range.begin, Some(5));
        assert_eq!(p.range.end, Some(7));

        let p = parse_args(&args(&["-oout.txt", "?d"])).unwrap();
        assert_eq!(p.output.as_deref(), Some("out.txt"));

        let p = parse_args(&args(&["-1ab", "?1?1"])).unwrap();
        assert_eq!(p.bindings[0].value, "ab");
    }

    #[test]
    fn bare_double_dash_ends_option_parsing() {
        let p = parse_args(&args(&["--", "-not-a-flag"])).unwrap();
        assert_eq!(p.positional, "-not-a-flag");
    }

    #[test]
    fn double_dash_then_extra_argument_is_an_error() {
        assert!(parse_args(&args(&["--", "a", "b"])).is_err());
    }
}
