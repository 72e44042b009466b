//! Binary entry point for the `maskuni` command-line tool.
//!
//! 1. [`parse_args`] processes `argv` into a [`ParsedArgs`] value.
//! 2. [`run`] builds the registry and generator, counts the word space,
//!    resolves the requested sub-range, and streams it to a sink.

use std::fs;
use std::io::Write;
use std::path::Path;

use maskuni::bruteforce::BruteforceGenerator;
use maskuni::cli::args::{parse_args, CharsetBinding, ParsedArgs, RunMode};
use maskuni::cli::help::print_bad_usage;
use maskuni::codepoint::{decode_stream, Codepoint, DecodeStatus, Mode};
use maskuni::mask_file::MaskFileGenerator;
use maskuni::registry::Registry;
use maskuni::sink::Sink;
use maskuni::{count_total, emit_range, resolve_range, MaskGenerator};

/// Resolves a `-1..-4`/`-c K:VAL` binding's value: a regular file's raw
/// bytes if `value` names one on disk, its literal text otherwise.
fn resolve_binding(binding: &CharsetBinding, mode: Mode) -> anyhow::Result<Vec<Codepoint>> {
    let path = Path::new(&binding.value);
    let bytes = if maskuni::util::is_reg_file(path) {
        fs::read(path).map_err(|e| anyhow::anyhow!("failed to read '{}': {e}", binding.value))?
    } else {
        binding.value.as_bytes().to_vec()
    };
    let (cps, consumed, status) = decode_stream(mode, &bytes);
    if status != DecodeStatus::Ok || consumed != bytes.len() {
        anyhow::bail!("-{}: invalid text in '{}' ({status})", binding.name, binding.value);
    }
    Ok(cps)
}

fn build_registry(args: &ParsedArgs) -> anyhow::Result<Registry> {
    let mut registry = Registry::with_builtins(args.mode);
    for binding in &args.bindings {
        let cps = resolve_binding(binding, args.mode)?;
        registry.define_raw(binding.name as Codepoint, &cps);
    }
    Ok(registry)
}

fn build_generator(args: &ParsedArgs, registry: Registry) -> anyhow::Result<Box<dyn MaskGenerator>> {
    match args.run_mode {
        RunMode::Mask => {
            let gen = MaskFileGenerator::new(&args.positional, args.mode, registry)?;
            Ok(Box::new(gen))
        }
        RunMode::Bruteforce => {
            let bytes = fs::read(&args.positional)
                .map_err(|e| anyhow::anyhow!("failed to read '{}': {e}", args.positional))?;
            let gen = BruteforceGenerator::new(&bytes, args.mode, &registry)?;
            Ok(Box::new(gen))
        }
    }
}

fn run(args: ParsedArgs) -> anyhow::Result<i32> {
    let registry = build_registry(&args)?;
    let mut gen = build_generator(&args, registry)?;

    let total = count_total(gen.as_mut())?;
    let range = resolve_range(total, args.job, args.range)?;

    if args.size_only {
        println!("{}", range.end_excl - range.start);
        return Ok(0);
    }

    let mut sink = Sink::open(args.output.as_deref())?;
    emit_range(gen.as_mut(), range, args.mode, args.delimiter, &mut sink)?;
    sink.flush()?;
    Ok(0)
}

fn main() {
    let argv: Vec<String> = std::env::args().skip(1).collect();
    let program = maskuni::cli::constants::TOOL_NAME;

    let args = match parse_args(&argv) {
        Ok(a) => a,
        Err(e) => print_bad_usage(program, &e.to_string()),
    };

    if args.exit_early {
        std::process::exit(0);
    }

    let exit_code = match run(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{program}: {e}");
            1
        }
    };
    std::process::exit(exit_code);
}
