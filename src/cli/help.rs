//! `--help` / `--version` / usage text.

use crate::cli::constants::TOOL_NAME;

pub fn print_usage(program: &str) {
    eprintln!("Usage:");
    eprintln!("      {program} [--mask] [options] <mask-or-maskfile>");
    eprintln!("      {program} --bruteforce [options] <brutefile>");
    eprintln!();
    eprintln!("Options:");
    eprintln!(" -m, --mask         single mask or mask-list file (default)");
    eprintln!(" -B, --bruteforce   bruteforce constraint file");
    eprintln!(" -u, --unicode      enable unicode mode (disables ?b)");
    eprintln!(" -j J/N             job partitioning; 1 <= J <= N");
    eprintln!(" -b N               first index (0-based, inclusive)");
    eprintln!(" -e N               last index (0-based, inclusive)");
    eprintln!(" -o FILE            write to FILE (default: stdout)");
    eprintln!(" -z                 use NUL as delimiter");
    eprintln!(" -n                 no delimiter");
    eprintln!(" -s                 print selected range size and exit");
    eprintln!(" -1..-4 VAL         bind names '1'..'4' (inline charset or file)");
    eprintln!(" -c K:VAL           bind name K to VAL (inline charset or file)");
    eprintln!(" -h, --help         display this help and exit");
    eprintln!(" -V, --version      display version and exit");
}

pub fn print_version() {
    println!("{TOOL_NAME} {}", env!("CARGO_PKG_VERSION"));
}

pub fn print_bad_usage(program: &str, message: &str) -> ! {
    eprintln!("{program}: {message}");
    print_usage(program);
    std::process::exit(1);
}
