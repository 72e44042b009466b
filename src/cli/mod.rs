//! Command-line front end: argument parsing, usage text, and display-level
//! plumbing shared by `main`.

pub mod args;
pub mod constants;
pub mod help;
