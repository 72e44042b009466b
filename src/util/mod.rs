//! Small cross-cutting helpers used by the CLI and file-reading layers.
//!
//! - [`file_status`] — file-type queries (`is_reg_file`, `is_directory`),
//!   used by the mask-file generator (C6) to decide whether its argument
//!   names a file on disk or an inline mask.

pub mod file_status;

pub use file_status::{is_directory, is_reg_file};
