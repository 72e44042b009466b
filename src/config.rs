//! Compile-time configuration constants.

/// Size of the working buffer the range driver accumulates encoded words
/// into before flushing to the sink.
pub const WORK_BUF_SIZE: usize = 8 * 1024;

/// How many leading ephemeral charset tokens (`'1'..'9'`) a mask-file line
/// may define.
pub const MAX_EPHEMERAL_CHARSETS: usize = crate::mask_parser::MAX_EPHEMERAL_CHARSETS;

/// How many `-1`..`-4` CLI-bound charset slots exist.
pub const MAX_CLI_CHARSET_SLOTS: usize = 4;
