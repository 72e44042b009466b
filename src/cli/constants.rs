//! CLI-wide constants.

pub const TOOL_NAME: &str = "maskuni";
