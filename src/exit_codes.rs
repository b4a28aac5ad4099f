/// Exit codes for the emmet-assist CLI
///
/// Success - The command produced a result
pub const SUCCESS: i32 = 0;

/// Nothing found - No abbreviation, invalid abbreviation or unknown language
pub const NOT_FOUND: i32 = 1;

/// Tool error - Bad input, unreadable extensions directory or internal error
pub const TOOL_ERROR: i32 = 2;

/// Helper functions for consistent exit behavior
pub mod exit {
    use super::TOOL_ERROR;

    /// Exit with tool error code (2)
    pub fn tool_error() -> ! {
        std::process::exit(TOOL_ERROR);
    }
}
