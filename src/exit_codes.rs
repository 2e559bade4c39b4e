/// Exit codes for shcheck
///
/// These exit codes allow build pipelines to distinguish between
/// violations reported by shellcheck and failures of shcheck itself.
/// Success - Nothing to check, no violations, or violations were ignored
pub const SUCCESS: i32 = 0;

/// Violations found - shellcheck reported at least one file with errors
pub const VIOLATIONS_FOUND: i32 = 1;

/// Tool error - Configuration error, launch failure, malformed tool output or report failure
pub const TOOL_ERROR: i32 = 2;

/// Helper functions for consistent exit behavior
pub mod exit {
    use super::{SUCCESS, TOOL_ERROR, VIOLATIONS_FOUND};

    /// Exit with success code (0)
    pub fn success() -> ! {
        std::process::exit(SUCCESS);
    }

    /// Exit with violations found code (1)
    pub fn violations_found() -> ! {
        std::process::exit(VIOLATIONS_FOUND);
    }

    /// Exit with tool error code (2)
    pub fn tool_error() -> ! {
        std::process::exit(TOOL_ERROR);
    }
}
