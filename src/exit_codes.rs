//! Exit code constants for the tplexec CLI.
//!
//! - 0: Success
//! - 1: Bad arguments or configuration
//! - 2: Executable could not be resolved
//! - 3: Executable ran but failed
//! - 4: Executable output was not in the expected format

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// Argument coercion or configuration failure.
pub const USER_ERROR: i32 = 1;

/// The named executable was not found on the search path.
pub const RESOLUTION_FAILURE: i32 = 2;

/// Spawn failure, I/O failure, timeout, or non-success exit status.
pub const EXECUTION_FAILURE: i32 = 3;

/// The tool succeeded but its output lacked the expected markup.
pub const OUTPUT_FORMAT_FAILURE: i32 = 4;
