//! Exit code constants for CLI commands.

/// Successful operation.
pub const EXIT_SUCCESS: i32 = 0;

/// General error (bad arguments, unknown channel, output failure, etc.).
pub const EXIT_ERROR: i32 = 1;

/// The policy document is missing or malformed.
///
/// Unknown namespaces and unknown properties land here.
pub const EXIT_CONFIG_ERROR: i32 = 2;

/// The node snapshot could not be read or a node data lookup failed.
pub const EXIT_SOURCE_ERROR: i32 = 3;
