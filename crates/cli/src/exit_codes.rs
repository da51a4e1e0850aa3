//! CLI Exit Code Registry
//!
//! Single source of truth for all CLI exit codes. Exit codes are part of the
//! shell contract — scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain    | Description                              |
//! |---------|-----------|------------------------------------------|
//! | 0       | Universal | Success                                  |
//! | 1       | Universal | General error (unspecified)              |
//! | 2       | Universal | CLI usage error (bad args, missing file) |
//! | 3-9     | import    | Import/reconciliation codes              |
//! | 10-19   | graph     | Graph store codes                        |

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Import (3-9)
// =============================================================================

/// Mapping fails the runnable gate (no company column, or no name column).
pub const EXIT_IMPORT_UNRUNNABLE: u8 = 3;

/// Import config file is invalid (bad TOML, failed validation).
pub const EXIT_IMPORT_CONFIG: u8 = 4;

/// Parse error reading the input sheet.
pub const EXIT_IMPORT_PARSE: u8 = 5;

// =============================================================================
// Graph store (10-19)
// =============================================================================

/// Cannot read or write the graph file.
pub const EXIT_GRAPH_IO: u8 = 10;

/// Graph file exists but does not deserialize.
pub const EXIT_GRAPH_CORRUPT: u8 = 11;
