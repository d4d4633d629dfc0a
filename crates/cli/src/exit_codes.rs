//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract — scripts rely on them.
//!
//! The surface is deliberately minimal. Migration runs either complete or
//! abort; callers branch on success, not on failure kind. Message text on
//! stderr carries the detail.
//!
//! | Code | Meaning                                        |
//! |------|------------------------------------------------|
//! | 0    | Success                                        |
//! | 1    | Fatal error (IO, parse, sink, upstream HTTP)   |
//! | 2    | Usage error (clap reports these itself too)    |
//!
//! Add a constant and a table row here before wiring a more specific code
//! into a command.

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// Any fatal error: unreadable input, parse failure, sink failure,
/// upstream HTTP failure.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;
