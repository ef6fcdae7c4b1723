//! Process exit codes, numbered as in BSD sysexits.h

pub const OK: i32 = 0;

/// No subcommand or conflicting flags
pub const USAGE: i32 = 64;

/// Rejected content document, malformed menu rows or a menu cycle
pub const DATAERR: i32 = 65;

/// Unknown menu node or page
pub const NOINPUT: i32 = 66;

/// Reading or writing the data directory failed
pub const IOERR: i32 = 74;

/// Write attempted under `--read-only`
pub const NOPERM: i32 = 77;

/// Unreadable or invalid settings file
pub const CONFIG: i32 = 78;
