//! Standard exit codes for CLI operations
//!
//! These exit codes follow Unix conventions and sysexits.h where applicable.

/// Success - operation completed without errors
pub const SUCCESS: i32 = 0;

/// General error - unspecified failure
pub const ERROR: i32 = 1;

/// Validation error - repository name or URL rejected
pub const VALIDATION_ERROR: i32 = 2;

/// Catalog unavailable - every enabled repository failed to load
pub const CATALOG_UNAVAILABLE: i32 = 3;

/// Not found - module or version absent from the catalog
pub const NOT_FOUND: i32 = 4;

/// IO error - storage unreadable or unwritable
pub const IO_ERROR: i32 = 5;

/// Install unavailable - installation is not implemented yet
pub const INSTALL_UNAVAILABLE: i32 = 6;
