/*!
 * Defaults and Constants
 *
 * Centralized location for supervisor defaults and timing constants.
 */

use std::time::Duration;

// =============================================================================
// IDENTITY DEFAULTS
// =============================================================================

/// Directory holding pidfiles when none is configured
pub const DEFAULT_RUNTIME_PATH: &str = "/tmp";

/// Suffix appended to the supervisor name to form the pidfile name
pub const DEFAULT_PIDFILE_EXTENSION: &str = ".pid";

/// Concurrent children allowed when no limit is configured
pub const DEFAULT_MAX_PROCESS: usize = 1;

/// Suffix of the advisory lock file kept next to the pidfile
pub const LOCK_FILE_SUFFIX: &str = ".lock";

// =============================================================================
// TIMING
// =============================================================================

/// Pause before a child exits after its job returns
pub const CHILD_EXIT_GRACE: Duration = Duration::from_micros(300);

/// Poll interval while waiting for slots held by processes that are not our children
pub const DEFAULT_RECLAIM_INTERVAL: Duration = Duration::from_millis(100);

// =============================================================================
// PIDFILE FORMAT
// =============================================================================

/// Leading byte of every pidfile; bumped on incompatible layout changes
pub const PIDFILE_FORMAT_VERSION: u8 = 1;
