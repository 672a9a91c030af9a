/*!
 * Core Types
 * Common types used across the supervisor
 */

use std::collections::BTreeSet;

/// OS process id, the raw value `nix::unistd::Pid` wraps
pub type Pid = i32;

/// Set of tracked process ids, ordered so listings are stable
pub type PidSet = BTreeSet<Pid>;

/// Common result type for supervisor operations
pub type ForkerResult<T> = Result<T, super::errors::ForkerError>;
