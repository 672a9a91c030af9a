/*!
 * Registry Module
 * Durable pid set storage keyed by supervisor identity
 */

pub mod codec;
pub mod lock;
pub mod store;

// Re-export for convenience
pub use lock::{LockMode, RegistryGuard};
pub use store::{FileRegistry, PidSnapshot};
