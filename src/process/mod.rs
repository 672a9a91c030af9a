/*!
 * Process Module
 * Child process creation, reaping and signalling
 */

pub mod controller;
pub mod traits;
pub mod types;

// Re-export for convenience
pub use controller::ForkController;
pub use traits::ProcessController;
pub use types::{ChildExit, ExitKind};
