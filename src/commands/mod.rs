pub mod query;
pub mod serve;
pub mod sync;

// Re-export command functions for convenience
pub use query::{list, search, status, types};
pub use serve::{run, serve};
pub use sync::sync;
