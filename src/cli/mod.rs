//! Command line interface shared by the `primer-morph` and `primer-taxi`
//! binaries.

pub mod args;
pub mod commands;
pub mod output;

// Re-export commonly used types
pub use args::*;
pub use commands::*;
pub use output::*;
