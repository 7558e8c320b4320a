//! Parser error handling module
//!
//! Two kinds of failure live here:
//! - [`SyntaxError`]: diagnostics describing ERROR and MISSING nodes in a tree,
//!   with categorized codes and hints
//! - [`ConfigError`]: a language that cannot be used at all (bad grammar,
//!   incompatible ABI version)

mod codes;
mod config;
mod error;

pub use codes::ErrorCode;
pub use config::ConfigError;
pub use error::{RelatedInfo, SyntaxError, SyntaxErrorBuilder};
