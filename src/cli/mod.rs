//! CLI command implementations

pub mod check;
pub mod clear;
pub mod comment;
pub mod context;
pub mod style;
pub mod validate;

pub use check::{CheckOptions, run_check};
pub use clear::run_clear;
pub use comment::run_comment;
pub use context::{CommandContext, GlobalOptions};
pub use validate::run_validate;
