//! GitHub API model types.

mod variable;

pub use variable::*;
