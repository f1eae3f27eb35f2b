//! HTTP request handlers for the mock server.

pub mod variables;

pub use variables::*;
