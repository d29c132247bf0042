//! Keyboard profiles
//!
//! Compiled-in profiles live in [`builtin`]; more can be loaded from JSON
//! files. All of them end up in a [`ProfileRegistry`] built once at start-up.

pub mod builtin;
pub mod json;
pub mod registry;

pub use json::{JsonProfile, LoadError};
pub use registry::ProfileRegistry;
