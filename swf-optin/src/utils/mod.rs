//! Shared utilities for the swf-optin CLI

pub mod format;
pub mod table;

pub use format::*;
pub use table::*;
