//! Shared error plumbing for the docmill workspace.

mod error;

pub use error::{DocmillError, Error, FromMessage, Result};
