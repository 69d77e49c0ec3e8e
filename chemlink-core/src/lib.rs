//! Error type, shared traits and hashing for the chemlink crates.
//!
//! - [`ChemlinkError`] and [`Result`], used by every fallible API
//! - [`Annotated`], [`Summarizable`], [`Scored`]
//! - [`hash`]: SHA-256 digests behind identity keys

pub mod error;
pub mod hash;
pub mod traits;

pub use error::{ChemlinkError, Result};
pub use traits::*;
