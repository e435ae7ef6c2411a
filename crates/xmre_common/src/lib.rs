//! Shared foundational types used across the XMR elimination toolchain.
//!
//! This crate provides interned identifiers, content hashing, and the
//! common result/error type used by every other crate in the workspace.

#![warn(missing_docs)]

pub mod hash;
pub mod ident;
pub mod result;

pub use hash::ContentHash;
pub use ident::{Ident, Interner};
pub use result::{InternalError, XmreResult};
