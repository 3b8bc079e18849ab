//! Domain types and pure algorithms for post revision history.
//!
//! Nothing in this crate performs I/O: the patch codec, the revision chain
//! (replay, version ladder, rebase planning) and the markup helpers are all
//! plain functions over owned data so they can be shared by the storage,
//! history and HTTP layers.

pub mod chain;
pub mod error;
pub mod markup;
pub mod patch;
pub mod post;
pub mod revision;
pub mod types;
