//! Revision history for posts.
//!
//! [`log::RevisionLog`] records edits, [`engine::DeltaChain`] reconstructs
//! and rebases chains on top of the pure algorithms in `folio_core::chain`,
//! and [`facade::PostHistory`] is the entry point used by the HTTP layer.
//! Post storage, rendering and tag lookup are reached through the traits in
//! [`collaborators`].

pub mod collaborators;
pub mod config;
pub mod edit;
pub mod engine;
pub mod error;
pub mod facade;
pub mod log;
pub mod memory;
pub mod pg;
pub mod renderer;
pub mod tags;
