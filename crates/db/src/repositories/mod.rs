//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod post_repo;
pub mod revision_repo;

pub use post_repo::PostRepo;
pub use revision_repo::RevisionRepo;
