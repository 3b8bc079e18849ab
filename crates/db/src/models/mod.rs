//! Row types for the post and revision tables.

pub mod post;
pub mod revision;
