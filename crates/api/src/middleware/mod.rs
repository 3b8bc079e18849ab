//! Request extractors.
//!
//! - [`viewer::Viewer`] -- The acting user, from the `x-user-id` header.
//! - [`viewer::Editor`] -- Same, but requires an identified user.

pub mod viewer;
