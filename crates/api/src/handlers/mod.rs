pub mod history;
pub mod posts;
