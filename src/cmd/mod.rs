pub mod actions;
pub mod comment;
pub mod config;
pub mod rewrite;
