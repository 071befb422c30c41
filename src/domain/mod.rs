pub mod comment;
pub mod prompt;
pub mod state;
pub mod ticket;
