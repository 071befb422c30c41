pub mod reply;
pub mod session;
