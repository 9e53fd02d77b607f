pub mod billing;
pub mod chat;
pub mod presence;
