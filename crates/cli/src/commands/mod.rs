//! Command handlers for the assistant CLI.

pub mod ask;
pub mod chat;
pub mod serve;

pub use ask::AskCommand;
pub use chat::ChatCommand;
pub use serve::ServeCommand;
