pub mod ask;
pub mod chat;
pub mod incidents;
pub mod probe;

pub use ask::handle_ask_command;
pub use chat::handle_chat_command;
pub use incidents::{handle_incidents_command, IncidentsCommand};
pub use probe::handle_probe_command;
