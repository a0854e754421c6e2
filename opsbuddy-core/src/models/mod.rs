mod incident;
mod message;
mod reply;

pub use incident::{Incident, StatusSummary};
pub use message::{Message, Role};
pub use reply::{Reply, Severity};
