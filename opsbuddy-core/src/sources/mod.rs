mod backend;
mod backend_response;
mod canned;
mod llm;
mod traits;

pub use backend::{BackendClient, BackendStatus, QueryRequest};
pub use backend_response::{
    format_backend_response, Dependencies, Dependency, QueryResponse, BACKEND_FALLBACK_MESSAGE,
};
pub use canned::{CannedResponder, GENERIC_RESPONSES};
pub use llm::{LlmClient, SYSTEM_PROMPT};
pub use traits::{DynResponseSource, ResponseSource};
