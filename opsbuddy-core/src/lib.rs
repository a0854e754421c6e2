pub mod config;
pub mod dataset;
pub mod dispatcher;
pub mod error;
pub mod intent;
pub mod models;
pub mod replies;
pub mod session;
pub mod sources;
pub mod store;

pub use config::{
    get_config_dir, BackendConfig, ChatConfig, DataConfig, DisplayConfig, LlmConfig,
    LoggingConfig, OpsBuddyConfig, ResponseMode, DEFAULT_GREETING,
};
pub use dataset::IncidentDataset;
pub use dispatcher::{Dispatcher, LLM_FAILURE_NOTICE};
pub use error::{CliErrorDisplay, OpsBuddyError, OpsBuddyResult};
pub use intent::{classify, mask_api_key, Intent};
pub use models::{Incident, Message, Reply, Role, Severity, StatusSummary};
pub use session::{ChatEvent, ChatSession};
pub use sources::{
    format_backend_response, BackendClient, BackendStatus, CannedResponder, DynResponseSource,
    LlmClient, QueryResponse, ResponseSource, BACKEND_FALLBACK_MESSAGE,
};
pub use store::MessageStore;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
