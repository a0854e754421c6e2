//! Routes a chat message to the handler its intent selects.
//!
//! Dataset intents (incident lookup, search, status summary) are answered
//! locally. Everything else walks the remote sources for the current mode and
//! ends with the canned responder, so `dispatch` itself never fails.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::config::{LlmConfig, OpsBuddyConfig, ResponseMode};
use crate::dataset::IncidentDataset;
use crate::error::OpsBuddyResult;
use crate::intent::{self, Intent};
use crate::models::Reply;
use crate::replies;
use crate::sources::{
    BackendClient, CannedResponder, DynResponseSource, LlmClient, BACKEND_FALLBACK_MESSAGE,
};

/// Prefix used when only the language model was tried and it failed.
pub const LLM_FAILURE_NOTICE: &str = "I couldn't reach the language model service, so here is an offline analysis instead.";

pub struct Dispatcher {
    dataset: IncidentDataset,
    mode: ResponseMode,
    backend: Option<DynResponseSource>,
    llm: RwLock<Option<DynResponseSource>>,
    llm_config: LlmConfig,
    canned: CannedResponder,
}

impl Dispatcher {
    pub fn new(dataset: IncidentDataset, mode: ResponseMode) -> Self {
        Self {
            dataset,
            mode,
            backend: None,
            llm: RwLock::new(None),
            llm_config: LlmConfig::default(),
            canned: CannedResponder::new(),
        }
    }

    pub fn with_backend(mut self, backend: DynResponseSource) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn with_llm(mut self, llm: DynResponseSource) -> Self {
        self.llm = RwLock::new(Some(llm));
        self
    }

    /// Settings used when a key pasted into the chat builds a new LLM client.
    pub fn with_llm_config(mut self, config: LlmConfig) -> Self {
        self.llm_config = config;
        self
    }

    pub fn from_config(config: &OpsBuddyConfig) -> OpsBuddyResult<Self> {
        let dataset = IncidentDataset::load(config.data.incidents_path.as_deref())?;
        let mut dispatcher =
            Self::new(dataset, config.chat.mode).with_llm_config(config.llm.clone());

        if config.chat.mode == ResponseMode::Backend {
            let backend = BackendClient::new(&config.backend)?;
            dispatcher = dispatcher.with_backend(Arc::new(backend));
        }

        if config.has_llm_key() {
            let llm = LlmClient::from_config(&config.llm)?;
            dispatcher = dispatcher.with_llm(Arc::new(llm));
        }

        Ok(dispatcher)
    }

    pub fn mode(&self) -> ResponseMode {
        self.mode
    }

    pub fn dataset(&self) -> &IncidentDataset {
        &self.dataset
    }

    pub async fn has_llm(&self) -> bool {
        self.llm.read().await.is_some()
    }

    /// Replaces the LLM slot, e.g. after a key is pasted into the chat.
    pub async fn set_llm(&self, llm: DynResponseSource) {
        *self.llm.write().await = Some(llm);
    }

    pub async fn dispatch(&self, text: &str) -> Reply {
        let intent = intent::classify(text);
        debug!(intent = intent.name(), mode = %self.mode, "Dispatching message");

        match intent {
            Intent::ApiKeySetup { key } => self.install_api_key(&key).await,
            Intent::IncidentLookup { id } => self.lookup(&id),
            Intent::IncidentSearch { query, terms } => self.search(&query, &terms),
            Intent::StatusSummary => replies::status_summary(&self.dataset.summary()),
            Intent::FallbackAnalysis => self.analyze(text).await,
        }
    }

    async fn install_api_key(&self, key: &str) -> Reply {
        let masked = intent::mask_api_key(key);
        match LlmClient::new(&self.llm_config, key) {
            Ok(client) => {
                self.set_llm(Arc::new(client)).await;
                info!(key = %masked, model = %self.llm_config.model, "LLM client configured");
                replies::api_key_accepted(&masked)
            }
            Err(e) => {
                e.log();
                replies::api_key_rejected()
            }
        }
    }

    fn lookup(&self, id: &str) -> Reply {
        match self.dataset.find_by_id(id) {
            Some(incident) => replies::incident_details(incident),
            None => {
                debug!(id = %id, "Incident not in dataset");
                replies::incident_not_found(id)
            }
        }
    }

    fn search(&self, query: &str, terms: &[String]) -> Reply {
        if terms.is_empty() {
            debug!(query = %query, "Search without terms, listing all incidents");
            return replies::all_incidents(self.dataset.all());
        }

        let matches = self.dataset.search(terms);
        debug!(terms = ?terms, hits = matches.len(), "Incident search");
        replies::search_results(query, &matches)
    }

    async fn remote_sources(&self) -> Vec<DynResponseSource> {
        let mut sources = Vec::new();
        if self.mode == ResponseMode::Backend {
            if let Some(backend) = &self.backend {
                sources.push(Arc::clone(backend));
            }
        }
        if let Some(llm) = self.llm.read().await.as_ref() {
            sources.push(Arc::clone(llm));
        }
        sources
    }

    async fn analyze(&self, text: &str) -> Reply {
        let mut backend_failed = false;
        let mut any_failed = false;

        for source in self.remote_sources().await {
            match source.respond(text).await {
                Ok(reply) => {
                    debug!(source = source.source_name(), "Remote source answered");
                    return reply;
                }
                Err(e) => {
                    warn!(
                        source = source.source_name(),
                        error_code = e.error_code(),
                        "Remote source failed: {}",
                        e
                    );
                    any_failed = true;
                    backend_failed |= source.source_name() == "backend";
                }
            }
        }

        let canned = self.canned.analyze(text);
        if !any_failed {
            return canned;
        }

        let notice = if backend_failed {
            BACKEND_FALLBACK_MESSAGE
        } else {
            LLM_FAILURE_NOTICE
        };
        Reply::warning(format!("{}\n\n{}", notice, canned.content))
    }
}
