use std::sync::Arc;

use async_trait::async_trait;

use crate::error::OpsBuddyResult;
use crate::models::Reply;

/// Something that can answer a free-text question.
///
/// Remote sources may fail; the dispatcher walks them in order and falls back
/// to the local canned responder, which never does.
#[async_trait]
pub trait ResponseSource: Send + Sync {
    fn source_name(&self) -> &str;

    fn is_remote(&self) -> bool {
        true
    }

    async fn respond(&self, text: &str) -> OpsBuddyResult<Reply>;

    async fn health_check(&self) -> OpsBuddyResult<bool> {
        Ok(true)
    }
}

pub type DynResponseSource = Arc<dyn ResponseSource>;
