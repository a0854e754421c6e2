use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::reply::{Reply, Severity};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Bot,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Bot => write!(f, "bot"),
        }
    }
}

/// A single chat line. Fields are private so a message cannot change once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    id: Uuid,
    content: String,
    role: Role,
    timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    severity: Option<Severity>,
}

impl Message {
    pub fn new(content: impl Into<String>, role: Role, severity: Option<Severity>) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: content.into(),
            role,
            timestamp: Utc::now(),
            severity,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(content, Role::User, None)
    }

    pub fn bot(content: impl Into<String>, severity: Severity) -> Self {
        Self::new(content, Role::Bot, Some(severity))
    }

    pub fn from_reply(reply: Reply) -> Self {
        Self::bot(reply.content, reply.severity)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn severity(&self) -> Option<Severity> {
        self.severity
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }
}
