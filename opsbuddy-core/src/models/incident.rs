use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::reply::Severity;

pub const RESOLVED_STATUS: &str = "Resolved";
pub const CRITICAL_PRIORITY: &str = "1-Critical";

/// One record of the read-only incident dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Incident {
    pub id: String,
    pub short_description: String,
    pub description: String,
    pub status: String,
    pub priority: String,
    pub category: String,
    pub subcategory: String,
    pub affected_service: String,
    #[serde(default)]
    pub assigned_individual: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub resolution_notes: Option<String>,
}

impl Incident {
    /// Anything not marked `Resolved` counts as open.
    pub fn is_open(&self) -> bool {
        self.status != RESOLVED_STATUS
    }

    pub fn is_critical(&self) -> bool {
        self.priority == CRITICAL_PRIORITY
    }

    /// Case-insensitive substring match against every field of the record.
    pub fn matches(&self, term: &str) -> bool {
        let needle = term.to_lowercase();
        if needle.is_empty() {
            return false;
        }

        self.searchable_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }

    fn searchable_fields(&self) -> Vec<String> {
        let mut fields = vec![
            self.id.clone(),
            self.short_description.clone(),
            self.description.clone(),
            self.status.clone(),
            self.priority.clone(),
            self.category.clone(),
            self.subcategory.clone(),
            self.affected_service.clone(),
            self.created_at.to_rfc3339(),
            self.updated_at.to_rfc3339(),
        ];
        fields.extend(self.assigned_individual.iter().cloned());
        fields.extend(self.resolution_notes.iter().cloned());
        fields
    }

    pub fn severity(&self) -> Severity {
        match self.status.as_str() {
            "Resolved" | "Closed" => Severity::Resolved,
            _ if self.is_critical() => Severity::Critical,
            "Open" | "In Progress" | "On Hold" | "New" => Severity::Warning,
            _ => Severity::Info,
        }
    }
}

/// Aggregate counts over the incident dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct StatusSummary {
    pub total: usize,
    pub open: usize,
    pub critical: usize,
}

impl StatusSummary {
    pub fn from_incidents<'a>(incidents: impl IntoIterator<Item = &'a Incident>) -> Self {
        incidents
            .into_iter()
            .fold(StatusSummary::default(), |mut acc, incident| {
                acc.total += 1;
                if incident.is_open() {
                    acc.open += 1;
                }
                if incident.is_critical() {
                    acc.critical += 1;
                }
                acc
            })
    }

    pub fn severity(&self) -> Severity {
        if self.critical > 0 {
            Severity::Critical
        } else if self.open > 0 {
            Severity::Warning
        } else {
            Severity::Resolved
        }
    }
}
