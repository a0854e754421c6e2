//! Rendering of `/query` payloads into chat replies.
//!
//! The backend answers `{intent, sub_intent, response}` where the shape of
//! `response` depends on the intent. Unknown shapes are shown as JSON.

use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

use crate::models::{Reply, Severity};

pub const INCIDENT_STATUS_INQUIRY: &str = "Incident Status Inquiry";
pub const CI_HEALTH_CHECK: &str = "CI Health Check";
pub const LIST_OPEN_INCIDENTS_WITH_HEALTH: &str = "List Open Incidents with CI Health";
pub const DEPENDENCY_IMPACT_ANALYSIS: &str = "Dependency Impact Analysis";

pub const BACKEND_FALLBACK_MESSAGE: &str = "I couldn't connect to the backend service. Please check if the server is running and try again. In the meantime, you can still use OpenAI-powered features if you've provided your API key.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    pub intent: String,
    #[serde(default)]
    pub sub_intent: String,
    #[serde(default)]
    pub response: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    pub ci: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub relationship: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Dependencies {
    #[serde(default)]
    pub upstream: Vec<Dependency>,
    #[serde(default)]
    pub downstream: Vec<Dependency>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Payload {
    message: Option<String>,
    incident_id: Option<String>,
    impacted_ci: Option<String>,
    status: Option<String>,
    description: Option<String>,
    dashboard: Option<String>,
    dependencies: Option<Dependencies>,
    incidents: Option<Vec<PayloadIncident>>,
    ci: Option<String>,
    prefix: Option<String>,
    health_status: Option<String>,
    details: Option<String>,
    recent_updates: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PayloadIncident {
    id: Option<String>,
    incident_id: Option<String>,
    short_description: Option<String>,
    status: Option<String>,
    ci: Option<String>,
    ci_health: Option<String>,
    details: Option<String>,
}

fn field(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("N/A")
}

fn write_dependency_list(out: &mut String, label: &str, deps: &[Dependency]) {
    if deps.is_empty() {
        let _ = writeln!(out, "- {}: None", label);
        return;
    }

    let _ = writeln!(out, "- {}:", label);
    for dep in deps {
        let _ = writeln!(out, "  - {} ({}, {})", dep.ci, dep.kind, dep.relationship);
    }
}

fn write_dependencies(out: &mut String, deps: &Dependencies) {
    write_dependency_list(out, "Upstream", &deps.upstream);
    write_dependency_list(out, "Downstream", &deps.downstream);
}

fn incident_status_severity(status: Option<&str>) -> Severity {
    match status {
        Some("Resolved") => Severity::Resolved,
        Some("Critical") => Severity::Critical,
        Some("In Progress") | Some("Open") => Severity::Warning,
        _ => Severity::Info,
    }
}

fn health_severity(health: Option<&str>) -> Severity {
    match health {
        Some("Healthy") => Severity::Resolved,
        Some("Critical") => Severity::Critical,
        Some("Warning") => Severity::Warning,
        _ => Severity::Info,
    }
}

pub fn format_backend_response(resp: &QueryResponse) -> Reply {
    let payload: Payload = serde_json::from_value(resp.response.clone()).unwrap_or_default();
    let mut content = payload.message.clone().unwrap_or_default();
    let mut severity = Severity::Info;

    match resp.intent.as_str() {
        INCIDENT_STATUS_INQUIRY => {
            if let Some(incident_id) = &payload.incident_id {
                severity = incident_status_severity(payload.status.as_deref());

                let ci = field(&payload.impacted_ci);
                let mut out = String::new();
                let _ = writeln!(out, "Incident {}", incident_id);
                let _ = writeln!(out, "Impacted CI: {}", ci);
                let _ = writeln!(out, "Status: {}", field(&payload.status));
                let _ = writeln!(out, "Description: {}", field(&payload.description));
                let _ = writeln!(out, "Dashboard: {}", field(&payload.dashboard));
                if let Some(deps) = &payload.dependencies {
                    let _ = writeln!(out);
                    let _ = writeln!(out, "Dependencies for {}:", ci);
                    write_dependencies(&mut out, deps);
                }
                content = out;
            }

            if let Some(incidents) = &payload.incidents {
                let mut out = format!("{}\n\n", payload.message.as_deref().unwrap_or_default());
                for inc in incidents {
                    let _ = writeln!(
                        out,
                        "- {}: {} ({})",
                        field(&inc.id),
                        field(&inc.short_description),
                        field(&inc.status)
                    );
                }
                content = out;
            }
        }
        CI_HEALTH_CHECK => {
            if let Some(ci) = &payload.ci {
                severity = health_severity(payload.health_status.as_deref());

                let mut out = String::new();
                let prefix = payload.prefix.as_deref().unwrap_or("CI");
                let _ = writeln!(out, "{}: {}", prefix, ci);
                let _ = writeln!(out, "- Health Status: {}", field(&payload.health_status));
                let _ = writeln!(out, "- Details: {}", field(&payload.details));
                let _ = writeln!(out, "- Recent Updates: {}", field(&payload.recent_updates));
                let _ = writeln!(out, "- Dashboard: {}", field(&payload.dashboard));
                if let Some(deps) = &payload.dependencies {
                    let _ = writeln!(out);
                    let _ = writeln!(out, "Dependencies for {}:", ci);
                    write_dependencies(&mut out, deps);
                }
                content = out;
            }
        }
        LIST_OPEN_INCIDENTS_WITH_HEALTH => {
            if let Some(incidents) = &payload.incidents {
                let mut out = format!("{}\n\n", payload.message.as_deref().unwrap_or_default());
                for inc in incidents {
                    let _ = writeln!(
                        out,
                        "- Incident {} (CI: {})",
                        field(&inc.incident_id),
                        field(&inc.ci)
                    );
                    let _ = writeln!(out, "  - Status: {}", field(&inc.status));
                    let _ = writeln!(out, "  - CI Health: {}", field(&inc.ci_health));
                    let _ = writeln!(out, "  - Details: {}", field(&inc.details));
                    let _ = writeln!(out);
                }

                let health = |wanted: &str| {
                    incidents
                        .iter()
                        .any(|inc| inc.ci_health.as_deref() == Some(wanted))
                };
                if health("Critical") {
                    severity = Severity::Critical;
                } else if health("Warning") {
                    severity = Severity::Warning;
                }
                content = out;
            }
        }
        DEPENDENCY_IMPACT_ANALYSIS => {
            if let Some(ci) = &payload.ci {
                let mut out = format!("Dependency Impact Analysis for {}:\n\n", ci);
                if let Some(deps) = &payload.dependencies {
                    write_dependencies(&mut out, deps);
                }
                content = out;
            }
        }
        _ => {}
    }

    if content.trim().is_empty() {
        content = match &resp.response {
            serde_json::Value::String(s) => s.clone(),
            other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
        };
    }

    Reply::new(content.trim_end(), severity)
}
