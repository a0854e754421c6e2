//! Reply text for answers built from the local incident dataset.

use std::fmt::Write as _;

use crate::models::{Incident, Reply, Severity, StatusSummary};

pub fn incident_details(incident: &Incident) -> Reply {
    let mut out = String::new();
    let _ = writeln!(out, "Incident {}: {}", incident.id, incident.short_description);
    let _ = writeln!(out, "- Status: {}", incident.status);
    let _ = writeln!(out, "- Priority: {}", incident.priority);
    let _ = writeln!(
        out,
        "- Category: {} / {}",
        incident.category, incident.subcategory
    );
    let _ = writeln!(out, "- Affected service: {}", incident.affected_service);
    let _ = writeln!(
        out,
        "- Assigned to: {}",
        incident.assigned_individual.as_deref().unwrap_or("Unassigned")
    );
    let _ = writeln!(out, "- Created: {}", incident.created_at.to_rfc3339());
    let _ = writeln!(out, "- Updated: {}", incident.updated_at.to_rfc3339());
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", incident.description);
    if let Some(notes) = &incident.resolution_notes {
        let _ = writeln!(out);
        let _ = writeln!(out, "Resolution: {}", notes);
    }

    Reply::new(out.trim_end(), incident.severity())
}

pub fn incident_not_found(id: &str) -> Reply {
    Reply::warning(format!(
        "Incident {} not found. Please check the ID and try again.",
        id
    ))
}

pub fn search_results(query: &str, matches: &[&Incident]) -> Reply {
    if matches.is_empty() {
        return Reply::info(format!(
            "I couldn't find any incidents matching \"{}\".",
            query
        ));
    }

    let noun = if matches.len() == 1 {
        "incident"
    } else {
        "incidents"
    };
    let heading = format!("Found {} {} matching \"{}\":", matches.len(), noun, query);
    incident_list(&heading, matches)
}

/// Answer to a search that named no usable terms, e.g. "show me all incidents".
pub fn all_incidents(incidents: &[Incident]) -> Reply {
    if incidents.is_empty() {
        return Reply::info("I couldn't find any incidents. The dataset is empty.");
    }

    let all: Vec<&Incident> = incidents.iter().collect();
    let heading = format!("Here are all {} incidents:", all.len());
    incident_list(&heading, &all)
}

fn incident_list(heading: &str, incidents: &[&Incident]) -> Reply {
    let mut out = format!("{}\n", heading);
    for incident in incidents {
        let _ = writeln!(
            out,
            "- {}: {} ({}, {})",
            incident.id, incident.short_description, incident.status, incident.priority
        );
    }

    let severity = if incidents.iter().any(|i| i.is_open() && i.is_critical()) {
        Severity::Critical
    } else if incidents.iter().any(|i| i.is_open()) {
        Severity::Warning
    } else {
        Severity::Info
    };

    Reply::new(out.trim_end(), severity)
}

pub fn status_summary(summary: &StatusSummary) -> Reply {
    Reply::new(
        format!(
            "Incident summary:\n- Total incidents: {}\n- Open incidents: {}\n- Critical priority: {}",
            summary.total, summary.open, summary.critical
        ),
        summary.severity(),
    )
}

pub fn api_key_accepted(masked: &str) -> Reply {
    Reply::resolved(format!(
        "API key {} saved. I'll use the language model for questions I can't answer from the incident data.",
        masked
    ))
}

pub fn api_key_rejected() -> Reply {
    Reply::warning("I couldn't set up the language model with that key. Please check it and try again.")
}
