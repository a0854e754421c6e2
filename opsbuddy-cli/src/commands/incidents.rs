use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use opsbuddy_core::{
    intent::search_terms, replies, Incident, IncidentDataset, OpsBuddyConfig, OpsBuddyError,
};

use crate::render::{print_reply, priority_color, status_color};

#[derive(Subcommand)]
pub enum IncidentsCommand {
    #[command(about = "List incidents in the dataset")]
    List {
        #[arg(short, long, help = "Only show incidents that are not resolved")]
        open: bool,

        #[arg(
            short,
            long,
            default_value = "text",
            help = "Output format (text, json)"
        )]
        format: String,
    },

    #[command(about = "Show one incident by ID")]
    Show {
        #[arg(help = "Incident ID (e.g., INC0010001)")]
        id: String,
    },

    #[command(about = "Search incidents by keyword")]
    Search {
        #[arg(required = true, help = "Search terms")]
        terms: Vec<String>,
    },

    #[command(about = "Show total, open and critical counts")]
    Summary {
        #[arg(
            short,
            long,
            default_value = "text",
            help = "Output format (text, json)"
        )]
        format: String,
    },
}

pub fn handle_incidents_command(
    action: Option<IncidentsCommand>,
    config: &OpsBuddyConfig,
) -> Result<()> {
    let dataset = IncidentDataset::load(config.data.incidents_path.as_deref())?;

    match action {
        Some(IncidentsCommand::List { open, format }) => cmd_list(&dataset, open, &format),
        Some(IncidentsCommand::Show { id }) => cmd_show(&dataset, &id),
        Some(IncidentsCommand::Search { terms }) => cmd_search(&dataset, &terms.join(" ")),
        Some(IncidentsCommand::Summary { format }) => cmd_summary(&dataset, &format),
        None => cmd_list(&dataset, false, "text"),
    }
}

fn incident_table(incidents: &[&Incident]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID").fg(comfy_table::Color::Cyan),
            Cell::new("Description").fg(comfy_table::Color::Cyan),
            Cell::new("Status").fg(comfy_table::Color::Cyan),
            Cell::new("Priority").fg(comfy_table::Color::Cyan),
            Cell::new("Service").fg(comfy_table::Color::Cyan),
            Cell::new("Updated").fg(comfy_table::Color::Cyan),
        ]);

    for incident in incidents {
        table.add_row(vec![
            Cell::new(&incident.id),
            Cell::new(&incident.short_description),
            Cell::new(&incident.status).fg(status_color(&incident.status)),
            Cell::new(&incident.priority).fg(priority_color(&incident.priority)),
            Cell::new(&incident.affected_service),
            Cell::new(incident.updated_at.format("%Y-%m-%d %H:%M").to_string()),
        ]);
    }

    table
}

fn cmd_list(dataset: &IncidentDataset, open: bool, format: &str) -> Result<()> {
    let incidents: Vec<&Incident> = if open {
        dataset.open_incidents()
    } else {
        dataset.all().iter().collect()
    };

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&incidents)?);
        return Ok(());
    }

    if incidents.is_empty() {
        println!("{}", "No incidents found.".yellow());
        return Ok(());
    }

    let title = if open { "Open Incidents" } else { "Incidents" };
    println!("{}", title.cyan().bold());
    println!("{}", "═".repeat(80).dimmed());
    println!();
    println!("{}", incident_table(&incidents));
    println!();
    println!("  Total: {} incidents", incidents.len());

    Ok(())
}

fn cmd_show(dataset: &IncidentDataset, id: &str) -> Result<()> {
    let incident = dataset
        .find_by_id(id)
        .ok_or_else(|| OpsBuddyError::IncidentNotFound(id.trim().to_uppercase()))?;

    print_reply(&replies::incident_details(incident));
    Ok(())
}

fn cmd_search(dataset: &IncidentDataset, query: &str) -> Result<()> {
    let terms = search_terms(query);
    let matches = dataset.search(&terms);

    if matches.is_empty() {
        print_reply(&replies::search_results(query, &matches));
        return Ok(());
    }

    println!("{} {}", "Search Results for:".cyan().bold(), query.yellow());
    println!("{}", "═".repeat(60).dimmed());
    println!();
    println!("{}", incident_table(&matches));
    println!();
    println!("  Found: {} incidents", matches.len());

    Ok(())
}

fn cmd_summary(dataset: &IncidentDataset, format: &str) -> Result<()> {
    let summary = dataset.summary();

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    print_reply(&replies::status_summary(&summary));
    Ok(())
}
