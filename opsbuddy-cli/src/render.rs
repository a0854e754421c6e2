use colored::{ColoredString, Colorize};
use opsbuddy_core::{Message, Reply, Role, Severity};

pub fn severity_color(text: &str, severity: Severity) -> ColoredString {
    match severity {
        Severity::Info => text.blue(),
        Severity::Warning => text.yellow(),
        Severity::Critical => text.red(),
        Severity::Resolved => text.green(),
    }
}

pub fn severity_marker(severity: Severity) -> ColoredString {
    match severity {
        Severity::Info => "●".blue(),
        Severity::Warning => "▲".yellow(),
        Severity::Critical => "✗".red().bold(),
        Severity::Resolved => "✓".green(),
    }
}

pub fn print_reply(reply: &Reply) {
    println!(
        "{} {}",
        severity_marker(reply.severity),
        severity_color(&reply.content, reply.severity)
    );
}

pub fn print_message(message: &Message, time_format: &str) {
    let time = message.timestamp().format(time_format).to_string();

    match message.role() {
        Role::User => {
            println!("{} {}", time.dimmed(), "You".bold());
            println!("  {}", message.content());
        }
        Role::Bot => {
            let severity = message.severity().unwrap_or_default();
            println!(
                "{} {} {}",
                time.dimmed(),
                "OpsBuddy".cyan().bold(),
                severity_marker(severity)
            );
            for line in message.content().lines() {
                println!("  {}", severity_color(line, severity));
            }
        }
    }
    println!();
}

pub fn priority_color(priority: &str) -> comfy_table::Color {
    match priority {
        "1-Critical" => comfy_table::Color::Red,
        "2-High" => comfy_table::Color::Yellow,
        _ => comfy_table::Color::Reset,
    }
}

pub fn status_color(status: &str) -> comfy_table::Color {
    match status {
        "Resolved" | "Closed" => comfy_table::Color::Green,
        "On Hold" => comfy_table::Color::DarkGrey,
        _ => comfy_table::Color::Yellow,
    }
}
