//! Terminal output for menus, page documents and reports
//!
//! Colors honour NO_COLOR, CLICOLOR and CLICOLOR_FORCE through `colored`.

use std::fmt::Display;
use std::path::Path;

use colored::Colorize;

use crate::application::services::MigrationReport;
use crate::domain::{MenuNode, NodeId, SchemaViolation};

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Print warning (yellow "warning:" prefix) to stderr
pub fn warning(msg: &(impl Display + ?Sized)) {
    eprintln!("{}: {}", "warning".yellow(), msg);
}

/// Print a schema violation below an error line, on stderr.
pub fn violation(v: &SchemaViolation) {
    eprintln!("  {} {}", "violation".red(), violation_line(v));
}

/// Print data as is (trees, JSON documents, TOML)
pub fn data(msg: &(impl Display + ?Sized)) {
    println!("{}", msg);
}

/// Print a completed write, e.g. `Added: [3] Profil -> page 4`
pub fn done(verb: &str, msg: &(impl Display + ?Sized)) {
    println!("{}: {}", verb.green(), msg);
}

/// Print a document that passed validation.
pub fn valid(what: &(impl Display + ?Sized)) {
    println!("{} {} is valid", "✓".green(), what);
}

pub fn node_details(node: &MenuNode) {
    println!("{}", node);
    if let Some(parent) = node.parent {
        println!("  parent: {parent}");
    }
    println!("  order:  {}", node.order);
}

pub fn removed_nodes(ids: &[NodeId]) {
    done("Removed", &format!("{} node(s)", ids.len()));
    for id in ids {
        println!("  {} {}", "-".red(), id);
    }
}

pub fn migration(report: &MigrationReport) {
    for page in &report.changed {
        println!("  {} page {}", "~".yellow(), page);
    }
    println!("{} {}", "✓".green(), migration_summary(report));
}

/// Print a config file location, marked by whether it exists.
pub fn config_path(label: &str, path: &Path) {
    if path.exists() {
        println!("  {} {label}: {}", "✓".green(), path.display());
    } else {
        println!("  {} {label}: {} (missing)", "✗".red(), path.display());
    }
}

fn violation_line(v: &SchemaViolation) -> String {
    match &v.actual_value {
        Some(actual) => format!(
            "{} {}: expected {}, found {}",
            v.path, v.field, v.expected_type, actual
        ),
        None => format!("{} {}: missing ({})", v.path, v.field, v.expected_type),
    }
}

fn migration_summary(report: &MigrationReport) -> String {
    let verb = if report.dry_run { "would change" } else { "changed" };
    format!(
        "{} page(s) scanned, {} {}",
        report.scanned,
        report.changed.len(),
        verb
    )
}
