use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use comfy_table::{Attribute, Cell, Color as TableColor, Table};
use serde::Serialize;
use std::io::Write;

use propreg::search::Page;
use propreg::{Field, Flow, PropertyRecord, ValidationIssue};

use crate::theme::Tone;

/// Output format options for CLI commands
#[derive(Clone, Debug, ValueEnum, Default, PartialEq)]
pub enum OutputFormat {
    /// Formatted table output (default)
    #[default]
    Table,
    /// JSON output for scripting
    Json,
    /// Compact single-line output
    Compact,
}

/// Global CLI options that affect output and behavior
#[derive(Clone, Debug, Default)]
pub struct GlobalOptions {
    pub output_format: OutputFormat,
    pub quiet: bool,
    pub verbose: bool,
    pub no_color: bool,
}

/// Trait for data that can be displayed as a table
pub trait TableDisplay {
    fn to_table(&self, options: &GlobalOptions) -> Table;
    fn to_compact(&self) -> String;
}

/// Output manager handles formatting and display
pub struct OutputManager {
    pub options: GlobalOptions,
}

impl OutputManager {
    pub fn new(options: GlobalOptions) -> Self {
        Self { options }
    }

    pub fn is_json(&self) -> bool {
        self.options.output_format == OutputFormat::Json
    }

    /// Display data according to the configured output format
    pub fn display<T>(&self, data: &T) -> Result<()>
    where
        T: Serialize + TableDisplay,
    {
        if self.options.quiet {
            return Ok(());
        }

        match self.options.output_format {
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(data)?;
                println!("{json}");
            }
            OutputFormat::Table => {
                let table = data.to_table(&self.options);
                println!("{table}");
            }
            OutputFormat::Compact => {
                println!("{}", data.to_compact());
            }
        }
        Ok(())
    }

    fn plain(&self) -> bool {
        self.options.no_color
    }

    /// Confirms a saved record or written file.
    pub fn success(&self, message: &str) {
        if !self.options.quiet {
            println!("{}", Tone::Saved.line(message, self.plain()));
        }
    }

    /// Errors print even under `--quiet`.
    pub fn error(&self, message: &str) {
        eprintln!("{}", Tone::Failed.line(message, self.plain()));
    }

    pub fn warning(&self, message: &str) {
        if !self.options.quiet {
            eprintln!("{}", Tone::Warning.line(message, self.plain()));
        }
    }

    /// Only shown with `--verbose`.
    pub fn verbose(&self, message: &str) {
        if self.options.verbose && !self.options.quiet {
            eprintln!("{}", Tone::Detail.line(message, self.plain()));
        }
    }

    pub fn info(&self, message: &str) {
        if !self.options.quiet && !self.is_json() {
            println!("{}", Tone::Note.line(message, self.plain()));
        }
    }

    pub fn heading(&self, text: &str) {
        if self.options.quiet || self.is_json() {
            return;
        }
        if self.plain() {
            println!("\n{text}\n{}", "=".repeat(text.chars().count()));
        } else {
            println!("\n{}", Tone::Heading.paint(text));
        }
    }

    pub fn key_value(&self, key: &str, value: &str) {
        if self.options.quiet || self.is_json() {
            return;
        }
        if self.plain() {
            println!("{key}: {value}");
        } else {
            println!("{}: {value}", Tone::Key.paint(key));
        }
    }

    pub fn bullet(&self, text: &str) {
        if !self.options.quiet && !self.is_json() {
            let marker = if self.plain() { "•".normal() } else { Tone::Detail.paint("•") };
            println!("  {marker} {text}");
        }
    }

    /// Single-line spinner text, overwritten by `clear_line`.
    pub fn progress(&self, message: &str) {
        if self.options.quiet || self.is_json() {
            return;
        }
        print!("\r{}...", Tone::Pending.line(message, self.plain()));
        std::io::stdout().flush().ok();
    }

    /// Clear the current line (useful after progress indicators)
    pub fn clear_line(&self) {
        if self.options.quiet || self.is_json() {
            return;
        }

        print!("\r{}", " ".repeat(80));
        print!("\r");
        std::io::stdout().flush().ok();
    }
}

fn themed_table(options: &GlobalOptions) -> Table {
    let mut table = Table::new();
    if options.no_color {
        table.load_preset(comfy_table::presets::ASCII_FULL);
    } else {
        table.load_preset(comfy_table::presets::UTF8_FULL_CONDENSED);
    }
    table
}

fn header_cells(options: &GlobalOptions, headers: &[&str]) -> Vec<Cell> {
    headers
        .iter()
        .map(|h| {
            let cell = Cell::new(h).add_attribute(Attribute::Bold);
            if options.no_color { cell } else { cell.fg(TableColor::Cyan) }
        })
        .collect()
}

/// Columns shown in the record list, in order.
const LIST_COLUMNS: &[Field] = &[
    Field::PropertyType,
    Field::ExtentInSqYds,
    Field::Address,
    Field::Boundary,
    Field::CurrentOwnerName,
    Field::DocumentType,
    Field::DocumentNumber,
    Field::YearOfPurchase,
    Field::SellerName,
    Field::RegistrationDate,
    Field::RegistrarOffice,
];

// ═══════════════════════════════════════════════════════════════════════════════
// Views
// ═══════════════════════════════════════════════════════════════════════════════

/// One page of the record table plus search context.
#[derive(Serialize)]
pub struct RecordListView<'a> {
    pub query: &'a str,
    #[serde(flatten)]
    pub page: Page<&'a PropertyRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<&'a str>,
}

impl TableDisplay for RecordListView<'_> {
    fn to_table(&self, options: &GlobalOptions) -> Table {
        let mut table = themed_table(options);
        let mut headers = vec!["ID"];
        headers.extend(LIST_COLUMNS.iter().map(|field| field.label()));
        table.set_header(header_cells(options, &headers));

        if let Some(message) = self.message {
            table.add_row(vec![Cell::new(message)]);
            return table;
        }

        for record in &self.page.items {
            let mut row = vec![Cell::new(record.id.as_ref().map(|id| id.as_str()).unwrap_or("-"))];
            row.extend(LIST_COLUMNS.iter().map(|field| Cell::new(record.field_text(*field))));
            table.add_row(row);
        }
        table
    }

    fn to_compact(&self) -> String {
        if let Some(message) = self.message {
            return message.to_string();
        }
        format!(
            "page {}/{}: {} of {} records",
            self.page.page + 1,
            self.page.page_count(),
            self.page.items.len(),
            self.page.total
        )
    }
}

/// A single record as field/value rows.
#[derive(Serialize)]
#[serde(transparent)]
pub struct RecordDetail<'a> {
    pub record: &'a PropertyRecord,
}

impl TableDisplay for RecordDetail<'_> {
    fn to_table(&self, options: &GlobalOptions) -> Table {
        let mut table = themed_table(options);
        table.set_header(header_cells(options, &["Field", "Value"]));
        if let Some(id) = &self.record.id {
            table.add_row(vec![Cell::new("ID"), Cell::new(id.as_str())]);
        }
        for field in Field::ALL {
            let text = self.record.field_text(field);
            if field == Field::SaleDeedType && text.is_empty() {
                continue;
            }
            table.add_row(vec![Cell::new(field.label()), Cell::new(text)]);
        }
        table
    }

    fn to_compact(&self) -> String {
        format!(
            "{} {} {} ({})",
            self.record.id.as_ref().map(|id| id.as_str()).unwrap_or("-"),
            self.record.property_type,
            self.record.address,
            self.record.current_owner_name
        )
    }
}

/// Validation issues found in a draft.
#[derive(Serialize)]
pub struct IssueReport {
    pub flow: Flow,
    pub valid: bool,
    pub issues: Vec<ValidationIssue>,
}

impl IssueReport {
    pub fn new(flow: Flow, issues: Vec<ValidationIssue>) -> Self {
        Self {
            flow,
            valid: issues.is_empty(),
            issues,
        }
    }
}

impl TableDisplay for IssueReport {
    fn to_table(&self, options: &GlobalOptions) -> Table {
        let mut table = themed_table(options);
        table.set_header(header_cells(options, &["Field", "Code", "Message"]));
        for issue in &self.issues {
            let message = if options.no_color {
                Cell::new(&issue.message)
            } else {
                Cell::new(&issue.message).fg(TableColor::Red)
            };
            table.add_row(vec![Cell::new(&issue.field), Cell::new(&issue.code), message]);
        }
        table
    }

    fn to_compact(&self) -> String {
        if self.valid {
            "valid".to_string()
        } else {
            self.issues
                .iter()
                .map(|issue| format!("{}: {}", issue.field, issue.message))
                .collect::<Vec<_>>()
                .join("; ")
        }
    }
}

/// Autocomplete candidates for a query.
#[derive(Serialize)]
pub struct SuggestionList<'a> {
    pub query: &'a str,
    pub suggestions: Vec<&'a str>,
}

impl TableDisplay for SuggestionList<'_> {
    fn to_table(&self, options: &GlobalOptions) -> Table {
        let mut table = themed_table(options);
        table.set_header(header_cells(options, &["Suggestion"]));
        if self.suggestions.is_empty() {
            table.add_row(vec![Cell::new("No suggestions")]);
        }
        for suggestion in &self.suggestions {
            table.add_row(vec![Cell::new(suggestion)]);
        }
        table
    }

    fn to_compact(&self) -> String {
        self.suggestions.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use propreg::search::Pager;
    use propreg::{Boundary, DocumentType, PropertyType, RecordId};

    fn sample() -> PropertyRecord {
        PropertyRecord {
            id: Some(RecordId::from(7)),
            property_type: PropertyType::Building,
            extent_in_sq_yds: "300".into(),
            address: "MG Road".into(),
            boundary: Boundary::West,
            current_owner_name: "Latha".into(),
            document_type: DocumentType::GiftDeed,
            sale_deed_type: None,
            document_number: "G-9".into(),
            year_of_purchase: "2001".into(),
            seller_name: "Prakash".into(),
            registration_date: chrono::NaiveDate::from_ymd_opt(2001, 8, 1).unwrap(),
            registrar_office: "Kadapa".into(),
        }
    }

    #[test]
    fn test_list_view_compact_and_json() {
        let records = vec![sample()];
        let view = RecordListView {
            query: "",
            page: Pager::default().paginate(&records),
            message: None,
            suggestions: Vec::new(),
        };
        assert_eq!(view.to_compact(), "page 1/1: 1 of 1 records");

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["total"], 1);
        assert_eq!(json["items"][0]["address"], "MG Road");
        assert!(json.get("message").is_none());
    }

    #[test]
    fn test_no_results_view() {
        let records: Vec<PropertyRecord> = Vec::new();
        let view = RecordListView {
            query: "zzz",
            page: Pager::default().paginate(&records),
            message: Some(propreg::search::NO_RESULTS_MESSAGE),
            suggestions: Vec::new(),
        };
        assert_eq!(view.to_compact(), propreg::search::NO_RESULTS_MESSAGE);
        let rendered = view.to_table(&GlobalOptions::default()).to_string();
        assert!(rendered.contains("No properties found"));
    }

    #[test]
    fn test_issue_report_compact() {
        let report = IssueReport::new(
            Flow::Create,
            vec![ValidationIssue::new("sellerName", "validation.required", "SELLER NAME is required")],
        );
        assert!(!report.valid);
        assert_eq!(report.to_compact(), "sellerName: SELLER NAME is required");
        assert_eq!(IssueReport::new(Flow::Edit, Vec::new()).to_compact(), "valid");
    }

    #[test]
    fn test_output_manager_quiet() {
        let options = GlobalOptions {
            quiet: true,
            ..Default::default()
        };
        let manager = OutputManager::new(options);
        let record = sample();
        assert!(manager.display(&RecordDetail { record: &record }).is_ok());
    }
}
