use anyhow::{Context, Result};
use clap::Args;

use propreg::RecordTable;

use crate::commands::Session;
use crate::examples::ExampleGroup;
use crate::output::RecordListView;

pub const EXAMPLES: &[ExampleGroup] = &[
    ExampleGroup {
        title: "Browse",
        commands: &[
            "propreg list                         # First page of all records",
            "propreg list --page 2 --page-size 10",
        ],
    },
    ExampleGroup {
        title: "Search",
        commands: &[
            "propreg list --search \"park lane\"    # Records with 'park lane' in any field",
            "propreg list --search gre --suggest  # Also show autocomplete candidates",
        ],
    },
];

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Case-insensitive text matched against every searchable field
    #[arg(short, long)]
    pub search: Option<String>,

    /// Page to show, starting at 1
    #[arg(short, long, default_value_t = 1)]
    pub page: usize,

    /// Rows per page (defaults to the configured page size)
    #[arg(long)]
    pub page_size: Option<usize>,

    /// Include autocomplete candidates for the search text
    #[arg(long)]
    pub suggest: bool,
}

pub async fn handle_list(args: ListArgs, session: &Session) -> Result<()> {
    let output = &session.output;
    let project = session.project()?;
    let client = session.connect(&project)?;

    let mut table = RecordTable::new(args.page_size.unwrap_or_else(|| project.page_size()));
    output.progress("Fetching records");
    let fetched = table.refresh(&client).await.context("Failed to fetch records");
    output.clear_line();
    let count = fetched?;
    output.verbose(&format!("Fetched {count} records"));

    if let Some(query) = args.search {
        table.set_query(query);
    }
    let requested = args.page.saturating_sub(1);
    let landed = table.go_to_page(requested);
    if landed != requested {
        output.warning(&format!("Page {} is past the end; showing page {}", args.page, landed + 1));
    }

    let page = table.current_page();
    let footer = format!(
        "Page {} of {} ({} matching, {} total)",
        page.page + 1,
        page.page_count(),
        page.total,
        table.records().len()
    );
    let view = RecordListView {
        query: table.query(),
        page,
        message: table.message(),
        suggestions: if args.suggest { table.autocomplete() } else { Vec::new() },
    };
    output.display(&view)?;

    if table.message().is_none() {
        output.info(&footer);
    }
    if args.suggest && !view.suggestions.is_empty() {
        output.heading("Suggestions");
        for suggestion in &view.suggestions {
            output.bullet(suggestion);
        }
    }
    Ok(())
}
