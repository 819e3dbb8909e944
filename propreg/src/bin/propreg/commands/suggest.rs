use anyhow::{Context, Result};
use clap::Args;

use propreg::RecordTable;

use crate::commands::Session;
use crate::examples::ExampleGroup;
use crate::output::SuggestionList;

pub const EXAMPLES: &[ExampleGroup] = &[ExampleGroup {
    title: "Autocomplete",
    commands: &["propreg suggest gre           # Words from type, address and owner containing 'gre'"],
}];

#[derive(Args, Debug)]
pub struct SuggestArgs {
    /// Partial search text
    pub query: String,
}

pub async fn handle_suggest(args: SuggestArgs, session: &Session) -> Result<()> {
    let project = session.project()?;
    let client = session.connect(&project)?;

    let mut table = RecordTable::new(project.page_size());
    table.refresh(&client).await.context("Failed to fetch records")?;
    table.set_query(args.query);

    session.output.display(&SuggestionList {
        query: table.query(),
        suggestions: table.autocomplete(),
    })
}
