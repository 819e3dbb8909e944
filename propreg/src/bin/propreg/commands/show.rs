use anyhow::{Context, Result};
use clap::Args;

use propreg::{RecordId, RecordStore};

use crate::commands::Session;
use crate::examples::ExampleGroup;
use crate::output::RecordDetail;

pub const EXAMPLES: &[ExampleGroup] = &[ExampleGroup {
    title: "Show",
    commands: &[
        "propreg show 12              # Show record 12",
        "propreg --output json show 12",
    ],
}];

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Record id
    pub id: String,
}

pub async fn handle_show(args: ShowArgs, session: &Session) -> Result<()> {
    let project = session.project()?;
    let client = session.connect(&project)?;
    let id = RecordId::new(args.id);

    let record = client
        .get(&id)
        .await
        .with_context(|| format!("Failed to load record {id}"))?;

    session.output.heading(&format!("Property {id}"));
    session.output.display(&RecordDetail { record: &record })
}
