use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use propreg::{RecordForm, RecordId, RecordStore};

use crate::commands::{FieldArgs, Session, fill_form, submit_form};
use crate::examples::ExampleGroup;
use crate::utils::load_draft;

pub const EXAMPLES: &[ExampleGroup] = &[ExampleGroup {
    title: "Edit a record",
    commands: &[
        "propreg update 12 --seller \"Ravi Kumar\"          # Change one field",
        "propreg update 12 --file changes.toml             # Apply several fields from a file",
    ],
}];

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Record id
    pub id: String,

    /// JSON or TOML file with field values; flags override it
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    #[command(flatten)]
    pub fields: FieldArgs,
}

pub async fn handle_update(args: UpdateArgs, session: &Session) -> Result<()> {
    let output = &session.output;
    let file_draft = args.file.as_deref().map(load_draft).transpose()?;

    let project = session.project()?;
    let client = session.connect(&project)?;
    let id = RecordId::new(args.id);

    output.progress("Loading record");
    let loaded = client.get(&id).await;
    output.clear_line();
    let record = loaded.with_context(|| format!("Failed to load record {id}"))?;

    let mut form = RecordForm::edit(&record)?;
    let rejected = fill_form(&mut form, file_draft.as_ref(), &args.fields, output);
    if rejected > 0 {
        output.verbose(&format!("{rejected} value(s) rejected by the input rules"));
    }

    output.heading(&format!("Update property {id}"));
    submit_form(&mut form, &client, output).await?;
    Ok(())
}
