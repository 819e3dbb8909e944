use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use propreg::RecordForm;

use crate::commands::{FieldArgs, Session, fill_form, submit_form};
use crate::examples::ExampleGroup;
use crate::utils::load_draft;

pub const EXAMPLES: &[ExampleGroup] = &[
    ExampleGroup {
        title: "From a file",
        commands: &["propreg create --file record.json"],
    },
    ExampleGroup {
        title: "From flags",
        commands: &[
            "propreg create --property-type House --extent 240 --address \"12 Park Lane\" \\",
            "    --boundary North --owner \"Asha Rao\" --document-type \"Gift Deed\" \\",
            "    --document-number DN-1 --year 2019 --seller \"Ravi Kumar\" \\",
            "    --registration-date 2019-04-02 --registrar-office Hyderabad",
        ],
    },
];

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// JSON or TOML file with field values; flags override it
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    #[command(flatten)]
    pub fields: FieldArgs,
}

pub async fn handle_create(args: CreateArgs, session: &Session) -> Result<()> {
    let output = &session.output;
    let file_draft = args.file.as_deref().map(load_draft).transpose()?;

    let mut form = RecordForm::create();
    let rejected = fill_form(&mut form, file_draft.as_ref(), &args.fields, output);
    if rejected > 0 {
        output.verbose(&format!("{rejected} value(s) rejected by the input rules"));
    }

    let project = session.project()?;
    let client = session.connect(&project)?;
    output.heading("Register property");
    submit_form(&mut form, &client, output).await?;
    Ok(())
}
