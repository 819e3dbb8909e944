use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, ValueEnum};

use propreg::filters::accepts;
use propreg::{Flow, ValidationIssue, validate_all};

use crate::commands::Session;
use crate::examples::ExampleGroup;
use crate::output::IssueReport;
use crate::utils::load_draft;

pub const EXAMPLES: &[ExampleGroup] = &[ExampleGroup {
    title: "Offline validation",
    commands: &[
        "propreg validate --file record.json              # Check a create payload",
        "propreg validate --file record.toml --flow edit  # Check with edit-form input rules",
    ],
}];

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum FlowArg {
    #[default]
    Create,
    Edit,
}

impl From<FlowArg> for Flow {
    fn from(value: FlowArg) -> Self {
        match value {
            FlowArg::Create => Flow::Create,
            FlowArg::Edit => Flow::Edit,
        }
    }
}

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// JSON or TOML file keyed by either flow's field names
    #[arg(short, long)]
    pub file: PathBuf,

    /// Which form's input rules to apply
    #[arg(long, value_enum, default_value_t = FlowArg::Create)]
    pub flow: FlowArg,
}

pub async fn handle_validate(args: ValidateArgs, session: &Session) -> Result<()> {
    let output = &session.output;
    let flow = Flow::from(args.flow);
    let draft = load_draft(&args.file)?;

    let mut issues: Vec<ValidationIssue> = draft
        .iter()
        .filter(|(field, value)| !accepts(*field, value, flow))
        .map(|(field, value)| {
            ValidationIssue::new(
                field.key(),
                "input.rejected",
                format!("'{value}' would be rejected while typing into {}", field.label()),
            )
        })
        .collect();
    issues.extend(validate_all(&draft).into_validation_error().issues);

    let report = IssueReport::new(flow, issues);
    if report.valid {
        if output.is_json() {
            output.display(&report)?;
        } else {
            output.success(&format!("{} is valid", args.file.display()));
        }
        return Ok(());
    }

    output.display(&report)?;
    anyhow::bail!("{} has {} issue(s)", args.file.display(), report.issues.len())
}
