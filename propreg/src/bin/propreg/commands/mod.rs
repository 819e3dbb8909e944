pub mod create;
pub mod init;
pub mod list;
pub mod show;
pub mod suggest;
pub mod update;
pub mod validate;

use anyhow::{Context, Result};
use clap::Args;

use propreg::{Client, ClientError, Field, InputOutcome, PropertyRecord, RecordDraft, RecordForm, RecordStore};

use crate::context::ProjectContext;
use crate::output::{IssueReport, OutputManager, RecordDetail};

/// Everything a command needs besides its own arguments.
pub struct Session {
    pub output: OutputManager,
    pub api_url: Option<String>,
}

impl Session {
    pub fn project(&self) -> Result<ProjectContext> {
        ProjectContext::find()
    }

    /// Builds the HTTP client from `--api-url`, the config file or the default.
    pub fn connect(&self, project: &ProjectContext) -> Result<Client> {
        if project.is_initialized() {
            self.output
                .verbose(&format!("Using config from {}", project.project_root.display()));
        } else {
            self.output.verbose("No .propreg/config.toml found; using defaults");
        }
        let url = project.api_url(self.api_url.as_deref())?;
        self.output.verbose(&format!("Using backend {url}"));
        Client::with_timeout(&url, project.timeout()).with_context(|| format!("Invalid backend URL '{url}'"))
    }
}

/// Per-field overrides shared by `create` and `update`.
#[derive(Args, Debug, Default)]
pub struct FieldArgs {
    /// Property type (House, Land, Building, Flat)
    #[arg(long)]
    pub property_type: Option<String>,
    /// Extent in square yards
    #[arg(long)]
    pub extent: Option<String>,
    #[arg(long)]
    pub address: Option<String>,
    /// Boundary (North, South, East, West)
    #[arg(long)]
    pub boundary: Option<String>,
    /// Current registered owner name
    #[arg(long)]
    pub owner: Option<String>,
    /// Document type (Sale Deed, Gift Deed)
    #[arg(long)]
    pub document_type: Option<String>,
    /// Sale deed type (Absolute, Possession, Irrevocable)
    #[arg(long)]
    pub sale_deed_type: Option<String>,
    #[arg(long)]
    pub document_number: Option<String>,
    #[arg(long)]
    pub year: Option<String>,
    #[arg(long)]
    pub seller: Option<String>,
    /// Registration date (YYYY-MM-DD)
    #[arg(long)]
    pub registration_date: Option<String>,
    #[arg(long)]
    pub registrar_office: Option<String>,
}

impl FieldArgs {
    pub fn values(&self) -> Vec<(Field, &str)> {
        [
            (Field::PropertyType, &self.property_type),
            (Field::ExtentInSqYds, &self.extent),
            (Field::Address, &self.address),
            (Field::Boundary, &self.boundary),
            (Field::CurrentOwnerName, &self.owner),
            (Field::DocumentType, &self.document_type),
            (Field::SaleDeedType, &self.sale_deed_type),
            (Field::DocumentNumber, &self.document_number),
            (Field::YearOfPurchase, &self.year),
            (Field::SellerName, &self.seller),
            (Field::RegistrationDate, &self.registration_date),
            (Field::RegistrarOffice, &self.registrar_office),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.as_deref().map(|v| (field, v)))
        .collect()
    }
}

/// Types a file draft and then the overrides into the form, the way a clerk would.
///
/// Returns how many values the input gate rejected.
pub fn fill_form(form: &mut RecordForm, file: Option<&RecordDraft>, overrides: &FieldArgs, output: &OutputManager) -> usize {
    let mut rejected = 0;
    let from_file = file
        .into_iter()
        .flat_map(|draft| draft.iter())
        .filter(|(_, value)| !value.is_empty());

    for (field, value) in from_file.chain(overrides.values()) {
        match form.input(field, value) {
            InputOutcome::Accepted(committed) => {
                if committed != value {
                    output.warning(&format!("{} trimmed to '{committed}'", field.label()));
                }
            }
            InputOutcome::Rejected => {
                rejected += 1;
                output.warning(&format!("{} rejected '{value}'; keeping '{}'", field.label(), form.value(field)));
            }
        }
        form.blur(field);
    }
    rejected
}

/// Submits the form and reports the outcome.
pub async fn submit_form<S>(form: &mut RecordForm, store: &S, output: &OutputManager) -> Result<PropertyRecord>
where
    S: RecordStore + ?Sized,
{
    output.progress("Submitting");
    let result = form.submit(store).await;
    output.clear_line();

    match result {
        Ok(saved) => {
            if let Some(message) = form.notification() {
                output.success(message);
            }
            output.display(&RecordDetail { record: &saved })?;
            Ok(saved)
        }
        Err(ClientError::Validation(error)) => {
            output.error("The record has validation errors:");
            output.display(&IssueReport::new(form.flow(), error.issues))?;
            anyhow::bail!("Submit blocked by validation errors")
        }
        Err(error) => {
            if let Some(message) = form.notification() {
                output.error(message);
            }
            Err(error).context("Backend request failed")
        }
    }
}
