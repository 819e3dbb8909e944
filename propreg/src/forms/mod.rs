//! Create and edit forms as explicit state.
//!
//! A [`RecordForm`] owns the draft, the inline error map and the submit state.
//! Every user action is a transition on that struct; the only async step is
//! [`RecordForm::submit`], which folds the backend's answer back into the state.

use log::{debug, warn};

use crate::client::RecordStore;
use crate::errors::ClientError;
use crate::filters::{InputOutcome, normalize};
use crate::types::{Field, Flow, PropertyRecord, RecordDraft, RecordId};
use crate::validators::{FieldErrors, validate_all, validate_field_in};

pub const CREATE_SUCCESS_MESSAGE: &str = "Registered Successfully";
pub const CREATE_FAILURE_MESSAGE: &str = "Failed to save data. Please try again later.";
pub const UPDATE_SUCCESS_MESSAGE: &str = "User updated successfully.";
pub const UPDATE_FAILURE_MESSAGE: &str = "Failed to update user. Please try again later.";

/// Where the form is in its submit lifecycle.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SubmitState {
    #[default]
    Idle,
    Pending,
    Succeeded(PropertyRecord),
    Failed(String),
}

impl SubmitState {
    pub fn is_pending(&self) -> bool {
        matches!(self, SubmitState::Pending)
    }
}

/// A validated payload ready for the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub flow: Flow,
    pub id: Option<RecordId>,
    pub record: PropertyRecord,
}

/// User actions a form reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    Input { field: Field, value: String },
    Blur(Field),
    Reset,
    DismissNotification,
}

#[derive(Debug, Clone)]
pub struct RecordForm {
    flow: Flow,
    id: Option<RecordId>,
    original: Option<PropertyRecord>,
    draft: RecordDraft,
    errors: FieldErrors,
    state: SubmitState,
}

impl Default for RecordForm {
    fn default() -> Self {
        Self::create()
    }
}

impl RecordForm {
    /// An empty create form.
    pub fn create() -> Self {
        Self {
            flow: Flow::Create,
            id: None,
            original: None,
            draft: RecordDraft::new(),
            errors: FieldErrors::new(),
            state: SubmitState::Idle,
        }
    }

    /// An edit form pre-filled from a stored record. The record must carry an id.
    pub fn edit(record: &PropertyRecord) -> Result<Self, ClientError> {
        let id = record.id.clone().ok_or_else(|| ClientError::InvalidRequest {
            message: "cannot edit a record without an id".into(),
        })?;
        Ok(Self {
            flow: Flow::Edit,
            id: Some(id),
            original: Some(record.clone()),
            draft: RecordDraft::from_record(record),
            errors: FieldErrors::new(),
            state: SubmitState::Idle,
        })
    }

    pub fn flow(&self) -> Flow {
        self.flow
    }

    pub fn id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }

    pub fn draft(&self) -> &RecordDraft {
        &self.draft
    }

    pub fn value(&self, field: Field) -> &str {
        self.draft.get(field)
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn state(&self) -> &SubmitState {
        &self.state
    }

    /// Offers a new value for a field.
    ///
    /// Rejected values leave the draft untouched. An accepted value that now
    /// validates clean clears that field's error; it never adds one.
    pub fn input(&mut self, field: Field, proposed: &str) -> InputOutcome {
        let outcome = normalize(field, proposed, self.flow);
        match &outcome {
            InputOutcome::Accepted(value) => {
                self.draft.set(field, value.clone());
                if validate_field_in(&self.draft, field).is_empty() {
                    self.errors.remove(field);
                }
                if field == Field::DocumentType && validate_field_in(&self.draft, Field::SaleDeedType).is_empty() {
                    self.errors.remove(Field::SaleDeedType);
                }
            }
            InputOutcome::Rejected => debug!("rejected input for {field}"),
        }
        outcome
    }

    /// Validates a field as it loses focus and records or clears its error.
    pub fn blur(&mut self, field: Field) {
        let errors = validate_field_in(&self.draft, field);
        if errors.is_empty() {
            self.errors.remove(field);
        } else {
            self.errors.merge(errors);
        }
    }

    /// True when the whole draft validates clean.
    pub fn is_valid(&self) -> bool {
        validate_all(&self.draft).is_empty()
    }

    pub fn apply(&mut self, event: FormEvent) {
        match event {
            FormEvent::Input { field, value } => {
                self.input(field, &value);
            }
            FormEvent::Blur(field) => self.blur(field),
            FormEvent::Reset => self.reset(),
            FormEvent::DismissNotification => self.dismiss_notification(),
        }
    }

    /// Validates everything and, if clean, moves to `Pending` and hands out the payload.
    ///
    /// On validation failure every field's error is shown and the state stays as it was.
    pub fn prepare_submit(&mut self) -> Result<Submission, ClientError> {
        if self.state.is_pending() {
            return Err(ClientError::InvalidRequest {
                message: "a submit is already in progress".into(),
            });
        }

        let errors = validate_all(&self.draft);
        if !errors.is_empty() {
            debug!("submit blocked by {} field error(s)", errors.len());
            self.errors = errors.clone();
            return Err(errors.into_validation_error().into());
        }

        let mut record = self.draft.to_record()?;
        record.id = self.id.clone();
        self.state = SubmitState::Pending;
        Ok(Submission {
            flow: self.flow,
            id: self.id.clone(),
            record,
        })
    }

    /// Folds a successful backend answer into the form.
    ///
    /// A create form starts over empty; an edit form shows what was saved.
    fn complete(&mut self, saved: PropertyRecord) {
        self.errors = FieldErrors::new();
        match self.flow {
            Flow::Create => self.draft = RecordDraft::new(),
            Flow::Edit => {
                self.draft = RecordDraft::from_record(&saved);
                self.original = Some(saved.clone());
            }
        }
        self.state = SubmitState::Succeeded(saved);
    }

    /// Records a failed submit. The draft is kept so the clerk can retry.
    fn fail(&mut self, error: &ClientError) {
        warn!("submit failed: {error}");
        self.state = SubmitState::Failed(self.failure_message().to_string());
    }

    /// Folds the backend's answer into the form and hands it back.
    pub fn finish_submit(&mut self, result: Result<PropertyRecord, ClientError>) -> Result<PropertyRecord, ClientError> {
        match result {
            Ok(saved) => {
                self.complete(saved.clone());
                Ok(saved)
            }
            Err(error) => {
                self.fail(&error);
                Err(error)
            }
        }
    }

    /// Runs the whole submit against a store.
    pub async fn submit<S>(&mut self, store: &S) -> Result<PropertyRecord, ClientError>
    where
        S: RecordStore + ?Sized,
    {
        let submission = self.prepare_submit()?;
        let result = match (&submission.flow, &submission.id) {
            (Flow::Edit, Some(id)) => store.update(id, &submission.record).await,
            _ => store.create(&submission.record).await,
        };
        self.finish_submit(result)
    }

    /// Clears the draft (create) or restores the stored values (edit).
    pub fn reset(&mut self) {
        self.draft = match &self.original {
            Some(record) => RecordDraft::from_record(record),
            None => RecordDraft::new(),
        };
        self.errors = FieldErrors::new();
        if !self.state.is_pending() {
            self.state = SubmitState::Idle;
        }
    }

    pub fn dismiss_notification(&mut self) {
        if matches!(self.state, SubmitState::Succeeded(_) | SubmitState::Failed(_)) {
            self.state = SubmitState::Idle;
        }
    }

    /// The transient notification to show for the current state.
    pub fn notification(&self) -> Option<&str> {
        match &self.state {
            SubmitState::Succeeded(_) => Some(self.success_message()),
            SubmitState::Failed(message) => Some(message),
            SubmitState::Idle | SubmitState::Pending => None,
        }
    }

    fn success_message(&self) -> &'static str {
        match self.flow {
            Flow::Create => CREATE_SUCCESS_MESSAGE,
            Flow::Edit => UPDATE_SUCCESS_MESSAGE,
        }
    }

    fn failure_message(&self) -> &'static str {
        match self.flow {
            Flow::Create => CREATE_FAILURE_MESSAGE,
            Flow::Edit => UPDATE_FAILURE_MESSAGE,
        }
    }
}
