//! Property registration records: validation, input gating, search and paging
//! over a REST backend.
//!
//! The crate is organised bottom-up:
//! - `types` - field schema, choice enums, `PropertyRecord` and `RecordDraft`
//! - `validators` - per-field rules producing `FieldErrors`
//! - `filters` - keystroke-level input gating
//! - `search` - client-side filter, suggestion vocabulary and pagination
//! - `forms` / `table` - state machines driven by user events
//! - `client` - the `RecordStore` seam and its HTTP implementation

pub mod client;
pub mod errors;
pub mod filters;
pub mod forms;
pub mod search;
pub mod table;
pub mod types;
pub mod validators;

pub use client::{Client, RecordStore};
pub use errors::*;
pub use filters::{InputOutcome, normalize};
pub use forms::{FormEvent, RecordForm, SubmitState, Submission};
pub use search::{Page, Pager, SearchOutcome};
pub use table::{RecordTable, TableEvent};
pub use types::{
    Boundary, DocumentType, Field, FieldKind, Flow, PropertyRecord, PropertyType, RecordDraft, RecordId, SaleDeedType,
};
pub use validators::{FieldErrors, validate, validate_all, validate_field_in, validate_key};
