//! Field-level validation for property record drafts.
//!
//! `validate` checks one field in isolation and yields zero or one issue keyed by
//! that field. `validate_all` runs every field plus the sale-deed dependency and
//! unions the results; a draft may be submitted only when it comes back empty.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::{ValidationError, ValidationIssue};
use crate::types::{Boundary, DocumentType, Field, FieldKind, PropertyType, RecordDraft, SaleDeedType, parse_date};

static NUMERIC_WITH_SYMBOLS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9.,/!@#$%^&*()_+]+$").expect("extent pattern is valid"));
static LETTERS_AND_SPACES: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z\s]*$").expect("name pattern is valid"));
static DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]*$").expect("digit pattern is valid"));

pub const EXTENT_PATTERN_MESSAGE: &str =
    "Extent in Sq. Yds should contain only numbers and allowed special characters";

/// Returns `true` if the value is made only of digits and the extent symbol set.
/// The empty string does not match.
pub fn is_numeric_with_symbols(value: &str) -> bool {
    NUMERIC_WITH_SYMBOLS.is_match(value)
}

/// Returns `true` if the value holds only ASCII letters and whitespace (empty matches).
pub fn is_letters_and_spaces(value: &str) -> bool {
    LETTERS_AND_SPACES.is_match(value)
}

/// Returns `true` if the value holds only ASCII digits (empty matches).
pub fn is_digits(value: &str) -> bool {
    DIGITS.is_match(value)
}

/// Human form of a field key: split before each capital, then uppercased.
///
/// `propertyAddress` becomes `PROPERTY ADDRESS`.
pub fn shout_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for ch in key.chars() {
        if ch.is_ascii_uppercase() {
            out.push(' ');
        }
        out.push(ch.to_ascii_uppercase());
    }
    out
}

/// Field errors keyed by field. Inserting a second issue for a field replaces the first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    issues: BTreeMap<Field, ValidationIssue>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    fn single(field: Field, code: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.insert(field, ValidationIssue::new(field.key(), code, message));
        errors
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn contains(&self, field: Field) -> bool {
        self.issues.contains_key(&field)
    }

    pub fn get(&self, field: Field) -> Option<&ValidationIssue> {
        self.issues.get(&field)
    }

    /// Message shown inline next to the field, if any.
    pub fn message(&self, field: Field) -> Option<&str> {
        self.issues.get(&field).map(|issue| issue.message.as_str())
    }

    pub fn insert(&mut self, field: Field, issue: ValidationIssue) {
        self.issues.insert(field, issue);
    }

    pub fn remove(&mut self, field: Field) -> Option<ValidationIssue> {
        self.issues.remove(&field)
    }

    /// Unions `other` into `self`, last writer wins per field.
    pub fn merge(&mut self, other: FieldErrors) {
        self.issues.extend(other.issues);
    }

    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.issues.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &ValidationIssue)> {
        self.issues.iter().map(|(field, issue)| (*field, issue))
    }

    pub fn into_validation_error(self) -> ValidationError {
        ValidationError::new(self.issues.into_values())
    }
}

/// Validates one field in isolation.
pub fn validate(field: Field, value: &str) -> FieldErrors {
    let trimmed = value.trim();

    match field {
        Field::YearOfPurchase => {
            if trimmed.is_empty() {
                FieldErrors::single(field, "validation.required", "Year of Purchase is required")
            } else if !is_digits(value) {
                FieldErrors::single(field, "validation.numeric", "Year of Purchase should be numeric")
            } else {
                FieldErrors::new()
            }
        }
        Field::RegistrationDate => {
            if trimmed.is_empty() {
                FieldErrors::single(field, "validation.required", "Registration Date is required")
            } else if parse_date(trimmed).is_none() {
                FieldErrors::single(
                    field,
                    "validation.date",
                    "Registration Date must be a valid date (YYYY-MM-DD)",
                )
            } else {
                FieldErrors::new()
            }
        }
        // Required-ness depends on the document type; see `validate_field_in`.
        Field::SaleDeedType => {
            if trimmed.is_empty() {
                FieldErrors::new()
            } else {
                check_choice(field, trimmed)
            }
        }
        _ => {
            if trimmed.is_empty() {
                return FieldErrors::single(field, "validation.required", required_message(field));
            }
            match field.kind() {
                FieldKind::NumericWithSymbols if !is_numeric_with_symbols(value) => {
                    FieldErrors::single(field, "validation.regex", EXTENT_PATTERN_MESSAGE)
                }
                FieldKind::Letters if !is_letters_and_spaces(value) => FieldErrors::single(
                    field,
                    "validation.regex",
                    format!("{} should only contain letters and spaces", shout_key(field.key())),
                ),
                FieldKind::Choice => check_choice(field, trimmed),
                _ => FieldErrors::new(),
            }
        }
    }
}

/// Validates a field by wire key from either flow. Unknown keys have no rules.
pub fn validate_key(key: &str, value: &str) -> FieldErrors {
    match Field::from_key(key) {
        Some(field) => validate(field, value),
        None => FieldErrors::new(),
    }
}

/// Validates one field with access to the rest of the draft, so dependent rules apply.
pub fn validate_field_in(draft: &RecordDraft, field: Field) -> FieldErrors {
    match field {
        Field::SaleDeedType => validate_sale_deed_type(draft.get(Field::DocumentType), draft.get(Field::SaleDeedType)),
        other => validate(other, draft.get(other)),
    }
}

/// Validates every field of the draft.
pub fn validate_all(draft: &RecordDraft) -> FieldErrors {
    let mut errors = FieldErrors::new();
    for field in Field::ALL {
        errors.merge(validate_field_in(draft, field));
    }
    errors
}

/// Sale deed type is required for a sale deed and ignored for anything else.
pub fn validate_sale_deed_type(document_type: &str, sale_deed_type: &str) -> FieldErrors {
    if DocumentType::parse_label(document_type) != Some(DocumentType::SaleDeed) {
        return FieldErrors::new();
    }
    if sale_deed_type.trim().is_empty() {
        return FieldErrors::single(
            Field::SaleDeedType,
            "validation.required_if",
            format!("{} is required for a Sale Deed", shout_key(Field::SaleDeedType.key())),
        );
    }
    check_choice(Field::SaleDeedType, sale_deed_type)
}

fn required_message(field: Field) -> String {
    format!("{} is required", shout_key(field.key()))
}

fn check_choice(field: Field, value: &str) -> FieldErrors {
    let known = match field {
        Field::PropertyType => PropertyType::parse_label(value).is_some(),
        Field::Boundary => Boundary::parse_label(value).is_some(),
        Field::DocumentType => DocumentType::parse_label(value).is_some(),
        Field::SaleDeedType => SaleDeedType::parse_label(value).is_some(),
        _ => true,
    };
    if known {
        FieldErrors::new()
    } else {
        FieldErrors::single(
            field,
            "validation.enum",
            format!("{} must be one of: {}", shout_key(field.key()), field.choices().join(", ")),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shout_key_splits_on_capitals() {
        assert_eq!(shout_key("propertyAddress"), "PROPERTY ADDRESS");
        assert_eq!(shout_key("extentInSqYds"), "EXTENT IN SQ YDS");
        assert_eq!(shout_key("boundary"), "BOUNDARY");
    }

    #[test]
    fn pattern_helpers() {
        assert!(is_numeric_with_symbols("1,200.50/2"));
        assert!(is_numeric_with_symbols("#12*"));
        assert!(!is_numeric_with_symbols(""));
        assert!(!is_numeric_with_symbols("12a"));
        assert!(is_letters_and_spaces("Asha Rao"));
        assert!(is_letters_and_spaces(""));
        assert!(!is_letters_and_spaces("R2D2"));
        assert!(is_digits("2024"));
        assert!(!is_digits("20 24"));
    }

    #[test]
    fn required_message_uses_shouted_key() {
        let errors = validate(Field::Address, "  ");
        assert_eq!(errors.message(Field::Address), Some("PROPERTY ADDRESS is required"));
        let errors = validate(Field::CurrentOwnerName, "");
        assert_eq!(
            errors.message(Field::CurrentOwnerName),
            Some("CURRENT REGISTERED OWNER NAME is required")
        );
    }

    #[test]
    fn extent_pattern_applies_after_required() {
        assert_eq!(validate(Field::ExtentInSqYds, "").get(Field::ExtentInSqYds).unwrap().code, "validation.required");
        assert_eq!(validate(Field::ExtentInSqYds, "12 yds").message(Field::ExtentInSqYds), Some(EXTENT_PATTERN_MESSAGE));
        assert!(validate(Field::ExtentInSqYds, "240.5").is_empty());
    }

    #[test]
    fn names_must_be_letters() {
        let errors = validate(Field::SellerName, "Ravi 2");
        assert_eq!(errors.message(Field::SellerName), Some("SELLER NAME should only contain letters and spaces"));
        assert!(validate(Field::SellerName, "Ravi Kumar").is_empty());
    }

    #[test]
    fn choice_fields_reject_unknown_labels() {
        assert_eq!(validate(Field::Boundary, "Up").get(Field::Boundary).unwrap().code, "validation.enum");
        assert!(validate(Field::Boundary, "west").is_empty());
    }

    #[test]
    fn unknown_keys_have_no_rules() {
        assert!(validate_key("colour", "").is_empty());
        assert!(!validate_key("address", "").is_empty());
    }

    #[test]
    fn sale_deed_dependency() {
        assert!(validate_sale_deed_type("Gift Deed", "").is_empty());
        assert_eq!(
            validate_sale_deed_type("Sale Deed", "").get(Field::SaleDeedType).unwrap().code,
            "validation.required_if"
        );
        assert!(validate_sale_deed_type("Sale Deed", "Possession").is_empty());
        assert_eq!(
            validate_sale_deed_type("Sale Deed", "Lease").get(Field::SaleDeedType).unwrap().code,
            "validation.enum"
        );
    }

    #[test]
    fn digits_are_ascii_only() {
        let arabic_indic_year = "\u{662}\u{660}\u{662}\u{664}";
        assert!(!is_digits(arabic_indic_year));
        assert_eq!(
            validate(Field::YearOfPurchase, arabic_indic_year).message(Field::YearOfPurchase),
            Some("Year of Purchase should be numeric")
        );
        assert!(!is_numeric_with_symbols("\u{ff11}\u{ff12}"));
        assert_eq!(
            validate(Field::ExtentInSqYds, "\u{ff11}\u{ff12}").message(Field::ExtentInSqYds),
            Some(EXTENT_PATTERN_MESSAGE)
        );
    }

    #[test]
    fn merge_is_last_writer_wins() {
        let mut errors = validate(Field::YearOfPurchase, "");
        errors.merge(validate(Field::YearOfPurchase, "12a3"));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.message(Field::YearOfPurchase), Some("Year of Purchase should be numeric"));
    }
}
