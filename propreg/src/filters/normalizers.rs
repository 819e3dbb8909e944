//! Per-field acceptance rules for proposed input values
//!
//! The proposed value is the whole field value after the keystroke, not the key
//! itself. Validation runs separately on blur and submit.

use crate::types::{Field, Flow};
use crate::validators::{is_digits, is_letters_and_spaces, is_numeric_with_symbols};

/// Longest value the year field will hold.
pub const YEAR_MAX_LEN: usize = 4;

/// Result of offering a new value to a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputOutcome {
    /// The value to commit; may differ from the proposal when truncated.
    Accepted(String),
    /// The proposal was discarded and the field keeps its previous value.
    Rejected,
}

impl InputOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, InputOutcome::Accepted(_))
    }
}

/// Returns `true` if `proposed` may be committed into `field` in the given flow.
pub fn accepts(field: Field, proposed: &str, flow: Flow) -> bool {
    match field {
        Field::ExtentInSqYds => proposed.is_empty() || is_numeric_with_symbols(proposed),
        Field::YearOfPurchase => is_digits(proposed),
        Field::SellerName | Field::CurrentOwnerName if flow == Flow::Create => is_letters_and_spaces(proposed),
        _ => true,
    }
}

/// Gates `proposed` and applies any length clamp.
pub fn normalize(field: Field, proposed: &str, flow: Flow) -> InputOutcome {
    if !accepts(field, proposed, flow) {
        return InputOutcome::Rejected;
    }
    match field {
        Field::YearOfPurchase => InputOutcome::Accepted(proposed.chars().take(YEAR_MAX_LEN).collect()),
        _ => InputOutcome::Accepted(proposed.to_string()),
    }
}

/// Value the field holds after offering `proposed` on top of `previous`.
pub fn committed_value(field: Field, previous: &str, proposed: &str, flow: Flow) -> String {
    match normalize(field, proposed, flow) {
        InputOutcome::Accepted(value) => value,
        InputOutcome::Rejected => previous.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extent_rejects_letters_and_keeps_previous() {
        assert_eq!(normalize(Field::ExtentInSqYds, "12a", Flow::Create), InputOutcome::Rejected);
        assert_eq!(committed_value(Field::ExtentInSqYds, "12", "12a", Flow::Create), "12");
        assert!(accepts(Field::ExtentInSqYds, "", Flow::Create));
        assert!(accepts(Field::ExtentInSqYds, "1,200/3", Flow::Edit));
    }

    #[test]
    fn year_accepts_digits_and_truncates() {
        assert_eq!(
            normalize(Field::YearOfPurchase, "202456", Flow::Create),
            InputOutcome::Accepted("2024".into())
        );
        assert!(accepts(Field::YearOfPurchase, "", Flow::Create));
        assert!(!accepts(Field::YearOfPurchase, "20a", Flow::Edit));
    }

    #[test]
    fn non_ascii_digits_are_rejected() {
        assert_eq!(
            normalize(Field::YearOfPurchase, "\u{662}\u{660}\u{662}\u{664}", Flow::Create),
            InputOutcome::Rejected
        );
        assert_eq!(normalize(Field::ExtentInSqYds, "\u{ff11}\u{ff12}", Flow::Edit), InputOutcome::Rejected);
        assert_eq!(committed_value(Field::YearOfPurchase, "20", "20\u{663}", Flow::Create), "20");
    }

    #[test]
    fn name_gate_applies_to_create_flow_only() {
        assert!(!accepts(Field::SellerName, "Ravi2", Flow::Create));
        assert!(!accepts(Field::CurrentOwnerName, "O'Neil", Flow::Create));
        assert!(accepts(Field::SellerName, "Ravi2", Flow::Edit));
        assert!(accepts(Field::SellerName, "Ravi Kumar", Flow::Create));
    }

    #[test]
    fn free_form_fields_accept_anything() {
        assert!(accepts(Field::Address, "#12, 3rd Cross", Flow::Create));
        assert!(accepts(Field::DocumentNumber, "", Flow::Create));
    }
}
