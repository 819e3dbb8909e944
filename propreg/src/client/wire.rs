//! Request bodies for the backend.
//!
//! The save endpoint expects the create-flow keys and the update endpoint the
//! edit-flow keys. Everything inside the crate uses [`Field`] and
//! [`PropertyRecord`]; the key spelling is chosen only here.

use serde_json::{Map, Value as JsonValue};

use crate::types::{Field, Flow, PropertyRecord};

/// Encodes a record as a request body for the given flow.
///
/// Values are sent as strings, the way the forms hold them. The create body
/// always carries `saleDeedType` (empty when unused); the edit body only
/// carries it when set.
pub fn encode(record: &PropertyRecord, flow: Flow) -> JsonValue {
    let mut body = Map::new();
    for field in Field::ALL {
        if field == Field::SaleDeedType && flow == Flow::Edit && record.sale_deed_type.is_none() {
            continue;
        }
        body.insert(
            field.wire_key(flow).to_string(),
            JsonValue::String(record.field_text(field).into_owned()),
        );
    }
    JsonValue::Object(body)
}
