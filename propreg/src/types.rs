use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value as JsonValue;

#[cfg(feature = "utoipa")]
use utoipa::ToSchema;

use crate::errors::{ClientError, ValidationError, ValidationIssue};

/// Calendar format used for registration dates on the wire and in search.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// ═══════════════════════════════════════════════════════════════════════════════
// Flow + Field - canonical schema shared by the create and edit flows
// ═══════════════════════════════════════════════════════════════════════════════

/// Which form a value travels through. The two flows use different wire keys for
/// three of the fields, and only the create flow gates name keystrokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Flow {
    #[default]
    Create,
    Edit,
}

/// How a field's raw value is constrained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// One of a fixed set of labels.
    Choice,
    /// Digits plus the extent symbol set.
    NumericWithSymbols,
    /// Digits only.
    Digits,
    /// Letters and whitespace only.
    Letters,
    /// ISO calendar date.
    Date,
    /// Anything goes.
    FreeText,
}

/// Every field of a property record, in form order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    PropertyType,
    ExtentInSqYds,
    Address,
    Boundary,
    CurrentOwnerName,
    DocumentType,
    SaleDeedType,
    DocumentNumber,
    YearOfPurchase,
    SellerName,
    RegistrationDate,
    RegistrarOffice,
}

impl Field {
    pub const ALL: [Field; 12] = [
        Field::PropertyType,
        Field::ExtentInSqYds,
        Field::Address,
        Field::Boundary,
        Field::CurrentOwnerName,
        Field::DocumentType,
        Field::SaleDeedType,
        Field::DocumentNumber,
        Field::YearOfPurchase,
        Field::SellerName,
        Field::RegistrationDate,
        Field::RegistrarOffice,
    ];

    /// Canonical key. Validation messages and error maps are keyed by it.
    #[inline]
    pub const fn key(self) -> &'static str {
        match self {
            Field::PropertyType => "propertyType",
            Field::ExtentInSqYds => "extentInSqYds",
            Field::Address => "propertyAddress",
            Field::Boundary => "boundary",
            Field::CurrentOwnerName => "currentRegisteredOwnerName",
            Field::DocumentType => "documentType",
            Field::SaleDeedType => "saleDeedType",
            Field::DocumentNumber => "documentNumber",
            Field::YearOfPurchase => "yearOfPurchase",
            Field::SellerName => "sellerName",
            Field::RegistrationDate => "registrationDate",
            Field::RegistrarOffice => "registerOffice",
        }
    }

    /// Key used by the list and update endpoints.
    #[inline]
    pub const fn edit_key(self) -> &'static str {
        match self {
            Field::Address => "address",
            Field::CurrentOwnerName => "currentOwnerName",
            Field::RegistrarOffice => "registrarOffice",
            other => other.key(),
        }
    }

    #[inline]
    pub const fn wire_key(self, flow: Flow) -> &'static str {
        match flow {
            Flow::Create => self.key(),
            Flow::Edit => self.edit_key(),
        }
    }

    /// Resolves a key from either flow.
    pub fn from_key(key: &str) -> Option<Field> {
        Field::ALL
            .into_iter()
            .find(|field| field.key() == key || field.edit_key() == key)
    }

    /// Column label for tabular output.
    pub const fn label(self) -> &'static str {
        match self {
            Field::PropertyType => "Property Type",
            Field::ExtentInSqYds => "Extent (sq. yds)",
            Field::Address => "Property Address",
            Field::Boundary => "Boundary",
            Field::CurrentOwnerName => "Current Registered Owner",
            Field::DocumentType => "Document Type",
            Field::SaleDeedType => "Sale Deed Type",
            Field::DocumentNumber => "Document Number",
            Field::YearOfPurchase => "Year of Purchase",
            Field::SellerName => "Seller Name",
            Field::RegistrationDate => "Registration Date",
            Field::RegistrarOffice => "Register Office/Sub Register Office",
        }
    }

    pub const fn kind(self) -> FieldKind {
        match self {
            Field::PropertyType | Field::Boundary | Field::DocumentType | Field::SaleDeedType => FieldKind::Choice,
            Field::ExtentInSqYds => FieldKind::NumericWithSymbols,
            Field::YearOfPurchase => FieldKind::Digits,
            Field::CurrentOwnerName | Field::SellerName => FieldKind::Letters,
            Field::RegistrationDate => FieldKind::Date,
            Field::Address | Field::DocumentNumber | Field::RegistrarOffice => FieldKind::FreeText,
        }
    }

    /// Allowed labels for choice fields, empty otherwise.
    pub fn choices(self) -> &'static [&'static str] {
        match self {
            Field::PropertyType => PropertyType::LABELS,
            Field::Boundary => Boundary::LABELS,
            Field::DocumentType => DocumentType::LABELS,
            Field::SaleDeedType => SaleDeedType::LABELS,
            _ => &[],
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Field {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::from_key(s.trim()).ok_or_else(|| ClientError::InvalidRequest {
            message: format!("unknown field '{s}'"),
        })
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Choice enums
// ═══════════════════════════════════════════════════════════════════════════════

macro_rules! choice_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $label:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[cfg_attr(feature = "utoipa", derive(ToSchema))]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];
            pub const LABELS: &'static [&'static str] = &[$($label),+];

            #[inline]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }

            /// Case-insensitive lookup by label, ignoring surrounding whitespace.
            pub fn parse_label(raw: &str) -> Option<Self> {
                let trimmed = raw.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|candidate| candidate.as_str().eq_ignore_ascii_case(trimmed))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                let raw = String::deserialize(deserializer)?;
                Self::parse_label(&raw).ok_or_else(|| {
                    serde::de::Error::custom(format!("invalid {}: '{raw}'", stringify!($name)))
                })
            }
        }

        impl FromStr for $name {
            type Err = ClientError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse_label(s).ok_or_else(|| ClientError::InvalidRequest {
                    message: format!(
                        "'{}' is not a valid {} (expected one of: {})",
                        s,
                        stringify!($name),
                        Self::LABELS.join(", ")
                    ),
                })
            }
        }
    };
}

choice_enum!(
    /// Kind of property being registered.
    PropertyType {
        House => "House",
        Land => "Land",
        Building => "Building",
        Flat => "Flat",
    }
);

choice_enum!(
    Boundary {
        North => "North",
        South => "South",
        East => "East",
        West => "West",
    }
);

choice_enum!(
    /// Instrument the registration was made with.
    DocumentType {
        SaleDeed => "Sale Deed",
        GiftDeed => "Gift Deed",
    }
);

choice_enum!(
    /// Only meaningful when the document type is a sale deed.
    SaleDeedType {
        Absolute => "Absolute",
        Possession => "Possession",
        Irrevocable => "Irrevocable",
    }
);

// ═══════════════════════════════════════════════════════════════════════════════
// RecordId
// ═══════════════════════════════════════════════════════════════════════════════

/// Backend-assigned identifier. The backend may send it as a number or a string.
#[cfg_attr(feature = "utoipa", derive(ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<u64> for RecordId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl Serialize for RecordId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.0.parse::<u64>() {
            Ok(numeric) => serializer.serialize_u64(numeric),
            Err(_) => serializer.serialize_str(&self.0),
        }
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match JsonValue::deserialize(deserializer)? {
            JsonValue::String(s) => Ok(RecordId(s)),
            JsonValue::Number(n) => Ok(RecordId(n.to_string())),
            other => Err(serde::de::Error::custom(format!("invalid record id: {other}"))),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// PropertyRecord
// ═══════════════════════════════════════════════════════════════════════════════

/// One property-registration entry as held by the backend.
///
/// Serializes with the list/update keys and accepts the create keys as aliases,
/// so one type reads every response shape the backend produces. Missing or null
/// text fields decode as empty strings and choice labels match in any case.
#[cfg_attr(feature = "utoipa", derive(ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub property_type: PropertyType,
    #[serde(default, deserialize_with = "lenient_string")]
    pub extent_in_sq_yds: String,
    #[serde(default, alias = "propertyAddress", deserialize_with = "lenient_string")]
    pub address: String,
    pub boundary: Boundary,
    #[serde(default, alias = "currentRegisteredOwnerName", deserialize_with = "lenient_string")]
    pub current_owner_name: String,
    pub document_type: DocumentType,
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub sale_deed_type: Option<SaleDeedType>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub document_number: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub year_of_purchase: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub seller_name: String,
    #[serde(deserialize_with = "lenient_date")]
    pub registration_date: NaiveDate,
    #[serde(default, alias = "registerOffice", deserialize_with = "lenient_string")]
    pub registrar_office: String,
}

impl PropertyRecord {
    /// Text of a field as shown in tables and matched by search.
    pub fn field_text(&self, field: Field) -> Cow<'_, str> {
        match field {
            Field::PropertyType => Cow::Borrowed(self.property_type.as_str()),
            Field::ExtentInSqYds => Cow::Borrowed(&self.extent_in_sq_yds),
            Field::Address => Cow::Borrowed(&self.address),
            Field::Boundary => Cow::Borrowed(self.boundary.as_str()),
            Field::CurrentOwnerName => Cow::Borrowed(&self.current_owner_name),
            Field::DocumentType => Cow::Borrowed(self.document_type.as_str()),
            Field::SaleDeedType => Cow::Borrowed(self.sale_deed_type.map(SaleDeedType::as_str).unwrap_or("")),
            Field::DocumentNumber => Cow::Borrowed(&self.document_number),
            Field::YearOfPurchase => Cow::Borrowed(&self.year_of_purchase),
            Field::SellerName => Cow::Borrowed(&self.seller_name),
            Field::RegistrationDate => Cow::Owned(self.registration_date.format(DATE_FORMAT).to_string()),
            Field::RegistrarOffice => Cow::Borrowed(&self.registrar_office),
        }
    }

    /// Whether the record carries the given id.
    pub fn has_id(&self, id: &RecordId) -> bool {
        self.id.as_ref() == Some(id)
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match JsonValue::deserialize(deserializer)? {
        JsonValue::Null => Ok(String::new()),
        JsonValue::String(s) => Ok(s),
        JsonValue::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!("expected string or number, got {other}"))),
    }
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<SaleDeedType>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => SaleDeedType::parse_label(&raw)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid sale deed type: {raw}"))),
    }
}

fn lenient_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_date(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid registration date: {raw}")))
}

/// Parses `YYYY-MM-DD`, tolerating a trailing time component.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    let date_part = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(date_part, DATE_FORMAT).ok()
}

// ═══════════════════════════════════════════════════════════════════════════════
// RecordDraft - raw string snapshot edited by a form
// ═══════════════════════════════════════════════════════════════════════════════

/// Raw string values for every field, exactly as typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordDraft {
    values: BTreeMap<Field, String>,
}

impl Default for RecordDraft {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordDraft {
    /// An empty draft with every field present.
    pub fn new() -> Self {
        Self {
            values: Field::ALL.into_iter().map(|field| (field, String::new())).collect(),
        }
    }

    /// Draft pre-filled from a stored record, as the edit flow opens it.
    pub fn from_record(record: &PropertyRecord) -> Self {
        Self {
            values: Field::ALL
                .into_iter()
                .map(|field| (field, record.field_text(field).into_owned()))
                .collect(),
        }
    }

    /// Builds a draft from a loose key/value map keyed by either flow's keys.
    pub fn from_json_map(map: &serde_json::Map<String, JsonValue>) -> Result<Self, ClientError> {
        let mut draft = Self::new();
        for (key, value) in map {
            if key == "id" {
                continue;
            }
            let field = Field::from_key(key).ok_or_else(|| ClientError::InvalidRequest {
                message: format!("unknown field '{key}'"),
            })?;
            let text = match value {
                JsonValue::Null => String::new(),
                JsonValue::String(s) => s.clone(),
                JsonValue::Number(n) => n.to_string(),
                JsonValue::Bool(b) => b.to_string(),
                other => {
                    return Err(ClientError::InvalidRequest {
                        message: format!("field '{key}' must be a scalar, got {other}"),
                    });
                }
            };
            draft.set(field, text);
        }
        Ok(draft)
    }

    pub fn get(&self, field: Field) -> &str {
        self.values.get(&field).map(String::as_str).unwrap_or("")
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        self.values.insert(field, value.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.values.iter().map(|(field, value)| (*field, value.as_str()))
    }

    pub fn is_blank(&self) -> bool {
        self.values.values().all(|value| value.trim().is_empty())
    }

    /// Parses the draft into a typed record without an id.
    ///
    /// Run the validator first: this only reports what fails to parse.
    pub fn to_record(&self) -> Result<PropertyRecord, ValidationError> {
        let mut issues = Vec::new();

        let property_type = parse_choice(self, Field::PropertyType, PropertyType::parse_label, &mut issues);
        let boundary = parse_choice(self, Field::Boundary, Boundary::parse_label, &mut issues);
        let document_type = parse_choice(self, Field::DocumentType, DocumentType::parse_label, &mut issues);
        let sale_deed_type = match document_type {
            Some(DocumentType::SaleDeed) => {
                parse_choice(self, Field::SaleDeedType, SaleDeedType::parse_label, &mut issues)
            }
            _ => None,
        };
        let registration_date = parse_date(self.get(Field::RegistrationDate));
        if registration_date.is_none() {
            issues.push(ValidationIssue::new(
                Field::RegistrationDate.key(),
                "validation.date",
                "Registration Date must be a valid date (YYYY-MM-DD)",
            ));
        }

        match (property_type, boundary, document_type, registration_date) {
            (Some(property_type), Some(boundary), Some(document_type), Some(registration_date))
                if issues.is_empty() =>
            {
                Ok(PropertyRecord {
                    id: None,
                    property_type,
                    extent_in_sq_yds: self.get(Field::ExtentInSqYds).trim().to_string(),
                    address: self.get(Field::Address).trim().to_string(),
                    boundary,
                    current_owner_name: self.get(Field::CurrentOwnerName).trim().to_string(),
                    document_type,
                    sale_deed_type,
                    document_number: self.get(Field::DocumentNumber).trim().to_string(),
                    year_of_purchase: self.get(Field::YearOfPurchase).trim().to_string(),
                    seller_name: self.get(Field::SellerName).trim().to_string(),
                    registration_date,
                    registrar_office: self.get(Field::RegistrarOffice).trim().to_string(),
                })
            }
            _ => Err(ValidationError::new(issues)),
        }
    }
}

fn parse_choice<T>(
    draft: &RecordDraft,
    field: Field,
    parse: fn(&str) -> Option<T>,
    issues: &mut Vec<ValidationIssue>,
) -> Option<T> {
    let parsed = parse(draft.get(field));
    if parsed.is_none() {
        issues.push(ValidationIssue::new(
            field.key(),
            "validation.enum",
            format!("{} must be one of: {}", field.label(), field.choices().join(", ")),
        ));
    }
    parsed
}
