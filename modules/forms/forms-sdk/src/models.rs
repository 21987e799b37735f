//! Public models for the forms module.
//!
//! These are transport agnostic. The REST layer maps them to its own DTOs.

use std::collections::BTreeMap;

use serde_json::Value;
use time::Date;

/// Paging parameters for [`crate::FormsClient::list_forms`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListFormsOptions {
    /// Maximum number of entries to return.
    pub limit: Option<u32>,
    /// Offset of the first entry.
    pub start: Option<u32>,
}

/// One page of the form listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormPager {
    pub entries: Vec<FormPagerEntry>,
    pub total: u32,
    pub limit: u32,
    pub start: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormPagerEntry {
    pub id: String,
    pub title: String,
}

/// A form with its fields ordered as authored.
#[derive(Debug, Clone, PartialEq)]
pub struct Form {
    pub id: String,
    pub title: String,
    pub fields: Vec<FormField>,
}

/// A single form field.
///
/// Attributes shared by every field live here; everything that depends on
/// the field type is carried by [`FieldKind`].
#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub required: bool,
    pub kind: FieldKind,
}

impl FormField {
    /// Public type discriminant, e.g. `"yes-no"`.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.kind.type_name()
    }
}

/// A selectable choice of a checkbox, dropdown or radio field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldOption {
    pub id: String,
    pub title: Option<String>,
    pub value: String,
}

/// Type-specific part of a [`FormField`].
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Checkbox {
        options: Vec<FieldOption>,
        default: Option<Vec<String>>,
    },
    Date {
        default: Option<Date>,
    },
    Dropdown {
        options: Vec<FieldOption>,
        default: Option<String>,
    },
    Email {
        default: Option<String>,
    },
    Number {
        default: Option<f64>,
    },
    Radio {
        options: Vec<FieldOption>,
        default: Option<String>,
    },
    Slider {
        min: f64,
        max: f64,
        step: f64,
        default: Option<f64>,
    },
    Textarea {
        default: Option<String>,
    },
    Text {
        default: Option<String>,
    },
    Url {
        default: Option<String>,
    },
    YesNo {
        default: Option<bool>,
    },
}

impl FieldKind {
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Checkbox { .. } => "checkbox",
            Self::Date { .. } => "date",
            Self::Dropdown { .. } => "dropdown",
            Self::Email { .. } => "email",
            Self::Number { .. } => "number",
            Self::Radio { .. } => "radio",
            Self::Slider { .. } => "slider",
            Self::Textarea { .. } => "textarea",
            Self::Text { .. } => "text",
            Self::Url { .. } => "url",
            Self::YesNo { .. } => "yes-no",
        }
    }

    /// Choices of an option-bearing field, `None` for every other kind.
    #[must_use]
    pub fn options(&self) -> Option<&[FieldOption]> {
        match self {
            Self::Checkbox { options, .. }
            | Self::Dropdown { options, .. }
            | Self::Radio { options, .. } => Some(options),
            _ => None,
        }
    }
}

/// Device the submission was made from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    pub device_type: String,
    pub name: String,
}

impl Device {
    /// Reported upstream when the caller did not say which device it used.
    #[must_use]
    pub fn unknown() -> Self {
        Self {
            device_type: "unknown".to_owned(),
            name: "unknown".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionMetadata {
    pub device: Option<Device>,
}

/// A filled-in form: field id to the value entered by the user.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Submission {
    pub metadata: SubmissionMetadata,
    pub fields: BTreeMap<String, Value>,
}

/// Returned once a submission has been sealed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionConfirmation {
    /// Backend-assigned submission id.
    pub submission_id: String,
}
