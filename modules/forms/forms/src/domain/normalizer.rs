//! Maps backend form records onto the typed SDK models.
//!
//! The backend describes every field with the same loose record: a type tag,
//! a list of options and a string-encoded default. A record that cannot be
//! turned into a valid [`FormField`] is dropped from the form, never reported.

use forms_sdk::{FieldKind, FieldOption, Form, FormField, FormPager, FormPagerEntry};
use serde_json::Value;
use thiserror::Error;
use time::Date;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

use crate::infra::graphql::models::{FormDto, PagerDto, RawField, RawOption};

const DATE_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

/// Why a backend field record was dropped.
#[derive(Debug, Error, PartialEq, Eq)]
enum InvalidField {
    #[error("unknown field type `{0}`")]
    UnknownType(String),

    #[error("default value is not a valid {0}")]
    DefaultShape(&'static str),

    #[error("slider needs numeric min, max and step options")]
    SliderBounds,
}

#[must_use]
pub fn normalize_pager(pager: PagerDto) -> FormPager {
    FormPager {
        entries: pager
            .entries
            .into_iter()
            .map(|entry| FormPagerEntry {
                id: entry.id,
                title: entry.title,
            })
            .collect(),
        total: pager.total,
        limit: pager.limit,
        start: pager.start,
    }
}

/// Order fields by their backend index, then drop the invalid ones.
#[must_use]
pub fn normalize_form(form: FormDto) -> Form {
    let mut raw_fields = form.fields;
    raw_fields.sort_by_key(|field| field.idx.unwrap_or(0));

    Form {
        id: form.id,
        title: form.title,
        fields: raw_fields.into_iter().filter_map(normalize_field).collect(),
    }
}

#[must_use]
pub fn normalize_field(raw: RawField) -> Option<FormField> {
    let field_id = raw.id.clone();
    match build_field(raw) {
        Ok(field) => Some(field),
        Err(reason) => {
            tracing::debug!(field_id = %field_id, %reason, "dropping form field");
            None
        }
    }
}

fn build_field(raw: RawField) -> Result<FormField, InvalidField> {
    let kind = build_kind(&raw.field_type, raw.default_value.as_deref(), raw.options)?;

    Ok(FormField {
        id: raw.id,
        title: raw.title,
        description: raw.description.filter(|d| !d.is_empty()),
        required: raw.required,
        kind,
    })
}

fn build_kind(
    field_type: &str,
    default: Option<&str>,
    options: Vec<RawOption>,
) -> Result<FieldKind, InvalidField> {
    let kind = match field_type {
        "checkbox" => FieldKind::Checkbox {
            default: checkbox_default(default)?,
            options: convert_options(options),
        },
        "date" => FieldKind::Date {
            default: typed_default(default, "date", |v| v.as_str().and_then(parse_date))?,
        },
        "dropdown" => FieldKind::Dropdown {
            default: string_default(default)?,
            options: convert_options(options),
        },
        "email" => FieldKind::Email {
            default: string_default(default)?,
        },
        "number" => FieldKind::Number {
            default: typed_default(default, "number", lax_number)?,
        },
        "radio" => FieldKind::Radio {
            default: string_default(default)?,
            options: convert_options(options),
        },
        "slider" => {
            let (min, max, step) = slider_bounds(&options)?;
            FieldKind::Slider {
                min,
                max,
                step,
                default: typed_default(default, "number", lax_number)?,
            }
        }
        "textarea" => FieldKind::Textarea {
            default: string_default(default)?,
        },
        "textfield" => FieldKind::Text {
            default: string_default(default)?,
        },
        "link" => FieldKind::Url {
            default: string_default(default)?,
        },
        "yes_no" => FieldKind::YesNo {
            default: typed_default(default, "boolean", lax_bool)?,
        },
        other => return Err(InvalidField::UnknownType(other.to_owned())),
    };
    Ok(kind)
}

/// JSON-decode a raw default. Anything that does not decode, including an
/// absent value or `null`, means "no default".
fn decode_default(raw: Option<&str>) -> Option<Value> {
    raw.and_then(|raw| serde_json::from_str::<Value>(raw).ok())
        .filter(|value| !value.is_null())
}

fn typed_default<T>(
    raw: Option<&str>,
    expected: &'static str,
    extract: impl FnOnce(&Value) -> Option<T>,
) -> Result<Option<T>, InvalidField> {
    let Some(value) = decode_default(raw) else {
        return Ok(None);
    };
    extract(&value)
        .map(Some)
        .ok_or(InvalidField::DefaultShape(expected))
}

fn string_default(raw: Option<&str>) -> Result<Option<String>, InvalidField> {
    typed_default(raw, "string", |v| v.as_str().map(str::to_owned))
}

/// Checkbox defaults are comma-separated: `x,y` selects `x` and `y`.
///
/// A JSON string is split the same way and a JSON array of strings is taken
/// as is. `null` means no default.
fn checkbox_default(raw: Option<&str>) -> Result<Option<Vec<String>>, InvalidField> {
    let Some(raw) = raw.filter(|raw| !raw.is_empty()) else {
        return Ok(None);
    };

    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Null) => Ok(None),
        Ok(Value::Array(items)) => items
            .iter()
            .map(|item| item.as_str().map(str::to_owned))
            .collect::<Option<Vec<_>>>()
            .map(Some)
            .ok_or(InvalidField::DefaultShape("list of strings")),
        Ok(Value::String(joined)) => Ok(Some(split_choices(&joined))),
        _ => Ok(Some(split_choices(raw))),
    }
}

/// Numbers also arrive as numeric strings, e.g. `"5"`.
fn lax_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

/// Booleans also arrive as `0`/`1` or as words such as `"yes"` and `"off"`.
fn lax_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_i64() {
            Some(0) => Some(false),
            Some(1) => Some(true),
            _ => None,
        },
        Value::String(s) => match s.to_ascii_lowercase().as_str() {
            "1" | "on" | "t" | "true" | "y" | "yes" => Some(true),
            "0" | "off" | "f" | "false" | "n" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn split_choices(joined: &str) -> Vec<String> {
    joined.split(',').map(str::to_owned).collect()
}

fn parse_date(value: &str) -> Option<Date> {
    Date::parse(value, DATE_FORMAT).ok()
}

/// Sliders carry `[min, max, step]` in their first three options.
fn slider_bounds(options: &[RawOption]) -> Result<(f64, f64, f64), InvalidField> {
    let [min, max, step, ..] = options else {
        return Err(InvalidField::SliderBounds);
    };
    let parse = |option: &RawOption| {
        option
            .value
            .trim()
            .parse::<f64>()
            .map_err(|_| InvalidField::SliderBounds)
    };
    Ok((parse(min)?, parse(max)?, parse(step)?))
}

fn convert_options(options: Vec<RawOption>) -> Vec<FieldOption> {
    options
        .into_iter()
        .map(|option| FieldOption {
            id: option.id,
            title: option.title,
            value: option.value,
        })
        .collect()
}
