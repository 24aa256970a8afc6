//! Date and time helpers backed by `chrono`.
//!
//! Accepted inputs for `format_date` and `past`:
//! - RFC 3339 strings (`2024-03-01T12:30:00+02:00`)
//! - plain dates (`2024-03-01`, read as midnight UTC)
//! - integer Unix timestamps in seconds

use std::collections::HashMap;
use std::fmt::Write;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset, Local, NaiveDate, Utc};
use tera::{Result, Value};

use crate::error::RegistrationError;
use crate::extension::{Extension, Registrar};

const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Registers the `now` function, the `format_date` filter and the `past` test.
#[derive(Debug, Clone)]
pub struct DateExtension {
    default_format: String,
}

impl DateExtension {
    pub const NAME: &'static str = "date";

    /// Use `format` when `format_date` is called without a `format` argument.
    pub fn with_default_format(format: impl Into<String>) -> Self {
        Self {
            default_format: format.into(),
        }
    }

    pub fn default_format(&self) -> &str {
        &self.default_format
    }
}

impl Default for DateExtension {
    fn default() -> Self {
        Self::with_default_format(DEFAULT_DATE_FORMAT)
    }
}

impl Extension for DateExtension {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn register(
        &self,
        registrar: &mut Registrar<'_>,
    ) -> std::result::Result<(), RegistrationError> {
        if !is_valid_format(&self.default_format) {
            return Err(registrar.failed(format!(
                "invalid default date format '{}'",
                self.default_format
            )));
        }

        let default_format = self.default_format.clone();
        registrar
            .register_function("now", now)
            .register_filter(
                "format_date",
                move |value: &Value, args: &HashMap<String, Value>| -> Result<Value> {
                    format_date(value, args, &default_format)
                },
            )
            .register_test("past", past);
        Ok(())
    }
}

/// `now(format="%H:%M", utc=true)`; RFC 3339 when no format is given.
fn now(args: &HashMap<String, Value>) -> Result<Value> {
    let utc = match args.get("utc") {
        Some(v) => v
            .as_bool()
            .ok_or_else(|| tera::Error::msg("now: `utc` must be a boolean"))?,
        None => false,
    };
    let current: DateTime<FixedOffset> = if utc {
        Utc::now().fixed_offset()
    } else {
        Local::now().fixed_offset()
    };

    match optional_str(args, "format", "now")? {
        Some(fmt) => render(&current, fmt).map(Value::String),
        None => Ok(Value::String(current.to_rfc3339())),
    }
}

fn format_date(
    value: &Value,
    args: &HashMap<String, Value>,
    default_format: &str,
) -> Result<Value> {
    let date = parse_date(value, "format_date")?;
    let fmt = optional_str(args, "format", "format_date")?.unwrap_or(default_format);
    render(&date, fmt).map(Value::String)
}

fn past(value: Option<&Value>, _args: &[Value]) -> Result<bool> {
    let value = value.ok_or_else(|| tera::Error::msg("past test needs a value"))?;
    Ok(parse_date(value, "past")? < Utc::now())
}

fn parse_date(value: &Value, caller: &str) -> Result<DateTime<FixedOffset>> {
    match value {
        Value::String(s) => {
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Ok(dt);
            }
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|naive| naive.and_utc().fixed_offset())
                .ok_or_else(|| tera::Error::msg(format!("{caller}: cannot parse date '{s}'")))
        }
        Value::Number(n) => n
            .as_i64()
            .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
            .map(|dt| dt.fixed_offset())
            .ok_or_else(|| tera::Error::msg(format!("{caller}: timestamp {n} is out of range"))),
        other => Err(tera::Error::msg(format!(
            "{caller} expects a date string or timestamp, got {other}"
        ))),
    }
}

fn optional_str<'a>(
    args: &'a HashMap<String, Value>,
    key: &str,
    caller: &str,
) -> Result<Option<&'a str>> {
    match args.get(key) {
        Some(v) => v
            .as_str()
            .map(Some)
            .ok_or_else(|| tera::Error::msg(format!("{caller}: `{key}` must be a string"))),
        None => Ok(None),
    }
}

fn is_valid_format(fmt: &str) -> bool {
    !StrftimeItems::new(fmt).any(|item| matches!(item, Item::Error))
}

fn render(date: &DateTime<FixedOffset>, fmt: &str) -> Result<String> {
    if !is_valid_format(fmt) {
        return Err(tera::Error::msg(format!("invalid date format '{fmt}'")));
    }
    let mut out = String::new();
    write!(out, "{}", date.format(fmt))
        .map_err(|_| tera::Error::msg(format!("cannot format date with '{fmt}'")))?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(pairs: &[(&str, Value)]) -> HashMap<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_format_rfc3339_keeps_offset() {
        let value = Value::from("2024-03-01T23:30:00+02:00");
        let out = format_date(&value, &args(&[("format", Value::from("%d.%m.%Y %H:%M"))]), "%Y")
            .unwrap();
        assert_eq!(out, Value::from("01.03.2024 23:30"));
    }

    #[test]
    fn test_format_plain_date_with_default() {
        let out = format_date(&Value::from("2024-03-01"), &HashMap::new(), "%Y/%m/%d").unwrap();
        assert_eq!(out, Value::from("2024/03/01"));
    }

    #[test]
    fn test_format_timestamp() {
        let out = format_date(&Value::from(0), &HashMap::new(), "%Y-%m-%d").unwrap();
        assert_eq!(out, Value::from("1970-01-01"));
    }

    #[test]
    fn test_format_rejects_garbage() {
        assert!(format_date(&Value::from("yesterday"), &HashMap::new(), "%Y").is_err());
        assert!(format_date(&Value::Bool(true), &HashMap::new(), "%Y").is_err());
    }

    #[test]
    fn test_invalid_format_is_error_not_panic() {
        let err = format_date(
            &Value::from("2024-03-01"),
            &args(&[("format", Value::from("%Q"))]),
            "%Y",
        )
        .unwrap_err();
        assert!(err.to_string().contains("%Q"));
    }

    #[test]
    fn test_now_with_format() {
        let out = now(&args(&[
            ("format", Value::from("%Y")),
            ("utc", Value::Bool(true)),
        ]))
        .unwrap();
        assert_eq!(out.as_str().unwrap().len(), 4);
    }

    #[test]
    fn test_now_default_is_rfc3339() {
        let out = now(&HashMap::new()).unwrap();
        assert!(DateTime::parse_from_rfc3339(out.as_str().unwrap()).is_ok());
    }

    #[test]
    fn test_now_rejects_non_bool_utc() {
        assert!(now(&args(&[("utc", Value::from("yes"))])).is_err());
    }

    #[test]
    fn test_past() {
        assert!(past(Some(&Value::from("2000-01-01")), &[]).unwrap());
        assert!(!past(Some(&Value::from("9999-01-01")), &[]).unwrap());
        assert!(past(None, &[]).is_err());
    }

    #[test]
    fn test_invalid_default_format_fails_registration() {
        let ext = DateExtension::with_default_format("%Q");
        let mut registry = crate::capability::CapabilityRegistry::new();
        let attached = std::collections::BTreeSet::new();
        let mut registrar = Registrar::new("date", &mut registry, &attached);
        assert!(matches!(
            ext.register(&mut registrar),
            Err(RegistrationError::Failed { .. })
        ));
    }
}
