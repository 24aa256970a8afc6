//! Basic string helpers.

use std::collections::HashMap;

use tera::{Result, Value};

use super::expect_str;
use crate::error::RegistrationError;
use crate::extension::{Extension, Registrar};

/// Registers the `upper` and `lower` filters.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringExtension;

impl StringExtension {
    pub const NAME: &'static str = "strings";
}

impl Extension for StringExtension {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn register(
        &self,
        registrar: &mut Registrar<'_>,
    ) -> std::result::Result<(), RegistrationError> {
        registrar
            .register_filter("upper", upper)
            .register_filter("lower", lower);
        Ok(())
    }
}

pub(crate) fn upper(value: &Value, _args: &HashMap<String, Value>) -> Result<Value> {
    Ok(Value::String(expect_str(value, "upper")?.to_uppercase()))
}

pub(crate) fn lower(value: &Value, _args: &HashMap<String, Value>) -> Result<Value> {
    Ok(Value::String(expect_str(value, "lower")?.to_lowercase()))
}
