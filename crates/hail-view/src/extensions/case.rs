//! Case conversion filters backed by `heck`.

use std::collections::HashMap;

use heck::{ToKebabCase, ToLowerCamelCase, ToPascalCase, ToShoutySnakeCase, ToSnakeCase};
use tera::{Result, Value};

use super::expect_str;
use crate::error::RegistrationError;
use crate::extension::{Extension, Registrar};

/// Registers `snake_case`, `pascal_case`, `camel_case`, `kebab_case` and `shouty_snake_case`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CaseExtension;

impl CaseExtension {
    pub const NAME: &'static str = "case";
}

impl Extension for CaseExtension {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn register(
        &self,
        registrar: &mut Registrar<'_>,
    ) -> std::result::Result<(), RegistrationError> {
        registrar
            .register_filter("snake_case", snake_case)
            .register_filter("pascal_case", pascal_case)
            .register_filter("camel_case", camel_case)
            .register_filter("kebab_case", kebab_case)
            .register_filter("shouty_snake_case", shouty_snake_case);
        Ok(())
    }
}

pub(crate) fn snake_case(value: &Value, _args: &HashMap<String, Value>) -> Result<Value> {
    Ok(Value::String(expect_str(value, "snake_case")?.to_snake_case()))
}

pub(crate) fn pascal_case(value: &Value, _args: &HashMap<String, Value>) -> Result<Value> {
    Ok(Value::String(expect_str(value, "pascal_case")?.to_pascal_case()))
}

pub(crate) fn camel_case(value: &Value, _args: &HashMap<String, Value>) -> Result<Value> {
    Ok(Value::String(
        expect_str(value, "camel_case")?.to_lower_camel_case(),
    ))
}

pub(crate) fn kebab_case(value: &Value, _args: &HashMap<String, Value>) -> Result<Value> {
    Ok(Value::String(expect_str(value, "kebab_case")?.to_kebab_case()))
}

pub(crate) fn shouty_snake_case(value: &Value, _args: &HashMap<String, Value>) -> Result<Value> {
    Ok(Value::String(
        expect_str(value, "shouty_snake_case")?.to_shouty_snake_case(),
    ))
}
