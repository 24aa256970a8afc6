//! Built-in extensions.

mod case;
mod date;
mod strings;

pub use case::CaseExtension;
pub use date::DateExtension;
pub use strings::StringExtension;

use tera::Value;

/// Borrow a filter input as `&str`, or fail with an error naming the filter.
pub(crate) fn expect_str<'a>(value: &'a Value, filter: &str) -> tera::Result<&'a str> {
    value
        .as_str()
        .ok_or_else(|| tera::Error::msg(format!("{filter} filter expects a string")))
}
