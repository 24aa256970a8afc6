//! Styled terminal output for `hail-view-ctl`.
//!
//! `anstream` strips the ANSI codes when stdout/stderr is not a terminal, so
//! piped output (and the integration tests) see plain text.
//!
//! ```ignore
//! output::header("Extensions:");
//! output::capability("filter", "upper");
//! output::success("Generated 2 file(s)");
//! output::error("Template 'controller' not found.");
//! ```

mod styles;

use std::fmt::Display;
use std::io::Write;

pub(crate) use styles::clap_styles;

use styles::{ACCENT, BOLD, DIM, ERROR, SUCCESS, WARNING};

pub(crate) fn success(msg: impl Display) {
    let mut out = anstream::stdout().lock();
    writeln!(out, "{SUCCESS}✓ {msg}{SUCCESS:#}").ok();
}

/// Print an error message to stderr.
pub(crate) fn error(msg: impl Display) {
    let mut out = anstream::stderr().lock();
    writeln!(out, "{ERROR}✗ {msg}{ERROR:#}").ok();
}

pub(crate) fn warning(msg: impl Display) {
    let mut out = anstream::stdout().lock();
    writeln!(out, "{WARNING}! {msg}{WARNING:#}").ok();
}

pub(crate) fn header(msg: impl Display) {
    let mut out = anstream::stdout().lock();
    writeln!(out, "{BOLD}{msg}{BOLD:#}").ok();
}

/// "  Label: value" with the label bolded.
pub(crate) fn label(name: impl Display, value: impl Display) {
    let mut out = anstream::stdout().lock();
    writeln!(out, "  {BOLD}{name}:{BOLD:#} {value}").ok();
}

/// One capability row: kind column then name.
pub(crate) fn capability(kind: impl Display, name: impl Display) {
    let mut out = anstream::stdout().lock();
    writeln!(out, "    {ACCENT}{kind:<8}{ACCENT:#} {name}").ok();
}

pub(crate) fn item(msg: impl Display) {
    let mut out = anstream::stdout().lock();
    writeln!(out, "  • {msg}").ok();
}

pub(crate) fn dim(msg: impl Display) {
    let mut out = anstream::stdout().lock();
    writeln!(out, "{DIM}{msg}{DIM:#}").ok();
}

pub(crate) fn blank() {
    let mut out = anstream::stdout().lock();
    writeln!(out).ok();
}

pub(crate) fn plain(msg: impl Display) {
    let mut out = anstream::stdout().lock();
    writeln!(out, "{msg}").ok();
}

/// Write rendered content byte-for-byte, bypassing ANSI stripping.
pub(crate) fn raw(content: &str) -> std::io::Result<()> {
    let mut out = std::io::stdout().lock();
    out.write_all(content.as_bytes())?;
    out.flush()
}
