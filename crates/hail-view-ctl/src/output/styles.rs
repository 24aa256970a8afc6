//! Palette shared by status output and clap help.

use anstyle::{AnsiColor, Color, Effects, Style};

const fn fg(color: AnsiColor) -> Style {
    Style::new().fg_color(Some(Color::Ansi(color)))
}

pub(crate) const SUCCESS: Style = fg(AnsiColor::Green);
pub(crate) const ERROR: Style = fg(AnsiColor::Red);
pub(crate) const WARNING: Style = fg(AnsiColor::Yellow);

/// Capability kinds and template names in listings.
pub(crate) const ACCENT: Style = fg(AnsiColor::Cyan);

pub(crate) const BOLD: Style = Style::new().effects(Effects::BOLD);
pub(crate) const DIM: Style = Style::new().effects(Effects::DIMMED);

pub(crate) fn clap_styles() -> clap::builder::Styles {
    let heading = fg(AnsiColor::Green).effects(Effects::BOLD);
    clap::builder::Styles::styled()
        .header(heading)
        .usage(heading)
        .literal(ACCENT)
        .placeholder(ACCENT)
        .error(fg(AnsiColor::Red).effects(Effects::BOLD))
        .valid(SUCCESS)
        .invalid(WARNING)
}
