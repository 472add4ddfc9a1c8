//! Terminal output for mpm commands.
//!
//! Commands print one line per outcome, prefixed by a status marker. With
//! color the marker is an emoji and module names are bold; without it the
//! marker is a bracketed word such as `[OK]`, which keeps output readable in
//! logs and CI.
//!
//! `--color auto` decides from the environment: `NO_COLOR` (any value)
//! disables color, `CLICOLOR=0` disables it, `CLICOLOR_FORCE` forces it,
//! `TERM=dumb` disables it, and otherwise stdout must be a color terminal.

use std::env;

use clap::ValueEnum;
use console::style;

use crate::registry::ModuleRecord;

/// Value of the global `--color` flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    #[default]
    Auto,
    Always,
    Never,
}

/// Whether command output uses colors and emoji markers.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub use_color: bool,
}

impl OutputConfig {
    pub fn new(choice: ColorChoice) -> Self {
        let use_color = match choice {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => colors_wanted(
                |name| env::var_os(name).map(|v| v.to_string_lossy().into_owned()),
                || console::Term::stdout().features().colors_supported(),
            ),
        };
        Self { use_color }
    }

    #[cfg(test)]
    pub fn with_color() -> Self {
        Self { use_color: true }
    }

    #[cfg(test)]
    pub fn without_color() -> Self {
        Self { use_color: false }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::new(ColorChoice::Auto)
    }
}

/// Apply the color conventions to the variables returned by `var`, falling
/// back to `terminal_supports_color` when none of them decides.
fn colors_wanted(
    var: impl Fn(&str) -> Option<String>,
    terminal_supports_color: impl FnOnce() -> bool,
) -> bool {
    // Presence alone disables, even when empty
    if var("NO_COLOR").is_some() {
        return false;
    }
    if var("CLICOLOR").as_deref() == Some("0") {
        return false;
    }
    if var("CLICOLOR_FORCE").is_some_and(|v| v != "0" && !v.is_empty()) {
        return true;
    }
    if var("TERM").as_deref() == Some("dumb") {
        return false;
    }
    terminal_supports_color()
}

/// Status marker: `fancy` with colors, `plain` without.
pub fn emoji<'a>(config: &OutputConfig, fancy: &'a str, plain: &'a str) -> &'a str {
    if config.use_color {
        fancy
    } else {
        plain
    }
}

/// Module name, bold when colors are enabled.
pub fn module_name(config: &OutputConfig, name: &str) -> String {
    if config.use_color {
        style(name).bold().to_string()
    } else {
        name.to_string()
    }
}

/// Multi-line description of one record, as printed by `show`.
pub fn format_record(config: &OutputConfig, record: &ModuleRecord, checkout_present: bool) -> String {
    let mut out = format!(
        "{}\n  url:       {}\n  reference: {}\n  path:      {}",
        module_name(config, &record.name),
        record.remote_url,
        record.reference,
        record.path
    );
    if !checkout_present {
        let warning = "folder missing, run install or load to restore it";
        let warning = if config.use_color {
            style(warning).yellow().to_string()
        } else {
            warning.to_string()
        };
        out.push_str(&format!(
            "\n  {} {}",
            emoji(config, "⚠️", "[WARN]"),
            warning
        ));
    }
    out
}
