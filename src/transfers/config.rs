use tracing::debug;

/// Option word enabling a diagnostic per unmatched transfer candidate.
const INCLUDE_UNMATCHED_WARNINGS: &str = "include_unmatched_warnings";

/// Options for a matching run, parsed from a free-form option string.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Config {
    /// Report each unmatched transfer candidate as a `Diagnostic` rather than
    /// only tracing it at debug level.
    pub include_unmatched_warnings: bool,
}

impl Config {
    /// Parses an option string. Unrecognised content is ignored, so this never
    /// fails; a missing or malformed string yields the defaults.
    pub fn from_opt_str(config: Option<&str>) -> Self {
        let config = match config.map(str::trim) {
            Some(s) if !s.is_empty() => s.to_lowercase(),
            _ => return Self::default(),
        };

        let include_unmatched_warnings = config.contains(INCLUDE_UNMATCHED_WARNINGS);
        if !include_unmatched_warnings {
            debug!(config = %config, "no recognised options in transfer matcher config");
        }
        Self {
            include_unmatched_warnings,
        }
    }
}
