//! TOML report configuration.

use std::path::Path;

use armory_analytics_models::{CategoryOrder, ReportOptions};

use crate::CliError;

/// Parses report options from TOML text. Missing keys keep their defaults.
///
/// # Errors
///
/// Returns [`CliError::Config`] if the TOML is invalid.
pub fn parse_report_options(toml: &str) -> Result<ReportOptions, CliError> {
    Ok(toml::from_str(toml)?)
}

/// Loads report options from `path`, or the defaults when no path is given.
///
/// # Errors
///
/// Returns [`CliError`] if the file cannot be read or parsed.
pub fn load_report_options(path: Option<&Path>) -> Result<ReportOptions, CliError> {
    let Some(path) = path else {
        return Ok(ReportOptions::default());
    };
    let text = std::fs::read_to_string(path)?;
    let options = parse_report_options(&text)?;
    log::debug!("Loaded report options from {}: {options:?}", path.display());
    Ok(options)
}

/// Applies command-line overrides on top of file options.
#[must_use]
pub fn apply_overrides(
    mut options: ReportOptions,
    enabled_only: bool,
    category_order: Option<CategoryOrder>,
) -> ReportOptions {
    if enabled_only {
        options.enabled_weapons_only = true;
    }
    if let Some(order) = category_order {
        options.category_order = order;
    }
    options
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_example_config() {
        let options = parse_report_options(include_str!("../report.example.toml")).unwrap();
        assert!(!options.enabled_weapons_only);
        assert_eq!(options.category_order, CategoryOrder::Name);
    }

    #[test]
    fn empty_config_is_default() {
        assert_eq!(parse_report_options("").unwrap(), ReportOptions::default());
    }

    #[test]
    fn rejects_unknown_order() {
        assert!(matches!(
            parse_report_options(r#"category-order = "code""#),
            Err(CliError::Config(_))
        ));
    }

    #[test]
    fn overrides_win() {
        let options = apply_overrides(ReportOptions::default(), true, Some(CategoryOrder::Name));
        assert!(options.enabled_weapons_only);
        assert_eq!(options.category_order, CategoryOrder::Name);

        let untouched = apply_overrides(options.clone(), false, None);
        assert_eq!(untouched, options);
    }

    #[test]
    fn no_path_means_defaults() {
        assert_eq!(load_report_options(None).unwrap(), ReportOptions::default());
    }
}
