use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::info;

/// Prefix of environment variables that override file settings.
pub const ENV_PREFIX: &str = "STOREFRONT";

/// Settings file looked up when no path is given (extension resolved by `config`).
pub const DEFAULT_SETTINGS_FILE: &str = "storefront";

/// Custom error type for settings loading.
#[storefront_derive::storefront_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// Loads settings from a file layered with environment overrides.
///
/// 1. **Base File**: `path`, or `storefront` in the working directory. The format is picked
///    from the extension (TOML, JSON, YAML...). The file is optional; a missing file yields
///    whatever the target type's serde defaults produce.
/// 2. **Environment Overrides**: variables prefixed with `STOREFRONT__`; nested keys use a
///    double underscore (`STOREFRONT__SHIPPING__LIMIT_METHODS_TO_CREATED=true` maps to
///    `shipping.limit_methods_to_created`).
///
/// # Errors
/// Returns [`ConfigError::Config`] if the file is malformed or its content does not match `T`.
///
/// # Example
/// ```rust,no_run
/// use storefront_kernel::config::load_settings;
///
/// #[derive(Default, serde::Deserialize)]
/// struct AppSettings {
///     port: u16,
/// }
///
/// let cfg: AppSettings = load_settings(Some("config/local")).unwrap_or_default();
/// ```
pub fn load_settings<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let effective_path =
        path.map_or_else(|| PathBuf::from(DEFAULT_SETTINGS_FILE), |p| p.as_ref().to_path_buf());

    let builder = Config::builder()
        .add_source(File::from(effective_path.as_path()).required(false))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .convert_case(config::Case::Snake),
        );

    info!(path = %effective_path.display(), "Loading settings");

    let settings = builder
        .build()
        .context("Failed to build settings")?
        .try_deserialize::<T>()
        .context("Failed to deserialize settings")?;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;
    use storefront_domain::settings::{RoundingMode, StorefrontSettings};
    use tempfile::tempdir;

    #[test]
    #[serial]
    fn loads_toml_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("storefront.toml");
        fs::write(
            &path,
            "[shipping]\nlimit_methods_to_created = true\nrounding = \"away_from_zero\"\n",
        )
        .unwrap();

        let settings: StorefrontSettings = load_settings(Some(&path)).unwrap();
        assert!(settings.shipping.limit_methods_to_created);
        assert_eq!(settings.shipping.rounding, RoundingMode::AwayFromZero);
        assert_eq!(settings.logging.level, "info");
    }

    #[test]
    #[serial]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let settings: StorefrontSettings =
            load_settings(Some(dir.path().join("absent.toml"))).unwrap();
        assert!(!settings.shipping.limit_methods_to_created);
        assert!(settings.catalog.max_combinations.is_none());
    }

    #[test]
    #[serial]
    fn malformed_file_is_reported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        fs::write(&path, "[shipping\nlimit_methods_to_created = ").unwrap();

        let err = load_settings::<StorefrontSettings>(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::Config { context: Some(_), .. }));
    }
}
