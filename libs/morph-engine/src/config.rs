use serde::Deserialize;

use morph_api::ConvertError;

/// Root configuration, parsed from TOML.
///
/// ```toml
/// [catalog]
/// containers = false
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MorphConfig {
    /// Standard catalog policies.
    #[serde(default)]
    pub catalog: CatalogConfig,
}

/// Which standard conversion policies the catalog carries.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogConfig {
    /// Lossless numeric widening (`u8 → u32`, `f32 → f64`, ...).
    #[serde(default = "default_true")]
    pub numeric_widening: bool,

    /// `String`/`&str` ↔ primitives via `FromStr`/`Display`.
    #[serde(default = "default_true")]
    pub string_parsing: bool,

    /// Single-element `Vec`/`Option` wrapping and unwrapping.
    #[serde(default = "default_true")]
    pub containers: bool,

    /// `serde_json::Value` ↔ JSON text and scalars.
    #[serde(default = "default_true")]
    pub json: bool,
}

fn default_true() -> bool {
    true
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            numeric_widening: default_true(),
            string_parsing: default_true(),
            containers: default_true(),
            json: default_true(),
        }
    }
}

impl MorphConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self, ConvertError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConvertError::Config(format!("{path}: {e}")))?;
        Self::parse(&content).map_err(|e| e.with_context(path))
    }

    /// Parse configuration from a TOML string.
    pub fn parse(toml_str: &str) -> Result<Self, ConvertError> {
        toml::from_str(toml_str).map_err(|e| ConvertError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use morph_api::ErrorKind;
    use std::io::Write;

    #[test]
    fn empty_document_enables_everything() {
        let config = MorphConfig::parse("").unwrap();
        assert_eq!(config, MorphConfig::default());
        assert!(config.catalog.containers);
    }

    #[test]
    fn flags_can_be_switched_off() {
        let config = MorphConfig::parse("[catalog]\ncontainers = false\njson = false\n").unwrap();
        assert!(config.catalog.numeric_widening);
        assert!(config.catalog.string_parsing);
        assert!(!config.catalog.containers);
        assert!(!config.catalog.json);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = MorphConfig::parse("[catalog]\nlocales = true\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[catalog]\nnumeric_widening = false").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let config = MorphConfig::load(&path).unwrap();
        assert!(!config.catalog.numeric_widening);
    }

    #[test]
    fn load_errors_name_the_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[catalog]\njson = \"yes\"").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let err = MorphConfig::load(&path).unwrap_err();
        assert!(err.to_string().starts_with(&format!("config error: {path}: ")));

        let err = MorphConfig::load("/nonexistent/morph.toml").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }
}
