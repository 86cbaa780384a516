use std::path::PathBuf;

use derive_more::derive::From;
use serde::{Deserialize, Serialize};

use crate::codec::Codecs;

#[derive(Debug, From)]
pub enum SettingsError {
    IOError(std::io::Error),

    DeserializationFailed(toml::de::Error),

    #[from(ignore)]
    EmptyBaseUrl,
}

impl std::error::Error for SettingsError {}

impl core::fmt::Display for SettingsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

pub type SettingsResult<T> = std::result::Result<T, SettingsError>;

/// MockSettings configures how contract mocks are compiled, usually read
/// from a `mocks.toml` shared by a test suite:
///
/// ```toml
/// base_url = "http://localhost:3000/api"
/// strict_body = false
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MockSettings {
    /// Prefix every compiled handler url is joined onto.
    pub base_url: String,

    /// Fail requests whose body cannot be decoded instead of passing the
    /// raw text on as input.
    #[serde(default)]
    pub strict_body: bool,
}

impl MockSettings {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            strict_body: false,
        }
    }

    #[must_use]
    pub fn with_strict_body(mut self, strict_body: bool) -> Self {
        self.strict_body = strict_body;
        self
    }

    /// # Errors
    ///
    /// Fails when `content` is not valid TOML for the settings or the base
    /// url is empty.
    pub fn from_toml_str(content: &str) -> SettingsResult<Self> {
        let settings: Self = toml::from_str(content)?;
        settings.validate()
    }

    /// # Errors
    ///
    /// Same as `from_toml_str`, plus any error reading the file.
    pub fn from_path<V: Into<PathBuf>>(target: V) -> SettingsResult<Self> {
        let target_path = target.into();
        ewe_trace::debug!("loading mock settings from {}", target_path.display());
        let content = std::fs::read_to_string(target_path)?;
        Self::from_toml_str(&content)
    }

    /// The codecs compiled handlers decode input with.
    #[must_use]
    pub fn codecs(&self) -> Codecs {
        if self.strict_body {
            Codecs::strict()
        } else {
            Codecs::default()
        }
    }

    fn validate(self) -> SettingsResult<Self> {
        if self.base_url.trim().is_empty() {
            return Err(SettingsError::EmptyBaseUrl);
        }
        Ok(self)
    }
}

#[cfg(test)]
mod settings_tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_settings_from_toml() {
        let settings = MockSettings::from_toml_str(
            r#"
            base_url = "http://localhost:3000/api"
            strict_body = true
            "#,
        )
        .unwrap();

        assert_eq!(
            settings,
            MockSettings::new("http://localhost:3000/api").with_strict_body(true)
        );
    }

    #[test]
    fn test_strict_body_defaults_to_off() {
        let settings = MockSettings::from_toml_str(r#"base_url = "http://localhost""#).unwrap();
        assert!(!settings.strict_body);
    }

    #[test]
    fn test_invalid_settings() {
        assert!(matches!(
            MockSettings::from_toml_str("strict_body = true"),
            Err(SettingsError::DeserializationFailed(_))
        ));
        assert!(matches!(
            MockSettings::from_toml_str(r#"base_url = "  ""#),
            Err(SettingsError::EmptyBaseUrl)
        ));
    }

    #[test]
    fn test_settings_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"base_url = "http://localhost:9000""#).unwrap();

        let settings = MockSettings::from_path(file.path()).unwrap();
        assert_eq!(settings.base_url, "http://localhost:9000");

        assert!(matches!(
            MockSettings::from_path("/definitely/not/here/mocks.toml"),
            Err(SettingsError::IOError(_))
        ));
    }
}
