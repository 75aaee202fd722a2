//! Credentials and voice configuration.
//!
//! Sources, later ones win: the optional JSON settings file, the process environment (including
//! `.env`, loaded by the binary), and command line overrides.

use std::{
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
};

use derive_more::{Display, Error};
use oxilangtag::{LanguageTag, LanguageTagParseError};
use serde::Deserialize;
use tracing::debug;

pub const DEFAULT_SETTINGS_FILE: &str = "appsettings.json";

/// Environment variable names per setting. The first one present wins.
const SUBSCRIPTION_KEY_VARS: [&str; 2] = ["AZURE_SUBSCRIPTION_KEY", "subscriptionKey"];
const REGION_VARS: [&str; 2] = ["AZURE_REGION", "region"];
const LANGUAGE_VARS: [&str; 1] = ["AZURE_SPEECH_LANGUAGE"];
const VOICE_VARS: [&str; 1] = ["AZURE_SPEECH_VOICE"];

#[derive(Debug, Display, Error)]
pub enum SettingsError {
    #[display("Failed to read settings file {}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[display("Invalid settings file {}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[display("Invalid language tag `{tag}`")]
    Language {
        tag: String,
        source: LanguageTagParseError,
    },
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub subscription_key: Option<String>,
    pub region: Option<String>,
    pub language: Option<String>,
    pub voice: Option<String>,
}

impl Settings {
    /// Load the settings file. A missing file yields empty settings.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            debug!("No settings file at `{}`", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.into(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| SettingsError::Parse {
            path: path.into(),
            source,
        })
    }

    /// Override with environment variables. Empty values are ignored.
    #[must_use]
    pub fn with_env(self, vars: impl IntoIterator<Item = (String, String)>) -> Self {
        let vars: HashMap<String, String> = vars
            .into_iter()
            .filter(|(_, value)| !value.trim().is_empty())
            .collect();
        let lookup = |names: &[&str]| names.iter().find_map(|name| vars.get(*name).cloned());

        Self {
            subscription_key: lookup(&SUBSCRIPTION_KEY_VARS).or(self.subscription_key),
            region: lookup(&REGION_VARS).or(self.region),
            language: lookup(&LANGUAGE_VARS).or(self.language),
            voice: lookup(&VOICE_VARS).or(self.voice),
        }
    }

    #[must_use]
    pub fn with_overrides(self, language: Option<String>, voice: Option<String>) -> Self {
        Self {
            language: language.or(self.language),
            voice: voice.or(self.voice),
            ..self
        }
    }

    /// Backend parameters, with defaults for language and voice.
    pub fn into_params(self) -> Result<azure::Params, SettingsError> {
        let defaults = azure::Params::default();
        let language = match self.language {
            Some(tag) => match LanguageTag::parse(tag.clone()) {
                Ok(tag) => tag.into_inner(),
                Err(source) => return Err(SettingsError::Language { tag, source }),
            },
            None => defaults.language,
        };

        Ok(azure::Params {
            region: self.region,
            subscription_key: self.subscription_key,
            language,
            voice: self.voice.unwrap_or(defaults.voice),
        })
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn missing_file_yields_empty_settings() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load(&dir.path().join(DEFAULT_SETTINGS_FILE)).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn file_uses_camel_case_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_SETTINGS_FILE);
        fs::write(
            &path,
            r#"{ "subscriptionKey": "key", "region": "westeurope", "voice": "en-GB-LibbyNeural" }"#,
        )
        .unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.subscription_key.as_deref(), Some("key"));
        assert_eq!(settings.region.as_deref(), Some("westeurope"));
        assert_eq!(settings.voice.as_deref(), Some("en-GB-LibbyNeural"));
        assert_eq!(settings.language, None);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_SETTINGS_FILE);
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            Settings::load(&path),
            Err(SettingsError::Parse { .. })
        ));
    }

    #[test]
    fn environment_overrides_file() {
        let file = Settings {
            subscription_key: Some("file-key".into()),
            region: Some("westus".into()),
            ..Settings::default()
        };
        let settings = file.with_env(vars(&[("region", "eastus"), ("PATH", "/bin")]));
        assert_eq!(settings.subscription_key.as_deref(), Some("file-key"));
        assert_eq!(settings.region.as_deref(), Some("eastus"));
    }

    #[rstest]
    #[case(&[("subscriptionKey", "plain")], Some("plain"))]
    #[case(&[("AZURE_SUBSCRIPTION_KEY", "prefixed")], Some("prefixed"))]
    #[case(&[("subscriptionKey", "plain"), ("AZURE_SUBSCRIPTION_KEY", "prefixed")], Some("prefixed"))]
    #[case(&[("AZURE_SUBSCRIPTION_KEY", "  ")], None)]
    fn subscription_key_from_environment(
        #[case] pairs: &[(&str, &str)],
        #[case] expected: Option<&str>,
    ) {
        let settings = Settings::default().with_env(vars(pairs));
        assert_eq!(settings.subscription_key.as_deref(), expected);
    }

    #[test]
    fn command_line_overrides_win() {
        let settings = Settings {
            language: Some("de-DE".into()),
            voice: Some("de-DE-KatjaNeural".into()),
            ..Settings::default()
        }
        .with_overrides(Some("en-GB".into()), None);
        assert_eq!(settings.language.as_deref(), Some("en-GB"));
        assert_eq!(settings.voice.as_deref(), Some("de-DE-KatjaNeural"));
    }

    #[test]
    fn params_fall_back_to_defaults() {
        let params = Settings::default().into_params().unwrap();
        assert_eq!(params.language, azure::DEFAULT_LANGUAGE);
        assert_eq!(params.voice, azure::DEFAULT_VOICE);
        assert_eq!(params.subscription_key, None);
    }

    #[test]
    fn invalid_language_is_rejected() {
        let settings = Settings {
            language: Some("not a tag".into()),
            ..Settings::default()
        };
        assert!(matches!(
            settings.into_params(),
            Err(SettingsError::Language { .. })
        ));
    }
}
