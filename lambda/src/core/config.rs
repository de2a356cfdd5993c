use std::env;
use std::str::FromStr;

use crate::errors::BotError;

pub const DEFAULT_DICE_API_URL: &str = "https://fzatry6j6k.execute-api.us-west-2.amazonaws.com/dev/";

/// Which revision of the dice service API the bot talks to.
///
/// The variant fixes the endpoint path, the query parameter name and the
/// reply formatting policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RollApi {
    /// `GET {base}?dice=..` answering `{ total }`.
    #[default]
    TotalOnly,
    /// `GET {base}?dice=..` answering a notation string and the rolls.
    Breakdown,
    /// `GET {base}/roll/?roll=..` answering a parsed instruction and the rolls.
    Structured,
}

impl FromStr for RollApi {
    type Err = BotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "total-only" | "total" | "v1" => Ok(RollApi::TotalOnly),
            "breakdown" | "v2" => Ok(RollApi::Breakdown),
            "structured" | "v3" => Ok(RollApi::Structured),
            other => Err(BotError::Config(format!(
                "DICE_API_VARIANT: unknown variant '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub microsoft_app_id: String,
    pub microsoft_app_password: String,
    pub dice_api_url: String,
    pub dice_api_variant: RollApi,
    pub error_reporting_project: Option<String>,
}

impl AppConfig {
    /// # Errors
    ///
    /// Returns `BotError::Config` naming the first missing or invalid variable.
    pub fn from_env() -> Result<Self, BotError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup, so tests need not touch
    /// the process environment.
    ///
    /// # Errors
    ///
    /// Returns `BotError::Config` naming the first missing or invalid variable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, BotError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| BotError::Config(format!("{key}: environment variable not found")))
        };

        Ok(Self {
            microsoft_app_id: required("MICROSOFT_APP_ID")?,
            microsoft_app_password: required("MICROSOFT_APP_PASSWORD")?,
            dice_api_url: lookup("DICE_API_URL")
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_DICE_API_URL.to_string()),
            dice_api_variant: lookup("DICE_API_VARIANT")
                .filter(|v| !v.is_empty())
                .map(|v| v.parse::<RollApi>())
                .transpose()?
                .unwrap_or_default(),
            error_reporting_project: lookup("ERROR_REPORTING_PROJECT").filter(|v| !v.is_empty()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_optional_vars_missing() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("MICROSOFT_APP_ID", "app"),
            ("MICROSOFT_APP_PASSWORD", "secret"),
        ]))
        .unwrap();

        assert_eq!(config.dice_api_url, DEFAULT_DICE_API_URL);
        assert_eq!(config.dice_api_variant, RollApi::TotalOnly);
        assert!(config.error_reporting_project.is_none());
    }

    #[test]
    fn test_missing_app_password_is_named() {
        let err = AppConfig::from_lookup(lookup_from(&[("MICROSOFT_APP_ID", "app")])).unwrap_err();
        assert!(err.to_string().contains("MICROSOFT_APP_PASSWORD"));
    }

    #[test]
    fn test_variant_and_reporting_project() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("MICROSOFT_APP_ID", "app"),
            ("MICROSOFT_APP_PASSWORD", "secret"),
            ("DICE_API_URL", "https://dice.example.com/dev/"),
            ("DICE_API_VARIANT", "Structured"),
            ("ERROR_REPORTING_PROJECT", "dicebot"),
        ]))
        .unwrap();

        assert_eq!(config.dice_api_url, "https://dice.example.com/dev/");
        assert_eq!(config.dice_api_variant, RollApi::Structured);
        assert_eq!(config.error_reporting_project.as_deref(), Some("dicebot"));
    }

    #[test]
    fn test_unknown_variant_rejected() {
        assert!("v4".parse::<RollApi>().is_err());
        assert_eq!("breakdown".parse::<RollApi>().unwrap(), RollApi::Breakdown);
    }
}
