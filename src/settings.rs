use chrono::NaiveDate;
use config::{Config, ConfigError, Environment, Source};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Settings {
    pub debug: bool,
    pub auth_token: String,
    pub enable_swagger: bool,
    pub port: u16,
    pub anchor_date: NaiveDate,
    pub initial_days: u32,
    pub more_days: u32,
    pub calendar_name: String,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_source(environment())
    }

    fn from_source<S>(source: S) -> Result<Self, ConfigError>
    where
        S: Source + Send + Sync + 'static,
    {
        let config = Config::builder()
            .add_source(source)
            .set_default("debug", false)?
            .set_default("auth_token", "default-token-change-me")?
            .set_default("enable_swagger", true)?
            .set_default("port", 8080)?
            .set_default("anchor_date", "2024-12-16")?
            .set_default("initial_days", 10)?
            .set_default("more_days", 25)?
            .set_default("calendar_name", "Booking Feed")?
            .build()?;

        config.try_deserialize()
    }
}

// APP_AUTH_TOKEN -> auth_token; nested keys use a double underscore
fn environment() -> Environment {
    Environment::with_prefix("APP")
        .prefix_separator("_")
        .separator("__")
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn with_vars(vars: &[(&str, &str)]) -> Settings {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_source(environment().source(Some(map))).unwrap()
    }

    #[test]
    fn test_defaults() {
        let settings = with_vars(&[]);
        assert_eq!(
            settings.anchor_date,
            NaiveDate::from_ymd_opt(2024, 12, 16).unwrap()
        );
        assert_eq!(settings.initial_days, 10);
        assert_eq!(settings.more_days, 25);
        assert_eq!(settings.port, 8080);
        assert!(!settings.debug);
    }

    #[test]
    fn test_numeric_looking_token_is_kept_verbatim() {
        let settings = with_vars(&[
            ("APP_AUTH_TOKEN", "007"),
            ("APP_PORT", "9000"),
            ("APP_DEBUG", "true"),
            ("APP_ANCHOR_DATE", "2025-01-06"),
            ("APP_MORE_DAYS", "5"),
        ]);
        assert_eq!(settings.auth_token, "007");
        assert_eq!(settings.port, 9000);
        assert!(settings.debug);
        assert_eq!(
            settings.anchor_date,
            NaiveDate::from_ymd_opt(2025, 1, 6).unwrap()
        );
        assert_eq!(settings.more_days, 5);
    }
}
