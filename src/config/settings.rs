//! Operator settings for Libris
//!
//! Lending policy (loan length, fine rate), session policy (timeout, login
//! attempts) and display preferences, persisted as `config.json`.

use serde::{Deserialize, Serialize};

use super::paths::LibrisPaths;
use crate::error::LibrisError;
use crate::models::Money;

/// Operator settings for Libris
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Loan period in days; due date is borrow time plus this many days
    #[serde(default = "default_loan_days")]
    pub loan_days: i64,

    /// Fine charged per started day past the due date
    #[serde(default = "default_fine_per_day")]
    pub fine_per_day: Money,

    /// Idle seconds before a logged-in session is forced back to the login screen
    #[serde(default = "default_session_timeout_secs")]
    pub session_timeout_secs: i64,

    /// Password prompts offered per login invocation
    #[serde(default = "default_max_login_attempts")]
    pub max_login_attempts: u32,

    /// Currency symbol used when printing fines
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Default tracing filter when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_loan_days() -> i64 {
    7
}

fn default_fine_per_day() -> Money {
    Money::from_cents(1000)
}

fn default_session_timeout_secs() -> i64 {
    600
}

fn default_max_login_attempts() -> u32 {
    3
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            loan_days: default_loan_days(),
            fine_per_day: default_fine_per_day(),
            session_timeout_secs: default_session_timeout_secs(),
            max_login_attempts: default_max_login_attempts(),
            currency_symbol: default_currency(),
            date_format: default_date_format(),
            log_level: default_log_level(),
        }
    }
}

impl Settings {
    /// Loan period in seconds
    pub fn loan_period_secs(&self) -> i64 {
        self.loan_days * crate::models::SECONDS_PER_DAY
    }

    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &LibrisPaths) -> Result<Self, LibrisError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| LibrisError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                LibrisError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            settings.validate()?;
            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &LibrisPaths) -> Result<(), LibrisError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| LibrisError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| LibrisError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    fn validate(&self) -> Result<(), LibrisError> {
        if self.loan_days <= 0 {
            return Err(LibrisError::Config("loan_days must be positive".into()));
        }
        if self.fine_per_day.is_negative() {
            return Err(LibrisError::Config("fine_per_day cannot be negative".into()));
        }
        if self.session_timeout_secs <= 0 {
            return Err(LibrisError::Config(
                "session_timeout_secs must be positive".into(),
            ));
        }
        if self.max_login_attempts == 0 {
            return Err(LibrisError::Config(
                "max_login_attempts must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.loan_days, 7);
        assert_eq!(settings.fine_per_day, Money::from_cents(1000));
        assert_eq!(settings.session_timeout_secs, 600);
        assert_eq!(settings.max_login_attempts, 3);
        assert_eq!(settings.loan_period_secs(), 7 * 86_400);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LibrisPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.loan_days = 14;
        settings.fine_per_day = Money::from_cents(250);

        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.loan_days, 14);
        assert_eq!(loaded.fine_per_day, Money::from_cents(250));
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LibrisPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.settings_file(), r#"{"loan_days": 21}"#).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.loan_days, 21);
        assert_eq!(loaded.max_login_attempts, 3);
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LibrisPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.settings_file(), r#"{"max_login_attempts": 0}"#).unwrap();

        let err = Settings::load_or_create(&paths).unwrap_err();
        assert!(matches!(err, LibrisError::Config(_)));
    }
}
