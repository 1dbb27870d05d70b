use crate::adapters::twilio::{TwilioCredentials, DEFAULT_API_BASE_URL};
use crate::core::message::{DEFAULT_TEMPLATE, NAME_PLACEHOLDER};
use crate::domain::model::DEFAULT_STATUS;
use crate::utils::error::{EntregadorError, Result};
use crate::utils::logger::LogFormat;
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_phone_number, validate_range,
    validate_required_field, validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub registration: RegistrationConfig,
    pub store: StoreConfig,
    pub directory: DirectoryConfig,
    pub notifier: NotifierConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrationConfig {
    /// Status given to deliveries whose request carries none.
    pub default_status: String,
    pub message_template: String,
    pub request_timeout_seconds: Option<u64>,
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            default_status: DEFAULT_STATUS.to_string(),
            message_template: DEFAULT_TEMPLATE.to_string(),
            request_timeout_seconds: Some(10),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreKind {
    #[default]
    Memory,
    JsonFile,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub r#type: StoreKind,
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoryConfig {
    pub residents_file: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotifierKind {
    #[default]
    Log,
    Twilio,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifierConfig {
    pub r#type: NotifierKind,
    pub account_sid: Option<String>,
    pub auth_token: Option<String>,
    pub from: Option<String>,
    pub api_base_url: String,
    pub timeout_seconds: u64,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            r#type: NotifierKind::Log,
            account_sid: None,
            auth_token: None,
            from: None,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout_seconds: 10,
        }
    }
}

impl NotifierConfig {
    pub fn twilio_credentials(&self) -> Result<TwilioCredentials> {
        Ok(TwilioCredentials {
            account_sid: resolved("notifier.account_sid", &self.account_sid)?,
            auth_token: resolved("notifier.auth_token", &self.auth_token)?,
            from: resolved("notifier.from", &self.from)?,
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// A required value that is present and not an unresolved `${VAR}` placeholder.
fn resolved(field: &str, value: &Option<String>) -> Result<String> {
    let value = validate_required_field(field, value)?;
    if value.trim().is_empty() || value.contains("${") {
        return Err(EntregadorError::MissingConfigError {
            field: field.to_string(),
        });
    }
    Ok(value.clone())
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub format: LogFormat,
}

impl AppConfig {
    /// Defaults when no file is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EntregadorError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| EntregadorError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left as-is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| EntregadorError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.registration
            .request_timeout_seconds
            .map(Duration::from_secs)
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("server.bind_address", &self.server.bind_address)?;
        if self.server.bind_address.parse::<std::net::SocketAddr>().is_err() {
            return Err(EntregadorError::InvalidConfigValueError {
                field: "server.bind_address".to_string(),
                value: self.server.bind_address.clone(),
                reason: "Expected host:port, e.g. 0.0.0.0:8080".to_string(),
            });
        }

        validate_non_empty_string(
            "registration.default_status",
            &self.registration.default_status,
        )?;
        if !self
            .registration
            .message_template
            .contains(NAME_PLACEHOLDER)
        {
            return Err(EntregadorError::InvalidConfigValueError {
                field: "registration.message_template".to_string(),
                value: self.registration.message_template.clone(),
                reason: format!("Template must contain the {} placeholder", NAME_PLACEHOLDER),
            });
        }
        if let Some(timeout) = self.registration.request_timeout_seconds {
            validate_range("registration.request_timeout_seconds", timeout, 1, 300)?;
        }

        if self.store.r#type == StoreKind::JsonFile {
            let path = validate_required_field("store.path", &self.store.path)?;
            validate_path("store.path", path)?;
        }

        if let Some(residents_file) = &self.directory.residents_file {
            validate_path("directory.residents_file", residents_file)?;
        }

        if self.notifier.r#type == NotifierKind::Twilio {
            let credentials = self.notifier.twilio_credentials()?;
            validate_phone_number("notifier.from", &credentials.from)?;
            validate_url("notifier.api_base_url", &self.notifier.api_base_url)?;
            validate_range("notifier.timeout_seconds", self.notifier.timeout_seconds, 1, 120)?;
        }

        tracing::debug!("Configuration validation passed");
        Ok(())
    }
}
