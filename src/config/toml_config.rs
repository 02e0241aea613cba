use crate::adapters::throttle::Rate;
use crate::domain::model::{User, UserId};
use crate::utils::error::{AdError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

pub const DEFAULT_BIND: &str = "127.0.0.1:8000";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub throttle: ThrottleConfig,
    #[serde(default)]
    pub users: Vec<UserConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub json: bool,
}

/// Request-rate ceilings, e.g. `"100/day"`. An unset rate disables the throttle.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThrottleConfig {
    pub anon: Option<String>,
    pub user: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserConfig {
    pub id: UserId,
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub token: String,
}

impl UserConfig {
    pub fn to_user(&self) -> User {
        User {
            id: self.id,
            username: self.username.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
        }
    }
}

impl ThrottleConfig {
    pub fn anon_rate(&self) -> Result<Option<Rate>> {
        self.anon.as_deref().map(str::parse).transpose()
    }

    pub fn user_rate(&self) -> Result<Option<Rate>> {
        self.user.as_deref().map(str::parse).transpose()
    }
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AdError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| AdError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${ALICE_TOKEN})
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| AdError::ConfigError {
            message: format!("env substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn bind_addr(&self) -> Result<std::net::SocketAddr> {
        validation::validate_socket_addr("server.bind", &self.server.bind)
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.bind_addr()?;
        self.throttle.anon_rate()?;
        self.throttle.user_rate()?;

        let mut ids = HashSet::new();
        let mut tokens = HashSet::new();
        for user in &self.users {
            validation::validate_positive_number("users.id", user.id, 1)?;
            validation::validate_non_empty_string("users.username", &user.username)?;
            validation::validate_non_empty_string("users.token", &user.token)?;

            if user.token.contains("${") {
                return Err(AdError::InvalidConfigValueError {
                    field: "users.token".to_string(),
                    value: user.token.clone(),
                    reason: "environment variable is not set".to_string(),
                });
            }
            if !ids.insert(user.id) {
                return Err(AdError::InvalidConfigValueError {
                    field: "users.id".to_string(),
                    value: user.id.to_string(),
                    reason: "duplicate user id".to_string(),
                });
            }
            if !tokens.insert(user.token.as_str()) {
                return Err(AdError::InvalidConfigValueError {
                    field: "users.token".to_string(),
                    value: user.username.clone(),
                    reason: "token is shared with another user".to_string(),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r#"
[server]
bind = "0.0.0.0:9000"

[logging]
json = true

[throttle]
anon = "10/minute"
user = "1000/day"

[[users]]
id = 1
username = "alice"
first_name = "Alice"
token = "alice-token"

[[users]]
id = 2
username = "bob"
token = "bob-token"
"#;

    #[test]
    fn test_parse_full_config() {
        let config = AppConfig::from_toml_str(SAMPLE).unwrap();

        assert_eq!(config.server.bind, "0.0.0.0:9000");
        assert!(config.logging.json);
        assert_eq!(config.users.len(), 2);
        assert_eq!(config.users[0].to_user().first_name, "Alice");
        assert_eq!(config.users[1].last_name, "");
        assert_eq!(config.throttle.anon_rate().unwrap().unwrap().requests, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config.server.bind, DEFAULT_BIND);
        assert!(config.users.is_empty());
        assert!(config.throttle.user_rate().unwrap().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("ADBOARD_TEST_CAROL_TOKEN", "carol-secret");

        let config = AppConfig::from_toml_str(
            r#"
[[users]]
id = 3
username = "carol"
token = "${ADBOARD_TEST_CAROL_TOKEN}"
"#,
        )
        .unwrap();
        assert_eq!(config.users[0].token, "carol-secret");

        std::env::remove_var("ADBOARD_TEST_CAROL_TOKEN");
    }

    #[test]
    fn test_unset_env_var_fails_validation() {
        let config = AppConfig::from_toml_str(
            r#"
[[users]]
id = 3
username = "carol"
token = "${ADBOARD_TEST_NEVER_SET}"
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_errors() {
        let bad_bind = AppConfig::from_toml_str("[server]\nbind = \"nowhere\"\n").unwrap();
        assert!(bad_bind.validate().is_err());

        let bad_rate = AppConfig::from_toml_str("[throttle]\nuser = \"5/fortnight\"\n").unwrap();
        assert!(bad_rate.validate().is_err());

        let duplicate = AppConfig::from_toml_str(
            r#"
[[users]]
id = 1
username = "a"
token = "same"

[[users]]
id = 2
username = "b"
token = "same"
"#,
        )
        .unwrap();
        assert!(duplicate.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(SAMPLE.as_bytes()).unwrap();

        let config = AppConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.users[1].username, "bob");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        assert!(matches!(
            AppConfig::from_file("/definitely/not/here.toml"),
            Err(AdError::IoError(_))
        ));
    }
}
