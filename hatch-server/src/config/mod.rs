//! Configuration module for hatch-server.
//!
//! Handles loading configuration from the TOML file, environment variables
//! and CLI arguments, in that order of precedence. Also handles admin
//! secret hashing.

pub mod file;

use crate::config::file::{FileConfig, is_hashed_secret};
use chrono_tz::Tz;
use hatch_core::config::{
    AccessConfig, AdminConfig, DEFAULT_API_BASE, DEFAULT_TITLE, DEFAULT_TIMEZONE, ReportConfig,
    ServerConfig, SharedConfig, StripeConfig, TelegramConfig,
};
use hatch_sdk::signature::DEFAULT_TOLERANCE;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("validation error: {0}")]
    ValidationError(String),

    #[error("password hashing error: {0}")]
    HashError(String),
}

/// Loaded configuration result containing all parts.
#[derive(Debug)]
pub struct LoadedConfig {
    pub server: ServerConfig,
    pub telegram: TelegramConfig,
    pub stripe: StripeConfig,
    pub report: ReportConfig,
    pub access: AccessConfig,
}

impl LoadedConfig {
    /// Wrap the reloadable sections in config stores.
    pub fn into_shared(self) -> SharedConfig {
        SharedConfig::new(self.telegram, self.stripe, self.report, self.access)
    }

    /// Push every reloadable section into an existing [`SharedConfig`].
    pub fn apply_to(self, shared: &SharedConfig) {
        shared.telegram.update(self.telegram);
        shared.stripe.update(self.stripe);
        shared.report.update(self.report);
        shared.access.update(self.access);
    }
}

/// Configuration loader that handles the complete loading process.
pub struct ConfigLoader {
    config_path: PathBuf,
    listen_override: Option<SocketAddr>,
}

impl ConfigLoader {
    /// Create a new config loader.
    pub fn new(config_path: impl AsRef<Path>, listen_override: Option<SocketAddr>) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
            listen_override,
        }
    }

    /// Load and process the configuration from the process environment.
    pub fn load(&self) -> Result<LoadedConfig, ConfigError> {
        self.load_with_env(|key| std::env::var(key).ok())
    }

    /// Load and process the configuration.
    ///
    /// This will:
    /// 1. Read the TOML file, if there is one
    /// 2. Hash a plaintext admin secret in the file (and rewrite the file)
    /// 3. Apply environment overrides, then CLI overrides
    /// 4. Validate and build the runtime configuration
    pub fn load_with_env(
        &self,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<LoadedConfig, ConfigError> {
        let mut file_config = self.read_file()?;

        if let Some(plaintext) = file_config.plaintext_admin_secret() {
            let hash = hash_secret(plaintext)?;
            file_config.admin.secret = Some(hash);
            self.rewrite_config(&file_config)?;
            tracing::info!("Admin secret hashed and config file updated");
        }

        apply_env(&mut file_config, env)?;

        if let Some(listen) = self.listen_override {
            file_config.server.listen = listen;
        }

        build_loaded_config(file_config)
    }

    /// Reload the configuration (used during SIGHUP).
    pub fn reload(&self) -> Result<LoadedConfig, ConfigError> {
        self.load()
    }

    fn read_file(&self) -> Result<FileConfig, ConfigError> {
        match std::fs::read_to_string(&self.config_path) {
            Ok(content) => Ok(toml::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = ?self.config_path, "No config file, using defaults and environment");
                Ok(FileConfig::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn rewrite_config(&self, config: &FileConfig) -> Result<(), ConfigError> {
        let toml_string = toml::to_string_pretty(config)?;

        // Write atomically: write to temp file, then rename
        let temp_path = self.config_path.with_extension("toml.tmp");
        std::fs::write(&temp_path, toml_string)?;
        std::fs::rename(&temp_path, &self.config_path)?;

        Ok(())
    }
}

fn apply_env(
    config: &mut FileConfig,
    env: impl Fn(&str) -> Option<String>,
) -> Result<(), ConfigError> {
    let env = |key: &str| env(key).filter(|v| !v.trim().is_empty());

    if let Some(listen) = env("LISTEN") {
        config.server.listen = listen.parse().map_err(|_| {
            ConfigError::ValidationError(format!("LISTEN is not a socket address: {listen}"))
        })?;
    }
    if let Some(port) = env("PORT") {
        let port = port
            .parse()
            .map_err(|_| ConfigError::ValidationError(format!("PORT is not a port: {port}")))?;
        config.server.listen.set_port(port);
    }
    if let Some(token) = env("TELEGRAM_BOT_TOKEN") {
        config.telegram.bot_token = Some(token);
    }
    if let Some(chat_id) = env("TELEGRAM_CHAT_ID") {
        config.telegram.chat_id = Some(chat_id);
    }
    if let Some(secret) = env("STRIPE_WEBHOOK_SECRET") {
        config.stripe.webhook_secret = Some(secret);
    }
    if let Some(timezone) = env("TIMEZONE") {
        config.report.timezone = Some(timezone);
    }
    if let Some(key) = env("QR_API_KEY") {
        config.qr.api_key = Some(key);
    }
    if let Some(secret) = env("ADMIN_SECRET") {
        config.admin.secret = Some(secret);
    }
    Ok(())
}

fn build_loaded_config(file_config: FileConfig) -> Result<LoadedConfig, ConfigError> {
    let FileConfig {
        server,
        telegram,
        stripe,
        report,
        tracking,
        qr,
        admin,
    } = file_config;

    let timezone = match report.timezone.as_deref().map(str::trim) {
        Some(name) => name.parse::<Tz>().map_err(|_| {
            ConfigError::ValidationError(format!("unknown timezone: {name}"))
        })?,
        None => DEFAULT_TIMEZONE,
    };

    let chat_id = telegram.chat_id.map(|id| id.trim().to_string());
    if chat_id.as_deref() == Some("") {
        return Err(ConfigError::ValidationError(
            "telegram.chat_id must not be empty".to_string(),
        ));
    }

    let api_base = telegram.api_base.as_deref().unwrap_or(DEFAULT_API_BASE);
    let api_base = Url::parse(api_base).map_err(|e| {
        ConfigError::ValidationError(format!("invalid telegram.api_base {api_base}: {e}"))
    })?;

    let tolerance_secs = stripe.tolerance_secs.unwrap_or(DEFAULT_TOLERANCE);
    if tolerance_secs <= 0 {
        return Err(ConfigError::ValidationError(
            "stripe.tolerance_secs must be positive".to_string(),
        ));
    }

    // Env-provided secrets are plaintext; hash them in memory only.
    let secret_hash = match admin.secret {
        Some(secret) if is_hashed_secret(&secret) => Some(secret),
        Some(secret) => Some(hash_secret(&secret)?),
        None => None,
    };

    Ok(LoadedConfig {
        server: ServerConfig {
            listen: server.listen,
            allowed_origins: tracking.allowed_origins,
        },
        telegram: TelegramConfig {
            bot_token: telegram.bot_token,
            chat_id,
            api_base,
        },
        stripe: StripeConfig::new(stripe.webhook_secret, tolerance_secs, stripe.allow_unsigned),
        report: ReportConfig {
            timezone,
            title: report.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            notify_purchases: report.notify_purchases.unwrap_or(true),
        },
        access: AccessConfig {
            qr_api_key: qr.api_key,
            admin: AdminConfig::new(secret_hash),
        },
    })
}

fn hash_secret(plaintext: &str) -> Result<String, ConfigError> {
    use argon2::{
        Argon2, PasswordHasher,
        password_hash::{SaltString, rand_core::OsRng},
    };

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(plaintext.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ConfigError::HashError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// A config path under the temp dir that no other test uses.
    fn temp_config(name: &str, content: Option<&str>) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("hatch-config-{}-{name}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("hatch-config.toml");
        match content {
            Some(content) => std::fs::write(&path, content).unwrap(),
            None => {
                let _ = std::fs::remove_file(&path);
            }
        }
        path
    }

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let path = temp_config("missing", None);
        let loaded = ConfigLoader::new(&path, None)
            .load_with_env(env_of(&[]))
            .unwrap();

        assert_eq!(loaded.server.listen, file::default_listen_addr());
        assert_eq!(loaded.report.timezone, DEFAULT_TIMEZONE);
        assert_eq!(loaded.report.title, DEFAULT_TITLE);
        assert!(loaded.report.notify_purchases);
        assert!(loaded.telegram.credentials().is_none());
        assert!(loaded.stripe.secret_bytes().is_none());
        assert_eq!(loaded.stripe.tolerance_secs, DEFAULT_TOLERANCE);
        assert!(!loaded.access.admin.is_protected());
    }

    #[test]
    fn test_precedence_file_env_cli() {
        let path = temp_config(
            "precedence",
            Some("[server]\nlisten = \"127.0.0.1:3000\"\n[report]\ntimezone = \"Europe/Berlin\"\n"),
        );
        let cli: SocketAddr = "127.0.0.1:9999".parse().unwrap();

        let loaded = ConfigLoader::new(&path, None)
            .load_with_env(env_of(&[("TIMEZONE", "Asia/Tokyo"), ("PORT", "4000")]))
            .unwrap();
        assert_eq!(loaded.report.timezone, chrono_tz::Asia::Tokyo);
        assert_eq!(loaded.server.listen.port(), 4000);

        let loaded = ConfigLoader::new(&path, Some(cli))
            .load_with_env(env_of(&[("PORT", "4000")]))
            .unwrap();
        assert_eq!(loaded.server.listen, cli);
        assert_eq!(loaded.report.timezone, chrono_tz::Europe::Berlin);
    }

    #[test]
    fn test_plaintext_admin_secret_is_hashed_in_file() {
        let path = temp_config("admin", Some("[admin]\nsecret = \"debug-secret\"\n"));
        let loaded = ConfigLoader::new(&path, None)
            .load_with_env(env_of(&[]))
            .unwrap();
        assert!(loaded.access.admin.verify_secret("debug-secret"));

        let rewritten: FileConfig =
            toml::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        let stored = rewritten.admin.secret.unwrap();
        assert!(is_hashed_secret(&stored));
        assert_eq!(loaded.access.admin.secret_hash.as_deref(), Some(stored.as_str()));
    }

    #[test]
    fn test_env_admin_secret_is_not_written() {
        let path = temp_config("admin-env", Some("[report]\ntitle = \"Hatch\"\n"));
        let loaded = ConfigLoader::new(&path, None)
            .load_with_env(env_of(&[("ADMIN_SECRET", "from-env")]))
            .unwrap();
        assert!(loaded.access.admin.verify_secret("from-env"));
        assert!(!std::fs::read_to_string(&path).unwrap().contains("argon2"));
    }

    #[test]
    fn test_validation_errors() {
        let path = temp_config("invalid", None);
        let loader = ConfigLoader::new(&path, None);

        let err = loader
            .load_with_env(env_of(&[("TIMEZONE", "Mars/Olympus")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));

        let err = loader
            .load_with_env(env_of(&[("PORT", "eighty")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));

        let path = temp_config("tolerance", Some("[stripe]\ntolerance_secs = 0\n"));
        let err = ConfigLoader::new(&path, None)
            .load_with_env(env_of(&[]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }
}
