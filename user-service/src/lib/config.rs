use std::env;
use std::str::FromStr;

use auth::Algorithm;
use auth::Authenticator;
use auth::JwtError;
use auth::JwtHandler;
use auth::TokenPolicy;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

/// Application configuration for user-service.
///
/// Read once at startup and handed to the components that need it.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    pub kafka: KafkaConfig,
    pub logging: LoggingConfig,
}

/// PostgreSQL database configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

/// HTTP server configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
    /// Base URL embedded in confirmation links.
    pub public_url: String,
}

/// Token signing configuration.
#[derive(Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub algorithm: String,
    pub access_token_expire_minutes: i64,
    pub confirm_token_expire_minutes: i64,
}

/// Kafka event broker configuration.
///
/// The same topic carries confirmation requests out and back into the
/// delivery consumer.
#[derive(Debug, Deserialize, Clone)]
pub struct KafkaConfig {
    pub brokers: String,
    pub topic: String,
    pub group_id: String,
}

/// Log output settings.
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Leading characters of an email local part left unmasked in logs.
    /// Defaults to 2 in development and 0 everywhere else.
    pub obfuscated_email_chars: usize,
}

impl JwtConfig {
    pub fn token_policy(&self) -> TokenPolicy {
        TokenPolicy::new(
            self.access_token_expire_minutes,
            self.confirm_token_expire_minutes,
        )
    }

    /// Build the shared authenticator from this configuration.
    ///
    /// # Errors
    /// * `UnsupportedAlgorithm` - Algorithm name is unknown or not HMAC based
    pub fn authenticator(&self) -> Result<Authenticator, JwtError> {
        let algorithm = Algorithm::from_str(&self.algorithm)
            .map_err(|_| JwtError::UnsupportedAlgorithm(self.algorithm.clone()))?;
        let jwt_handler = JwtHandler::new(self.secret.as_bytes(), algorithm)?;

        Ok(Authenticator::new(jwt_handler, self.token_policy()))
    }
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("algorithm", &self.algorithm)
            .field(
                "access_token_expire_minutes",
                &self.access_token_expire_minutes,
            )
            .field(
                "confirm_token_expire_minutes",
                &self.confirm_token_expire_minutes,
            )
            .finish()
    }
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (JWT__SECRET, SERVER__HTTP_PORT, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    /// 4. Built-in defaults for token lifetimes, algorithm and log masking
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        Self::builder(&run_mode)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: DATABASE__URL=postgres://... overrides database.url
            .add_source(Environment::default().separator("__"))
            .build()?
            .try_deserialize()
    }

    fn builder(
        run_mode: &str,
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        let obfuscated_email_chars: i64 = if run_mode == "development" { 2 } else { 0 };

        ConfigBuilder::builder()
            .set_default("server.http_port", 8000)?
            .set_default("server.public_url", "http://localhost:8000")?
            .set_default("jwt.algorithm", "HS256")?
            .set_default(
                "jwt.access_token_expire_minutes",
                TokenPolicy::DEFAULT_ACCESS_TOKEN_EXPIRE_MINUTES,
            )?
            .set_default(
                "jwt.confirm_token_expire_minutes",
                TokenPolicy::DEFAULT_CONFIRM_TOKEN_EXPIRE_MINUTES,
            )?
            .set_default("kafka.topic", "user.confirmations")?
            .set_default("kafka.group_id", "user-service-mailer")?
            .set_default("logging.obfuscated_email_chars", obfuscated_email_chars)
    }
}
