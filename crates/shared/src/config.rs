//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Session token configuration.
    pub session: SessionConfig,
    /// Transaction workflow tuning.
    #[serde(default)]
    pub workflow: WorkflowConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Session token configuration.
///
/// Every value here is supplied externally; nothing is baked into the binary.
#[derive(Clone, Deserialize)]
pub struct SessionConfig {
    /// Secret key for signing session tokens (HS512).
    pub secret: String,
    /// Value of the `iss` claim, checked on verification.
    #[serde(default = "default_issuer")]
    pub issuer: String,
    /// Session token lifetime in seconds.
    #[serde(default = "default_expiration_secs")]
    pub expiration_secs: u64,
    /// Name of the HTTP-only cookie carrying the session token.
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
}

impl std::fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionConfig")
            .field("secret", &"[hidden]")
            .field("issuer", &self.issuer)
            .field("expiration_secs", &self.expiration_secs)
            .field("cookie_name", &self.cookie_name)
            .finish()
    }
}

fn default_issuer() -> String {
    "coffer".to_string()
}

fn default_expiration_secs() -> u64 {
    86400 // 1 day
}

fn default_cookie_name() -> String {
    "coffer_session".to_string()
}

/// Transaction workflow tuning.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowConfig {
    /// Maximum principals returned by the reviewer search.
    #[serde(default = "default_user_search_limit")]
    pub user_search_limit: u64,
    /// Transactions shown per page on the wallet view.
    #[serde(default = "default_wallet_page_size")]
    pub wallet_page_size: u32,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            user_search_limit: default_user_search_limit(),
            wallet_page_size: default_wallet_page_size(),
        }
    }
}

fn default_user_search_limit() -> u64 {
    10
}

fn default_wallet_page_size() -> u32 {
    10
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("COFFER").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
