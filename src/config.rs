use std::env;
use std::net::SocketAddr;

#[derive(Clone)]
pub struct Config {
    // Redis
    pub redis_url: String,

    // Session signing secret (HS256)
    pub jwt_secret: String,

    // Solana JSON-RPC endpoint
    pub rpc_url: String,

    // Server
    pub bind_addr: SocketAddr,

    // TTLs (in seconds)
    pub session_ttl_secs: u64,
    pub challenge_ttl_secs: u64,

    // Rate limiting
    pub rate_limit_auth_per_min: u32,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("redis_url", &"[REDACTED]")
            .field("jwt_secret", &"[REDACTED]")
            .field("rpc_url", &self.rpc_url)
            .field("bind_addr", &self.bind_addr)
            .field("session_ttl_secs", &self.session_ttl_secs)
            .field("challenge_ttl_secs", &self.challenge_ttl_secs)
            .field("rate_limit_auth_per_min", &self.rate_limit_auth_per_min)
            .finish()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),

    #[error("Failed to parse {0}: {1}")]
    ParseError(String, String),
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Attempt to load .env file, but don't fail if it doesn't exist
        // (env vars may be set directly in production)
        let _ = dotenvy::dotenv();

        // Redis — required to prevent silent unauthenticated connections
        let redis_url =
            env::var("REDIS_URL").map_err(|_| ConfigError::MissingVar("REDIS_URL".to_string()))?;

        // Session signing secret — required, minimum 32 characters
        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| ConfigError::MissingVar("JWT_SECRET".to_string()))?;
        if jwt_secret.len() < 32 {
            return Err(ConfigError::InvalidValue(
                "JWT_SECRET".to_string(),
                "must be at least 32 characters".to_string(),
            ));
        }

        // Ledger RPC endpoint
        let rpc_url =
            env::var("RPC_URL").unwrap_or_else(|_| "https://api.devnet.solana.com".to_string());
        if !rpc_url.starts_with("http://") && !rpc_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue(
                "RPC_URL".to_string(),
                "must be an http(s) URL".to_string(),
            ));
        }

        // Server
        let bind_addr_str = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3001".to_string());
        let bind_addr = bind_addr_str
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::ParseError("BIND_ADDR".to_string(), e.to_string()))?;

        // TTLs
        let session_ttl_secs = parse_env_or_default("SESSION_TTL_SECS", 86_400)?;
        let challenge_ttl_secs = parse_env_or_default("CHALLENGE_TTL_SECS", 300)?;

        // Rate limiting
        let rate_limit_auth_per_min = parse_env_or_default("RATE_LIMIT_AUTH_PER_MIN", 10)?;

        Ok(Config {
            redis_url,
            jwt_secret,
            rpc_url,
            bind_addr,
            session_ttl_secs,
            challenge_ttl_secs,
            rate_limit_auth_per_min,
        })
    }
}

/// Helper function to parse environment variable with a default value
fn parse_env_or_default<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(val) => val
            .parse::<T>()
            .map_err(|e| ConfigError::ParseError(key.to_string(), format!("{}: {}", e, val))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Use a mutex to ensure tests run serially since they modify global env vars.
    // unwrap_or_else handles poison from prior panics.
    static TEST_MUTEX: Mutex<()> = Mutex::new(());

    fn lock_test() -> std::sync::MutexGuard<'static, ()> {
        TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn clear_test_env() {
        env::remove_var("REDIS_URL");
        env::remove_var("JWT_SECRET");
        env::remove_var("RPC_URL");
        env::remove_var("BIND_ADDR");
        env::remove_var("SESSION_TTL_SECS");
        env::remove_var("CHALLENGE_TTL_SECS");
        env::remove_var("RATE_LIMIT_AUTH_PER_MIN");
    }

    const TEST_SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn set_required_env() {
        env::set_var("REDIS_URL", "redis://127.0.0.1:6379");
        env::set_var("JWT_SECRET", TEST_SECRET);
    }

    #[test]
    fn test_parse_env_or_default() {
        let _guard = lock_test();

        env::set_var("TEST_U64", "12345");
        let result: Result<u64, ConfigError> = parse_env_or_default("TEST_U64", 100);
        assert_eq!(result.unwrap(), 12345);

        env::remove_var("TEST_U64");
        let result: Result<u64, ConfigError> = parse_env_or_default("TEST_U64", 100);
        assert_eq!(result.unwrap(), 100);
    }

    #[test]
    fn test_missing_jwt_secret() {
        let _guard = lock_test();
        clear_test_env();

        env::set_var("REDIS_URL", "redis://127.0.0.1:6379");
        // Set JWT_SECRET empty so a .env file cannot supply a valid one
        // (dotenvy does not override existing vars).
        env::set_var("JWT_SECRET", "");

        let result = Config::from_env();
        assert!(result.is_err());
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::InvalidValue(ref s, _) if s == "JWT_SECRET"
        ));

        clear_test_env();
    }

    #[test]
    fn test_short_jwt_secret() {
        let _guard = lock_test();
        clear_test_env();

        env::set_var("REDIS_URL", "redis://127.0.0.1:6379");
        env::set_var("JWT_SECRET", "too-short");

        let result = Config::from_env();
        assert!(result.is_err());
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::InvalidValue(ref s, _) if s == "JWT_SECRET"
        ));

        clear_test_env();
    }

    #[test]
    fn test_invalid_socket_addr() {
        let _guard = lock_test();
        clear_test_env();

        set_required_env();
        env::set_var("BIND_ADDR", "invalid_address");

        let result = Config::from_env();
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), ConfigError::ParseError(_, _)));

        clear_test_env();
    }

    #[test]
    fn test_invalid_rpc_url() {
        let _guard = lock_test();
        clear_test_env();

        set_required_env();
        env::set_var("RPC_URL", "ftp://not-a-rpc-endpoint");

        let result = Config::from_env();
        assert!(result.is_err());
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::InvalidValue(ref s, _) if s == "RPC_URL"
        ));

        clear_test_env();
    }

    #[test]
    fn test_config_defaults() {
        let _guard = lock_test();
        clear_test_env();

        set_required_env();
        env::set_var("BIND_ADDR", "0.0.0.0:3001");

        let config = Config::from_env().unwrap();

        assert_eq!(config.redis_url, "redis://127.0.0.1:6379");
        assert_eq!(config.jwt_secret, TEST_SECRET);
        assert_eq!(config.rpc_url, "https://api.devnet.solana.com");
        assert_eq!(config.bind_addr.to_string(), "0.0.0.0:3001");
        assert_eq!(config.session_ttl_secs, 86_400);
        assert_eq!(config.challenge_ttl_secs, 300);
        assert_eq!(config.rate_limit_auth_per_min, 10);

        clear_test_env();
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let _guard = lock_test();
        clear_test_env();

        set_required_env();
        let config = Config::from_env().unwrap();
        let debug = format!("{:?}", config);
        assert!(!debug.contains(TEST_SECRET));
        assert!(debug.contains("[REDACTED]"));

        clear_test_env();
    }
}
