use crate::token::codec::JwtConfig;

/// Runtime configuration for the API server, read once at startup.
///
/// Every field falls back to a local-development value; deployments override
/// through the environment.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the listener binds to.
    pub host: String,
    /// Port the listener binds to.
    pub port: u16,
    /// Origins the CORS layer accepts, comma-separated in `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// Per-request timeout enforced by the middleware stack, in seconds.
    pub request_timeout_secs: u64,
    /// Lifetime of a password-reset OTP, in seconds. Deliberately short by
    /// default; raise `OTP_TTL_SECS` to loosen it.
    pub otp_ttl_secs: i64,
    /// Token signing secret and expiry windows.
    pub jwt: JwtConfig,
}

/// Read `key` from the environment, falling back to `default` when unset.
pub(crate) fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

impl ServerConfig {
    /// Build the configuration from environment variables.
    ///
    /// | Env Var                | Default                 |
    /// |------------------------|-------------------------|
    /// | `HOST`                 | `0.0.0.0`               |
    /// | `PORT`                 | `3000`                  |
    /// | `CORS_ORIGINS`         | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                    |
    /// | `OTP_TTL_SECS`         | `61`                    |
    ///
    /// # Panics
    ///
    /// Panics when a numeric variable is set but not parsable.
    pub fn from_env() -> Self {
        let port: u16 = env_or("PORT", "3000")
            .parse()
            .expect("PORT must be a valid u16");

        let request_timeout_secs: u64 = env_or("REQUEST_TIMEOUT_SECS", "30")
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let otp_ttl_secs: i64 = env_or("OTP_TTL_SECS", "61")
            .parse()
            .expect("OTP_TTL_SECS must be a valid i64");

        let cors_origins: Vec<String> = env_or("CORS_ORIGINS", "http://localhost:5173")
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();

        Self {
            host: env_or("HOST", "0.0.0.0"),
            port,
            cors_origins,
            request_timeout_secs,
            otp_ttl_secs,
            jwt: JwtConfig::from_env(),
        }
    }
}
