use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub api: ApiConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
    pub mail: MailConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub port: u16,
    pub enable_request_logging: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub max_connections: u32,
    /// Seconds to wait when acquiring a pooled connection
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// HMAC secret for session tokens. Never serialized back out.
    #[serde(skip_serializing)]
    pub jwt_secret: Option<String>,
    pub session_ttl_hours: u64,
    pub cookie_name: String,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    pub redis_url: String,
    pub queue_name: String,
    pub verify_url_base: String,
    #[serde(skip_serializing)]
    pub resend_api_key: Option<String>,
    pub resend_base_url: String,
    pub from_address: String,
}

/// Longest session lifetime accepted from configuration (one year)
pub const MAX_SESSION_TTL_HOURS: u64 = 24 * 365;

impl SecurityConfig {
    /// Session lifetime, clamped to `1..=MAX_SESSION_TTL_HOURS`
    pub fn session_ttl(&self) -> chrono::Duration {
        let hours = self.session_ttl_hours.clamp(1, MAX_SESSION_TTL_HOURS);
        chrono::Duration::hours(i64::try_from(hours).unwrap_or(1))
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // API overrides
        if let Ok(v) = env::var("PORT") {
            self.api.port = v.parse().unwrap_or(self.api.port);
        }
        if let Ok(v) = env::var("API_ENABLE_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = non_empty(v);
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }

        // Security overrides
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = non_empty(v);
        }
        if let Ok(v) = env::var("SECURITY_SESSION_TTL_HOURS") {
            match v.trim().parse::<u64>() {
                Ok(hours) if (1..=MAX_SESSION_TTL_HOURS).contains(&hours) => {
                    self.security.session_ttl_hours = hours;
                }
                _ => tracing::warn!(
                    "Ignoring SECURITY_SESSION_TTL_HOURS={:?}; expected 1..={}",
                    v,
                    MAX_SESSION_TTL_HOURS
                ),
            }
        }
        if let Ok(v) = env::var("SECURITY_COOKIE_NAME") {
            if !v.trim().is_empty() {
                self.security.cookie_name = v.trim().to_string();
            }
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        // Mail overrides
        if let Ok(v) = env::var("REDIS_URL") {
            self.mail.redis_url = v;
        }
        if let Ok(v) = env::var("MAIL_QUEUE_NAME") {
            self.mail.queue_name = v;
        }
        if let Ok(v) = env::var("MAIL_VERIFY_URL_BASE") {
            self.mail.verify_url_base = v;
        }
        if let Ok(v) = env::var("RESEND_API_KEY") {
            self.mail.resend_api_key = non_empty(v);
        }
        if let Ok(v) = env::var("RESEND_BASE_URL") {
            self.mail.resend_base_url = v.trim_end_matches('/').to_string();
        }
        if let Ok(v) = env::var("MAIL_FROM") {
            self.mail.from_address = v;
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            api: ApiConfig {
                port: 5000,
                enable_request_logging: true,
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 10,
                connection_timeout: 30,
            },
            security: SecurityConfig {
                jwt_secret: None,
                session_ttl_hours: 24,
                cookie_name: "token".to_string(),
                cors_origins: vec![
                    "http://localhost:3000".to_string(),
                    "http://localhost:5173".to_string(),
                ],
            },
            mail: MailConfig::defaults("http://localhost:5173/verify"),
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            api: ApiConfig {
                port: 5000,
                enable_request_logging: true,
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 20,
                connection_timeout: 10,
            },
            security: SecurityConfig {
                jwt_secret: None,
                session_ttl_hours: 24,
                cookie_name: "token".to_string(),
                cors_origins: vec!["https://staging.example.com".to_string()],
            },
            mail: MailConfig::defaults("https://staging.example.com/verify"),
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            api: ApiConfig {
                port: 5000,
                enable_request_logging: false,
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 50,
                connection_timeout: 5,
            },
            security: SecurityConfig {
                jwt_secret: None,
                session_ttl_hours: 24,
                cookie_name: "token".to_string(),
                cors_origins: vec!["https://app.example.com".to_string()],
            },
            mail: MailConfig::defaults("https://app.example.com/verify"),
        }
    }
}

impl MailConfig {
    fn defaults(verify_url_base: &str) -> Self {
        Self {
            redis_url: "redis://127.0.0.1:6379".to_string(),
            queue_name: "email-queue".to_string(),
            verify_url_base: verify_url_base.to_string(),
            resend_api_key: None,
            resend_base_url: "https://api.resend.com".to_string(),
            from_address: "Verify <no-reply@yourapp.com>".to_string(),
        }
    }
}

fn non_empty(v: String) -> Option<String> {
    let v = v.trim();
    if v.is_empty() {
        None
    } else {
        Some(v.to_string())
    }
}
