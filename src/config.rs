use serde::{Deserialize, Serialize};

/// Contact details returned to visitors after they submit the contact form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdminContact {
    pub admin: String,
    pub contact_number: String,
    pub address: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    /// Shared secret for `POST /authenticate`. `None` rejects every attempt.
    pub admin_password: Option<String>,
    pub allowed_origins: Vec<String>,
    /// Honour `X-Forwarded-For` / `X-Real-IP` when resolving the client address.
    pub trust_proxy_headers: bool,
    pub admin_contact: AdminContact,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            database_url: std::env::var("DATABASE_URL")
                .or_else(|_| std::env::var("DB_URL"))
                .map_err(|_| {
                    anyhow::anyhow!("DATABASE_URL or DB_URL environment variable required")
                })
                .and_then(|url| {
                    if url.trim().is_empty() {
                        anyhow::bail!("DATABASE_URL cannot be empty");
                    }
                    if !url.starts_with("postgresql://") && !url.starts_with("postgres://") {
                        anyhow::bail!("DATABASE_URL must start with postgresql:// or postgres://");
                    }
                    Ok(url)
                })?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            admin_password: std::env::var("ADMIN_PASSWORD")
                .ok()
                .filter(|s| !s.is_empty()),
            allowed_origins: parse_origins(
                &std::env::var("ALLOWED_ORIGINS")
                    .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            )?,
            trust_proxy_headers: match std::env::var("TRUST_PROXY_HEADERS") {
                Ok(raw) => parse_bool(&raw).ok_or_else(|| {
                    anyhow::anyhow!("TRUST_PROXY_HEADERS must be true or false, got '{}'", raw)
                })?,
                Err(_) => true,
            },
            admin_contact: AdminContact {
                admin: env_or("ADMIN_NAME", "Site Administrator"),
                contact_number: env_or("ADMIN_CONTACT_NUMBER", ""),
                address: env_or("ADMIN_ADDRESS", ""),
            },
        };

        // Log successful configuration load (without sensitive values)
        tracing::info!("Configuration loaded successfully");
        tracing::debug!("Database URL: {}...", url_preview(&config.database_url));
        tracing::debug!("Allowed origins: {:?}", config.allowed_origins);
        tracing::debug!("Server Port: {}", config.port);
        if config.admin_password.is_none() {
            tracing::warn!("ADMIN_PASSWORD not set; /authenticate will reject every attempt");
        }

        Ok(config)
    }
}

/// First 20 characters of a connection URL, enough to tell hosts apart in logs.
fn url_preview(url: &str) -> String {
    url.chars().take(20).collect()
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Splits a comma-separated origin list, rejecting entries that are not http(s) URLs.
pub fn parse_origins(raw: &str) -> anyhow::Result<Vec<String>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|origin| {
            if !origin.starts_with("http://") && !origin.starts_with("https://") {
                anyhow::bail!("Allowed origin must start with http:// or https://: {}", origin);
            }
            Ok(origin.trim_end_matches('/').to_string())
        })
        .collect()
}

pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
