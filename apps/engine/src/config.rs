use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    /// Master switch for the generation backend. When false, any attempt to
    /// call the backend fails with a permission error before the call is made.
    pub generation_enabled: bool,
    /// Per-call timeout for generation requests, in seconds.
    pub generation_timeout_secs: u64,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            generation_enabled: std::env::var("GENERATION_ENABLED")
                .map(|v| parse_bool(&v))
                .unwrap_or(true),
            generation_timeout_secs: std::env::var("GENERATION_TIMEOUT_SECS")
                .unwrap_or_else(|_| "120".to_string())
                .parse::<u64>()
                .context("GENERATION_TIMEOUT_SECS must be a positive integer")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool_truthy_variants() {
        for v in ["1", "true", "TRUE", "yes", "on", " True "] {
            assert!(parse_bool(v), "expected '{v}' to parse as true");
        }
    }

    #[test]
    fn test_parse_bool_falsy_variants() {
        for v in ["0", "false", "no", "off", "", "enabled"] {
            assert!(!parse_bool(v), "expected '{v}' to parse as false");
        }
    }
}
