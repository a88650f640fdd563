use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::sync::OnceLock;
use url::Url;

const DEFAULT_SERVER_ADDRESS: &str = "0.0.0.0:5001";
const DEFAULT_OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1/";
const DEFAULT_MODEL: &str = "deepseek/deepseek-chat";
const DEFAULT_REFERER: &str = "http://localhost:3000";
const DEFAULT_TITLE: &str = "QuizWizAI";

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    /// Absent when the credential is unset; generation then answers with a
    /// configuration error instead of failing at startup.
    pub openrouter_api_key: Option<String>,
    pub openrouter_base_url: Url,
    pub model: String,
    pub app_referer: String,
    pub app_title: String,
    pub public_rps: u32,
    pub upstream_timeout_secs: u64,
    pub static_dir: Option<String>,
    pub cors_origin: Option<String>,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a config from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let openrouter_base_url = parse_base_url(
            &get("OPENROUTER_BASE_URL").unwrap_or_else(|| DEFAULT_OPENROUTER_BASE_URL.to_string()),
        )?;

        Ok(Self {
            server_address: get("SERVER_ADDRESS")
                .unwrap_or_else(|| DEFAULT_SERVER_ADDRESS.to_string()),
            openrouter_api_key: get("OPENROUTER_API_KEY").map(|k| k.trim().to_string()),
            openrouter_base_url,
            model: get("OPENROUTER_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            app_referer: get("APP_REFERER").unwrap_or_else(|| DEFAULT_REFERER.to_string()),
            app_title: get("APP_TITLE").unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            public_rps: parse_or("PUBLIC_RPS", get("PUBLIC_RPS"), 10)?,
            upstream_timeout_secs: parse_or(
                "UPSTREAM_TIMEOUT_SECS",
                get("UPSTREAM_TIMEOUT_SECS"),
                120,
            )?,
            static_dir: get("STATIC_DIR"),
            cors_origin: get("CORS_ORIGIN"),
        })
    }

    /// Full URL of the chat completion endpoint.
    pub fn completions_url(&self) -> Result<Url> {
        self.openrouter_base_url
            .join("chat/completions")
            .map_err(|e| Error::Config(format!("Invalid OPENROUTER_BASE_URL: {}", e)))
    }
}

fn parse_base_url(raw: &str) -> Result<Url> {
    let mut normalized = raw.trim().to_string();
    if !normalized.ends_with('/') {
        normalized.push('/');
    }
    let url = Url::parse(&normalized)
        .map_err(|e| Error::Config(format!("Invalid value for OPENROUTER_BASE_URL: {}", e)))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(Error::Config(format!(
            "OPENROUTER_BASE_URL must use http or https, got {}",
            url.scheme()
        )));
    }
    Ok(url)
}

fn parse_or<T>(name: &str, raw: Option<String>, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
    }
}

pub fn init_config() -> Result<()> {
    let config = Config::from_env()?;
    if config.openrouter_api_key.is_none() {
        tracing::warn!("OPENROUTER_API_KEY is not set; question generation is disabled");
    }
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(())
}

pub fn get_config() -> &'static Config {
    CONFIG
        .get()
        .expect("Configuration has not been initialized")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_environment_is_empty() {
        let cfg = config_from(&[]).unwrap();
        assert_eq!(cfg.server_address, "0.0.0.0:5001");
        assert!(cfg.openrouter_api_key.is_none());
        assert_eq!(cfg.model, "deepseek/deepseek-chat");
        assert_eq!(cfg.public_rps, 10);
        assert_eq!(
            cfg.completions_url().unwrap().as_str(),
            "https://openrouter.ai/api/v1/chat/completions"
        );
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let cfg = config_from(&[("OPENROUTER_API_KEY", "   ")]).unwrap();
        assert!(cfg.openrouter_api_key.is_none());
    }

    #[test]
    fn base_url_without_trailing_slash_keeps_its_path() {
        let cfg = config_from(&[("OPENROUTER_BASE_URL", "http://127.0.0.1:9000/v1")]).unwrap();
        assert_eq!(
            cfg.completions_url().unwrap().as_str(),
            "http://127.0.0.1:9000/v1/chat/completions"
        );
    }

    #[test]
    fn malformed_numbers_are_config_errors() {
        let err = config_from(&[("PUBLIC_RPS", "lots")]).unwrap_err();
        assert!(matches!(err, Error::Config(msg) if msg.contains("PUBLIC_RPS")));
    }

    #[test]
    fn non_http_base_url_is_rejected() {
        let err = config_from(&[("OPENROUTER_BASE_URL", "ftp://example.com/")]).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
