//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Environment variable that overrides `api.access_token`
pub const ACCESS_TOKEN_ENV: &str = "PRISMIC_ACCESS_TOKEN";

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub language: String,
    pub timezone: String,

    // Date format (moment.js style)
    pub date_format: String,

    // Static export
    pub public_dir: String,

    // Content API
    #[serde(default)]
    pub api: ApiConfig,

    // Server
    #[serde(default)]
    pub server: ServerConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "spacetraveling".to_string(),
            language: "pt-BR".to_string(),
            timezone: String::new(),

            date_format: "DD MMM YYYY".to_string(),

            public_dir: "public".to_string(),

            api: ApiConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Apply overrides taken from the process environment
    pub fn apply_env(&mut self) {
        if let Ok(token) = std::env::var(ACCESS_TOKEN_ENV) {
            if !token.trim().is_empty() {
                tracing::debug!("Using access token from {}", ACCESS_TOKEN_ENV);
                self.api.access_token = Some(token);
            }
        }
    }
}

/// Headless CMS API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Repository API entry point, e.g. `https://my-repo.cdn.prismic.io/api/v2`
    pub endpoint: String,
    pub access_token: Option<String>,
    pub document_type: String,
    pub page_size: usize,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://spacetraveling.cdn.prismic.io/api/v2".to_string(),
            access_token: None,
            document_type: "posts".to_string(),
            page_size: 2,
            timeout_secs: 10,
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub ip: String,
    pub port: u16,
    /// Age after which a generated post page is regenerated in the background
    pub revalidate_secs: u64,
    /// Pre-generate the posts of the first listing page on startup
    pub prerender: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            ip: "localhost".to_string(),
            port: 3000,
            revalidate_secs: 60 * 30,
            prerender: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.title, "spacetraveling");
        assert_eq!(config.language, "pt-BR");
        assert_eq!(config.api.document_type, "posts");
        assert_eq!(config.api.page_size, 2);
        assert_eq!(config.server.revalidate_secs, 1800);
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: My Blog
language: en
api:
  endpoint: https://blog.cdn.prismic.io/api/v2
  page_size: 5
server:
  port: 8080
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "My Blog");
        assert_eq!(config.language, "en");
        assert_eq!(config.api.endpoint, "https://blog.cdn.prismic.io/api/v2");
        assert_eq!(config.api.page_size, 5);
        assert_eq!(config.api.document_type, "posts");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.revalidate_secs, 1800);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "title: From File\ntimezone: America/Sao_Paulo").unwrap();

        let config = SiteConfig::load(file.path()).unwrap();
        assert_eq!(config.title, "From File");
        assert_eq!(config.timezone, "America/Sao_Paulo");
        assert_eq!(config.date_format, "DD MMM YYYY");
    }

    #[test]
    fn test_load_invalid_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "api: [unterminated").unwrap();
        assert!(SiteConfig::load(file.path()).is_err());
    }
}
