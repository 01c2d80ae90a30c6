//! spacetraveling: a server-rendered blog front end for a headless CMS
//!
//! Posts are read from a Prismic-style content API, normalized into listing
//! pages and post details, and rendered with embedded Tera templates either
//! on request (`serve`) or ahead of time (`generate`).

pub mod cache;
pub mod client;
pub mod commands;
pub mod config;
pub mod content;
pub mod helpers;
pub mod server;
pub mod templates;
pub mod view;

use anyhow::Result;
use std::path::{Path, PathBuf};

use client::{ContentClient, PrismicClient};
use content::{format_page, PostPage};
use helpers::DateFormatter;

/// The blog application
#[derive(Debug, Clone)]
pub struct Blog {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Public (output) directory
    pub public_dir: PathBuf,
}

impl Blog {
    /// Create a new instance from a directory, reading `_config.yml` when present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let mut config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            tracing::debug!("No config at {:?}, using defaults", config_path);
            config::SiteConfig::default()
        };
        config.apply_env();

        Ok(Self::with_config(base_dir, config))
    }

    pub fn with_config(base_dir: PathBuf, config: config::SiteConfig) -> Self {
        let public_dir = base_dir.join(&config.public_dir);
        Self {
            config,
            base_dir,
            public_dir,
        }
    }

    /// HTTP client for the configured content API
    pub fn client(&self) -> Result<PrismicClient> {
        Ok(PrismicClient::new(&self.config.api)?)
    }

    pub fn dates(&self) -> DateFormatter {
        DateFormatter::from_config(&self.config)
    }

    /// First page of the post listing
    pub async fn first_page(&self, client: &dyn ContentClient) -> Result<PostPage> {
        let api = &self.config.api;
        let raw = client.query(&api.document_type, api.page_size).await?;
        Ok(format_page(&raw, &self.dates()))
    }

    /// Start the HTTP server
    pub async fn serve(&self, ip: &str, port: u16) -> Result<()> {
        server::start(self, ip, port).await
    }

    /// Export the static site
    pub async fn generate(&self) -> Result<()> {
        commands::generate::run(self).await
    }
}

impl Default for Blog {
    fn default() -> Self {
        Self::with_config(PathBuf::from("."), config::SiteConfig::default())
    }
}
