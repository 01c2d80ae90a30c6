//! Prismic REST API v2 client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use super::{ClientError, ContentClient, Result};
use crate::config::ApiConfig;
use crate::content::{RawListing, RawPost};

/// Repository metadata returned by the API entry point
#[derive(Debug, Deserialize)]
struct ApiInfo {
    #[serde(default)]
    refs: Vec<ApiRef>,
}

#[derive(Debug, Deserialize)]
struct ApiRef {
    #[serde(rename = "ref")]
    reference: String,
    #[serde(rename = "isMasterRef", default)]
    is_master_ref: bool,
}

pub struct PrismicClient {
    client: Client,
    endpoint: Url,
    access_token: Option<String>,
}

impl PrismicClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .gzip(true)
            .user_agent(concat!("spacetraveling/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            endpoint: Url::parse(&config.endpoint)?,
            access_token: config
                .access_token
                .clone()
                .filter(|token| !token.trim().is_empty()),
        })
    }

    /// Add the access token to a URL unless it already carries one
    fn authorize(&self, url: &mut Url) {
        if let Some(token) = &self.access_token {
            if !url.query_pairs().any(|(key, _)| key == "access_token") {
                url.query_pairs_mut().append_pair("access_token", token);
            }
        }
    }

    /// Build a `documents/search` URL for a predicate query
    fn search_url(&self, master_ref: &str, predicate: &str, page_size: usize) -> Result<Url> {
        let base = self.endpoint.as_str().trim_end_matches('/');
        let mut url = Url::parse(&format!("{}/documents/search", base))?;
        url.query_pairs_mut()
            .append_pair("ref", master_ref)
            .append_pair("q", &format!("[{}]", predicate))
            .append_pair("pageSize", &page_size.to_string());
        self.authorize(&mut url);
        Ok(url)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: Url) -> Result<T> {
        tracing::debug!("GET {}", url);
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Resolve the ref pointing at the currently published content
    async fn master_ref(&self) -> Result<String> {
        let mut url = self.endpoint.clone();
        self.authorize(&mut url);

        let info: ApiInfo = self.get_json(url).await?;
        info.refs
            .into_iter()
            .find(|r| r.is_master_ref)
            .map(|r| r.reference)
            .ok_or(ClientError::MissingRef)
    }
}

/// `[at(document.type, "posts")]`
fn type_predicate(document_type: &str) -> String {
    format!("[at(document.type,{})]", quote(document_type))
}

/// `[at(my.posts.uid, "slug")]`
fn uid_predicate(document_type: &str, uid: &str) -> String {
    format!("[at(my.{}.uid,{})]", document_type, quote(uid))
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

#[async_trait]
impl ContentClient for PrismicClient {
    async fn query(&self, document_type: &str, page_size: usize) -> Result<RawListing> {
        let master_ref = self.master_ref().await?;
        let url = self.search_url(&master_ref, &type_predicate(document_type), page_size)?;
        self.get_json(url).await
    }

    async fn get_by_uid(&self, document_type: &str, uid: &str) -> Result<Option<RawPost>> {
        let master_ref = self.master_ref().await?;
        let url = self.search_url(&master_ref, &uid_predicate(document_type, uid), 1)?;
        let listing: RawListing = self.get_json(url).await?;
        Ok(listing.results.into_iter().next())
    }

    async fn fetch_page(&self, url: &str) -> Result<RawListing> {
        let mut url = Url::parse(url)?;
        self.authorize(&mut url);
        self.get_json(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(token: Option<&str>) -> PrismicClient {
        let config = ApiConfig {
            endpoint: "https://blog.cdn.prismic.io/api/v2".to_string(),
            access_token: token.map(String::from),
            ..Default::default()
        };
        PrismicClient::new(&config).unwrap()
    }

    #[test]
    fn test_predicates() {
        assert_eq!(type_predicate("posts"), r#"[at(document.type,"posts")]"#);
        assert_eq!(
            uid_predicate("posts", "como-utilizar-hooks"),
            r#"[at(my.posts.uid,"como-utilizar-hooks")]"#
        );
        assert_eq!(quote(r#"a"b"#), r#""a\"b""#);
    }

    #[test]
    fn test_search_url() {
        let url = client(Some("secret"))
            .search_url("YE-master", &type_predicate("posts"), 2)
            .unwrap();

        assert_eq!(url.path(), "/api/v2/documents/search");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("ref".to_string(), "YE-master".to_string())));
        assert!(pairs.contains(&("q".to_string(), r#"[[at(document.type,"posts")]]"#.to_string())));
        assert!(pairs.contains(&("pageSize".to_string(), "2".to_string())));
        assert!(pairs.contains(&("access_token".to_string(), "secret".to_string())));
    }

    #[test]
    fn test_authorize_does_not_duplicate_token() {
        let client = client(Some("secret"));
        let mut url = Url::parse("https://blog.cdn.prismic.io/api/v2/documents/search?page=2&access_token=other").unwrap();
        client.authorize(&mut url);
        assert_eq!(url.query_pairs().filter(|(k, _)| k == "access_token").count(), 1);
    }

    #[test]
    fn test_blank_token_is_ignored() {
        let client = client(Some("  "));
        let mut url = Url::parse("https://blog.cdn.prismic.io/api/v2").unwrap();
        client.authorize(&mut url);
        assert_eq!(url.query(), None);
    }

    #[test]
    fn test_invalid_endpoint() {
        let config = ApiConfig {
            endpoint: "not a url".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            PrismicClient::new(&config),
            Err(ClientError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_parse_api_info() {
        let json = r#"{
            "refs": [
                { "id": "preview", "ref": "YE-preview", "isMasterRef": false },
                { "id": "master", "ref": "YE-master", "label": "Master", "isMasterRef": true }
            ],
            "types": { "posts": "Posts" }
        }"#;
        let info: ApiInfo = serde_json::from_str(json).unwrap();
        let master = info.refs.into_iter().find(|r| r.is_master_ref).unwrap();
        assert_eq!(master.reference, "YE-master");
    }
}
