//! In-memory content client for tests

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::{ClientError, ContentClient, Result};
use crate::content::{RawListing, RawPost, RawPostData};

/// Serves a fixed set of listing pages addressed as `memory://page/<n>`
#[derive(Default)]
pub(crate) struct MemoryClient {
    pages: Vec<Vec<RawPost>>,
    documents: HashMap<String, RawPost>,
    failing: Mutex<HashSet<String>>,
    pub(crate) uid_lookups: AtomicUsize,
}

impl MemoryClient {
    /// Build a client whose listing is split into pages of the given uids
    pub(crate) fn with_pages(pages: &[&[&str]]) -> Self {
        let pages: Vec<Vec<RawPost>> = pages
            .iter()
            .map(|uids| uids.iter().map(|uid| document(uid)).collect())
            .collect();

        let documents = pages
            .iter()
            .flatten()
            .filter_map(|post| post.uid.clone().map(|uid| (uid, post.clone())))
            .collect();

        Self {
            pages,
            documents,
            ..Default::default()
        }
    }

    /// Make every request for `url` fail
    pub(crate) fn fail_url(&self, url: &str) {
        self.failing.lock().unwrap().insert(url.to_string());
    }

    pub(crate) fn page_url(index: usize) -> String {
        format!("memory://page/{}", index)
    }

    fn listing(&self, index: usize) -> RawListing {
        RawListing {
            results: self.pages.get(index).cloned().unwrap_or_default(),
            next_page: (index + 1 < self.pages.len()).then(|| Self::page_url(index + 1)),
        }
    }
}

/// A published post with a short body
pub(crate) fn document(uid: &str) -> RawPost {
    serde_json::from_value(serde_json::json!({
        "uid": uid,
        "first_publication_date": "2021-03-15T19:25:28+0000",
        "data": {
            "title": format!("Post {}", uid),
            "subtitle": format!("About {}", uid),
            "author": "Joseph Oliveira",
            "banner": { "url": format!("https://images.example.com/{}.png", uid) },
            "content": [
                { "heading": "Introdução", "body": [{ "text": "Lorem ipsum dolor sit amet" }] }
            ]
        }
    }))
    .unwrap_or_else(|_| RawPost {
        uid: Some(uid.to_string()),
        data: Some(RawPostData::default()),
        ..Default::default()
    })
}

#[async_trait]
impl ContentClient for MemoryClient {
    async fn query(&self, _document_type: &str, _page_size: usize) -> Result<RawListing> {
        self.fetch_page(&Self::page_url(0)).await
    }

    async fn get_by_uid(&self, _document_type: &str, uid: &str) -> Result<Option<RawPost>> {
        self.uid_lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.documents.get(uid).cloned())
    }

    async fn fetch_page(&self, url: &str) -> Result<RawListing> {
        if self.failing.lock().unwrap().contains(url) {
            return Err(ClientError::Status {
                status: 503,
                url: url.to_string(),
            });
        }

        url.strip_prefix("memory://page/")
            .and_then(|index| index.parse::<usize>().ok())
            .map(|index| self.listing(index))
            .ok_or_else(|| ClientError::NotFound(url.to_string()))
    }
}
