//! Cache of generated post pages
//!
//! Post pages are generated on first request. Until a page is ready the
//! server shows the fallback view; once generated it is served from here and
//! regenerated in the background when older than the revalidation window.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use crate::client::ContentClient;
use crate::content::{format_detail, PostDetail};
use crate::helpers::DateFormatter;

/// Most unknown uids remembered at once
const MAX_NOT_FOUND: usize = 1024;

/// Represents the cached state of one post page
#[derive(Debug, Clone)]
enum CacheEntry {
    /// First generation in progress
    Generating,
    Ready {
        detail: PostDetail,
        generated_at: Instant,
        /// A background regeneration is running
        refreshing: bool,
    },
    /// The content API has no post with this uid
    NotFound { checked_at: Instant },
}

/// What the caller should show for a requested page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CachedPage {
    Ready(PostDetail),
    Generating,
    NotFound,
}

/// Result of a cache lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lookup {
    pub page: CachedPage,
    /// The caller now owns a (re)generation of this page and must run it
    pub generate: bool,
}

/// Generated post pages keyed by uid
#[derive(Debug)]
pub struct PageCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    revalidate: Duration,
}

impl PageCache {
    pub fn new(revalidate: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            revalidate,
        }
    }

    /// Look up a page, claiming its generation when it is missing or stale
    pub async fn lookup(&self, slug: &str) -> Lookup {
        let mut entries = self.entries.write().await;

        match entries.get_mut(slug) {
            None => {
                entries.insert(slug.to_string(), CacheEntry::Generating);
                Lookup {
                    page: CachedPage::Generating,
                    generate: true,
                }
            }
            Some(CacheEntry::Generating) => Lookup {
                page: CachedPage::Generating,
                generate: false,
            },
            Some(CacheEntry::Ready {
                detail,
                generated_at,
                refreshing,
            }) => {
                let stale = generated_at.elapsed() >= self.revalidate;
                let generate = stale && !*refreshing;
                if generate {
                    *refreshing = true;
                }
                Lookup {
                    page: CachedPage::Ready(detail.clone()),
                    generate,
                }
            }
            Some(CacheEntry::NotFound { checked_at }) => {
                if checked_at.elapsed() >= self.revalidate {
                    entries.insert(slug.to_string(), CacheEntry::Generating);
                    Lookup {
                        page: CachedPage::Generating,
                        generate: true,
                    }
                } else {
                    Lookup {
                        page: CachedPage::NotFound,
                        generate: false,
                    }
                }
            }
        }
    }

    /// Store the outcome of a generation; `None` records a missing post.
    ///
    /// Expired not-found entries are dropped here, and once `MAX_NOT_FOUND`
    /// live ones exist further misses are not remembered.
    pub async fn complete(&self, slug: &str, detail: Option<PostDetail>) {
        let mut entries = self.entries.write().await;

        let Some(detail) = detail else {
            let revalidate = self.revalidate;
            entries.retain(|_, entry| {
                !matches!(entry, CacheEntry::NotFound { checked_at } if checked_at.elapsed() >= revalidate)
            });

            let remembered = entries
                .values()
                .filter(|e| matches!(e, CacheEntry::NotFound { .. }))
                .count();
            if remembered < MAX_NOT_FOUND {
                entries.insert(
                    slug.to_string(),
                    CacheEntry::NotFound {
                        checked_at: Instant::now(),
                    },
                );
            } else {
                tracing::debug!("Not-found memo full, forgetting {}", slug);
                entries.remove(slug);
            }
            return;
        };

        entries.insert(
            slug.to_string(),
            CacheEntry::Ready {
                detail,
                generated_at: Instant::now(),
                refreshing: false,
            },
        );
    }

    /// Give up on a failed generation. A previously generated page keeps being served.
    pub async fn abandon(&self, slug: &str) {
        let mut entries = self.entries.write().await;
        match entries.get_mut(slug) {
            Some(CacheEntry::Ready { refreshing, .. }) => *refreshing = false,
            Some(CacheEntry::Generating) => {
                entries.remove(slug);
            }
            _ => {}
        }
    }

    /// Fetch and format a post, then record the result
    pub async fn generate(
        &self,
        client: &dyn ContentClient,
        document_type: &str,
        dates: &DateFormatter,
        slug: &str,
    ) {
        let start = Instant::now();
        match client.get_by_uid(document_type, slug).await {
            Ok(Some(raw)) => {
                self.complete(slug, Some(format_detail(&raw, dates))).await;
                tracing::info!("Generated /post/{} in {:?}", slug, start.elapsed());
            }
            Ok(None) => {
                tracing::info!("No post with uid {}", slug);
                self.complete(slug, None).await;
            }
            Err(e) => {
                tracing::error!("Failed to generate /post/{}: {}", slug, e);
                self.abandon(slug).await;
            }
        }
    }

    /// Generate pages ahead of the first request
    pub async fn prerender(
        &self,
        client: &dyn ContentClient,
        document_type: &str,
        dates: &DateFormatter,
        slugs: &[String],
    ) {
        for slug in slugs.iter().filter(|s| !s.is_empty()) {
            if self.lookup(slug).await.generate {
                self.generate(client, document_type, dates, slug).await;
            }
        }
    }

    /// Number of tracked pages in any state
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Number of cached pages that are ready to serve
    pub async fn ready_count(&self) -> usize {
        self.entries
            .read()
            .await
            .values()
            .filter(|e| matches!(e, CacheEntry::Ready { .. }))
            .count()
    }
}
