//! Paginated post listing with incremental "load more"

use serde::Serialize;

use crate::client::ContentClient;
use crate::content::{format_page, PostPage, PostSummary};
use crate::helpers::DateFormatter;

/// Listing view state. Only [`ListingState::reduce`] changes it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListingState {
    pub posts: Vec<PostSummary>,
    pub next_cursor: Option<String>,
    pub loading: bool,
    /// Message of the last failed "load more", cleared by the next success
    pub error: Option<String>,
}

#[derive(Debug, Clone)]
pub enum ListingAction {
    LoadMoreRequested,
    PageLoaded(PostPage),
    LoadFailed(String),
}

impl ListingState {
    pub fn from_page(page: PostPage) -> Self {
        Self {
            posts: page.results,
            next_cursor: page.next_cursor,
            loading: false,
            error: None,
        }
    }

    /// Whether the "load more" affordance is offered
    pub fn can_load_more(&self) -> bool {
        self.next_cursor.is_some() && !self.loading
    }

    pub fn reduce(mut self, action: ListingAction) -> Self {
        match action {
            ListingAction::LoadMoreRequested => {
                if self.can_load_more() {
                    self.loading = true;
                }
            }
            ListingAction::PageLoaded(page) => {
                // A response nobody asked for is dropped
                if self.loading {
                    self.posts.extend(page.results);
                    self.next_cursor = page.next_cursor;
                    self.loading = false;
                    self.error = None;
                }
            }
            ListingAction::LoadFailed(message) => {
                if self.loading {
                    self.loading = false;
                    self.error = Some(message);
                }
            }
        }
        self
    }
}

/// Result of one "load more" step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The next page was appended with this many posts
    Appended(usize),
    /// No cursor left, or a fetch is already in flight
    Unavailable,
    /// The fetch failed; posts and cursor are untouched
    Failed,
}

/// Owns a [`ListingState`] and performs the fetches its transitions call for
#[derive(Debug, Clone, Default)]
pub struct ListingController {
    state: ListingState,
}

impl ListingController {
    pub fn new(first_page: PostPage) -> Self {
        Self {
            state: ListingState::from_page(first_page),
        }
    }

    pub fn state(&self) -> &ListingState {
        &self.state
    }

    pub fn into_state(self) -> ListingState {
        self.state
    }

    fn dispatch(&mut self, action: ListingAction) {
        let state = std::mem::take(&mut self.state);
        self.state = state.reduce(action);
    }

    /// Fetch the page behind the current cursor and append it
    pub async fn load_more(
        &mut self,
        client: &dyn ContentClient,
        dates: &DateFormatter,
    ) -> LoadOutcome {
        self.dispatch(ListingAction::LoadMoreRequested);
        if !self.state.loading {
            return LoadOutcome::Unavailable;
        }

        let Some(cursor) = self.state.next_cursor.clone() else {
            return LoadOutcome::Unavailable;
        };

        match client.fetch_page(&cursor).await {
            Ok(raw) => {
                let page = format_page(&raw, dates);
                let count = page.results.len();
                tracing::debug!("Loaded {} more posts from {}", count, cursor);
                self.dispatch(ListingAction::PageLoaded(page));
                LoadOutcome::Appended(count)
            }
            Err(e) => {
                tracing::warn!("Failed to load more posts from {}: {}", cursor, e);
                self.dispatch(ListingAction::LoadFailed(e.to_string()));
                LoadOutcome::Failed
            }
        }
    }

    /// Load up to `count` further pages, stopping at the last page or the first failure
    pub async fn load_pages(
        &mut self,
        client: &dyn ContentClient,
        dates: &DateFormatter,
        count: usize,
    ) -> usize {
        let mut loaded = 0;
        for _ in 0..count {
            match self.load_more(client, dates).await {
                LoadOutcome::Appended(_) => loaded += 1,
                LoadOutcome::Unavailable | LoadOutcome::Failed => break,
            }
        }
        loaded
    }

    /// Load every remaining page
    pub async fn load_all(&mut self, client: &dyn ContentClient, dates: &DateFormatter) -> usize {
        let mut loaded = 0;
        while let LoadOutcome::Appended(_) = self.load_more(client, dates).await {
            loaded += 1;
        }
        loaded
    }
}
