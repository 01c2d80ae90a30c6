//! Single post view

use serde::Serialize;

use crate::content::{estimate_reading_time, PostDetail};

/// Detail page state. `Fallback` carries no post, so nothing can read one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailView {
    /// The page is still being generated
    Fallback,
    Ready(PostDetail),
}

impl DetailView {
    pub fn new(is_generating: bool, detail: Option<PostDetail>) -> Self {
        match detail {
            Some(detail) if !is_generating => Self::Ready(detail),
            _ => Self::Fallback,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback)
    }

    /// Render model for the ready state
    pub fn post_view(&self) -> Option<PostView> {
        match self {
            Self::Fallback => None,
            Self::Ready(detail) => Some(PostView::from(detail)),
        }
    }
}

/// Template data for a ready post
#[derive(Debug, Clone, Serialize)]
pub struct PostView {
    pub title: String,
    pub banner_url: String,
    pub published_at: Option<String>,
    pub author: String,
    pub reading_time: u32,
    pub blocks: Vec<BlockView>,
}

/// One content block, keyed by position since headings repeat
#[derive(Debug, Clone, Serialize)]
pub struct BlockView {
    pub key: usize,
    pub heading: String,
    pub paragraphs: Vec<String>,
}

impl From<&PostDetail> for PostView {
    fn from(detail: &PostDetail) -> Self {
        Self {
            title: detail.title.clone(),
            banner_url: detail.banner_url.clone(),
            published_at: detail.published_at.clone(),
            author: detail.author.clone(),
            reading_time: estimate_reading_time(&detail.content),
            blocks: detail
                .content
                .iter()
                .enumerate()
                .map(|(key, block)| BlockView {
                    key,
                    heading: block.heading.clone().unwrap_or_default(),
                    paragraphs: block.body.iter().filter_map(|p| p.text.clone()).collect(),
                })
                .collect(),
        }
    }
}
