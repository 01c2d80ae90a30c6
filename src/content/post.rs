//! Post models
//!
//! `Raw*` types mirror the content API's JSON. Every nested field is optional
//! because the backend schema is not guaranteed; the formatter applies the
//! defaults. The remaining types are the normalized shapes the views consume.

use serde::{Deserialize, Deserializer, Serialize};

/// A listing response: one page of documents plus the next-page URL
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawListing {
    #[serde(deserialize_with = "null_as_default")]
    pub results: Vec<RawPost>,
    pub next_page: Option<String>,
}

/// Treat an explicit JSON `null` like a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A single document as returned by the content API
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawPost {
    pub uid: Option<String>,
    pub first_publication_date: Option<String>,
    pub data: Option<RawPostData>,
}

/// Structured data payload of a post document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawPostData {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub author: Option<String>,
    pub banner: Option<RawBanner>,
    pub content: Option<Vec<RawContentBlock>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawBanner {
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawContentBlock {
    pub heading: Option<String>,
    pub body: Option<Vec<RawParagraph>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawParagraph {
    pub text: Option<String>,
}

/// A post as shown in the listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostSummary {
    /// Document uid, used in `/post/<id>` links
    pub id: String,
    /// Display date, `None` when the document was never published
    pub published_at: Option<String>,
    pub title: String,
    pub subtitle: String,
    pub author: String,
}

/// One page of the post listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostPage {
    pub results: Vec<PostSummary>,
    /// URL of the next page; `None` exactly when there are no more pages
    pub next_cursor: Option<String>,
}

impl PostPage {
    pub fn has_more(&self) -> bool {
        self.next_cursor.is_some()
    }
}

/// A full post for the detail page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostDetail {
    pub published_at: Option<String>,
    pub title: String,
    pub banner_url: String,
    pub author: String,
    pub content: Vec<ContentBlock>,
}

/// A heading and its paragraphs, in document order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentBlock {
    pub heading: Option<String>,
    pub body: Vec<Paragraph>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph {
    pub text: Option<String>,
}

impl Paragraph {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }
}
