//! Content API clients

mod error;
pub mod prismic;
#[cfg(test)]
pub(crate) mod testing;

use async_trait::async_trait;

use crate::content::{RawListing, RawPost};

pub use error::{ClientError, Result};
pub use prismic::PrismicClient;

/// Read access to the headless CMS
#[async_trait]
pub trait ContentClient: Send + Sync {
    /// First page of documents of a type
    async fn query(&self, document_type: &str, page_size: usize) -> Result<RawListing>;

    /// A single document by uid, `None` when no document has that uid
    async fn get_by_uid(&self, document_type: &str, uid: &str) -> Result<Option<RawPost>>;

    /// A follow-up page, addressed by the `next_page` URL of a previous listing
    async fn fetch_page(&self, url: &str) -> Result<RawListing>;
}
