//! Content module - post models, formatting and reading time

pub mod formatter;
mod post;
pub mod reading_time;

pub use formatter::{format_detail, format_page};
pub use post::{
    ContentBlock, Paragraph, PostDetail, PostPage, PostSummary, RawBanner, RawContentBlock,
    RawListing, RawParagraph, RawPost, RawPostData,
};
pub use reading_time::estimate_reading_time;
