//! Show a single post

use anyhow::Result;

use crate::client::{ClientError, ContentClient};
use crate::content::{format_detail, reading_time, PostDetail};
use crate::Blog;

pub async fn run(blog: &Blog, slug: &str) -> Result<()> {
    let client = blog.client()?;
    let detail = fetch(blog, &client, slug).await?;
    let words = reading_time::word_count(&detail.content);

    println!("{}", detail.title);
    println!(
        "  {} | {} | {} min ({} words)",
        detail.published_at.as_deref().unwrap_or("unpublished"),
        detail.author,
        reading_time::estimate_reading_time(&detail.content),
        words
    );
    for block in &detail.content {
        if let Some(heading) = block.heading.as_deref().filter(|h| !h.is_empty()) {
            println!();
            println!("## {}", heading);
        }
        for paragraph in block.body.iter().filter_map(|p| p.text.as_deref()) {
            println!();
            println!("{}", paragraph);
        }
    }

    Ok(())
}

/// Fetch and format one post by uid
pub async fn fetch(blog: &Blog, client: &dyn ContentClient, slug: &str) -> Result<PostDetail> {
    let raw = client
        .get_by_uid(&blog.config.api.document_type, slug)
        .await?
        .ok_or_else(|| ClientError::NotFound(slug.to_string()))?;
    Ok(format_detail(&raw, &blog.dates()))
}
