//! List posts from the content API

use anyhow::Result;

use crate::client::ContentClient;
use crate::view::{ListingController, ListingState};
use crate::Blog;

/// Print every post, following the listing cursor to the last page
pub async fn run(blog: &Blog) -> Result<()> {
    let client = blog.client()?;
    let listing = collect(blog, &client).await?;

    println!("Posts ({}):", listing.posts.len());
    for post in &listing.posts {
        println!(
            "  {} - {} ({}) [{}]",
            post.published_at.as_deref().unwrap_or("unpublished"),
            post.title,
            post.author,
            post.id
        );
    }

    if let Some(error) = &listing.error {
        anyhow::bail!("Listing is incomplete: {}", error);
    }

    Ok(())
}

/// Load the first page and every page after it
pub async fn collect(blog: &Blog, client: &dyn ContentClient) -> Result<ListingState> {
    let dates = blog.dates();
    let mut listing = ListingController::new(blog.first_page(client).await?);
    let pages = 1 + listing.load_all(client, &dates).await;
    tracing::debug!("Loaded {} listing pages", pages);
    Ok(listing.into_state())
}
