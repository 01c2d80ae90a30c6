//! Export the blog as static HTML

use anyhow::Result;
use std::fs;
use std::path::{Component, Path};

use crate::client::ContentClient;
use crate::templates::{SiteData, TemplateRenderer};
use crate::view::DetailView;
use crate::Blog;

use super::{list, show};

/// Pages written by an export
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSummary {
    pub posts: usize,
    pub skipped: usize,
}

/// Generate the static site into the public directory
pub async fn run(blog: &Blog) -> Result<()> {
    let start = std::time::Instant::now();
    let client = blog.client()?;

    let summary = export(blog, &client, &blog.public_dir).await?;

    tracing::info!(
        "Generated {} posts ({} skipped) in {:?}",
        summary.posts,
        summary.skipped,
        start.elapsed()
    );
    Ok(())
}

/// Write `index.html` with the full listing and `post/<uid>/index.html` per post
pub async fn export(
    blog: &Blog,
    client: &dyn ContentClient,
    out_dir: &Path,
) -> Result<ExportSummary> {
    let renderer = TemplateRenderer::new()?;
    let site = SiteData::from(&blog.config);

    let listing = list::collect(blog, client).await?;
    if let Some(error) = &listing.error {
        anyhow::bail!("Could not load every listing page: {}", error);
    }

    fs::create_dir_all(out_dir)?;
    fs::write(
        out_dir.join("index.html"),
        renderer.render_home(&site, &listing, None)?,
    )?;

    let mut summary = ExportSummary::default();
    for post in &listing.posts {
        if !is_safe_uid(&post.id) {
            tracing::warn!("Skipping post with unusable uid {:?}: {:?}", post.id, post.title);
            summary.skipped += 1;
            continue;
        }

        let detail = show::fetch(blog, client, &post.id).await?;
        let html = renderer.render_detail(&site, &DetailView::Ready(detail))?;

        let post_dir = out_dir.join("post").join(&post.id);
        fs::create_dir_all(&post_dir)?;
        fs::write(post_dir.join("index.html"), html)?;
        tracing::debug!("Wrote post/{}/index.html", post.id);
        summary.posts += 1;
    }

    Ok(summary)
}

/// A uid becomes a directory name, so it must be exactly one normal path component
fn is_safe_uid(uid: &str) -> bool {
    let mut components = Path::new(uid).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}
