//! Built-in page templates using the Tera template engine
//!
//! Templates are embedded in the binary. Autoescaping stays on for every
//! template since post text comes straight from the content API.

use anyhow::Result;
use serde::Serialize;
use tera::{Context, Tera};

use crate::config::SiteConfig;
use crate::view::{DetailView, ListingState};

/// Seconds between reloads of the "still generating" page
const FALLBACK_REFRESH_SECS: u64 = 2;

/// Template renderer with the embedded theme
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("theme/layout.html")),
            ("home.html", include_str!("theme/home.html")),
            ("post.html", include_str!("theme/post.html")),
            ("loading.html", include_str!("theme/loading.html")),
            ("not_found.html", include_str!("theme/not_found.html")),
        ])?;

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }

    fn base_context(site: &SiteData) -> Context {
        let mut context = Context::new();
        context.insert("site", site);
        context.insert("labels", &Labels::for_language(&site.language));
        context
    }

    /// Render the home page. `load_more_href` is only offered when the listing can grow.
    pub fn render_home(
        &self,
        site: &SiteData,
        listing: &ListingState,
        load_more_href: Option<&str>,
    ) -> Result<String> {
        let mut context = Self::base_context(site);
        context.insert("listing", listing);
        context.insert(
            "load_more_href",
            &load_more_href.filter(|_| listing.can_load_more()),
        );
        self.render("home.html", &context)
    }

    /// Render a post page, or the loading page while it is generated
    pub fn render_detail(&self, site: &SiteData, view: &DetailView) -> Result<String> {
        let mut context = Self::base_context(site);
        match view.post_view() {
            Some(post) => {
                context.insert("post", &post);
                self.render("post.html", &context)
            }
            None => {
                context.insert("refresh_secs", &FALLBACK_REFRESH_SECS);
                self.render("loading.html", &context)
            }
        }
    }

    pub fn render_not_found(&self, site: &SiteData) -> Result<String> {
        self.render("not_found.html", &Self::base_context(site))
    }
}

/// Site-wide template data
#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub language: String,
}

impl From<&SiteConfig> for SiteData {
    fn from(config: &SiteConfig) -> Self {
        Self {
            title: config.title.clone(),
            language: config.language.clone(),
        }
    }
}

/// Interface strings for the supported languages
#[derive(Debug, Clone, Serialize)]
struct Labels {
    load_more: &'static str,
    load_failed: &'static str,
    loading: &'static str,
    not_found: &'static str,
    back_home: &'static str,
}

impl Labels {
    fn for_language(language: &str) -> Self {
        if language.to_ascii_lowercase().starts_with("pt") {
            Self {
                load_more: "Carregar mais posts",
                load_failed: "Não foi possível carregar mais posts. Tente novamente.",
                loading: "Carregando...",
                not_found: "Post não encontrado.",
                back_home: "Voltar para a home",
            }
        } else {
            Self {
                load_more: "Load more posts",
                load_failed: "Could not load more posts. Please try again.",
                loading: "Loading...",
                not_found: "Post not found.",
                back_home: "Back to home",
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{ContentBlock, Paragraph, PostDetail, PostSummary};

    fn site() -> SiteData {
        SiteData::from(&SiteConfig::default())
    }

    fn listing(cursor: Option<&str>) -> ListingState {
        ListingState {
            posts: vec![PostSummary {
                id: "como-utilizar-hooks".to_string(),
                published_at: None,
                title: "Como utilizar Hooks".to_string(),
                subtitle: "Pensando em sincronização".to_string(),
                author: "Joseph Oliveira".to_string(),
            }],
            next_cursor: cursor.map(String::from),
            loading: false,
            error: None,
        }
    }

    #[test]
    fn test_render_home_with_more_pages() {
        let renderer = TemplateRenderer::new().unwrap();
        let html = renderer
            .render_home(&site(), &listing(Some("https://next")), Some("/?pages=2"))
            .unwrap();
        assert!(html.contains("/post/como-utilizar-hooks"));
        assert!(html.contains("Como utilizar Hooks"));
        assert!(html.contains("Carregar mais posts"));
        assert!(!html.contains("<time>"));
    }

    #[test]
    fn test_render_home_last_page_hides_load_more() {
        let renderer = TemplateRenderer::new().unwrap();
        let html = renderer
            .render_home(&site(), &listing(None), Some("/?pages=2"))
            .unwrap();
        assert!(!html.contains("Carregar mais posts"));
    }

    #[test]
    fn test_render_home_error_banner() {
        let renderer = TemplateRenderer::new().unwrap();
        let mut state = listing(Some("https://next"));
        state.error = Some("503".to_string());
        let html = renderer.render_home(&site(), &state, Some("/?pages=2")).unwrap();
        assert!(html.contains("role=\"alert\""));
        assert!(html.contains("Carregar mais posts"));
    }

    #[test]
    fn test_render_fallback() {
        let renderer = TemplateRenderer::new().unwrap();
        let html = renderer.render_detail(&site(), &DetailView::Fallback).unwrap();
        assert!(html.contains("Carregando..."));
        assert!(html.contains("http-equiv=\"refresh\""));
    }

    #[test]
    fn test_render_post_escapes_content() {
        let renderer = TemplateRenderer::new().unwrap();
        let detail = PostDetail {
            published_at: Some("15 mar 2021".to_string()),
            title: "Hooks".to_string(),
            banner_url: String::new(),
            author: "Joseph".to_string(),
            content: vec![ContentBlock {
                heading: Some("Intro".to_string()),
                body: vec![Paragraph::new("<script>alert(1)</script>")],
            }],
        };
        let html = renderer
            .render_detail(&site(), &DetailView::Ready(detail))
            .unwrap();
        assert!(html.contains("<h1>Hooks</h1>"));
        assert!(html.contains("<time>15 mar 2021</time>"));
        assert!(html.contains("0 min"));
        assert!(html.contains("id=\"block-0\""));
        assert!(!html.contains("<script>alert(1)</script>"));
    }

    #[test]
    fn test_render_not_found_in_english() {
        let renderer = TemplateRenderer::new().unwrap();
        let site = SiteData {
            title: "Blog".to_string(),
            language: "en".to_string(),
        };
        let html = renderer.render_not_found(&site).unwrap();
        assert!(html.contains("Post not found."));
        assert!(html.contains("lang=\"en\""));
    }
}
