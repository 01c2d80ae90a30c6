//! Normalizes content API responses into view models

use super::post::{
    ContentBlock, Paragraph, PostDetail, PostPage, PostSummary, RawListing, RawPost, RawPostData,
};
use crate::helpers::DateFormatter;

/// Map a raw listing response into a `PostPage`.
///
/// Posts keep their order. A blank `next_page` becomes `None` so it can never
/// be mistaken for a cursor.
pub fn format_page(raw: &RawListing, dates: &DateFormatter) -> PostPage {
    PostPage {
        results: raw
            .results
            .iter()
            .map(|post| format_summary(post, dates))
            .collect(),
        next_cursor: normalize_cursor(raw.next_page.as_deref()),
    }
}

/// Map one raw document into a listing entry
pub fn format_summary(raw: &RawPost, dates: &DateFormatter) -> PostSummary {
    let data = raw.data.as_ref();

    PostSummary {
        id: raw.uid.clone().unwrap_or_default(),
        published_at: dates.display(raw.first_publication_date.as_deref()),
        title: text_field(data, |d| d.title.as_deref()),
        subtitle: text_field(data, |d| d.subtitle.as_deref()),
        author: text_field(data, |d| d.author.as_deref()),
    }
}

/// Map one raw document into the full post shown on its page
pub fn format_detail(raw: &RawPost, dates: &DateFormatter) -> PostDetail {
    let data = raw.data.as_ref();

    let content = data
        .and_then(|d| d.content.as_ref())
        .map(|blocks| {
            blocks
                .iter()
                .map(|block| ContentBlock {
                    heading: block.heading.clone(),
                    body: block
                        .body
                        .iter()
                        .flatten()
                        .map(|p| Paragraph {
                            text: p.text.clone(),
                        })
                        .collect(),
                })
                .collect()
        })
        .unwrap_or_default();

    PostDetail {
        published_at: dates.display(raw.first_publication_date.as_deref()),
        title: text_field(data, |d| d.title.as_deref()),
        banner_url: data
            .and_then(|d| d.banner.as_ref())
            .and_then(|b| b.url.clone())
            .unwrap_or_default(),
        author: text_field(data, |d| d.author.as_deref()),
        content,
    }
}

/// Treat empty and whitespace-only cursors as "no more pages"
pub fn normalize_cursor(cursor: Option<&str>) -> Option<String> {
    cursor
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(String::from)
}

fn text_field<F>(data: Option<&RawPostData>, field: F) -> String
where
    F: Fn(&RawPostData) -> Option<&str>,
{
    data.and_then(field).unwrap_or_default().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::post::{RawBanner, RawContentBlock, RawParagraph};

    fn dates() -> DateFormatter {
        DateFormatter::new("DD MMM YYYY", "pt-BR", "")
    }

    fn raw_post(uid: &str, date: Option<&str>) -> RawPost {
        RawPost {
            uid: Some(uid.to_string()),
            first_publication_date: date.map(String::from),
            data: Some(RawPostData {
                title: Some(format!("Title {}", uid)),
                subtitle: Some(format!("Subtitle {}", uid)),
                author: Some("Danilo Vieira".to_string()),
                ..Default::default()
            }),
        }
    }

    #[test]
    fn test_format_page() {
        let raw = RawListing {
            results: vec![
                raw_post("a", Some("2021-03-15T19:25:28+0000")),
                raw_post("b", Some("2021-03-25T19:27:35+0000")),
            ],
            next_page: Some("https://repo.cdn.prismic.io/api/v2/documents/search?page=2".into()),
        };

        let page = format_page(&raw, &dates());
        assert_eq!(page.results.len(), 2);
        assert_eq!(page.results[0].id, "a");
        assert_eq!(page.results[0].published_at.as_deref(), Some("15 mar 2021"));
        assert_eq!(page.results[0].title, "Title a");
        assert_eq!(page.results[0].subtitle, "Subtitle a");
        assert_eq!(page.results[0].author, "Danilo Vieira");
        assert_eq!(page.results[1].id, "b");
        assert!(page.has_more());
    }

    #[test]
    fn test_blank_cursor_means_no_more_pages() {
        for next_page in [None, Some(""), Some("   ")] {
            let raw = RawListing {
                results: vec![raw_post("a", None)],
                next_page: next_page.map(String::from),
            };
            let page = format_page(&raw, &dates());
            assert_eq!(page.next_cursor, None, "input {:?}", next_page);
            assert!(!page.has_more());
        }
    }

    #[test]
    fn test_null_date_passes_through() {
        let raw = RawListing {
            results: vec![raw_post("draft", None)],
            next_page: None,
        };
        let page = format_page(&raw, &dates());
        assert_eq!(page.results[0].published_at, None);
        assert_eq!(page.results[0].id, "draft");
    }

    #[test]
    fn test_missing_data_defaults() {
        let raw = RawListing {
            results: vec![RawPost::default()],
            next_page: None,
        };
        let page = format_page(&raw, &dates());
        let summary = &page.results[0];
        assert_eq!(summary.id, "");
        assert_eq!(summary.title, "");
        assert_eq!(summary.subtitle, "");
        assert_eq!(summary.author, "");
    }

    #[test]
    fn test_format_is_deterministic() {
        let raw = RawListing {
            results: vec![
                raw_post("a", Some("2021-03-15T19:25:28+0000")),
                raw_post("b", None),
            ],
            next_page: Some("https://next".into()),
        };
        assert_eq!(format_page(&raw, &dates()), format_page(&raw, &dates()));
    }

    #[test]
    fn test_format_detail() {
        let mut raw = raw_post("hooks", Some("2021-03-15T19:25:28+0000"));
        if let Some(data) = raw.data.as_mut() {
            data.banner = Some(RawBanner {
                url: Some("https://images.prismic.io/banner.png".to_string()),
            });
            data.content = Some(vec![
                RawContentBlock {
                    heading: Some("Proin et varius".to_string()),
                    body: Some(vec![
                        RawParagraph {
                            text: Some("Lorem ipsum".to_string()),
                        },
                        RawParagraph { text: None },
                    ]),
                },
                RawContentBlock {
                    heading: None,
                    body: None,
                },
            ]);
        }

        let detail = format_detail(&raw, &dates());
        assert_eq!(detail.title, "Title hooks");
        assert_eq!(detail.published_at.as_deref(), Some("15 mar 2021"));
        assert_eq!(detail.banner_url, "https://images.prismic.io/banner.png");
        assert_eq!(detail.content.len(), 2);
        assert_eq!(detail.content[0].body.len(), 2);
        assert_eq!(detail.content[0].body[1].text, None);
        assert!(detail.content[1].body.is_empty());
    }

    #[test]
    fn test_format_detail_without_data() {
        let detail = format_detail(&RawPost::default(), &dates());
        assert_eq!(detail.banner_url, "");
        assert!(detail.content.is_empty());
        assert_eq!(detail.published_at, None);
    }
}
