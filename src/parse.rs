use scraper::{ElementRef, Html, Selector};

use crate::config::SiteProfile;
use crate::{Error, Result};

/// Why a review container produced no record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dropped {
    MissingScore,
    Unscored,
    NotANumber,
}

/// Parses trimmed score text. The site's sentinel and anything that isn't a finite
/// number are drops, not errors.
pub fn parse_score(text: &str, unscored: &str) -> core::result::Result<f64, Dropped> {
    let text = text.trim();
    if text == unscored {
        return Err(Dropped::Unscored);
    }
    match text.parse::<f64>() {
        Ok(score) if score.is_finite() => Ok(score),
        _ => Err(Dropped::NotANumber),
    }
}

/// Joins a site-relative `href` onto `origin`. Absolute, protocol-relative or
/// path-relative links are rejected rather than guessed at.
pub fn resolve_url(origin: &str, href: &str, page_url: &str) -> Result<String> {
    let href = href.trim();
    if !href.starts_with('/') || href.starts_with("//") {
        return Err(Error::Parse {
            url: page_url.to_string(),
            reason: format!("link `{}` is not a same-origin absolute path", href),
        });
    }
    Ok(format!("{}{}", origin.trim_end_matches('/'), href))
}

/// Compiled selectors for one `SiteProfile`.
#[derive(Debug, Clone)]
pub struct Selectors {
    container: Selector,
    score: Selector,
    review: Selector,
    read_more: Selector,
    next_page: Selector,
}

impl Selectors {
    pub fn new(profile: &SiteProfile) -> Result<Self> {
        Ok(Self {
            container: create_selector(&profile.container)?,
            score: create_selector(&profile.score)?,
            review: create_selector(&profile.review)?,
            read_more: create_selector(&profile.read_more)?,
            next_page: create_selector(&profile.next_page)?,
        })
    }
}

#[inline]
fn create_selector(sel_str: &str) -> Result<Selector> {
    Selector::parse(sel_str).map_err(|_| Error::ParseMissingSelector(sel_str.into()))
}

/// What a container's review element holds.
#[derive(Debug, Clone, PartialEq)]
pub enum ReviewBody {
    /// Visible text, trimmed.
    Text(String),
    /// Truncated review; the raw `href` of its "read more" link.
    ReadMore(String),
}

/// A parsed listing page, queried through the site's selectors.
pub struct ReviewPage<'s> {
    doc: Html,
    sel: &'s Selectors,
}

impl<'s> ReviewPage<'s> {
    pub fn parse(html: &str, sel: &'s Selectors) -> Self {
        Self {
            doc: Html::parse_document(html),
            sel,
        }
    }

    /// Review containers in document order.
    pub fn containers(&self) -> impl Iterator<Item = ElementRef<'_>> + '_ {
        self.doc.select(&self.sel.container)
    }

    pub fn score_of(&self, container: ElementRef<'_>) -> Option<String> {
        container.select(&self.sel.score).next().map(element_text)
    }

    pub fn review_of(&self, container: ElementRef<'_>) -> Option<ReviewBody> {
        let review = container.select(&self.sel.review).next()?;
        let href = review
            .select(&self.sel.read_more)
            .next()
            .and_then(|a| a.value().attr("href"));
        Some(match href {
            Some(href) => ReviewBody::ReadMore(href.to_string()),
            None => ReviewBody::Text(element_text(review)),
        })
    }

    /// Raw `href` of the "next" pagination link, if there is one that carries a target.
    pub fn next_link(&self) -> Option<String> {
        self.doc
            .select(&self.sel.next_page)
            .next()
            .and_then(|a| a.value().attr("href"))
            .map(String::from)
    }

    /// First review element anywhere on the page, used on full-review pages.
    pub fn first_review_text(&self) -> Option<String> {
        self.doc.select(&self.sel.review).next().map(element_text)
    }
}

fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// Where a surviving record's review text comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum ReviewSource {
    Missing,
    Inline(String),
    /// Resolved URL of the full review page.
    Expand(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub score: f64,
    pub review: ReviewSource,
}

/// Everything taken from one listing page before any review is expanded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Listing {
    pub entries: Vec<Entry>,
    pub next_page: Option<String>,
    pub dropped: Vec<Dropped>,
}

/// Extracts scored entries and the resolved next-page URL from one listing page.
/// The parsed document is dropped before returning so nothing non-`Send` outlives the call.
pub fn extract_listing(
    html: &str,
    page_url: &str,
    profile: &SiteProfile,
    sel: &Selectors,
) -> Result<Listing> {
    let page = ReviewPage::parse(html, sel);
    let mut listing = Listing::default();

    for container in page.containers() {
        let score = match page.score_of(container) {
            None => Err(Dropped::MissingScore),
            Some(text) => parse_score(&text, &profile.unscored),
        };
        let score = match score {
            Ok(score) => score,
            Err(dropped) => {
                listing.dropped.push(dropped);
                continue;
            }
        };

        let review = match page.review_of(container) {
            None => ReviewSource::Missing,
            Some(ReviewBody::Text(text)) => ReviewSource::Inline(text),
            Some(ReviewBody::ReadMore(href)) => {
                ReviewSource::Expand(resolve_url(&profile.origin, &href, page_url)?)
            }
        };
        listing.entries.push(Entry { score, review });
    }

    listing.next_page = page
        .next_link()
        .map(|href| resolve_url(&profile.origin, &href, page_url))
        .transpose()?;

    Ok(listing)
}

/// Review body of a full-review page, `None` if the page has no review element.
pub fn extract_full_review(html: &str, sel: &Selectors) -> Option<String> {
    ReviewPage::parse(html, sel).first_review_text()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
          <div class="p-mark">
            <div class="c-rating__score">4.2</div>
            <div class="p-mark__review">作画が <b>綺麗</b></div>
          </div>
          <div class="p-mark"><div class="c-rating__score">-</div>
            <div class="p-mark__review">unscored</div></div>
          <div class="p-mark"><div class="c-rating__score">abc</div></div>
          <div class="p-mark"><div class="p-mark__review">no score</div></div>
          <div class="p-mark"><div class="c-rating__score"> 3.0 </div></div>
          <div class="p-mark">
            <div class="c-rating__score">5.0</div>
            <div class="p-mark__review">途中…<a href="/animes/1/2/reviews/99">続きを読む</a></div>
          </div>
          <div class="p-mark">
            <div class="c-rating__score">1.5</div>
            <div class="p-mark__review">dead <a>link</a></div>
          </div>
          <a class="c2-pagination__next" href="/animes/1/2?page=2">次へ</a>
        </body></html>
    "#;

    fn parse(html: &str) -> Result<Listing> {
        let profile = SiteProfile::default();
        let sel = Selectors::new(&profile).unwrap();
        extract_listing(html, "https://filmarks.com/animes/1/2", &profile, &sel)
    }

    #[test]
    fn score_parsing() {
        assert_eq!(parse_score(" 8.5 ", "-"), Ok(8.5));
        assert_eq!(parse_score("-", "-"), Err(Dropped::Unscored));
        assert_eq!(parse_score("n/a", "-"), Err(Dropped::NotANumber));
        assert_eq!(parse_score("", "-"), Err(Dropped::NotANumber));
        assert_eq!(parse_score("NaN", "-"), Err(Dropped::NotANumber));
    }

    #[test]
    fn url_resolution_only_accepts_site_paths() {
        let page = "https://filmarks.com/a";
        assert_eq!(
            resolve_url("https://filmarks.com/", "/animes/1?page=2", page).unwrap(),
            "https://filmarks.com/animes/1?page=2"
        );
        for bad in ["https://evil.example/x", "//evil.example/x", "animes/1", ""] {
            let err = resolve_url("https://filmarks.com", bad, page).unwrap_err();
            assert!(err.is_parse(), "{}", bad);
        }
    }

    #[test]
    fn extracts_entries_in_order_and_drops_unscored_containers() {
        let listing = parse(PAGE).unwrap();
        assert_eq!(
            listing.entries,
            vec![
                Entry {
                    score: 4.2,
                    review: ReviewSource::Inline("作画が 綺麗".into())
                },
                Entry {
                    score: 3.0,
                    review: ReviewSource::Missing
                },
                Entry {
                    score: 5.0,
                    review: ReviewSource::Expand(
                        "https://filmarks.com/animes/1/2/reviews/99".into()
                    )
                },
                Entry {
                    score: 1.5,
                    review: ReviewSource::Inline("dead link".into())
                },
            ]
        );
        assert_eq!(
            listing.dropped,
            vec![Dropped::Unscored, Dropped::NotANumber, Dropped::MissingScore]
        );
        assert_eq!(
            listing.next_page.as_deref(),
            Some("https://filmarks.com/animes/1/2?page=2")
        );
    }

    #[test]
    fn next_link_without_href_ends_pagination() {
        let listing = parse(r#"<a class="c2-pagination__next">次へ</a>"#).unwrap();
        assert_eq!(listing.next_page, None);
        assert!(listing.entries.is_empty());
    }

    #[test]
    fn cross_origin_links_are_parse_errors() {
        let html = r#"<a class="c2-pagination__next" href="https://other.example/p2">x</a>"#;
        assert!(parse(html).unwrap_err().is_parse());
    }

    #[test]
    fn full_review_page() {
        let profile = SiteProfile::default();
        let sel = Selectors::new(&profile).unwrap();
        let html = r#"<div class="p-mark__review">
            全文のレビュー </div><div class="p-mark__review">other</div>"#;
        assert_eq!(extract_full_review(html, &sel).as_deref(), Some("全文のレビュー"));
        assert_eq!(extract_full_review("<p>gone</p>", &sel), None);
    }

    #[test]
    fn invalid_selector_is_reported() {
        let profile = SiteProfile {
            container: "div[".into(),
            ..SiteProfile::default()
        };
        assert!(matches!(
            Selectors::new(&profile),
            Err(Error::ParseMissingSelector(s)) if s == "div["
        ));
    }
}
