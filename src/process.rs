use std::mem;

use chrono::Local;
use serde::Serialize;

use crate::config::SiteProfile;
use crate::parse::{extract_full_review, extract_listing, Dropped, ReviewSource, Selectors};
use crate::record::{Dataset, Record};
use crate::request::PageClient;
use crate::{info_time, Error, Result};

/// Where a crawl is. `Done` and `Failed` are terminal.
#[derive(Debug, Clone, PartialEq)]
pub enum CrawlState {
    Idle,
    Fetching(String),
    Extracting { url: String, html: String },
    Done,
    Failed,
}

/// Counts of everything a crawl recovered from instead of failing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CrawlStats {
    pub pages: usize,
    pub records: usize,
    pub dropped_missing_score: usize,
    pub dropped_unscored: usize,
    pub dropped_not_a_number: usize,
    pub failed_expansions: usize,
}

impl CrawlStats {
    fn count_drop(&mut self, dropped: Dropped) {
        match dropped {
            Dropped::MissingScore => self.dropped_missing_score += 1,
            Dropped::Unscored => self.dropped_unscored += 1,
            Dropped::NotANumber => self.dropped_not_a_number += 1,
        }
    }

    pub fn dropped(&self) -> usize {
        self.dropped_missing_score + self.dropped_unscored + self.dropped_not_a_number
    }
}

/// A finished crawl.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Crawl {
    pub dataset: Dataset,
    pub stats: CrawlStats,
}

/// Walks the listing pages one at a time, following "next" links until there are none.
/// Fetches never overlap: each page, and each review expansion on it, completes
/// before the next request goes out.
pub struct Crawler<'c, C> {
    client: &'c C,
    profile: SiteProfile,
    selectors: Selectors,
    state: CrawlState,
    records: Vec<Record>,
    stats: CrawlStats,
}

impl<'c, C: PageClient> Crawler<'c, C> {
    pub fn new(client: &'c C, profile: SiteProfile) -> Result<Self> {
        let selectors = Selectors::new(&profile)?;
        Ok(Self {
            client,
            profile,
            selectors,
            state: CrawlState::Idle,
            records: Vec::new(),
            stats: CrawlStats::default(),
        })
    }

    pub fn state(&self) -> &CrawlState {
        &self.state
    }

    pub fn stats(&self) -> &CrawlStats {
        &self.stats
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.state, CrawlState::Done | CrawlState::Failed)
    }

    /// Points an idle crawler at its first page.
    pub fn start(&mut self, start_url: &str) {
        if self.state == CrawlState::Idle {
            self.state = CrawlState::Fetching(start_url.to_string());
        }
    }

    /// Runs one transition. A fetch or parse failure moves to `Failed` and is returned
    /// with the page URL and how many records had been collected.
    pub async fn step(&mut self) -> Result<()> {
        match mem::replace(&mut self.state, CrawlState::Failed) {
            CrawlState::Fetching(url) => match self.client.fetch_html(&url).await {
                Ok(html) => {
                    self.stats.pages += 1;
                    self.state = CrawlState::Extracting { url, html };
                    Ok(())
                }
                Err(e) => Err(self.abort(url, e)),
            },
            CrawlState::Extracting { url, html } => match self.extract(&url, &html).await {
                Ok(Some(next)) => {
                    self.state = CrawlState::Fetching(next);
                    Ok(())
                }
                Ok(None) => {
                    self.state = CrawlState::Done;
                    Ok(())
                }
                Err(e) => Err(self.abort(url, e)),
            },
            other => {
                self.state = other;
                Ok(())
            }
        }
    }

    /// Hands back the dataset, only once the crawl is `Done`.
    pub fn finish(self) -> Option<Crawl> {
        match self.state {
            CrawlState::Done => Some(Crawl {
                dataset: self.records.into(),
                stats: self.stats,
            }),
            _ => None,
        }
    }

    fn abort(&mut self, url: String, source: Error) -> Error {
        self.state = CrawlState::Failed;
        Error::Crawl {
            url,
            collected: self.records.len(),
            source: Box::new(source),
        }
    }

    async fn extract(&mut self, url: &str, html: &str) -> Result<Option<String>> {
        let listing = extract_listing(html, url, &self.profile, &self.selectors)?;
        for dropped in listing.dropped {
            self.stats.count_drop(dropped);
        }

        let found = listing.entries.len();
        for entry in listing.entries {
            let review = match entry.review {
                ReviewSource::Missing => None,
                ReviewSource::Inline(text) => Some(text),
                ReviewSource::Expand(review_url) => self.expand(&review_url).await,
            };
            self.records.push(Record::new(entry.score, review));
        }
        self.stats.records = self.records.len();
        info_time!("Extracted {} records from {}", found, url);

        Ok(listing.next_page)
    }

    /// Full text of a truncated review. A failed fetch leaves the review absent.
    async fn expand(&mut self, review_url: &str) -> Option<String> {
        match self.client.fetch_html(review_url).await {
            Ok(html) => extract_full_review(&html, &self.selectors),
            Err(e) => {
                self.stats.failed_expansions += 1;
                info_time!("Couldn't expand review, keeping it without text: {}", e);
                None
            }
        }
    }
}

/// Crawls every listing page reachable from `start_url`. Any fetch or parse failure on a
/// listing page fails the whole crawl; no partial dataset is returned.
pub async fn crawl<C: PageClient>(
    client: &C,
    profile: SiteProfile,
    start_url: &str,
) -> Result<Crawl> {
    let start_time = Local::now();
    info_time!("Started crawling {}", start_url);

    let mut crawler = Crawler::new(client, profile)?;
    crawler.start(start_url);
    while !crawler.is_finished() {
        crawler.step().await?;
    }

    let stats = crawler.stats().clone();
    info_time!(
        start_time,
        "Crawled {} pages: {} records, {} dropped, {} failed expansions",
        stats.pages,
        stats.records,
        stats.dropped(),
        stats.failed_expansions
    );
    crawler.finish().ok_or_else(|| Error::Parse {
        url: start_url.to_string(),
        reason: "crawl stopped before reaching its last page".into(),
    })
}
