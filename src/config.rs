use serde::Serialize;

use crate::record::ScoreRange;

pub const DEFAULT_ORIGIN: &str = "https://filmarks.com";
/// Score text the site shows for a review without a rating.
pub const UNSCORED_SENTINEL: &str = "-";
/// Bucket labels offered for score filtering.
pub const SCORE_BUCKETS: [&str; 5] = ["0-1", "1-2", "2-3", "3-4", "4-5"];
/// Top-level categories offered for filtering: noun, adjective, verb, adverb.
pub const WORD_CLASSES: [&str; 4] = ["名詞", "形容詞", "動詞", "副詞"];

/// Where things live in the review site's markup.
#[derive(Debug, Clone)]
pub struct SiteProfile {
    /// Origin that relative links on the site are resolved against.
    pub origin: String,
    pub container: String,
    pub score: String,
    pub review: String,
    /// Link inside a truncated review pointing at the full text.
    pub read_more: String,
    pub next_page: String,
    pub unscored: String,
}

impl Default for SiteProfile {
    fn default() -> Self {
        Self {
            origin: DEFAULT_ORIGIN.into(),
            container: ".p-mark".into(),
            score: ".c-rating__score".into(),
            review: ".p-mark__review".into(),
            read_more: "a".into(),
            next_page: "a.c2-pagination__next".into(),
            unscored: UNSCORED_SENTINEL.into(),
        }
    }
}

/// Parameters of one analysis run over a crawled dataset.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub range: ScoreRange,
    pub categories: Vec<String>,
    /// Only handed to the word cloud renderer, never applied to counting.
    pub stop_words: Vec<String>,
    pub target_words: Vec<String>,
}

/// Settings for the word cloud renderer, which lives outside this crate.
#[derive(Debug, Clone, Serialize)]
pub struct CloudConfig {
    pub stop_words: Vec<String>,
    pub font_path: Option<String>,
    pub width: u32,
    pub height: u32,
    pub background: String,
    pub colormap: String,
}

impl CloudConfig {
    pub fn new(stop_words: Vec<String>) -> Self {
        Self {
            stop_words,
            font_path: None,
            width: 800,
            height: 400,
            background: "white".into(),
            colormap: "summer".into(),
        }
    }
}

/// Splits comma separated user input, trimming entries and dropping empty ones.
pub fn parse_word_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|w| !w.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_list_trims_and_skips_blanks() {
        assert_eq!(parse_word_list(" 作画 ,, 声優,"), vec!["作画", "声優"]);
        assert!(parse_word_list("").is_empty());
        assert!(parse_word_list(" , ").is_empty());
    }

    #[test]
    fn every_bucket_label_is_a_valid_range() {
        for label in SCORE_BUCKETS {
            assert!(label.parse::<ScoreRange>().is_ok(), "{}", label);
        }
    }
}
