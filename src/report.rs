use chrono::Local;
use serde::Serialize;

use crate::config::{AnalysisConfig, CloudConfig};
use crate::freq::{cloud_text, frequencies, target_counts, FrequencyTable, TargetCounts};
use crate::info_time;
use crate::morph::{filter_categories, Analyzer};
use crate::record::{aggregate_text, filter_by_score, Dataset, Record};
use crate::Result;

/// Result of one analysis run. Built fresh each time, nothing carries over.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub selected: Vec<Record>,
    /// Base forms that passed the category filter, in text order.
    pub tokens: Vec<String>,
    pub frequencies: FrequencyTable,
    pub targets: TargetCounts,
    /// Space-joined tokens for the word cloud renderer.
    pub cloud_text: String,
    pub cloud: CloudConfig,
}

impl Report {
    pub fn has_words(&self) -> bool {
        !self.tokens.is_empty()
    }
}

/// Score filter, text aggregation, category filter, then counting.
/// Stop words ride along to the renderer untouched; they never affect the counts.
pub fn analyze<A: Analyzer + ?Sized>(
    dataset: &Dataset,
    config: &AnalysisConfig,
    analyzer: &A,
) -> Result<Report> {
    let start_time = Local::now();

    let selected = filter_by_score(dataset, config.range);
    let corpus = aggregate_text(&selected);
    let tokens = filter_categories(analyzer, &corpus, &config.categories)?;
    let frequencies = frequencies(&tokens);
    let targets = target_counts(&tokens, &config.target_words);

    info_time!(
        start_time,
        "Analyzed {} of {} records: {} words, {} distinct",
        selected.len(),
        dataset.len(),
        tokens.len(),
        frequencies.len()
    );

    Ok(Report {
        cloud_text: cloud_text(&tokens),
        cloud: CloudConfig::new(config.stop_words.clone()),
        selected,
        tokens,
        frequencies,
        targets,
    })
}
