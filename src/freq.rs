use std::collections::HashMap;

use serde::{Serialize, Serializer};

/// Occurrences of each base form, remembering the order words were first seen.
/// Serializes as the ranked list, most frequent first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: HashMap<String, usize>,
    first_seen: Vec<String>,
}

#[derive(Serialize)]
struct RankedWord<'a> {
    label: String,
    word: &'a str,
    count: usize,
}

impl Serialize for FrequencyTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let ranked: Vec<RankedWord<'_>> = self
            .ranked()
            .into_iter()
            .enumerate()
            .map(|(rank, (word, count))| RankedWord {
                label: rank_label(rank, word),
                word,
                count,
            })
            .collect();
        ranked.serialize(serializer)
    }
}

fn rank_label(rank: usize, word: &str) -> String {
    format!("{:02}_{}", rank, word)
}

impl FrequencyTable {
    pub fn get(&self, word: &str) -> usize {
        self.counts.get(word).copied().unwrap_or(0)
    }

    /// Number of distinct words.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts, equal to the number of tokens counted.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Most frequent first; ties keep first-seen order.
    pub fn ranked(&self) -> Vec<(&str, usize)> {
        let mut ranked: Vec<(&str, usize)> = self
            .first_seen
            .iter()
            .map(|w| (w.as_str(), self.counts[w]))
            .collect();
        // Stable sort, so first-seen order survives among equal counts.
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }

    /// Ranked words prefixed with their zero-padded rank (`00_作画`) so they sort for display.
    pub fn ranked_labels(&self) -> Vec<(String, usize)> {
        self.ranked()
            .into_iter()
            .enumerate()
            .map(|(rank, (word, count))| (rank_label(rank, word), count))
            .collect()
    }
}

pub fn frequencies<S: AsRef<str>>(tokens: &[S]) -> FrequencyTable {
    let mut table = FrequencyTable::default();
    for token in tokens {
        let token = token.as_ref();
        match table.counts.get_mut(token) {
            Some(n) => *n += 1,
            None => {
                table.counts.insert(token.to_string(), 1);
                table.first_seen.push(token.to_string());
            }
        }
    }
    table
}

/// Counts of caller-chosen words, in the order they were first asked for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TargetCounts(Vec<(String, usize)>);

impl TargetCounts {
    pub fn get(&self, word: &str) -> Option<usize> {
        self.0.iter().find(|(w, _)| w == word).map(|(_, n)| *n)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.0.iter().map(|(w, n)| (w.as_str(), *n))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Exact matches of each target word among the already category-filtered tokens.
/// A target from an excluded category therefore counts zero. Repeated targets are
/// reported once.
pub fn target_counts<S, T>(tokens: &[S], targets: &[T]) -> TargetCounts
where
    S: AsRef<str>,
    T: AsRef<str>,
{
    let mut counts: Vec<(String, usize)> = Vec::with_capacity(targets.len());
    for target in targets {
        let target = target.as_ref();
        if counts.iter().any(|(w, _)| w == target) {
            continue;
        }
        let n = tokens.iter().filter(|t| t.as_ref() == target).count();
        counts.push((target.to_string(), n));
    }
    TargetCounts(counts)
}

/// Retained words joined by spaces, the input the word cloud renderer expects.
pub fn cloud_text<S: AsRef<str>>(tokens: &[S]) -> String {
    tokens
        .iter()
        .map(|t| t.as_ref())
        .collect::<Vec<&str>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKENS: [&str; 7] = ["作画", "良い", "声優", "良い", "作画", "作画", "曲"];

    #[test]
    fn counts_sum_to_token_count() {
        let table = frequencies(&TOKENS);
        assert_eq!(table.total(), TOKENS.len());
        assert_eq!(table.len(), 4);
        assert_eq!(table.get("作画"), 3);
        assert_eq!(table.get("missing"), 0);
    }

    #[test]
    fn ranking_breaks_ties_by_first_appearance() {
        let table = frequencies(&TOKENS);
        assert_eq!(
            table.ranked(),
            vec![("作画", 3), ("良い", 2), ("声優", 1), ("曲", 1)]
        );
        assert_eq!(table.ranked_labels()[0], ("00_作画".to_string(), 3));
        assert_eq!(table.ranked_labels()[3].0, "03_曲");
    }

    #[test]
    fn json_keeps_the_ranked_order() {
        let json = serde_json::to_value(frequencies(&TOKENS)).unwrap();
        let ranked = json.as_array().unwrap();
        assert_eq!(ranked.len(), 4);
        assert_eq!(ranked[0]["label"], "00_作画");
        assert_eq!(ranked[0]["count"], 3);
        assert_eq!(ranked[1]["word"], "良い");
        assert_eq!(ranked[3]["label"], "03_曲");
    }

    #[test]
    fn targets_count_exact_matches_once_per_word() {
        let counts = target_counts(&TOKENS, &["良い", "作画", "良い", "ストーリー"]);
        assert_eq!(
            counts.iter().collect::<Vec<_>>(),
            vec![("良い", 2), ("作画", 3), ("ストーリー", 0)]
        );
        assert_eq!(counts.get("作画"), Some(3));
        assert_eq!(counts.get("曲"), None);
    }

    #[test]
    fn empty_inputs() {
        let none: [&str; 0] = [];
        assert!(frequencies(&none).is_empty());
        assert!(frequencies(&none).ranked().is_empty());
        assert_eq!(target_counts(&none, &["x"]).get("x"), Some(0));
        assert!(target_counts(&TOKENS, &none).is_empty());
        assert_eq!(cloud_text(&none), "");
    }

    #[test]
    fn cloud_text_keeps_every_token() {
        assert_eq!(cloud_text(&TOKENS[..3]), "作画 良い 声優");
    }
}
