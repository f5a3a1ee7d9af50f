use std::str::FromStr;

use serde::Serialize;

use crate::{Error, Result};

/// One scored review pulled from a listing page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub score: f64,
    pub review: Option<String>,
}

impl Record {
    pub fn new(score: f64, review: Option<String>) -> Self {
        Self { score, review }
    }
}

/// All records of one crawl, in discovery order. Never mutated after the crawl returns.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl From<Vec<Record>> for Dataset {
    fn from(records: Vec<Record>) -> Self {
        Self { records }
    }
}

/// Half-open score interval `[min, max)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreRange {
    min: f64,
    max: f64,
}

impl ScoreRange {
    pub fn new(min: f64, max: f64) -> Result<Self> {
        if min.is_nan() || max.is_nan() || min >= max {
            return Err(Error::InvalidRange(format!("{} is not below {}", min, max)));
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn contains(&self, score: f64) -> bool {
        self.min <= score && score < self.max
    }
}

/// Parses bucket labels like `"3-4"`.
impl FromStr for ScoreRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (min, max) = s
            .split_once('-')
            .ok_or_else(|| Error::InvalidRange(format!("expected `min-max`, got `{}`", s)))?;
        let bound = |b: &str| {
            b.trim()
                .parse::<f64>()
                .map_err(|_| Error::InvalidRange(format!("`{}` is not a number", b.trim())))
        };
        Self::new(bound(min)?, bound(max)?)
    }
}

/// Records whose score falls in `range`, in dataset order.
pub fn filter_by_score(dataset: &Dataset, range: ScoreRange) -> Vec<Record> {
    dataset
        .records()
        .iter()
        .filter(|r| range.contains(r.score))
        .cloned()
        .collect()
}

/// Joins review texts with single spaces; a missing review counts as empty text.
pub fn aggregate_text(records: &[Record]) -> String {
    records
        .iter()
        .map(|r| r.review.as_deref().unwrap_or(""))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> Dataset {
        vec![
            Record::new(4.5, Some("最高".into())),
            Record::new(3.0, None),
            Record::new(5.0, Some("神".into())),
            Record::new(3.9, Some("普通".into())),
            Record::new(2.99, Some("微妙".into())),
        ]
        .into()
    }

    #[test]
    fn range_is_upper_exclusive_and_keeps_order() {
        let range: ScoreRange = "3-4".parse().unwrap();
        let picked = filter_by_score(&dataset(), range);
        let scores: Vec<f64> = picked.iter().map(|r| r.score).collect();
        assert_eq!(scores, vec![3.0, 3.9]);
    }

    #[test]
    fn top_score_needs_a_max_above_it() {
        let ds = dataset();
        assert!(filter_by_score(&ds, ScoreRange::new(4.0, 5.0).unwrap())
            .iter()
            .all(|r| r.score < 5.0));
        assert_eq!(filter_by_score(&ds, ScoreRange::new(4.0, 5.1).unwrap()).len(), 2);
    }

    #[test]
    fn every_kept_record_is_in_range_and_every_other_is_out() {
        let ds = dataset();
        for (min, max) in [(0.0, 1.0), (2.5, 3.5), (3.0, 4.0), (0.0, 10.0)] {
            let range = ScoreRange::new(min, max).unwrap();
            let kept = filter_by_score(&ds, range);
            assert!(kept.iter().all(|r| min <= r.score && r.score < max));
            let outside = ds.records().iter().filter(|r| !range.contains(r.score)).count();
            assert_eq!(kept.len() + outside, ds.len());
        }
    }

    #[test]
    fn bad_ranges_are_rejected() {
        assert!("4-3".parse::<ScoreRange>().is_err());
        assert!("2-2".parse::<ScoreRange>().is_err());
        assert!("a-3".parse::<ScoreRange>().is_err());
        assert!("3".parse::<ScoreRange>().is_err());
        assert!(ScoreRange::new(f64::NAN, 1.0).is_err());
    }

    #[test]
    fn aggregate_uses_empty_text_for_missing_reviews() {
        let records = vec![
            Record::new(1.0, Some("A".into())),
            Record::new(1.0, None),
            Record::new(1.0, Some("B".into())),
        ];
        assert_eq!(aggregate_text(&records), "A  B");
        assert_eq!(aggregate_text(&[]), "");
    }
}
