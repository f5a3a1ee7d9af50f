//! Crawls a paginated review listing into scored records, then counts the words
//! of the chosen parts of speech in the reviews of a chosen score range.

mod error;
mod macros;

pub mod config;
pub mod freq;
pub mod morph;
pub mod parse;
pub mod process;
pub mod record;
pub mod report;
pub mod request;

pub use error::{Error, Result};
pub use process::{crawl, Crawl, CrawlStats};
pub use record::{Dataset, Record, ScoreRange};
pub use report::{analyze, Report};
