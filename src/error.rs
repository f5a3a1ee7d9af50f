use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Couldn't fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Fetching {url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("Unexpected markup at {url}: {reason}")]
    Parse { url: String, reason: String },
    #[error("The selector you are trying to scrape for is invalid. Selector: {0}")]
    ParseMissingSelector(String),

    #[error("Crawl aborted at {url} after collecting {collected} records: {source}")]
    Crawl {
        url: String,
        collected: usize,
        #[source]
        source: Box<Error>,
    },

    #[error("Invalid score range: {0}")]
    InvalidRange(String),
    #[error("Morphological analysis failed: {0}")]
    Analyzer(String),
    #[error("Lexicon line {line}: {reason}")]
    Lexicon { line: usize, reason: String },

    #[error("Io Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Json Error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Transport failure or non-success response.
    pub fn is_fetch(&self) -> bool {
        match self {
            Error::Fetch { .. } | Error::Status { .. } => true,
            Error::Crawl { source, .. } => source.is_fetch(),
            _ => false,
        }
    }

    /// Markup that doesn't have the expected shape.
    pub fn is_parse(&self) -> bool {
        match self {
            Error::Parse { .. } | Error::ParseMissingSelector(_) => true,
            Error::Crawl { source, .. } => source.is_parse(),
            _ => false,
        }
    }
}
