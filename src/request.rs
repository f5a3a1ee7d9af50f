use std::future::Future;

use reqwest::Client;

use crate::{Error, Result};

/// Something that can turn a URL into page HTML.
pub trait PageClient {
    fn fetch_html(&self, url: &str) -> impl Future<Output = Result<String>>;
}

/// `PageClient` backed by a shared `reqwest::Client`.
#[derive(Debug, Clone, Default)]
pub struct HttpClient {
    // Client uses Arc so we can clone cheaply
    client: Client,
}

impl HttpClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl PageClient for HttpClient {
    /// Requests a page and returns its HTML, failing on any non-success status.
    async fn fetch_html(&self, url: &str) -> Result<String> {
        let fetch_err = |source| Error::Fetch {
            url: url.to_string(),
            source,
        };
        let res = self.client.get(url).send().await.map_err(fetch_err)?;
        let status = res.status();
        if !status.is_success() {
            return Err(Error::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        res.text().await.map_err(fetch_err)
    }
}
