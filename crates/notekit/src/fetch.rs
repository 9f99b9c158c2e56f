use std::time::Duration;

use url::Url;

use crate::error::NotekitError;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetches remote page content (e.g., a course table of contents).
pub trait ContentFetcher {
    fn fetch(&self, url: &Url) -> Result<String, NotekitError>;
}

/// Default HTTP fetcher backed by `ureq`. One GET per call, no retries.
pub struct HttpFetcher {
    agent: ureq::Agent,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self { agent }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

impl ContentFetcher for HttpFetcher {
    fn fetch(&self, url: &Url) -> Result<String, NotekitError> {
        tracing::debug!(url = %url, "fetching page");
        let response = match self.agent.get(url.as_str()).call() {
            Ok(response) => response,
            Err(ureq::Error::Status(code, response)) => {
                return Err(NotekitError::Fetch(format!(
                    "received {} ({}) from {}",
                    code,
                    response.status_text(),
                    url
                )));
            }
            Err(err) => {
                return Err(NotekitError::Fetch(format!(
                    "failed to fetch {}: {}",
                    url, err
                )));
            }
        };

        response.into_string().map_err(|err| {
            NotekitError::Fetch(format!("failed reading body from {}: {}", url, err))
        })
    }
}

/// Parses `raw` as an absolute URL, mapping failures to `InvalidUrl`.
pub fn parse_url(raw: &str) -> Result<Url, NotekitError> {
    Url::parse(raw).map_err(|err| NotekitError::InvalidUrl {
        url: raw.to_string(),
        reason: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_url_accepts_absolute_https() {
        let url = parse_url("https://fullstackopen.com/en/part5").unwrap();
        assert_eq!(url.path(), "/en/part5");
    }

    #[test]
    fn parse_url_rejects_relative_paths() {
        let err = parse_url("/en/part5").expect_err("relative url should fail");
        assert!(matches!(err, NotekitError::InvalidUrl { .. }));
        assert!(err.to_string().contains("/en/part5"));
    }
}
