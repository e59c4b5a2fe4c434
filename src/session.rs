use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::StatusCode;

/// Default per-request timeout. Fetches must fail fast rather than hang.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Blocking HTTP session owned by exactly one adapter. Released when the
/// adapter goes out of scope.
pub struct Session {
    client: Client,
}

impl Session {
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .cookie_store(true)
            .build()
            .expect("Failed to build HTTP client");

        Session { client }
    }

    fn random_user_agent(&self) -> &'static str {
        let uas = [
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
            "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0",
            "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:121.0) Gecko/20100101 Firefox/121.0",
        ];
        use rand::Rng;
        let mut rng = rand::thread_rng();
        uas[rng.gen_range(0..uas.len())]
    }

    /// GET a URL, returning status and body text.
    pub fn get(&self, url: &str) -> Result<(StatusCode, String), reqwest::Error> {
        let resp = self
            .client
            .get(url)
            .header(USER_AGENT, self.random_user_agent())
            .send()?;
        let status = resp.status();
        let text = resp.text()?;
        Ok((status, text))
    }

    /// GET a URL asking for JSON. Some Workday deployments only answer
    /// their data endpoints when the Accept header says so.
    pub fn get_json(&self, url: &str) -> Result<(StatusCode, String), reqwest::Error> {
        let resp = self
            .client
            .get(url)
            .header(USER_AGENT, self.random_user_agent())
            .header(ACCEPT, "application/json")
            .send()?;
        let status = resp.status();
        let text = resp.text()?;
        Ok((status, text))
    }
}

impl Default for Session {
    fn default() -> Self {
        Session::new()
    }
}
