//! Checker pages whose captcha guards each endpoint.
//!
//! The solver needs the URL of the page a human would have visited; the
//! token it returns is only accepted for requests matching that page. Only
//! keywords are escaped; domains and URLs go into the query as given.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use super::{AhrefsClient, TrafficMode};

/// Everything but letters, digits and `_.-~/` is escaped; spaces become `%20`.
const KEYWORD: &AsciiSet = &NON_ALPHANUMERIC.remove(b'_').remove(b'.').remove(b'-').remove(b'~').remove(b'/');

impl AhrefsClient {
    /// `/backlink-checker/?input={domain}&mode=subdomains`, domain as given.
    pub fn backlink_checker_page(&self, domain: &str) -> String {
        format!("{}/backlink-checker/?input={domain}&mode=subdomains", self.base_url())
    }

    /// `/keyword-generator/?country={country}&input={keyword}`
    pub fn keyword_generator_page(&self, keyword: &str, country: &str) -> String {
        format!(
            "{}/keyword-generator/?country={country}&input={}",
            self.base_url(),
            utf8_percent_encode(keyword, KEYWORD)
        )
    }

    /// `/keyword-difficulty/?country={country}&input={keyword}`
    pub fn keyword_difficulty_page(&self, keyword: &str, country: &str) -> String {
        format!(
            "{}/keyword-difficulty/?country={country}&input={}",
            self.base_url(),
            utf8_percent_encode(keyword, KEYWORD)
        )
    }

    /// `/traffic-checker/?input={target}&mode={mode}`, target as given.
    pub fn traffic_checker_page(&self, target: &str, mode: TrafficMode) -> String {
        format!("{}/traffic-checker/?input={target}&mode={mode}", self.base_url())
    }
}
