//! Range-based pagination
//!
//! Toornament list endpoints take a `Range: {unit}={start}-{end}` request
//! header and answer with `Content-Range: {unit} {start}-{end}/{total}`.
//! Pages are fetched strictly in order; the first response reveals the
//! total, so at least one request is always made.

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_RANGE, RANGE};
use reqwest::Method;
use rosterlink_domain::{Result, RosterLinkError};
use serde_json::Value;
use tracing::{debug, instrument};

use super::executor::RequestExecutor;
use super::transport::Transport;

static CONTENT_RANGE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([A-Za-z_]+)\s+(?:(\d+)-(\d+)|\*)/(\d+)\s*$")
        .expect("CONTENT_RANGE_PATTERN should compile - this is a bug")
});

/// Parsed `Content-Range` response header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentRange {
    /// Index range of the returned items; `None` for `{unit} */{total}`
    pub items: Option<(u64, u64)>,
    pub total: u64,
}

impl ContentRange {
    /// Parse a header value for the expected `unit`.
    ///
    /// # Errors
    /// Returns `RosterLinkError::Parse` if the value does not match
    /// `{unit} {first}-{last}/{total}` or `{unit} */{total}`.
    pub fn parse(unit: &str, value: &str) -> Result<Self> {
        let invalid = || RosterLinkError::Parse(format!("Invalid Content-Range '{value}' for unit {unit}"));

        let captures = CONTENT_RANGE_PATTERN.captures(value).ok_or_else(invalid)?;
        if &captures[1] != unit {
            return Err(invalid());
        }

        let number = |index: usize| -> Result<Option<u64>> {
            captures
                .get(index)
                .map(|m| m.as_str().parse::<u64>().map_err(|_| invalid()))
                .transpose()
        };

        let items = match (number(2)?, number(3)?) {
            (Some(first), Some(last)) if first <= last => Some((first, last)),
            (None, None) => None,
            _ => return Err(invalid()),
        };
        let total = number(4)?.ok_or_else(invalid)?;

        Ok(Self { items, total })
    }

    /// Index of the first item after this page.
    pub fn next_start(&self) -> Option<u64> {
        self.items.map(|(_, last)| last + 1)
    }
}

impl RequestExecutor {
    /// Fetch every item of a paginated collection
    ///
    /// Issues GET requests for `{unit}={start}-{start + per_page - 1}` until
    /// the reported total is reached and returns all items in server order.
    /// Any failed page aborts the whole call; partial results are dropped.
    ///
    /// # Errors
    /// `RemoteApi` for a rejected page, `Parse` for a missing or malformed
    /// `Content-Range` header or a non-array body, plus the errors of
    /// [`RequestExecutor::get`].
    #[instrument(skip(self))]
    pub async fn paginate(
        &self,
        url: &str,
        unit: &str,
        per_page: u32,
        authorized: bool,
    ) -> Result<Vec<Value>> {
        if per_page == 0 {
            return Err(RosterLinkError::InvalidInput("page size must be positive".to_string()));
        }

        let mut items = Vec::new();
        let mut start: u64 = 0;
        let mut total: u64 = 1;
        let mut pages = 0u32;

        while start < total {
            let end = start + u64::from(per_page) - 1;
            let mut headers = HeaderMap::new();
            let range = HeaderValue::from_str(&format!("{unit}={start}-{end}"))
                .map_err(|e| RosterLinkError::InvalidInput(format!("Invalid range unit: {e}")))?;
            headers.insert(RANGE, range);

            let response = self.send(Method::GET, url, None::<&()>, headers, authorized).await?;
            let content_range = response
                .headers()
                .get(CONTENT_RANGE)
                .ok_or_else(|| RosterLinkError::Parse("Missing Content-Range header".to_string()))?
                .to_str()
                .map_err(|e| RosterLinkError::Parse(format!("Invalid Content-Range header: {e}")))
                .and_then(|value| ContentRange::parse(unit, value))?;

            match Transport::read_json(response).await? {
                Value::Array(page) => items.extend(page),
                Value::Null => {}
                other => {
                    return Err(RosterLinkError::Parse(format!(
                        "Expected a JSON array page, found {other}"
                    )))
                }
            }
            pages += 1;

            total = content_range.total;
            match content_range.next_start() {
                Some(next) if next > start => start = next,
                Some(_) => {
                    return Err(RosterLinkError::Parse(format!(
                        "Content-Range did not advance past {start}"
                    )))
                }
                None => break,
            }
        }

        debug!(pages, items = items.len(), total, "Paginated fetch complete");
        Ok(items)
    }
}
