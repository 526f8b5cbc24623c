//! Directory API client.
//!
//! One authenticated GET, no retries: any failure aborts the run before a
//! store is touched.

use fc_common::{Error, Result};
use fc_config::ApiToken;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::io::{self, Read};
use std::time::Duration;
use tracing::{debug, info};

/// One untyped instance object as returned by the API.
pub type RawRecord = Map<String, Value>;

/// Anything that can produce one batch of raw instance records.
pub trait InstanceSource {
    fn fetch(&self) -> Result<Vec<RawRecord>>;
}

#[derive(Debug, Deserialize)]
struct InstancesResponse {
    instances: Vec<RawRecord>,
}

/// Decode a response body into raw records, preserving API order.
pub fn parse_response(body: &str) -> Result<Vec<RawRecord>> {
    let response: InstancesResponse = serde_json::from_str(body)
        .map_err(|e| Error::Schema(format!("response body is not an instance list: {e}")))?;
    Ok(response.instances)
}

/// Blocking HTTP source with a fixed overall deadline.
#[derive(Debug, Clone)]
pub struct HttpSource {
    url: String,
    token: ApiToken,
    timeout: Duration,
}

impl HttpSource {
    pub fn new(url: impl Into<String>, token: ApiToken, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            token,
            timeout,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn timeout_error(&self) -> Error {
        Error::Timeout {
            seconds: self.timeout.as_secs().max(1),
        }
    }

    fn transport_error(&self, err: &(dyn std::error::Error + 'static)) -> Error {
        if is_timeout(err) {
            self.timeout_error()
        } else {
            Error::Network(format!("GET {}: {err}", self.url))
        }
    }
}

impl InstanceSource for HttpSource {
    fn fetch(&self) -> Result<Vec<RawRecord>> {
        let agent = ureq::AgentBuilder::new().timeout(self.timeout).build();

        debug!(url = %self.url, timeout_secs = self.timeout.as_secs(), "requesting instance list");
        let response = match agent
            .get(&self.url)
            .set("Authorization", &self.token.bearer_header())
            .set("Accept", "application/json")
            .call()
        {
            Ok(response) => response,
            Err(ureq::Error::Status(code, _)) => {
                return Err(Error::Network(format!("GET {} returned HTTP {code}", self.url)));
            }
            Err(ureq::Error::Transport(err)) => return Err(self.transport_error(&err)),
        };

        // Unbounded read: the full instance list exceeds ureq's string cap.
        let mut body = String::new();
        response
            .into_reader()
            .read_to_string(&mut body)
            .map_err(|e| self.transport_error(&e))?;

        let records = parse_response(&body)?;
        info!(records = records.len(), bytes = body.len(), "instance list fetched");
        Ok(records)
    }
}

/// Walk the error chain looking for an I/O timeout.
fn is_timeout(err: &(dyn std::error::Error + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(e) = current {
        if let Some(io_err) = e.downcast_ref::<io::Error>() {
            if matches!(io_err.kind(), io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock) {
                return true;
            }
        }
        current = e.source();
    }
    false
}
