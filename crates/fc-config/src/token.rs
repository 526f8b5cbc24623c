//! Bearer token for the directory API.

use fc_common::{Error, Result};
use std::fmt;

/// Bearer token sourced from the process environment.
///
/// Never printed: `Debug` and `Display` are redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiToken(String);

impl ApiToken {
    /// Read the token from the named environment variable.
    pub fn from_env(var: &str) -> Result<Self> {
        Self::from_lookup(var, |key| std::env::var(key).ok())
    }

    /// Read the token through an arbitrary variable lookup.
    ///
    /// Surrounding whitespace is stripped; a missing or blank value is an
    /// authentication error.
    pub fn from_lookup<F>(var: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw = lookup(var)
            .ok_or_else(|| Error::Authentication(format!("{var} is not set")))?;
        Self::new(raw).map_err(|_| Error::Authentication(format!("{var} is blank")))
    }

    /// Wrap a literal token, rejecting blank values.
    pub fn new(raw: impl AsRef<str>) -> Result<Self> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(Error::Authentication("token is blank".to_string()));
        }
        Ok(ApiToken(trimmed.to_string()))
    }

    /// Value of the `Authorization` header.
    pub fn bearer_header(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiToken(<redacted>)")
    }
}

impl fmt::Display for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}
