//! Service base URL type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

use crate::error::{Error, InvalidInputError};

/// A validated base URL of a record service.
///
/// The URL must be absolute, use `http` or `https`, and have a host. A
/// path prefix is allowed for services mounted below the root; trailing
/// slashes are removed so endpoint paths can be appended directly.
///
/// # Example
///
/// ```
/// use pbase_core::BaseUrl;
///
/// let base = BaseUrl::new("http://127.0.0.1:8090/").unwrap();
/// assert_eq!(base.endpoint("/api/collections"),
///            "http://127.0.0.1:8090/api/collections");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BaseUrl(Url);

impl BaseUrl {
    /// Create a new base URL from a string, validating the format.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is not valid or doesn't meet requirements.
    pub fn new(s: impl AsRef<str>) -> Result<Self, Error> {
        let s = s.as_ref();
        let mut url = Url::parse(s).map_err(|e| InvalidInputError::BaseUrl {
            value: s.to_string(),
            reason: e.to_string(),
        })?;

        Self::validate(&url, s)?;

        url.set_query(None);
        url.set_fragment(None);
        let trimmed = url.path().trim_end_matches('/').to_string();
        url.set_path(&trimmed);

        Ok(Self(url))
    }

    /// Returns the absolute URL string for an endpoint path.
    ///
    /// `path` is expected to start with `/`.
    pub fn endpoint(&self, path: &str) -> String {
        let base = self.0.as_str().trim_end_matches('/');
        format!("{}{}", base, path)
    }

    /// Returns the endpoint as a parsed [`Url`], ready for query building.
    pub fn endpoint_url(&self, path: &str) -> Result<Url, Error> {
        let full = self.endpoint(path);
        Url::parse(&full).map_err(|e| {
            InvalidInputError::Other {
                message: format!("can't build URL '{}': {}", full, e),
            }
            .into()
        })
    }

    /// Returns the base URL as a string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the inner URL.
    pub fn as_url(&self) -> &Url {
        &self.0
    }

    /// Returns the host string.
    pub fn host(&self) -> Option<&str> {
        self.0.host_str()
    }

    fn validate(url: &Url, original: &str) -> Result<(), Error> {
        if url.cannot_be_a_base() {
            return Err(InvalidInputError::BaseUrl {
                value: original.to_string(),
                reason: "must be an absolute URL".to_string(),
            }
            .into());
        }

        if !matches!(url.scheme(), "http" | "https") {
            return Err(InvalidInputError::BaseUrl {
                value: original.to_string(),
                reason: "must use http or https".to_string(),
            }
            .into());
        }

        if url.host_str().is_none_or(str::is_empty) {
            return Err(InvalidInputError::BaseUrl {
                value: original.to_string(),
                reason: "must have a host".to_string(),
            }
            .into());
        }

        Ok(())
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str().trim_end_matches('/'))
    }
}

impl FromStr for BaseUrl {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for BaseUrl {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.0.as_str())
    }
}

impl<'de> Deserialize<'de> for BaseUrl {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        BaseUrl::new(&s).map_err(serde::de::Error::custom)
    }
}

impl AsRef<str> for BaseUrl {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_https_url() {
        let base = BaseUrl::new("https://pb.example.com").unwrap();
        assert_eq!(base.host(), Some("pb.example.com"));
    }

    #[test]
    fn plain_http_is_allowed() {
        let base = BaseUrl::new("http://10.0.0.7:8090").unwrap();
        assert_eq!(
            base.endpoint("/api/health"),
            "http://10.0.0.7:8090/api/health"
        );
    }

    #[test]
    fn normalizes_trailing_slash() {
        let base = BaseUrl::new("https://pb.example.com/").unwrap();
        assert_eq!(
            base.endpoint("/api/collections"),
            "https://pb.example.com/api/collections"
        );
        assert_eq!(base.to_string(), "https://pb.example.com");
    }

    #[test]
    fn keeps_path_prefix() {
        let base = BaseUrl::new("https://example.com/pb/").unwrap();
        assert_eq!(
            base.endpoint("/api/collections"),
            "https://example.com/pb/api/collections"
        );
    }

    #[test]
    fn drops_query_and_fragment() {
        let base = BaseUrl::new("https://example.com/?x=1#top").unwrap();
        assert_eq!(base.endpoint("/api"), "https://example.com/api");
    }

    #[test]
    fn rejects_other_schemes() {
        assert!(BaseUrl::new("ftp://example.com").is_err());
        assert!(BaseUrl::new("file:///tmp/pb").is_err());
    }

    #[test]
    fn rejects_relative_url() {
        assert!(BaseUrl::new("/api/collections").is_err());
    }

    #[test]
    fn endpoint_url_parses() {
        let base = BaseUrl::new("http://127.0.0.1:8090").unwrap();
        let url = base.endpoint_url("/api/files/token").unwrap();
        assert_eq!(url.path(), "/api/files/token");
    }
}
