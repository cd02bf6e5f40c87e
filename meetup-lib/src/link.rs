use reqwest::Url;
use std::fmt;
use std::str::FromStr;

pub const SHORT_LINK_PREFIX: &str = "https://cmpf.re/";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    #[error("link is empty")]
    Empty,

    #[error("invalid link {link}: {reason}")]
    Malformed { link: String, reason: String },

    #[error("the link must start with {}, got {0}", SHORT_LINK_PREFIX)]
    ForeignDomain(String),
}

/// A meetup short link, checked locally before any network call is made.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShortLink(Url);

impl ShortLink {
    pub fn parse(input: &str) -> Result<Self, Error> {
        let input = input.trim();
        if input.is_empty() {
            return Err(Error::Empty);
        }
        let url = Url::parse(input).map_err(|e| Error::Malformed {
            link: input.to_string(),
            reason: e.to_string(),
        })?;
        if !url.as_str().starts_with(SHORT_LINK_PREFIX) {
            return Err(Error::ForeignDomain(url.to_string()));
        }
        Ok(Self(url))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Everything after the short link host, path and query included.
    pub fn code(&self) -> &str {
        self.0
            .as_str()
            .strip_prefix(SHORT_LINK_PREFIX)
            .unwrap_or_default()
    }

    /// The same short link served from another base, e.g. a local proxy.
    pub fn with_base(&self, base: &str) -> Result<Url, Error> {
        let rebased = format!("{}/{}", base.trim_end_matches('/'), self.code());
        Url::parse(&rebased).map_err(|e| Error::Malformed {
            link: rebased,
            reason: e.to_string(),
        })
    }
}

impl FromStr for ShortLink {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ShortLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
