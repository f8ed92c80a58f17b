//! Errors raised while rewriting URLs.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum UrlError {
    #[error("invalid URL {input:?}: {source}")]
    InvalidUrl {
        input: String,
        #[source]
        source: url::ParseError,
    },

    #[error("URL {0} has no domain host")]
    NotADomain(String),

    #[error("rewritten host {host:?} rejected: {source}")]
    InvalidHost {
        host: String,
        #[source]
        source: url::ParseError,
    },
}
