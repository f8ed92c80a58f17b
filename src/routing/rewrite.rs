//! Region rewriting of hostnames and URLs.
//!
//! # Responsibilities
//! - Rebuild a hostname as `platform.region.<suffix>` with a new region
//! - Drop the region label when no region is requested
//! - Rewrite only the host of a URL; scheme, port, path, query and fragment
//!   are carried over untouched

use url::Url;

use crate::routing::error::UrlError;
use crate::routing::facets::{domain_of, label_at, reversed_labels, HostLayout};

impl HostLayout {
    /// Rebuild `hostname` with `region` in the region slot.
    ///
    /// The platform keeps its position; an absent or empty region removes
    /// the region label. Labels above the platform are not part of the
    /// grammar and are not carried over. A fully-qualified name stays
    /// fully qualified.
    pub fn rewrite_host(&self, hostname: &str, region: Option<&str>) -> String {
        let labels = reversed_labels(hostname);
        let platform = self.platform_label(&labels);
        let region = region.filter(|r| !r.is_empty());
        let suffix = (0..self.suffix_labels())
            .rev()
            .filter_map(|index| label_at(&labels, index));

        let mut host = platform
            .into_iter()
            .chain(region)
            .chain(suffix)
            .collect::<Vec<_>>()
            .join(".");
        if hostname.ends_with('.') {
            host.push('.');
        }
        host
    }

    /// Rewrite the host of `url` for `region`.
    pub fn rewrite_url(&self, url: &Url, region: Option<&str>) -> Result<Url, UrlError> {
        let domain = domain_of(url).ok_or_else(|| UrlError::NotADomain(url.to_string()))?;
        let host = self.rewrite_host(domain, region);

        let mut rewritten = url.clone();
        rewritten
            .set_host(Some(host.as_str()))
            .map_err(|source| UrlError::InvalidHost { host, source })?;
        Ok(rewritten)
    }
}

/// Rewrite the host of an absolute URL string using the default layout.
pub fn encode_region(href: &str, region: Option<&str>) -> Result<String, UrlError> {
    let url = Url::parse(href).map_err(|source| UrlError::InvalidUrl {
        input: href.to_string(),
        source,
    })?;
    HostLayout::default()
        .rewrite_url(&url, region)
        .map(String::from)
}
