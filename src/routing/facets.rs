//! Hostname facet parsing.
//!
//! # Responsibilities
//! - Split a hostname into labels, read from the root outward
//! - Extract the platform label and, when present, the region label
//! - Derive facets straight from a URL (domain hosts only)
//!
//! # Design Decisions
//! - The base suffix (registrable domain plus reserved label) has a fixed
//!   label count per deployment, carried by [`HostLayout`]
//! - A lone label above the suffix is always the platform, never a bare region
//! - Values are not validated against an allow-list; labels are taken verbatim
//! - Empty labels count as absent
//! - The root label of a fully-qualified name (`host.`) is not a label

use serde::Serialize;
use url::{Host, Url};

/// Labels in the default base suffix: `reserved.second.top`.
pub const DEFAULT_SUFFIX_LABELS: usize = 3;

/// Routing facets encoded in a hostname.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Facets {
    pub platform: Option<String>,
    pub region: Option<String>,
}

impl Facets {
    pub fn platform(&self) -> Option<&str> {
        self.platform.as_deref()
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }
}

/// Shape of the hostnames served by one deployment.
///
/// Reading labels right to left, the first `suffix_labels` labels are the
/// fixed base suffix. The next label is the region when a platform label sits
/// above it, otherwise it is the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HostLayout {
    suffix_labels: usize,
}

impl HostLayout {
    pub const fn new(suffix_labels: usize) -> Self {
        Self { suffix_labels }
    }

    pub fn suffix_labels(&self) -> usize {
        self.suffix_labels
    }

    /// Parse the platform and region out of a hostname.
    pub fn parse(&self, hostname: &str) -> Facets {
        let labels = reversed_labels(hostname);
        let slot = self.suffix_labels;

        match (label_at(&labels, slot), label_at(&labels, slot + 1)) {
            (Some(region), Some(platform)) => Facets {
                platform: Some(platform.to_string()),
                region: Some(region.to_string()),
            },
            (Some(platform), None) | (None, Some(platform)) => Facets {
                platform: Some(platform.to_string()),
                region: None,
            },
            (None, None) => Facets::default(),
        }
    }

    /// Facets of a URL's host. IP hosts and host-less URLs carry none.
    pub fn parse_url(&self, url: &Url) -> Facets {
        domain_of(url)
            .map(|domain| self.parse(domain))
            .unwrap_or_default()
    }

    /// The platform label, whether or not a region sits below it.
    pub(crate) fn platform_label<'a>(&self, labels: &[&'a str]) -> Option<&'a str> {
        label_at(labels, self.suffix_labels + 1).or_else(|| label_at(labels, self.suffix_labels))
    }
}

impl Default for HostLayout {
    fn default() -> Self {
        Self::new(DEFAULT_SUFFIX_LABELS)
    }
}

/// Parse facets using the default layout.
pub fn parse_facets(hostname: &str) -> Facets {
    HostLayout::default().parse(hostname)
}

/// Parse facets of an absolute URL using the default layout.
///
/// Unparseable input yields empty facets.
pub fn facets_of_url(href: &str) -> Facets {
    Url::parse(href)
        .map(|url| HostLayout::default().parse_url(&url))
        .unwrap_or_default()
}

/// Labels ordered from the top-level domain outward.
pub(crate) fn reversed_labels(hostname: &str) -> Vec<&str> {
    hostname
        .strip_suffix('.')
        .unwrap_or(hostname)
        .split('.')
        .rev()
        .collect()
}

pub(crate) fn label_at<'a>(labels: &[&'a str], index: usize) -> Option<&'a str> {
    labels.get(index).copied().filter(|label| !label.is_empty())
}

pub(crate) fn domain_of(url: &Url) -> Option<&str> {
    match url.host() {
        Some(Host::Domain(domain)) => Some(domain),
        _ => None,
    }
}
