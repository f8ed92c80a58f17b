//! Redirect decision.
//!
//! # Responsibilities
//! - Compare the region of the request host with the region of the referrer
//! - Produce the region-qualified target URL when they differ
//!
//! # Design Decisions
//! - Stateless: every request is evaluated on its own inputs
//! - Total: malformed input never fails, it just yields `NoRedirect`
//! - The target is whatever the rewriter builds for the referrer's region;
//!   only hosts the rewriter rejects (IP addresses) yield `NoRedirect`

use url::Url;

use crate::routing::facets::{Facets, HostLayout};

/// Outcome of evaluating one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectDecision {
    NoRedirect,
    RedirectTo(String),
}

impl RedirectDecision {
    pub fn target(&self) -> Option<&str> {
        match self {
            RedirectDecision::NoRedirect => None,
            RedirectDecision::RedirectTo(target) => Some(target),
        }
    }
}

/// Everything the transport needs to answer a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub request: Facets,
    /// `None` when no usable referrer was supplied.
    pub referer: Option<Facets>,
    pub decision: RedirectDecision,
}

impl HostLayout {
    /// Evaluate a request URL against an optional referrer.
    ///
    /// A referrer that is not a valid absolute URL is treated as absent.
    pub fn evaluate(&self, request: &Url, referer: Option<&str>) -> Evaluation {
        let request_facets = self.parse_url(request);
        let referer_facets = referer
            .and_then(|href| Url::parse(href).ok())
            .map(|url| self.parse_url(&url));

        let decision = self.decide_facets(request, &request_facets, referer_facets.as_ref());

        Evaluation {
            request: request_facets,
            referer: referer_facets,
            decision,
        }
    }

    fn decide_facets(
        &self,
        request: &Url,
        request_facets: &Facets,
        referer_facets: Option<&Facets>,
    ) -> RedirectDecision {
        let Some(wanted) = referer_facets.and_then(Facets::region) else {
            return RedirectDecision::NoRedirect;
        };

        if request_facets.region() == Some(wanted) {
            return RedirectDecision::NoRedirect;
        }

        match self.rewrite_url(request, Some(wanted)) {
            Ok(target) => RedirectDecision::RedirectTo(target.into()),
            Err(_) => RedirectDecision::NoRedirect,
        }
    }
}

/// Decide whether `request_url` must be redirected, using the default layout.
pub fn decide(request_url: &str, referer_url: Option<&str>) -> RedirectDecision {
    decide_with(&HostLayout::default(), request_url, referer_url)
}

/// Decide whether `request_url` must be redirected under `layout`.
pub fn decide_with(layout: &HostLayout, request_url: &str, referer_url: Option<&str>) -> RedirectDecision {
    match Url::parse(request_url) {
        Ok(request) => layout.evaluate(&request, referer_url).decision,
        Err(_) => RedirectDecision::NoRedirect,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn redirect(target: &str) -> RedirectDecision {
        RedirectDecision::RedirectTo(target.to_string())
    }

    #[test]
    fn test_redirects_into_referrer_region() {
        assert_eq!(
            decide(
                "https://app.buttermilk-waffles.devon.pizza/foo",
                Some("https://app.ca.buttermilk-waffles.devon.pizza/")
            ),
            redirect("https://app.ca.buttermilk-waffles.devon.pizza/foo")
        );
    }

    #[test]
    fn test_switches_between_regions() {
        assert_eq!(
            decide(
                "https://app.us.buttermilk-waffles.devon.pizza/bar?q=1",
                Some("https://app.ca.buttermilk-waffles.devon.pizza/")
            ),
            redirect("https://app.ca.buttermilk-waffles.devon.pizza/bar?q=1")
        );
    }

    #[test]
    fn test_keeps_request_platform() {
        assert_eq!(
            decide(
                "https://admin.buttermilk-waffles.devon.pizza/",
                Some("https://app.ca.buttermilk-waffles.devon.pizza/")
            ),
            redirect("https://admin.ca.buttermilk-waffles.devon.pizza/")
        );
    }

    #[test]
    fn test_matching_regions() {
        assert_eq!(
            decide(
                "https://app.ca.buttermilk-waffles.devon.pizza/",
                Some("https://app.ca.buttermilk-waffles.devon.pizza/bar")
            ),
            RedirectDecision::NoRedirect
        );
    }

    #[test]
    fn test_no_referrer() {
        assert_eq!(
            decide("https://app.buttermilk-waffles.devon.pizza/", None),
            RedirectDecision::NoRedirect
        );
    }

    #[test]
    fn test_regionless_referrer_does_not_strip_region() {
        assert_eq!(
            decide(
                "https://app.ca.buttermilk-waffles.devon.pizza/",
                Some("https://app.buttermilk-waffles.devon.pizza/")
            ),
            RedirectDecision::NoRedirect
        );
    }

    #[test]
    fn test_malformed_inputs_fail_open() {
        assert_eq!(
            decide("https://app.buttermilk-waffles.devon.pizza/", Some("::garbage::")),
            RedirectDecision::NoRedirect
        );
        assert_eq!(
            decide("not a url", Some("https://app.ca.buttermilk-waffles.devon.pizza/")),
            RedirectDecision::NoRedirect
        );
    }

    #[test]
    fn test_short_hosts_settle_after_two_hops() {
        let referer = Some("https://app.ca.buttermilk-waffles.devon.pizza/");

        let first = decide("https://buttermilk-waffles.devon.pizza/foo", referer);
        assert_eq!(first, redirect("https://ca.buttermilk-waffles.devon.pizza/foo"));

        let second = decide(first.target().unwrap(), referer);
        assert_eq!(second, redirect("https://ca.ca.buttermilk-waffles.devon.pizza/foo"));

        assert_eq!(decide(second.target().unwrap(), referer), RedirectDecision::NoRedirect);
    }

    #[test]
    fn test_ip_hosts_never_redirect() {
        let referer = Some("https://app.ca.buttermilk-waffles.devon.pizza/");
        assert_eq!(decide("http://127.0.0.1:8787/", referer), RedirectDecision::NoRedirect);
        assert_eq!(decide("http://[::1]:8787/", referer), RedirectDecision::NoRedirect);
    }

    #[test]
    fn test_fully_qualified_hosts() {
        assert_eq!(
            decide(
                "https://app.buttermilk-waffles.devon.pizza/",
                Some("https://app.ca.buttermilk-waffles.devon.pizza./")
            ),
            redirect("https://app.ca.buttermilk-waffles.devon.pizza/")
        );
        assert_eq!(
            decide(
                "https://app.buttermilk-waffles.devon.pizza./foo",
                Some("https://app.ca.buttermilk-waffles.devon.pizza/")
            ),
            redirect("https://app.ca.buttermilk-waffles.devon.pizza./foo")
        );
        assert_eq!(
            decide(
                "https://app.ca.buttermilk-waffles.devon.pizza./",
                Some("https://app.ca.buttermilk-waffles.devon.pizza/")
            ),
            RedirectDecision::NoRedirect
        );
    }

    #[test]
    fn test_redirect_target_is_stable() {
        let referer = Some("https://app.ca.buttermilk-waffles.devon.pizza/");
        let first = decide("https://app.buttermilk-waffles.devon.pizza/foo", referer);
        let target = first.target().unwrap();
        assert_eq!(decide(target, referer), RedirectDecision::NoRedirect);
    }

    #[test]
    fn test_evaluation_carries_facets() {
        let layout = HostLayout::default();
        let request = Url::parse("https://app.buttermilk-waffles.devon.pizza/").unwrap();
        let evaluation = layout.evaluate(&request, Some("https://app.ca.buttermilk-waffles.devon.pizza/"));

        assert_eq!(evaluation.request.platform(), Some("app"));
        assert_eq!(evaluation.request.region(), None);
        assert_eq!(evaluation.referer.as_ref().and_then(Facets::region), Some("ca"));
        assert!(evaluation.decision.target().is_some());

        let evaluation = layout.evaluate(&request, Some("%%%"));
        assert_eq!(evaluation.referer, None);
        assert_eq!(evaluation.decision, RedirectDecision::NoRedirect);
    }
}
