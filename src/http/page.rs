//! Region page rendering.
//!
//! Shown when no redirect is needed: the parsed facets of the request and
//! the referrer, followed by link sections for every configured region plus
//! a regionless one. Links keep the current platform and are produced by the
//! host rewriter, so following one exercises the redirect logic.

use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use url::Url;

use crate::config::PageConfig;
use crate::routing::{Evaluation, Facets, HostLayout};

const ABSENT: &str = "(none)";

/// View model for the region page.
#[derive(Template)]
#[template(path = "region_page.html")]
pub struct RegionPage {
    pub title: String,
    pub request_href: String,
    pub request_platform: String,
    pub request_region: String,
    pub referer_href: String,
    pub referer_region: String,
    pub sections: Vec<LinkSection>,
}

pub struct LinkSection {
    pub title: String,
    pub links: Vec<PageLink>,
}

pub struct PageLink {
    pub label: String,
    pub href: String,
}

impl RegionPage {
    pub fn build(
        layout: &HostLayout,
        page: &PageConfig,
        request: &Url,
        referer: Option<&str>,
        evaluation: &Evaluation,
    ) -> Self {
        let mut sections: Vec<LinkSection> = page
            .regions
            .iter()
            .map(|region| {
                link_section(layout, request, Some(region.as_str()), format!("Region {region}"), &page.paths)
            })
            .collect();
        sections.push(link_section(layout, request, None, "Generic".to_string(), &page.paths));

        Self {
            title: page.title.clone(),
            request_href: request.to_string(),
            request_platform: display(evaluation.request.platform()),
            request_region: display(evaluation.request.region()),
            referer_href: display(referer),
            referer_region: display(evaluation.referer.as_ref().and_then(Facets::region)),
            sections,
        }
    }
}

fn link_section(
    layout: &HostLayout,
    request: &Url,
    region: Option<&str>,
    title: String,
    paths: &[String],
) -> LinkSection {
    let links = paths
        .iter()
        .filter_map(|path| {
            let target = request.join(path).ok()?;
            let href = layout.rewrite_url(&target, region).ok()?;
            Some(PageLink {
                label: if path == "/" { "Home".to_string() } else { path.clone() },
                href: href.into(),
            })
        })
        .collect();

    LinkSection { title, links }
}

fn display(value: Option<&str>) -> String {
    value.unwrap_or(ABSENT).to_string()
}

/// Render the page, falling back to a plain 500 if the template fails.
pub fn render_page(page: &RegionPage) -> Response {
    match page.render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Page rendering failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Page rendering error").into_response()
        }
    }
}
