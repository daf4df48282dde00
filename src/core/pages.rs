//! Maps a rewritten internal path onto the page the renderer should build.

use crate::domain::model::{ContentKind, RouteDecision};
use serde::Serialize;

pub const CORPORATE_SEGMENT: &str = "main";
const PORTFOLIO_SECTIONS: [&str; 4] = ["about", "experience", "services", "contact"];
const CORPORATE_SECTIONS: [&str; 1] = ["about"];

/// Which internal route tree a page belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SiteTree {
    Portfolio,
    Corporate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "page", rename_all = "snake_case")]
pub enum PageRequest {
    Home {
        tree: SiteTree,
    },
    Section {
        tree: SiteTree,
        name: String,
    },
    Listing {
        tree: SiteTree,
        kind: ContentKind,
    },
    Detail {
        tree: SiteTree,
        kind: ContentKind,
        slug: String,
    },
    App {
        segment: String,
        rest: String,
    },
    TenantPlaceholder {
        domain: String,
        rest: String,
    },
    NotFound,
}

/// Resolves a routing decision; redirects have no page and yield `None`.
pub fn resolve(decision: &RouteDecision, main_segment: &str) -> Option<PageRequest> {
    let page = match decision {
        RouteDecision::Redirect { .. } => return None,
        RouteDecision::Main { path, .. } => resolve_tree(path, main_segment, main_segment),
        RouteDecision::App { segment, path, .. } => resolve_tree(path, segment, main_segment),
        RouteDecision::Tenant { hostname, path, .. } => resolve_tenant(hostname, path),
    };
    Some(page)
}

fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// An app subdomain pointed at the main or corporate segment serves that tree.
fn resolve_tree(path: &str, segment: &str, main_segment: &str) -> PageRequest {
    let parts = segments(path);
    let rest = match parts.split_first() {
        Some((first, rest)) if *first == segment => rest,
        _ => return PageRequest::NotFound,
    };

    match segment {
        _ if segment == main_segment => resolve_portfolio(rest),
        CORPORATE_SEGMENT => resolve_corporate(rest),
        _ => PageRequest::App {
            segment: segment.to_string(),
            rest: rest.join("/"),
        },
    }
}

fn resolve_portfolio(rest: &[&str]) -> PageRequest {
    let tree = SiteTree::Portfolio;
    match rest {
        [] => PageRequest::Home { tree },
        ["blogs"] => PageRequest::Listing {
            tree,
            kind: ContentKind::Portfolio,
        },
        ["blogs", slug] => PageRequest::Detail {
            tree,
            kind: ContentKind::Portfolio,
            slug: slug.to_string(),
        },
        [name] if PORTFOLIO_SECTIONS.contains(name) => PageRequest::Section {
            tree,
            name: name.to_string(),
        },
        _ => PageRequest::NotFound,
    }
}

fn resolve_corporate(rest: &[&str]) -> PageRequest {
    let tree = SiteTree::Corporate;
    match rest {
        [] => PageRequest::Home { tree },
        ["blogs"] => PageRequest::Listing {
            tree,
            kind: ContentKind::Blog,
        },
        ["blogs", slug] => PageRequest::Detail {
            tree,
            kind: ContentKind::Blog,
            slug: slug.to_string(),
        },
        ["careers"] => PageRequest::Listing {
            tree,
            kind: ContentKind::Careers,
        },
        ["careers", slug] => PageRequest::Detail {
            tree,
            kind: ContentKind::Careers,
            slug: slug.to_string(),
        },
        [name] if CORPORATE_SECTIONS.contains(name) => PageRequest::Section {
            tree,
            name: name.to_string(),
        },
        _ => PageRequest::NotFound,
    }
}

/// `/<domain>` and `/<domain>/<slug>` render the placeholder; deeper paths do not exist.
fn resolve_tenant(hostname: &str, path: &str) -> PageRequest {
    let parts = segments(path);
    match parts.as_slice() {
        [domain] if *domain == hostname => PageRequest::TenantPlaceholder {
            domain: hostname.to_string(),
            rest: String::new(),
        },
        [domain, slug] if *domain == hostname => PageRequest::TenantPlaceholder {
            domain: hostname.to_string(),
            rest: slug.to_string(),
        },
        _ => PageRequest::NotFound,
    }
}
