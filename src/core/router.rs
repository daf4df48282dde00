//! Hostname based request routing.
//!
//! Every request is matched against an ordered rule list: historical
//! redirects, registered app subdomains, the main site, and finally the
//! tenant catch-all. The first rule that applies decides the outcome; the
//! tenant rule always applies, so each request gets exactly one decision.

use crate::config::toml_config::RoutingConfig;
use crate::domain::model::RouteDecision;
use regex::Regex;

/// Paths that never go through the router (framework internals, assets).
#[derive(Debug, Clone)]
pub struct BypassMatcher {
    prefixes: Vec<String>,
    asset: Regex,
}

impl BypassMatcher {
    pub fn new(prefixes: &[String]) -> Self {
        Self {
            prefixes: prefixes.to_vec(),
            // 根目錄下的檔案，例如 /favicon.ico、/robots.txt
            asset: Regex::new(r"^[\w-]+\.\w+").expect("static asset pattern is valid"),
        }
    }

    pub fn is_bypassed(&self, path: &str) -> bool {
        let relative = path.trim_start_matches('/');
        self.prefixes
            .iter()
            .any(|prefix| relative.starts_with(prefix.as_str()))
            || self.asset.is_match(relative)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Rule {
    Redirect { host: String, location: String },
    App { host: String, segment: String },
    Main { hosts: Vec<String>, segment: String },
    Tenant,
}

impl Rule {
    fn apply(&self, host: &str, path: &str, query: Option<&str>) -> Option<RouteDecision> {
        let query = query.map(str::to_string);
        match self {
            Rule::Redirect { host: h, location } if h == host => Some(RouteDecision::Redirect {
                location: location.clone(),
            }),
            Rule::App { host: h, segment } if h == host => Some(RouteDecision::App {
                segment: segment.clone(),
                path: prefix_path(segment, path),
                query,
            }),
            Rule::Main { hosts, segment } if hosts.iter().any(|h| h == host) => {
                if has_segment_prefix(segment, path) {
                    Some(RouteDecision::Main {
                        path: path.to_string(),
                        query,
                        passthrough: true,
                    })
                } else {
                    Some(RouteDecision::Main {
                        path: prefix_path(segment, path),
                        query,
                        passthrough: false,
                    })
                }
            }
            Rule::Tenant => Some(RouteDecision::Tenant {
                hostname: host.to_string(),
                path: format!("/{}{}", host, path),
                query,
            }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DomainRouter {
    root_domain: String,
    dev_suffix: Option<String>,
    preview_suffix: Option<String>,
    preview_separator: String,
    rules: Vec<Rule>,
    bypass: BypassMatcher,
}

impl DomainRouter {
    pub fn new(root_domain: &str, routing: &RoutingConfig) -> Self {
        let root_domain = root_domain.trim().to_ascii_lowercase();
        let mut rules = Vec::new();

        for redirect in &routing.redirects {
            rules.push(Rule::Redirect {
                host: redirect.host.to_ascii_lowercase(),
                location: redirect.location.clone(),
            });
        }

        for app in &routing.apps {
            rules.push(Rule::App {
                host: format!("{}.{}", app.subdomain.to_ascii_lowercase(), root_domain),
                segment: app.segment.clone(),
            });
        }

        let mut main_hosts = vec![root_domain.clone()];
        main_hosts.extend(routing.main_hosts.iter().map(|h| h.to_ascii_lowercase()));
        rules.push(Rule::Main {
            hosts: main_hosts,
            segment: routing.main_segment.clone(),
        });

        rules.push(Rule::Tenant);

        Self {
            root_domain,
            dev_suffix: Some(routing.dev_suffix.to_ascii_lowercase()).filter(|s| !s.is_empty()),
            preview_suffix: routing.preview_suffix.as_ref().map(|s| s.to_ascii_lowercase()),
            preview_separator: routing.preview_separator.clone(),
            rules,
            bypass: BypassMatcher::new(&routing.bypass_prefixes),
        }
    }

    pub fn root_domain(&self) -> &str {
        &self.root_domain
    }

    /// False for paths the router must leave alone (see [`BypassMatcher`]).
    pub fn should_route(&self, path: &str) -> bool {
        !self.bypass.is_bypassed(path)
    }

    /// Maps local-development and preview hostnames onto the root domain.
    pub fn normalize_host(&self, raw_host: &str) -> String {
        let mut host = raw_host.trim().to_ascii_lowercase();

        if let Some(suffix) = &self.dev_suffix {
            if let Some(stripped) = host.strip_suffix(suffix.as_str()) {
                host = format!("{}.{}", stripped, self.root_domain);
            }
        }

        if let Some(preview) = &self.preview_suffix {
            let preview_tail = format!(".{}", preview);
            if !self.preview_separator.is_empty()
                && host.contains(self.preview_separator.as_str())
                && host.ends_with(&preview_tail)
            {
                let project = host
                    .split(self.preview_separator.as_str())
                    .next()
                    .unwrap_or_default();
                host = format!("{}.{}", project, self.root_domain);
            }
        }

        host
    }

    pub fn route(&self, raw_host: &str, raw_path: &str, query: Option<&str>) -> RouteDecision {
        let host = self.normalize_host(raw_host);
        let path = normalize_path(raw_path);
        let query = query.filter(|q| !q.is_empty());

        let decision = self
            .rules
            .iter()
            .find_map(|rule| rule.apply(&host, &path, query))
            .unwrap_or_else(|| RouteDecision::Tenant {
                hostname: host.clone(),
                path: format!("/{}{}", host, path),
                query: query.map(str::to_string),
            });

        tracing::debug!(
            host = %raw_host,
            normalized = %host,
            path = %path,
            target = %decision.target(),
            "Routed request"
        );
        decision
    }
}

fn normalize_path(raw_path: &str) -> String {
    if raw_path.is_empty() {
        "/".to_string()
    } else if raw_path.starts_with('/') {
        raw_path.to_string()
    } else {
        format!("/{}", raw_path)
    }
}

/// `/` maps to the bare segment, anything else is appended.
fn prefix_path(segment: &str, path: &str) -> String {
    if path == "/" {
        format!("/{}", segment)
    } else {
        format!("/{}{}", segment, path)
    }
}

fn has_segment_prefix(segment: &str, path: &str) -> bool {
    match path.strip_prefix('/').and_then(|p| p.strip_prefix(segment)) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::toml_config::{AppRoute, RedirectRoute};

    fn routing() -> RoutingConfig {
        RoutingConfig {
            preview_suffix: Some("vercel.app".to_string()),
            main_hosts: vec!["localhost:3000".to_string(), "192.168.0.114:3000".to_string()],
            apps: vec![
                AppRoute {
                    subdomain: "photography".to_string(),
                    segment: "photography".to_string(),
                },
                AppRoute {
                    subdomain: "store".to_string(),
                    segment: "store".to_string(),
                },
                AppRoute {
                    subdomain: "blog".to_string(),
                    segment: "blog".to_string(),
                },
            ],
            redirects: vec![RedirectRoute {
                host: "vercel.pub".to_string(),
                location: "https://vercel.com/blog/platforms-starter-kit".to_string(),
            }],
            ..RoutingConfig::default()
        }
    }

    fn router() -> DomainRouter {
        DomainRouter::new("example.com", &routing())
    }

    #[test]
    fn test_app_subdomain_rewrite() {
        let router = router();
        for _ in 0..2 {
            let decision = router.route("photography.example.com", "/gallery", Some("page=2"));
            assert_eq!(
                decision,
                RouteDecision::App {
                    segment: "photography".to_string(),
                    path: "/photography/gallery".to_string(),
                    query: Some("page=2".to_string()),
                }
            );
        }
    }

    #[test]
    fn test_app_root_path_maps_to_bare_segment() {
        let decision = router().route("store.example.com", "/", None);
        assert_eq!(decision.rewritten_path(), Some("/store"));
    }

    #[test]
    fn test_main_domain_prefixes_path() {
        let decision = router().route("example.com", "/about", None);
        assert_eq!(
            decision,
            RouteDecision::Main {
                path: "/portfolio/about".to_string(),
                query: None,
                passthrough: false,
            }
        );
    }

    #[test]
    fn test_main_domain_existing_prefix_passes_through() {
        let decision = router().route("example.com", "/portfolio/about", None);
        assert_eq!(
            decision,
            RouteDecision::Main {
                path: "/portfolio/about".to_string(),
                query: None,
                passthrough: true,
            }
        );

        let decision = router().route("example.com", "/portfolio", None);
        assert_eq!(decision.rewritten_path(), Some("/portfolio"));
    }

    #[test]
    fn test_prefix_guard_respects_segment_boundary() {
        let decision = router().route("example.com", "/portfolios", None);
        assert_eq!(decision.rewritten_path(), Some("/portfolio/portfolios"));
    }

    #[test]
    fn test_main_rewrite_is_idempotent() {
        let router = router();
        for path in ["/", "/about", "/blogs/hello", "/portfolio", "/portfolio/x"] {
            let once = router.route("example.com", path, Some("q=1"));
            let once_path = once.rewritten_path().unwrap().to_string();
            let twice = router.route("example.com", &once_path, Some("q=1"));
            assert_eq!(twice.rewritten_path(), Some(once_path.as_str()), "{}", path);
            assert_eq!(twice.target(), once.target());
        }
    }

    #[test]
    fn test_loopback_hosts_are_main() {
        let router = router();
        let decision = router.route("localhost:3000", "/blogs", None);
        assert_eq!(decision.rewritten_path(), Some("/portfolio/blogs"));

        let decision = router.route("192.168.0.114:3000", "/", None);
        assert_eq!(decision.rewritten_path(), Some("/portfolio"));
    }

    #[test]
    fn test_unknown_host_goes_to_tenant() {
        let decision = router().route("unknown-tenant.test", "/anything", None);
        assert_eq!(
            decision,
            RouteDecision::Tenant {
                hostname: "unknown-tenant.test".to_string(),
                path: "/unknown-tenant.test/anything".to_string(),
                query: None,
            }
        );
    }

    #[test]
    fn test_redirect_host() {
        let decision = router().route("vercel.pub", "/anything", Some("x=1"));
        assert_eq!(
            decision,
            RouteDecision::Redirect {
                location: "https://vercel.com/blog/platforms-starter-kit".to_string(),
            }
        );
    }

    #[test]
    fn test_dev_suffix_normalization() {
        let router = router();
        assert_eq!(
            router.normalize_host("photography.localhost:3000"),
            "photography.example.com"
        );
        let decision = router.route("blog.localhost:3000", "/post", None);
        assert_eq!(decision.rewritten_path(), Some("/blog/post"));
    }

    #[test]
    fn test_preview_host_collapses_to_root_domain() {
        let router = router();
        assert_eq!(
            router.normalize_host("store---git-feature-team.vercel.app"),
            "store.example.com"
        );
        let decision = router.route("store---git-feature-team.vercel.app", "/cart", None);
        assert_eq!(decision.rewritten_path(), Some("/store/cart"));
    }

    #[test]
    fn test_host_matching_is_case_insensitive() {
        let decision = router().route("Photography.Example.COM", "/", None);
        assert_eq!(decision.rewritten_path(), Some("/photography"));
    }

    #[test]
    fn test_empty_query_is_dropped() {
        let decision = router().route("example.com", "/about", Some(""));
        assert_eq!(decision.query(), None);
        assert_eq!(decision.target(), "/portfolio/about");
    }

    #[test]
    fn test_bypass_matcher() {
        let router = router();
        assert!(!router.should_route("/api/contact-email"));
        assert!(!router.should_route("/_next/static/chunk.js"));
        assert!(!router.should_route("/favicon.ico"));
        assert!(!router.should_route("/images/hero.png"));
        assert!(router.should_route("/"));
        assert!(router.should_route("/blogs/hello-world"));
        assert!(router.should_route("/apiary"));
    }
}
